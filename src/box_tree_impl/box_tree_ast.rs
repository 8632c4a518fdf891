//! Data structures to represent lambda calculus expressions, and some utility
//! functions to display and inspect them.

use std::collections::HashSet;

/// Lambda glyph used for rendering by default.
pub const LAMBDA_GLYPH: char = 'λ';

/// ASCII stand-in for the lambda glyph.
pub const ASCII_LAMBDA_GLYPH: char = '@';

/// Represents a lambda-calculus expression.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ExprNode {
    FnDef {
        formal_param: String,
        fn_body: Box<ExprNode>,
    },
    FnApp {
        fn_body: Box<ExprNode>,
        actual_arg: Box<ExprNode>,
    },
    Var {
        var_name: String,
    },
}

impl ExprNode {
    pub fn var(var_name: &str) -> Self {
        return ExprNode::Var {
            var_name: String::from(var_name),
        };
    }

    pub fn fn_app(fn_body: ExprNode, actual_arg: ExprNode) -> Self {
        return ExprNode::FnApp {
            fn_body: Box::new(fn_body),
            actual_arg: Box::new(actual_arg),
        };
    }

    pub fn fn_def(formal_param: &str, fn_body: ExprNode) -> Self {
        return ExprNode::FnDef {
            formal_param: String::from(formal_param),
            fn_body: Box::new(fn_body),
        };
    }
}

// Helper function to produce a string representation of an ExprNode.
fn expr_node_to_string_helper(expr_node: &ExprNode, lambda_glyph: char, string_so_far: &mut String) {
    match expr_node {
        ExprNode::Var { var_name } => {
            string_so_far.push_str(var_name.as_str());
        }
        ExprNode::FnApp {
            fn_body,
            actual_arg,
        } => {
            string_so_far.push('(');
            expr_node_to_string_helper(fn_body, lambda_glyph, string_so_far);
            string_so_far.push(' ');
            expr_node_to_string_helper(actual_arg, lambda_glyph, string_so_far);
            string_so_far.push(')');
        }
        ExprNode::FnDef {
            formal_param,
            fn_body,
        } => {
            string_so_far.push(lambda_glyph);
            string_so_far.push_str(formal_param.as_str());
            string_so_far.push('.');
            expr_node_to_string_helper(fn_body, lambda_glyph, string_so_far);
        }
    };
}

/// Converts an expr node to its canonical string form, writing abstractions
/// with the given lambda glyph.
pub fn expr_node_to_string(expr_node: &ExprNode, lambda_glyph: char) -> String {
    let mut out_string = String::new();
    expr_node_to_string_helper(expr_node, lambda_glyph, &mut out_string);
    return out_string;
}

// Display trait implementation for ExprNode using expr_node_to_string function.
impl std::fmt::Display for ExprNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", expr_node_to_string(self, LAMBDA_GLYPH).as_str());
    }
}

/// Computes the free variables in the given lambda calculus expression.
pub fn get_free_variables(expr_body: &ExprNode) -> HashSet<&str> {
    match expr_body {
        ExprNode::Var { var_name } => {
            return HashSet::from([var_name.as_str()]);
        }
        ExprNode::FnApp {
            fn_body,
            actual_arg,
        } => {
            let fn_body_free_vars = get_free_variables(fn_body);
            let actual_arg_free_vars = get_free_variables(actual_arg);

            return fn_body_free_vars
                .union(&actual_arg_free_vars)
                .copied()
                .collect();
        }
        ExprNode::FnDef {
            formal_param,
            fn_body,
        } => {
            let mut fn_body_free_vars = get_free_variables(fn_body);
            fn_body_free_vars.remove(formal_param.as_str());
            return fn_body_free_vars;
        }
    };
}

/// Computes the names bound by some abstraction in the given lambda calculus
/// expression.
pub fn get_bound_variables(expr_body: &ExprNode) -> HashSet<&str> {
    match expr_body {
        ExprNode::Var { .. } => {
            return HashSet::new();
        }
        ExprNode::FnApp {
            fn_body,
            actual_arg,
        } => {
            let fn_body_bound_vars = get_bound_variables(fn_body);
            let actual_arg_bound_vars = get_bound_variables(actual_arg);

            return fn_body_bound_vars
                .union(&actual_arg_bound_vars)
                .copied()
                .collect();
        }
        ExprNode::FnDef {
            formal_param,
            fn_body,
        } => {
            let mut fn_body_bound_vars = get_bound_variables(fn_body);
            fn_body_bound_vars.insert(formal_param.as_str());
            return fn_body_bound_vars;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // λn.λf.λx.(f ((n f) x)), the successor function on Church numerals.
    fn church_succ() -> ExprNode {
        return ExprNode::fn_def(
            "n",
            ExprNode::fn_def(
                "f",
                ExprNode::fn_def(
                    "x",
                    ExprNode::fn_app(
                        ExprNode::var("f"),
                        ExprNode::fn_app(
                            ExprNode::fn_app(ExprNode::var("n"), ExprNode::var("f")),
                            ExprNode::var("x"),
                        ),
                    ),
                ),
            ),
        );
    }

    #[test]
    fn test_expr_node_to_string_1() {
        let expected_output = "λn.λf.λx.(f ((n f) x))";

        assert_eq!(expected_output, format!("{}", church_succ()).as_str());
    }

    // Test rendering with the ASCII lambda.
    #[test]
    fn test_expr_node_to_string_ascii() {
        let test_input = ExprNode::fn_app(
            ExprNode::fn_def("x", ExprNode::var("x")),
            ExprNode::var("y"),
        );

        assert_eq!(
            expr_node_to_string(&test_input, ASCII_LAMBDA_GLYPH),
            "(@x.x y)"
        );
    }

    // Test free and bound variable sets on a few expressions.
    #[test]
    fn test_free_and_bound_variables() {
        // (λx.(x y) λy.(y z)): free {y, z}, bound {x, y}.
        let mixed = ExprNode::fn_app(
            ExprNode::fn_def("x", ExprNode::fn_app(ExprNode::var("x"), ExprNode::var("y"))),
            ExprNode::fn_def("y", ExprNode::fn_app(ExprNode::var("y"), ExprNode::var("z"))),
        );

        let exprs_and_expected_sets = vec![
            (ExprNode::var("v"), vec!["v"], vec![]),
            (church_succ(), vec![], vec!["n", "f", "x"]),
            (mixed, vec!["y", "z"], vec!["x", "y"]),
        ];

        for (expr, expected_free, expected_bound) in exprs_and_expected_sets {
            assert_eq!(get_free_variables(&expr), HashSet::from_iter(expected_free));
            assert_eq!(get_bound_variables(&expr), HashSet::from_iter(expected_bound));
        }
    }
}
