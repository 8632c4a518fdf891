//! Capture-avoiding substitution (alpha conversion) over box-tree
//! expressions.

use std::collections::HashSet;

use crate::box_tree_impl::box_tree_ast::{get_free_variables, ExprNode};

/// Endless supply of candidate variable names in lexicographic order:
/// `a`, `b`, ..., `z`, `aa`, `ab`, ...
#[derive(Debug, Clone, Default)]
pub struct FreshNames {
    current: String,
}

impl FreshNames {
    pub fn new() -> Self {
        return Self::default();
    }

    // Bumps `current` to its successor, carrying past 'z' like an odometer.
    fn increment(&mut self) {
        match self.current.pop() {
            None => self.current.push('a'),
            Some('z') => {
                self.increment();
                self.current.push('a');
            }
            Some(c) => self.current.push((c as u8 + 1) as char),
        }
    }
}

impl Iterator for FreshNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.increment();
        return Some(self.current.clone());
    }
}

/// Picks the first name from `FreshNames` that is not in `vars_to_avoid`.
pub fn choose_fresh_name(vars_to_avoid: &HashSet<&str>) -> String {
    return FreshNames::new()
        .find(|candidate| !vars_to_avoid.contains(candidate.as_str()))
        .unwrap_or_default();
}

/// Given an abstraction `λformal_param.fn_body` that would capture a free
/// variable of the value being substituted for `var_name`, returns a fresh
/// parameter name and the body with `formal_param` renamed to it.
///
/// The fresh name must differ from `var_name` too, or the substitution that
/// follows would replace the renamed bound occurrences.
fn perform_alpha_conversion(
    formal_param: &str,
    fn_body: &ExprNode,
    var_name: &str,
    var_value_free_vars: &HashSet<&str>,
) -> (String, ExprNode) {
    let mut vars_to_avoid = get_free_variables(fn_body);
    vars_to_avoid.insert(formal_param);
    vars_to_avoid.insert(var_name);
    vars_to_avoid.extend(var_value_free_vars.iter().copied());

    let new_formal_param = choose_fresh_name(&vars_to_avoid);

    let new_var = ExprNode::var(new_formal_param.as_str());
    let new_var_free_vars = HashSet::from([new_formal_param.as_str()]);
    let renamed_fn_body = substitute_helper(fn_body, formal_param, &new_var, &new_var_free_vars);

    return (new_formal_param, renamed_fn_body);
}

// Builds a copy of `expr_body` with free occurrences of `var_name` replaced by
// `var_value`, renaming binders that would capture `var_value_free_vars`.
fn substitute_helper(
    expr_body: &ExprNode,
    var_name: &str,
    var_value: &ExprNode,
    var_value_free_vars: &HashSet<&str>,
) -> ExprNode {
    match expr_body {
        ExprNode::Var {
            var_name: curr_var_name,
        } => {
            if curr_var_name == var_name {
                return var_value.clone();
            }

            return expr_body.clone();
        }

        ExprNode::FnApp {
            fn_body,
            actual_arg,
        } => {
            return ExprNode::FnApp {
                fn_body: Box::new(substitute_helper(
                    fn_body,
                    var_name,
                    var_value,
                    var_value_free_vars,
                )),
                actual_arg: Box::new(substitute_helper(
                    actual_arg,
                    var_name,
                    var_value,
                    var_value_free_vars,
                )),
            };
        }

        ExprNode::FnDef {
            formal_param,
            fn_body,
        } => {
            // var_name is shadowed, so nothing below here refers to it.
            if formal_param == var_name {
                return expr_body.clone();
            }

            if var_value_free_vars.contains(formal_param.as_str()) {
                let (new_formal_param, renamed_fn_body) =
                    perform_alpha_conversion(formal_param, fn_body, var_name, var_value_free_vars);

                return ExprNode::FnDef {
                    formal_param: new_formal_param,
                    fn_body: Box::new(substitute_helper(
                        &renamed_fn_body,
                        var_name,
                        var_value,
                        var_value_free_vars,
                    )),
                };
            }

            return ExprNode::FnDef {
                formal_param: formal_param.clone(),
                fn_body: Box::new(substitute_helper(
                    fn_body,
                    var_name,
                    var_value,
                    var_value_free_vars,
                )),
            };
        }
    };
}

/// Computes `expr_body[var_value/var_name]`: a new tree in which every free
/// occurrence of `var_name` is replaced by `var_value`, with bound variables
/// renamed wherever they would otherwise capture a free variable of
/// `var_value`. Neither input is modified.
pub fn substitute(var_name: &str, var_value: &ExprNode, expr_body: &ExprNode) -> ExprNode {
    let var_value_free_vars = get_free_variables(var_value);
    return substitute_helper(expr_body, var_name, var_value, &var_value_free_vars);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::box_tree_impl::box_tree_recursive_descent_parsing::parse_recursive_descent;

    use super::*;

    // Parses a test expression, panicking on failure.
    fn parse(program_str: &str) -> ExprNode {
        return parse_recursive_descent(program_str).expect("Unable to parse test expression.");
    }

    // Builds a random expression over a small alphabet so names collide often.
    fn random_expr(rng: &mut StdRng, depth: usize) -> ExprNode {
        const NAMES: [&str; 4] = ["a", "b", "x", "y"];
        let name = NAMES[rng.gen_range(0..NAMES.len())];

        if depth == 0 {
            return ExprNode::var(name);
        }

        match rng.gen_range(0..3) {
            0 => return ExprNode::var(name),
            1 => {
                return ExprNode::fn_app(
                    random_expr(rng, depth - 1),
                    random_expr(rng, depth - 1),
                )
            }
            _ => return ExprNode::fn_def(name, random_expr(rng, depth - 1)),
        }
    }

    // Test that the fresh name supply enumerates in lexicographic order.
    #[test]
    fn test_fresh_names_order() {
        let names: Vec<String> = FreshNames::new().take(28).collect();

        assert_eq!(names[0], "a");
        assert_eq!(names[25], "z");
        assert_eq!(names[26], "aa");
        assert_eq!(names[27], "ab");

        let after_zz = FreshNames::new().nth(26 + 26 * 26).expect("FreshNames is endless.");
        assert_eq!(after_zz, "aaa");
    }

    // Test that the first unused name is chosen.
    #[test]
    fn test_choose_fresh_name() {
        assert_eq!(choose_fresh_name(&HashSet::new()), "a");
        assert_eq!(choose_fresh_name(&HashSet::from(["a", "b", "d"])), "c");
    }

    // Test simple substitutions that need no renaming.
    #[test]
    fn test_substitute_simple() {
        let cases = vec![
            ("x", "y", "x", "y"),
            ("x", "y", "z", "z"),
            ("x", "(f g)", "(x x)", "((f g) (f g))"),
            ("x", "a", "λy.x", "λy.a"),
            // Shadowed occurrences are left alone.
            ("x", "a", "λx.x", "λx.x"),
            ("x", "a", "(x λx.x)", "(a λx.x)"),
        ];

        for (var_name, var_value, expr_body, expected) in cases {
            let result = substitute(var_name, &parse(var_value), &parse(expr_body));
            assert_eq!(result.to_string(), expected);
        }
    }

    // Test that a binder that would capture the value is renamed first.
    #[test]
    fn test_substitute_renames_capturing_binder() {
        let cases = vec![
            ("x", "y", "λy.x", "λa.y"),
            ("x", "y", "λy.(x y)", "λa.(y a)"),
            // 'a' is free in the value, so the rename must skip it.
            ("x", "(y a)", "λy.(x y)", "λb.((y a) b)"),
            // The body already mentions 'a' freely.
            ("x", "y", "λy.((x y) a)", "λb.((y b) a)"),
            // Renaming reaches through an inner binder for another name.
            ("x", "y", "λy.λz.(x (y z))", "λa.λz.(y (a z))"),
            // The target itself is never chosen as the fresh name.
            ("a", "y", "λy.y", "λb.b"),
            ("a", "(y b)", "λy.(y a)", "λc.(c (y b))"),
        ];

        for (var_name, var_value, expr_body, expected) in cases {
            let result = substitute(var_name, &parse(var_value), &parse(expr_body));
            assert_eq!(result.to_string(), expected);
        }
    }

    // Test that inputs are not modified.
    #[test]
    fn test_substitute_leaves_inputs_intact() {
        let var_value = parse("y");
        let expr_body = parse("λy.(x y)");

        let _ = substitute("x", &var_value, &expr_body);

        assert_eq!(var_value, parse("y"));
        assert_eq!(expr_body, parse("λy.(x y)"));
    }

    // Test that substituting a variable for itself changes nothing.
    #[test]
    fn test_substitution_identity() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let expr_body = random_expr(&mut rng, 6);

            for var_name in ["a", "b", "x", "y"] {
                let result = substitute(var_name, &ExprNode::var(var_name), &expr_body);
                assert_eq!(result, expr_body, "substituting {} in {}", var_name, expr_body);
            }
        }
    }

    // Test that no free variable of the value ends up bound after
    // substitution.
    #[test]
    fn test_substitution_capture_freedom() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let expr_body = random_expr(&mut rng, 6);
            let var_value = random_expr(&mut rng, 3);

            for var_name in ["a", "x"] {
                let marker_value = ExprNode::fn_app(var_value.clone(), ExprNode::var("marker"));
                let result = substitute(var_name, &marker_value, &expr_body);

                let value_free_vars = get_free_variables(&marker_value);
                let body_free_vars = get_free_variables(&expr_body);

                // Free variables after substitution are exactly the ones we
                // expect; a capture would make some disappear.
                let mut expected_free_vars: HashSet<&str> = body_free_vars.clone();
                if body_free_vars.contains(var_name) {
                    expected_free_vars.remove(var_name);
                    expected_free_vars.extend(value_free_vars.iter().copied());
                }

                assert_eq!(
                    get_free_variables(&result),
                    expected_free_vars,
                    "substituting {} for {} in {}",
                    marker_value,
                    var_name,
                    expr_body
                );
            }
        }
    }
}
