//! Executes lambda-calculus expressions given in the box-tree representation
//! by repeated single-step beta reduction.

use thiserror::Error;
use tracing::debug;

use crate::box_tree_impl::box_tree_ast::ExprNode;
use crate::box_tree_impl::box_tree_substitution::substitute;

/// Which subterms a reduction pass is allowed to look inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionStrategy {
    /// Leftmost-outermost redex anywhere in the tree. Reaches the normal form
    /// whenever one exists.
    #[default]
    Normal,
    /// Call-by-name to weak head normal form: only the function position of
    /// applications is searched, never abstraction bodies or arguments.
    Lazy,
}

/// Bookkeeping for a single `reduce_step` pass.
#[derive(Debug, Default)]
struct ReductionContext {
    reduced: bool,
}

/// Errors raised while driving reduction to a normal form.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("No normal form reached after {max_steps} reduction steps. Last expression: {last_expr}")]
    StepLimitExceeded {
        max_steps: usize,
        last_expr: ExprNode,
    },
}

/// Represents the result of driving an expression to normal form.
#[derive(Debug, PartialEq, Eq)]
pub struct Normalization {
    pub normal_form: ExprNode,
    pub num_steps: usize,
}

// Rebuilds `expr_body`, contracting the first redex found in traversal order
// unless one has already been contracted during this pass.
fn reduce_helper(
    expr_body: &ExprNode,
    strategy: ReductionStrategy,
    context: &mut ReductionContext,
) -> ExprNode {
    if context.reduced {
        return expr_body.clone();
    }

    match expr_body {
        ExprNode::Var { .. } => {
            return expr_body.clone();
        }

        ExprNode::FnApp {
            fn_body,
            actual_arg,
        } => {
            // The function being applied is a function definition, so we are
            // at a redex.
            if let ExprNode::FnDef {
                formal_param,
                fn_body: defined_fn,
            } = &**fn_body
            {
                context.reduced = true;
                return substitute(formal_param, actual_arg, defined_fn);
            }

            let new_fn_body = reduce_helper(fn_body, strategy, context);
            let new_actual_arg = match strategy {
                ReductionStrategy::Normal => reduce_helper(actual_arg, strategy, context),
                ReductionStrategy::Lazy => (**actual_arg).clone(),
            };

            return ExprNode::FnApp {
                fn_body: Box::new(new_fn_body),
                actual_arg: Box::new(new_actual_arg),
            };
        }

        ExprNode::FnDef {
            formal_param,
            fn_body,
        } => match strategy {
            ReductionStrategy::Normal => {
                return ExprNode::FnDef {
                    formal_param: formal_param.clone(),
                    fn_body: Box::new(reduce_helper(fn_body, strategy, context)),
                };
            }
            ReductionStrategy::Lazy => {
                return expr_body.clone();
            }
        },
    };
}

/// Performs at most one beta reduction on `expr_body`, choosing the
/// leftmost-outermost redex that `strategy` allows. Returns the new
/// expression and whether a reduction happened; `false` means `expr_body` is
/// already normal under `strategy` and is returned unchanged.
pub fn reduce_step(expr_body: &ExprNode, strategy: ReductionStrategy) -> (ExprNode, bool) {
    let mut context = ReductionContext::default();
    let new_expr = reduce_helper(expr_body, strategy, &mut context);
    return (new_expr, context.reduced);
}

/// Calls `reduce_step` until nothing changes. `observer` sees the input and
/// then every intermediate expression along with its step number. With
/// `max_steps` set, gives up once that many reductions have been performed
/// without reaching a normal form.
pub fn normalize<F>(
    expr_body: ExprNode,
    strategy: ReductionStrategy,
    max_steps: Option<usize>,
    mut observer: F,
) -> Result<Normalization, ExecutionError>
where
    F: FnMut(usize, &ExprNode),
{
    let mut curr_expr = expr_body;
    let mut num_steps = 0;

    observer(num_steps, &curr_expr);

    loop {
        let (new_expr, reduced) = reduce_step(&curr_expr, strategy);

        if !reduced {
            return Ok(Normalization {
                normal_form: curr_expr,
                num_steps,
            });
        }

        if let Some(max_steps) = max_steps {
            if num_steps >= max_steps {
                return Err(ExecutionError::StepLimitExceeded {
                    max_steps,
                    last_expr: curr_expr,
                });
            }
        }

        num_steps += 1;
        curr_expr = new_expr;

        debug!(step = num_steps, expr = %curr_expr, "reduced");
        observer(num_steps, &curr_expr);
    }
}
