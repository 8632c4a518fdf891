//! Code to configure and run the interpreter on an expression, a source file,
//! or interactively.

use std::fs;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::Editor;
use thiserror::Error;
use tracing::{info, warn};

use crate::box_tree_impl::box_tree_ast::{expr_node_to_string, ASCII_LAMBDA_GLYPH, LAMBDA_GLYPH};
use crate::box_tree_impl::box_tree_execution::{normalize, ExecutionError, ReductionStrategy};
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{self, ParseError};

/// Step bound used unless `--max-steps` says otherwise.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Input that ends the interactive session.
pub const QUIT_COMMAND: &str = "quit";

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// Expression to evaluate. Without this or a source file, starts a REPL.
    #[arg(short, long, conflicts_with = "src_filepath")]
    pub expr: Option<String>,

    /// File containing a single expression to evaluate.
    #[arg(short, long)]
    pub src_filepath: Option<String>,

    /// Reduce to weak head normal form, never inside bodies or arguments.
    #[arg(short, long)]
    pub lazy: bool,

    /// Print every intermediate expression.
    #[arg(short, long)]
    pub trace: bool,

    /// Render lambdas as '@' instead of 'λ'.
    #[arg(short, long)]
    pub ascii: bool,

    /// Give up after this many reduction steps. 0 means no limit.
    #[arg(short, long, default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,
}

impl InterpreterConfig {
    pub fn strategy(&self) -> ReductionStrategy {
        if self.lazy {
            return ReductionStrategy::Lazy;
        }

        return ReductionStrategy::Normal;
    }

    pub fn step_limit(&self) -> Option<usize> {
        match self.max_steps {
            0 => return None,
            max_steps => return Some(max_steps),
        }
    }

    pub fn lambda_glyph(&self) -> char {
        if self.ascii {
            return ASCII_LAMBDA_GLYPH;
        }

        return LAMBDA_GLYPH;
    }
}

/// Errors that may be thrown when running the interpreter.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Input file error: {0}")]
    InputFileError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Execution error: {0}")]
    ExecutionError(#[from] ExecutionError),

    #[error("Readline error: {0}")]
    ReadlineError(#[from] ReadlineError),
}

/// Parses and reduces one expression. Returns the text to show the user: the
/// normal form, preceded by every numbered intermediate step in trace mode.
pub fn evaluate_source(source: &str, config: &InterpreterConfig) -> Result<String, RunError> {
    let mut parser = box_tree_recursive_descent_parsing::Parser::new(source)?;
    let expr_node = parser.parse_expression()?;

    if let Some(token) = parser.remaining_token() {
        warn!(
            start_idx = token.start_idx,
            token = %token.token_text,
            "ignoring input after the first complete expression"
        );
    }

    let lambda_glyph = config.lambda_glyph();
    let mut out = vec![];

    let normalization = normalize(
        expr_node,
        config.strategy(),
        config.step_limit(),
        |step, expr| {
            if config.trace {
                out.push(format!("{}: {}", step, expr_node_to_string(expr, lambda_glyph)));
            }
        },
    )?;

    if !config.trace {
        out.push(expr_node_to_string(&normalization.normal_form, lambda_glyph));
    }

    return Ok(out.join("\n"));
}

/// Runs a read-eval-print loop on standard input until `quit`, Ctrl-C, or
/// Ctrl-D. A line ending in `\` continues on the next line. Errors in one
/// input are printed and the loop carries on.
pub fn run_repl(config: &InterpreterConfig) -> Result<(), RunError> {
    let mut editor = Editor::<()>::new();
    let mut input: Option<String> = None;

    info!(strategy = ?config.strategy(), "starting interactive session");
    println!("nameless-lambda. Type '{}' to exit.", QUIT_COMMAND);

    loop {
        match editor.readline(">> ") {
            Ok(mut line) if line.ends_with('\\') => {
                line.pop();
                line.push('\n');
                if let Some(input) = input.as_mut() {
                    input.push_str(line.as_str());
                } else {
                    input = Some(line);
                }
            }
            Ok(line) => {
                let input = if let Some(mut input) = input.take() {
                    input.push_str(line.as_str());
                    input
                } else {
                    line
                };

                if input.trim() == QUIT_COMMAND {
                    break;
                }

                if input.trim().is_empty() {
                    continue;
                }

                editor.add_history_entry(input.as_str());

                match evaluate_source(input.as_str(), config) {
                    Ok(execution_result) => println!("{}", execution_result),
                    Err(run_error) => println!("{}", run_error),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                break;
            }
            Err(readline_error) => {
                return Err(RunError::from(readline_error));
            }
        }
    }

    info!("interactive session finished");
    return Ok(());
}

/// Run the interpreter (i.e. the lexer, parser, and reduction) given an
/// interpreter config. Returns the text to print, which is empty after an
/// interactive session.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    if let Some(expr) = &config.expr {
        return evaluate_source(expr.as_str(), config);
    }

    if let Some(src_filepath) = &config.src_filepath {
        let program_string = fs::read_to_string(src_filepath)?;
        return evaluate_source(program_string.as_str(), config);
    }

    run_repl(config)?;
    return Ok(String::new());
}
