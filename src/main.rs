//! Reduce a lambda calculus expression to normal form and print the result to
//! standard output, or start an interactive session when no expression is
//! given.
//!
//! Example usage:
//!
//!     cargo run -- --expr '((λx.λy.x y) y)' --trace
//!     cargo run -- --src-filepath term.lc --lazy
//!     RUST_LOG=debug cargo run

use clap::Parser;
use nameless_lambda::end_to_end::{run_interpreter, InterpreterConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let interpreter_config = InterpreterConfig::parse();

    let interpreter_result = run_interpreter(&interpreter_config);

    match interpreter_result {
        Ok(execution_result) => {
            if !execution_result.is_empty() {
                println!("{}", execution_result);
            }
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            std::process::exit(1);
        }
    }
}
