//! Interpreter for a small French teaching pseudocode
//! (`Algorithme` / `TDO` / `Debut` / `Fin`).

pub mod error;
pub mod eval;
pub mod lexer;
pub mod logging;

pub use error::AlgoError;

use eval::{environment::Environment, Evaluator};
use lexer::Lexer;
use std::io::{self, Write};
use tracing::{error, info};

pub const SUCCESS_MESSAGE: &str = "Program executed successfully.";

/// Lexes and runs `source`, writing whatever the program prints to `out`.
/// Returns the variable table as it stands when `Fin` is reached.
pub fn run_program<W: Write>(source: &str, out: W) -> Result<Environment, AlgoError> {
    let tokens = Lexer::new().lex_input(source)?;
    info!(tokens = tokens.len(), "lexing done");

    let mut evaluator = Evaluator::new(out);
    evaluator.interpret(&tokens)?;

    Ok(evaluator.into_environment())
}

pub fn execute(source: &str) -> Result<(), AlgoError> {
    let stdout = io::stdout();

    run_program(source, stdout.lock())
        .map(|_| info!("{}", SUCCESS_MESSAGE))
        .map_err(|e| {
            error!("Error during execution: {}", e);
            e
        })
}

pub fn run_algo(source: &str) -> String {
    match execute(source) {
        Ok(()) => SUCCESS_MESSAGE.to_string(),
        Err(e) => e.to_string(),
    }
}
