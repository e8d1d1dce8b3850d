use clap::Parser;
use libalgo::{
    execute,
    logging::{self, LogConfig, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL},
    SUCCESS_MESSAGE,
};
use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info};

/// Runs an algorithm written in the Algorithme / TDO / Debut / Fin pseudocode.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Source file of the algorithm
    file: PathBuf,

    /// Where diagnostics are written
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = LogConfig {
        level: args.log_level,
        file: Some(args.log_file),
    };
    if let Err(e) = logging::init(&config) {
        eprintln!("{}", e);
    }

    match run_file(&args.file) {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(message) => {
            println!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Reads and runs one source file. Both sides carry the line to print.
fn run_file(path: &Path) -> Result<String, String> {
    let source = fs::read_to_string(path).map_err(|e| {
        error!(file = %path.display(), "File error: {}", e);
        format!("File error: {}", e)
    })?;

    info!(file = %path.display(), "running");

    execute(&source)
        .map(|_| SUCCESS_MESSAGE.to_string())
        .map_err(|e| e.to_string())
}
