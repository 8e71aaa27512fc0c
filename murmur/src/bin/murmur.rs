use std::process::ExitCode;

use clap::Parser;
use murmur::cli::{Cli, run};

#[tokio::main]
async fn main() -> ExitCode {
    murmur::logging::init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("murmur error: {err}");
            ExitCode::FAILURE
        }
    }
}
