//! Entry point for the Savings Engine binary.
//!
//! Running this binary starts an HTTP server that exposes the cost
//! calculator.  Configuration is read from `SAVINGS_*` environment
//! variables; see [`savings_engine::config::EngineConfig::from_env`].

use savings_engine::config::EngineConfig;
use savings_engine::logging::init_logger;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {:#}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logger(config.log_format);
    if let Err(err) = savings_engine::api::serve(config).await {
        tracing::error!("Error running server: {:#}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
