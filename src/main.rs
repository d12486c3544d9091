//! RAX Auth Server - Entry Point
//!
//! Registers username/password pairs and verifies logins against salted
//! bcrypt hashes held in memory.

use log::{error, info};
use std::process::ExitCode;

use rax_auth_server::Server;
use rax_auth_server::config::ServerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching auth server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        error!("Server terminated: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
