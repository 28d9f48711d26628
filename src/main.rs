//! x-mcp: MCP server exposing an X (Twitter) account as tools
//!
//! Authenticates with a stored cookie session (logging in again when it has
//! expired), then serves JSON-RPC requests on stdin/stdout until stdin
//! closes. Logs go to stderr.

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod http;
mod mcp;
mod tools;

#[cfg(test)]
mod tests_dispatch;
#[cfg(test)]
mod tests_session_startup;

use anyhow::Result;
use auth::{Authenticator, LoginSource, SessionStore};
use clap::Parser;
use cli::Cli;
use client::WebConnector;
use config::Config;
use error::AppError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_cli(&cli);
    info!("Starting x-mcp, session directory {}", config.data_dir.display());

    let authenticator = Authenticator::new(
        SessionStore::new(&config.data_dir),
        Box::new(WebConnector::new(&config.user_agent, &config.language)),
        config.login_attempts,
    );
    let mut source = LoginSource::new(config.configured_login.clone(), config.interactive);

    let session = match authenticator.ensure_session(&mut source).await {
        Ok(session) => session,
        Err(e) => {
            error!("Cannot start without a session: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(exit_code(&e));
        }
    };

    let context = mcp::ServerContext::new(session.api.clone(), session.account());
    mcp::handle_stdio(context).await
}

/// Map startup failures to process exit codes
fn exit_code(err: &AppError) -> i32 {
    match err {
        AppError::InvalidArgument(_) => 1,
        AppError::AuthenticationFailure(_) => 2,
        AppError::RemoteOperationFailure { .. } => 3,
        AppError::PersistenceFailure(_) => 4,
        AppError::Internal(_) => 5,
    }
}
