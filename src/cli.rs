//! Command-line flags
//!
//! The server has no subcommands; flags only tune how it authenticates.

use clap::Parser;
use std::path::PathBuf;

/// x-mcp command line
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "x-mcp")]
#[command(about = "MCP server for X (Twitter) over a cookie session", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the session bundle (default: auth/x_data)
    #[arg(long, env = "X_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Full cookie header copied from a logged-in browser session
    #[arg(long, env = "X_COOKIES", hide_env_values = true)]
    pub cookies: Option<String>,

    /// Value of the auth_token cookie
    #[arg(long, env = "X_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Value of the ct0 (CSRF) cookie
    #[arg(long, env = "X_CT0", hide_env_values = true)]
    pub ct0: Option<String>,

    /// Browser user agent sent with every request
    #[arg(long, env = "X_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Client language header
    #[arg(long, env = "X_LANGUAGE")]
    pub language: Option<String>,

    /// Interactive login attempts before giving up
    #[arg(long, default_value_t = 3)]
    pub login_attempts: u32,

    /// Never prompt on the terminal for login cookies
    #[arg(long)]
    pub no_prompt: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
