//! Runtime configuration resolved once at startup

use crate::auth::LoginCredentials;
use crate::cli::Cli;
use std::path::{Path, PathBuf};

/// Session directory used when neither `--data-dir` nor `X_DATA_DIR` is given
pub const DEFAULT_DATA_DIR: &str = "auth/x_data";

pub const DEFAULT_LANGUAGE: &str = "en";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub language: String,
    /// Cookies supplied through flags or env, tried before any prompt
    pub configured_login: Option<LoginCredentials>,
    pub login_attempts: u32,
    pub interactive: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = cli
            .data_dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            data_dir,
            user_agent: non_empty(cli.user_agent.as_deref())
                .unwrap_or(DEFAULT_USER_AGENT)
                .to_string(),
            language: non_empty(cli.language.as_deref())
                .unwrap_or(DEFAULT_LANGUAGE)
                .to_string(),
            configured_login: configured_login(cli),
            login_attempts: cli.login_attempts.max(1),
            interactive: !cli.no_prompt,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A full cookie header wins over the individual cookie flags
fn configured_login(cli: &Cli) -> Option<LoginCredentials> {
    if let Some(header) = non_empty(cli.cookies.as_deref()) {
        return Some(LoginCredentials::from_cookie_header(header));
    }
    match (non_empty(cli.auth_token.as_deref()), non_empty(cli.ct0.as_deref())) {
        (Some(auth_token), Some(ct0)) => Some(LoginCredentials::from_tokens(auth_token, ct0)),
        _ => None,
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
