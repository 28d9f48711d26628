//! Login input: cookies captured from a logged-in browser session

use crate::auth::bundle::{parse_cookie_header, AUTH_TOKEN_COOKIE, CSRF_COOKIE};
use crate::error::AppError;
use std::collections::BTreeMap;
use std::io::{self, BufRead, IsTerminal, Write};

/// Cookies offered for one login attempt
#[derive(Debug, Clone, PartialEq)]
pub struct LoginCredentials {
    pub cookies: BTreeMap<String, String>,
}

impl LoginCredentials {
    pub fn from_cookie_header(header: &str) -> Self {
        Self {
            cookies: parse_cookie_header(header),
        }
    }

    pub fn from_tokens(auth_token: &str, ct0: &str) -> Self {
        let mut cookies = BTreeMap::new();
        cookies.insert(AUTH_TOKEN_COOKIE.to_string(), auth_token.to_string());
        cookies.insert(CSRF_COOKIE.to_string(), ct0.to_string());
        Self { cookies }
    }
}

/// Where the Authenticator gets login input from, one attempt at a time
pub trait CredentialSource {
    /// Credentials for attempt `attempt` (1-based); `None` means give up
    fn next_credentials(&mut self, attempt: u32) -> Result<Option<LoginCredentials>, AppError>;
}

/// Configured cookies first, then the terminal if one is attached
pub struct LoginSource {
    configured: Option<LoginCredentials>,
    interactive: bool,
}

impl LoginSource {
    pub fn new(configured: Option<LoginCredentials>, interactive: bool) -> Self {
        Self {
            configured,
            interactive,
        }
    }
}

impl CredentialSource for LoginSource {
    fn next_credentials(&mut self, attempt: u32) -> Result<Option<LoginCredentials>, AppError> {
        if let Some(configured) = self.configured.take() {
            return Ok(Some(configured));
        }
        // stdin is the protocol channel unless a person is sitting at it
        if !self.interactive || !io::stdin().is_terminal() {
            return Ok(None);
        }
        prompt_cookie_header(attempt).map_err(|e| {
            AppError::AuthenticationFailure(format!("Failed to read login input: {}", e))
        })
    }
}

fn prompt_cookie_header(attempt: u32) -> io::Result<Option<LoginCredentials>> {
    let mut stderr = io::stderr();
    writeln!(
        stderr,
        "\nLogin attempt {}: open x.com in a browser where you are logged in and copy the\n\
         request Cookie header (it must contain auth_token and ct0).",
        attempt
    )?;
    write!(stderr, "Cookie: ")?;
    stderr.flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    if read == 0 || line.is_empty() {
        return Ok(None);
    }
    Ok(Some(LoginCredentials::from_cookie_header(line)))
}
