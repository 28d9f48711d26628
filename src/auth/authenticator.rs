//! Startup authentication: reuse the stored session or log in again

use crate::auth::bundle::SessionBundle;
use crate::auth::credentials::CredentialSource;
use crate::auth::store::SessionStore;
use crate::client::{Connector, XApi};
use crate::error::AppError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A probed adapter plus the bundle it was built from
pub struct AuthenticatedClient {
    pub api: Arc<dyn XApi>,
    pub bundle: SessionBundle,
}

impl AuthenticatedClient {
    pub fn account(&self) -> &str {
        self.bundle.account.as_deref().unwrap_or("<unknown>")
    }
}

pub struct Authenticator {
    store: SessionStore,
    connector: Box<dyn Connector>,
    attempts: u32,
}

impl Authenticator {
    pub fn new(store: SessionStore, connector: Box<dyn Connector>, attempts: u32) -> Self {
        Self {
            store,
            connector,
            attempts: attempts.max(1),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Load and probe the stored bundle, falling back to login
    pub async fn ensure_session(
        &self,
        source: &mut dyn CredentialSource,
    ) -> Result<AuthenticatedClient, AppError> {
        let mut last_error = String::from("no login credentials available");

        if let Some(mut bundle) = self.store.load() {
            match self.verify(&bundle).await {
                Ok((api, account)) => {
                    info!("Reusing stored session for @{}", account);
                    if bundle.account.as_deref() != Some(account.as_str()) {
                        bundle.account = Some(account);
                        self.store.save(&bundle)?;
                    }
                    return Ok(AuthenticatedClient { api, bundle });
                }
                Err(e @ AppError::AuthenticationFailure(_)) => {
                    warn!("Stored session is no longer valid: {}", e);
                    if let Err(clear_err) = self.store.clear() {
                        warn!("{}", clear_err);
                    }
                    last_error = e.detail().to_string();
                }
                // the bundle may still be good; keep it for the next start
                Err(e) => return Err(e),
            }
        }
        self.login(source, last_error).await
    }

    async fn login(
        &self,
        source: &mut dyn CredentialSource,
        mut last_error: String,
    ) -> Result<AuthenticatedClient, AppError> {
        for attempt in 1..=self.attempts {
            let credentials = match source.next_credentials(attempt)? {
                Some(credentials) => credentials,
                None => break,
            };

            let mut bundle = SessionBundle::new(credentials.cookies, BTreeMap::new());
            if let Err(e) = bundle.check() {
                warn!("Login attempt {} rejected: {}", attempt, e);
                last_error = e.to_string();
                continue;
            }

            match self.verify(&bundle).await {
                Ok((api, account)) => {
                    info!("Logged in as @{}", account);
                    bundle.account = Some(account);
                    self.store.save(&bundle)?;
                    return Ok(AuthenticatedClient { api, bundle });
                }
                Err(e) => {
                    warn!("Login attempt {} failed: {}", attempt, e);
                    last_error = e.detail().to_string();
                }
            }
        }

        Err(AppError::AuthenticationFailure(format!(
            "no working session after {} login attempt(s): {}",
            self.attempts, last_error
        )))
    }

    async fn verify(&self, bundle: &SessionBundle) -> Result<(Arc<dyn XApi>, String), AppError> {
        let api = self.connector.connect(bundle)?;
        let account = api.probe().await?;
        Ok((api, account))
    }
}
