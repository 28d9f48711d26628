//! File-backed Session Store: one bundle per data directory

use crate::auth::bundle::SessionBundle;
use crate::error::AppError;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const BUNDLE_FILE_NAME: &str = "session.json";

pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.dir.join(BUNDLE_FILE_NAME)
    }

    /// Load the stored bundle
    ///
    /// Missing, unreadable and corrupt files all yield `None`; the caller
    /// re-authenticates in every one of those cases.
    pub fn load(&self) -> Option<SessionBundle> {
        let path = self.bundle_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session bundle at {}", path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read session bundle {}: {}", path.display(), e);
                return None;
            }
        };

        match SessionBundle::from_json(&contents) {
            Ok(bundle) => {
                debug!(
                    "Loaded session bundle for {} with cookies {:?}",
                    bundle.account.as_deref().unwrap_or("<unknown>"),
                    bundle.cookies.keys().collect::<Vec<_>>()
                );
                Some(bundle)
            }
            Err(e) => {
                warn!("Ignoring session bundle {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Persist a bundle, replacing any previous one
    pub fn save(&self, bundle: &SessionBundle) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::PersistenceFailure(format!(
                "Failed to create data directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.bundle_path();
        let contents = serde_json::to_string_pretty(bundle)
            .map_err(|e| AppError::PersistenceFailure(format!("Failed to serialize session: {}", e)))?;

        fs::write(&path, contents).map_err(|e| {
            AppError::PersistenceFailure(format!("Failed to write {}: {}", path.display(), e))
        })?;

        // Cookies grant full account access
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AppError::PersistenceFailure(format!("Failed to set file permissions: {}", e))
            })?;
        }

        debug!("Saved session bundle to {}", path.display());
        Ok(())
    }

    /// Remove the stored bundle; a missing file is not an error
    pub fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(self.bundle_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::PersistenceFailure(format!(
                "Failed to remove session bundle: {}",
                e
            ))),
        }
    }
}
