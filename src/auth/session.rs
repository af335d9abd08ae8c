//! Local session persistence in the data directory.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SESSION_FILE: &str = "session.json";

/// The signed-in account as returned by the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Reads and writes the session file. A missing or unreadable file simply
/// means nobody is signed in.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Self {
        SessionStore {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn load(&self) -> Option<Session> {
        let blob = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&blob) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Discarding unreadable session file: {e}");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let blob = serde_json::to_string(session).context("Failed to serialize session")?;
        fs::write(&self.path, blob)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        debug!("Session saved for {}", session.email);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file: {}", self.path.display()))?;
        }
        debug!("Session cleared");
        Ok(())
    }
}
