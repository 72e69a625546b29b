// src/session.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::{debug, info, warn};

use crate::model::User;

/// What survives between runs: the bearer token and who it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Current authentication state, optionally mirrored to a JSON file.
///
/// Shared between the API client (which clears it on a 401) and callers.
#[derive(Debug, Default)]
pub struct Session {
    path: Option<PathBuf>,
    state: Mutex<Option<SessionData>>,
}

impl Session {
    /// Not persisted anywhere.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Restore from `path`. A missing file means signed out; an unreadable one
    /// is logged and treated the same.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<SessionData>(&raw) {
                Ok(data) => {
                    debug!(path = %path.display(), "restored session");
                    Some(data)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt session file");
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            path: Some(path),
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.lock().as_ref().and_then(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Store a fresh login.
    pub fn establish(&self, token: String, user: Option<User>) -> Result<()> {
        let data = SessionData { token, user };
        self.persist(Some(&data))?;
        *self.lock() = Some(data);
        info!("session established");
        Ok(())
    }

    /// Replace the cached user after a profile change. No-op when signed out.
    pub fn update_user(&self, user: User) -> Result<()> {
        let mut guard = self.lock();
        if let Some(data) = guard.as_mut() {
            data.user = Some(user);
            self.persist(Some(data))?;
        }
        Ok(())
    }

    /// Forget the token and user, on disk too.
    pub fn clear(&self) -> Result<()> {
        let had = self.lock().take().is_some();
        self.persist(None)?;
        if had {
            info!("session cleared");
        }
        Ok(())
    }

    fn persist(&self, data: Option<&SessionData>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        match data {
            Some(data) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {:?}", parent))?;
                }
                let body = serde_json::to_string_pretty(data)?;
                fs::write(path, body).with_context(|| format!("writing session {:?}", path))?;
            }
            None => match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("removing session {:?}", path));
                }
            },
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<SessionData>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
