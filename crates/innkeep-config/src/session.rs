// ── Persistent session ──
//
// The bearer token lives in the system keyring under
// `innkeep / <profile>/token`; the verified user object is cached next to
// the config in `<data dir>/<profile>/session.json`. Neither half is
// useful alone, so `clear` removes both.

use std::path::{Path, PathBuf};

use innkeep_core::model::User;
use innkeep_core::{CoreError, Session, SessionStore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConfigError, data_dir};

const KEYRING_SERVICE: &str = "innkeep";

/// Where the cached user for `profile` is kept.
pub fn session_path(profile: &str) -> PathBuf {
    data_dir().join(profile).join("session.json")
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionRecord {
    #[serde(default)]
    user: Option<User>,
}

/// The non-secret half of a session on disk.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no session was ever saved.
    pub fn read_user(&self) -> Result<Option<User>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str::<SessionRecord>(&raw)?.user),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write_user(&self, user: Option<&User>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let record = SessionRecord {
            user: user.cloned(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }

    pub fn remove(&self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Keyring-backed [`SessionStore`] for one profile.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    profile: String,
    file: SessionFile,
}

impl KeyringSessionStore {
    pub fn new(profile: impl Into<String>) -> Self {
        let profile = profile.into();
        let file = SessionFile::new(session_path(&profile));
        Self { profile, file }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn file(&self) -> &SessionFile {
        &self.file
    }

    fn entry(&self) -> Result<keyring::Entry, ConfigError> {
        Ok(keyring::Entry::new(
            KEYRING_SERVICE,
            &format!("{}/token", self.profile),
        )?)
    }

    /// Store a token without a cached user (`config set-token`).
    pub fn set_token(&self, token: &SecretString) -> Result<(), ConfigError> {
        self.entry()?.set_password(token.expose_secret())?;
        self.file.write_user(None)
    }

    fn load_inner(&self) -> Result<Option<Session>, ConfigError> {
        let token = match self.entry()?.get_password() {
            Ok(token) => token,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // A corrupt cache only costs us the user name; the token still works.
        let user = self.file.read_user().unwrap_or_default();
        Ok(Some(Session::new(SecretString::from(token), user)))
    }

    fn clear_inner(&self) -> Result<(), ConfigError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => return Err(e.into()),
        }
        self.file.remove()
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.load_inner()?)
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        debug!(profile = %self.profile, "saving session");
        self.entry()?.set_password(session.token.expose_secret()).map_err(ConfigError::from)?;
        Ok(self.file.write_user(session.user.as_ref())?)
    }

    fn clear(&self) -> Result<(), CoreError> {
        debug!(profile = %self.profile, "clearing session");
        Ok(self.clear_inner()?)
    }
}
