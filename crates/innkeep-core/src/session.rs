// ── Explicit session object ──
//
// The bearer token and cached user live behind one `SessionStore`.
// Only the auth flow writes it; everything else reads the token through
// the console's current `ApiClient`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use innkeep_api::models::User;
use secrecy::SecretString;

use crate::error::CoreError;

/// An authenticated session: the bearer token plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    /// Cached from login / verify. May be absent for a token pasted in
    /// from config.
    pub user: Option<User>,
}

impl Session {
    pub fn new(token: SecretString, user: Option<User>) -> Self {
        Self { token, user }
    }
}

/// Persistence for the single active session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, CoreError>;
    fn save(&self, session: &Session) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-process store. Used by tests and by one-off `--token` invocations.
#[derive(Default)]
pub struct MemorySessionStore {
    current: ArcSwapOption<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            current: ArcSwapOption::from_pointee(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.current.load_full().map(|s| (*s).clone()))
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        self.current.store(Some(Arc::new(session.clone())));
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.current.store(None);
        Ok(())
    }
}

/// Outcome of the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoginRequired,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::LoginRequired => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());

        store
            .save(&Session::new("abc".to_string().into(), None))
            .unwrap();
        assert_eq!(store.load().unwrap().unwrap().token.expose_secret(), "abc");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
