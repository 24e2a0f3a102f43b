//! The signed-in user's bearer token and where it is kept between runs.
//!
//! [`SessionContext`] is the one handle every network-calling module gets.
//! [`SessionContext::invalidate`] is the only way a session is cleared, so a
//! logout and a 401 leave storage in the same state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use taskdeck_core::auth::LoginResponse;
use tracing::{debug, error, warn};

use crate::ServiceError;

/// Fixed name of the session file inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Map<String, Value>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: Map::new(),
        }
    }

    /// Best-effort name for the title bar: `name`, then `email`.
    pub fn display_name(&self) -> Option<&str> {
        self.user
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| self.user.get("email").and_then(Value::as_str))
    }
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            token: resp.token,
            user: resp.user,
        }
    }
}

/// Durable storage for at most one session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ServiceError>;
    fn save(&self, session: &Session) -> Result<(), ServiceError>;
    fn clear(&self) -> Result<(), ServiceError>;
}

/// JSON file under the user's data directory.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/taskdeck/session.json`, falling back to
    /// `~/.local/share/taskdeck/session.json`.
    pub fn open_default() -> Self {
        Self::new(default_data_dir().join("taskdeck").join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ServiceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ServiceError::Internal(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // A corrupt file is as good as no session.
                warn!(path = %self.path.display(), "ignoring unreadable session file: {e}");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), ServiceError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| ServiceError::Internal(format!("create {}: {e}", dir.display())))?;
        }
        let body = serde_json::to_string_pretty(session)
            .map_err(|e| ServiceError::Internal(format!("encode session: {e}")))?;
        std::fs::write(&self.path, body)
            .map_err(|e| ServiceError::Internal(format!("write {}: {e}", self.path.display())))
    }

    fn clear(&self) -> Result<(), ServiceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::Internal(format!(
                "remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// Process-local store, for tests and throwaway clients.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ServiceError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), ServiceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ServiceError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Shared handle to the current session and its backing store.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    /// Wrap `store`, picking up whatever session it already holds.
    pub fn new(store: impl SessionStore + 'static) -> Self {
        let current = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("could not load stored session: {e}");
                None
            }
        };
        Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                current: RwLock::new(current),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Persist `session` and make it current.
    pub fn establish(&self, session: Session) -> Result<(), ServiceError> {
        self.inner.store.save(&session)?;
        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
        debug!("session established");
        Ok(())
    }

    /// Drop the session from memory and storage.
    pub fn invalidate(&self) {
        self.inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Err(e) = self.inner.store.clear() {
            error!("failed to clear stored session: {e}");
        }
        debug!("session invalidated");
    }
}

fn default_data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let mut user = Map::new();
        user.insert("email".into(), Value::from("ada@example.com"));
        Session {
            token: "tok-1".into(),
            user,
        }
    }

    #[test]
    fn file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join(SESSION_FILE_NAME));
        assert_eq!(store.load().unwrap(), None);

        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert!(!store.path().exists());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(FileSessionStore::new(&path).load().unwrap(), None);
    }

    #[test]
    fn context_picks_up_stored_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        FileSessionStore::new(&path).save(&session()).unwrap();

        let ctx = SessionContext::new(FileSessionStore::new(&path));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.token().as_deref(), Some("tok-1"));
        assert_eq!(ctx.current().unwrap().display_name(), Some("ada@example.com"));
    }

    #[test]
    fn invalidate_clears_memory_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        let ctx = SessionContext::new(FileSessionStore::new(&path));
        ctx.establish(session()).unwrap();
        assert!(path.exists());

        let other_handle = ctx.clone();
        other_handle.invalidate();

        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.token(), None);
        assert!(!path.exists());
    }

    #[test]
    fn display_name_prefers_name() {
        let mut s = session();
        s.user.insert("name".into(), Value::from("Ada"));
        assert_eq!(s.display_name(), Some("Ada"));
        assert_eq!(Session::new("t").display_name(), None);
    }
}
