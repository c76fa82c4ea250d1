//! Login session persistence
//!
//! The backend's bearer token is kept in `session.json` next to the config,
//! with the same eight hour lifetime the web login gives its cookie.

use chrono::{DateTime, Duration, Utc};
use nakliye_types::{BearerToken, Error, Result, Session};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Lifetime of a stored login, matching the `access_token` cookie max-age
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 8;

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in the default config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::Config::config_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Persist a freshly issued token
    pub fn save(&self, token: BearerToken, now: DateTime<Utc>) -> Result<Session> {
        let session = Session {
            token,
            expires_at: now + Duration::seconds(SESSION_TTL_SECS),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&session)?)?;
        Ok(session)
    }

    pub fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Current credential; absent or expired sessions are a missing credential
    pub fn credential(&self, now: DateTime<Utc>) -> Result<BearerToken> {
        match self.load()? {
            Some(session) if session.is_valid_at(now) => Ok(session.token),
            Some(_) => {
                debug!(path = %self.path.display(), "stored session expired");
                Err(Error::MissingCredential)
            }
            None => Err(Error::MissingCredential),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_no_session_is_missing_credential() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(matches!(store.credential(now()), Err(Error::MissingCredential)));
    }

    #[test]
    fn test_saved_session_expires_after_eight_hours() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(BearerToken::new("tok").unwrap(), now()).unwrap();

        let token = store.credential(now() + Duration::hours(7)).unwrap();
        assert_eq!(token.as_str(), "tok");
        assert!(matches!(
            store.credential(now() + Duration::hours(8)),
            Err(Error::MissingCredential)
        ));
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(BearerToken::new("tok").unwrap(), now()).unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }
}
