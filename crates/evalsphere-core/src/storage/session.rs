//! Typed session storage wrapper.

use crate::models::AuthSession;
use anyhow::Result;
use redb::Database;
use std::sync::Arc;

/// Typed session persistence around evalsphere-storage::SessionStorage.
///
/// Auth keys follow the login slice: `isAuthenticated`, `token`, and the
/// `user` record are written only when a token came back, `refreshToken`
/// independently when present.
pub struct SessionStorage {
    inner: evalsphere_storage::SessionStorage,
}

impl SessionStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self {
            inner: evalsphere_storage::SessionStorage::new(db)?,
        })
    }

    /// Mirror a login result into the session table
    pub fn store_auth(&self, session: &AuthSession) -> Result<()> {
        if let Some(token) = &session.token {
            self.inner.put_raw("isAuthenticated", b"true")?;
            self.inner.put_raw("token", token.as_bytes())?;
            let user_json = serde_json::to_vec(&session.user)?;
            self.inner.put_raw("user", &user_json)?;
        }
        if let Some(refresh) = &session.refresh_token {
            self.inner.put_raw("refreshToken", refresh.as_bytes())?;
        }
        Ok(())
    }

    /// Load the mirrored session, if a user record is present
    pub fn load_auth(&self) -> Result<Option<AuthSession>> {
        let Some(user_bytes) = self.inner.get_raw("user")? else {
            return Ok(None);
        };
        let user = serde_json::from_slice(&user_bytes)?;
        let token = self.get_value("token")?;
        let refresh_token = self.get_value("refreshToken")?;
        Ok(Some(AuthSession {
            user,
            token,
            refresh_token,
        }))
    }

    /// Store a plain string value under a session key
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.inner.put_raw(key, value.as_bytes())
    }

    /// Get a plain string value by key
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get_raw(key)? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    /// Drop the wizard session keys
    pub fn clear_volatile(&self) -> Result<()> {
        self.inner.clear_volatile()
    }

    /// Drop auth and wizard keys, as logout does
    pub fn clear_auth(&self) -> Result<()> {
        self.inner.clear_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRecord;
    use tempfile::tempdir;

    fn test_storage() -> (SessionStorage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        (SessionStorage::new(db).unwrap(), temp_dir)
    }

    fn session_with_token() -> AuthSession {
        AuthSession {
            user: UserRecord {
                username: "admin".to_string(),
                role: Some("reviewer".to_string()),
            },
            token: Some("jwt-token".to_string()),
            refresh_token: Some("refresh-token".to_string()),
        }
    }

    #[test]
    fn test_store_and_load_auth() {
        let (storage, _guard) = test_storage();

        storage.store_auth(&session_with_token()).unwrap();

        let loaded = storage.load_auth().unwrap().unwrap();
        assert_eq!(loaded.user.username, "admin");
        assert_eq!(loaded.token.as_deref(), Some("jwt-token"));
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh-token"));
        assert_eq!(
            storage.get_value("isAuthenticated").unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_tokenless_response_stores_nothing() {
        let (storage, _guard) = test_storage();

        let session = AuthSession {
            token: None,
            refresh_token: None,
            ..session_with_token()
        };
        storage.store_auth(&session).unwrap();

        assert!(storage.load_auth().unwrap().is_none());
        assert!(storage.get_value("isAuthenticated").unwrap().is_none());
    }

    #[test]
    fn test_clear_auth_also_drops_wizard_keys() {
        let (storage, _guard) = test_storage();

        storage.store_auth(&session_with_token()).unwrap();
        storage.set_value("selectedSuites", "[1,2]").unwrap();
        storage.set_value("language", "en").unwrap();

        storage.clear_auth().unwrap();

        assert!(storage.load_auth().unwrap().is_none());
        assert!(storage.get_value("selectedSuites").unwrap().is_none());
        assert_eq!(storage.get_value("language").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_clear_volatile_keeps_auth() {
        let (storage, _guard) = test_storage();

        storage.store_auth(&session_with_token()).unwrap();
        storage.set_value("workflow_step2", "{}").unwrap();

        storage.clear_volatile().unwrap();

        assert!(storage.load_auth().unwrap().is_some());
        assert!(storage.get_value("workflow_step2").unwrap().is_none());
    }
}
