use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// OAuth scope that grants read/write access to the user's calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

const SESSION_FILE: &str = "session.json";

/// Basic profile fields handed over by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// A signed-in session: the bearer credential plus who it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Access token for API requests
    pub access_token: String,

    /// Optional refresh token for token renewal
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Token expiration timestamp (Unix timestamp); unknown when `None`
    #[serde(default)]
    pub expires_at: Option<i64>,

    /// Scopes granted to this token
    #[serde(default)]
    pub scopes: Vec<String>,

    #[serde(default)]
    pub profile: Profile,
}

impl Session {
    pub fn new(access_token: impl Into<String>, profile: Profile) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            scopes: Vec::new(),
            profile,
        }
    }

    /// Check if the token needs refresh (within 5 minutes of expiry)
    pub fn needs_refresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() >= expires_at.saturating_sub(300),
            None => false,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }

    /// Whether calendar access was granted.
    ///
    /// Sessions recorded without scope information are assumed to carry it;
    /// the remote permission probe has the final word.
    pub fn has_calendar_scope(&self) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|s| s == CALENDAR_SCOPE)
    }
}

/// File-backed storage for the signed-in session.
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Storage rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Persist a session, replacing any previous one
    pub fn store(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create session directory")?;

        let path = self.session_path();
        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        fs::write(&path, &json).context("Failed to write session file")?;

        tracing::info!(
            "Stored session for {} at {:?}",
            session.profile.email,
            path
        );
        Ok(())
    }

    /// Load the stored session
    pub fn retrieve(&self) -> Result<Session> {
        let path = self.session_path();

        let json = fs::read_to_string(&path).context("Failed to read session file")?;

        let session: Session =
            serde_json::from_str(&json).context("Failed to deserialize session")?;

        tracing::debug!("Retrieved session for {}", session.profile.email);
        Ok(session)
    }

    /// Remove the stored session, if any
    pub fn delete(&self) -> Result<()> {
        let path = self.session_path();

        if path.exists() {
            fs::remove_file(&path).context("Failed to delete session file")?;
            tracing::info!("Deleted stored session");
        }

        Ok(())
    }

    pub fn has_session(&self) -> bool {
        self.retrieve().is_ok()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn session_expiring_at(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "test".to_string(),
            refresh_token: None,
            expires_at,
            scopes: vec![],
            profile: Profile::default(),
        }
    }

    #[test]
    fn test_token_expiry() {
        let now = chrono::Utc::now().timestamp();

        let expired = session_expiring_at(Some(now - 3600));
        assert!(expired.is_expired());
        assert!(expired.needs_refresh());

        let valid = session_expiring_at(Some(now + 3600));
        assert!(!valid.is_expired());
        assert!(!valid.needs_refresh());

        let soon = session_expiring_at(Some(now + 200));
        assert!(!soon.is_expired());
        assert!(soon.needs_refresh());

        let unknown = session_expiring_at(None);
        assert!(!unknown.is_expired());
        assert!(!unknown.needs_refresh());
    }

    #[test]
    fn test_extreme_expiry_values() {
        let ancient = session_expiring_at(Some(i64::MIN));
        assert!(ancient.is_expired());
        assert!(ancient.needs_refresh());

        let distant = session_expiring_at(Some(i64::MAX));
        assert!(!distant.is_expired());
        assert!(!distant.needs_refresh());
    }

    #[test]
    fn test_calendar_scope() {
        let mut session = session_expiring_at(None);
        assert!(session.has_calendar_scope());

        session.scopes = vec!["openid".to_string(), "email".to_string()];
        assert!(!session.has_calendar_scope());

        session.scopes.push(CALENDAR_SCOPE.to_string());
        assert!(session.has_calendar_scope());
    }

    #[test]
    fn test_store_retrieve_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::at(dir.path().join("nested"));
        assert!(!storage.has_session());

        let profile = Profile {
            display_name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            avatar_url: Some("https://example.com/sam.png".to_string()),
        };
        storage.store(&Session::new("ya29.token", profile.clone())).unwrap();

        let loaded = storage.retrieve().unwrap();
        assert_eq!(loaded.access_token, "ya29.token");
        assert_eq!(loaded.profile, profile);

        storage.delete().unwrap();
        assert!(!storage.has_session());
        // Deleting twice is fine
        storage.delete().unwrap();
    }

    #[test]
    fn test_corrupt_session_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();

        let storage = SessionStorage::at(dir.path());
        assert!(storage.retrieve().is_err());
        assert!(!storage.has_session());
    }
}
