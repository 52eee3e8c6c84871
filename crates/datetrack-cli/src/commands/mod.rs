//! Command handlers and the state they share.

pub mod account;
pub mod calendar;
pub mod matches;
pub mod records;

use anyhow::{Context as _, Result};
use datetrack_auth::SessionStorage;
use datetrack_calendar::{CalendarClient, SqliteKvStore, SyncOrchestrator};
use datetrack_core::{AuthError, Config};
use datetrack_records::RecordStore;
use tracing::{debug, warn};

pub type Orchestrator = SyncOrchestrator<CalendarClient, SqliteKvStore>;

/// Loaded configuration plus handles built from it on demand.
pub struct Context {
    pub config: Config,
    pub sessions: SessionStorage,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStorage::at(&config.config_dir);
        Self { config, sessions }
    }

    pub fn records(&self) -> Result<RecordStore> {
        RecordStore::new(self.config.data.database_path())
            .with_context(|| format!("Failed to open {}", self.config.data.database_path))
    }

    pub fn link_store(&self) -> Result<SqliteKvStore> {
        Ok(SqliteKvStore::new(self.config.data.database_path())?)
    }

    /// Token for calendar calls: the environment override, else the stored session.
    pub fn access_token(&self) -> Result<String, AuthError> {
        if let Some(token) = Config::access_token_from_env() {
            debug!("Using access token from environment");
            return Ok(token);
        }

        let session = self.sessions.retrieve().map_err(|e| {
            debug!("No usable session: {:#}", e);
            AuthError::NotSignedIn
        })?;

        if session.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        if !session.has_calendar_scope() {
            return Err(AuthError::MissingCalendarScope);
        }
        if session.needs_refresh() {
            warn!("Session expires within five minutes; sign in again soon");
        }
        Ok(session.access_token)
    }

    pub fn orchestrator(&self) -> Result<Orchestrator> {
        let token = self.access_token()?;
        let client = CalendarClient::new(&token, &self.config.calendar)?;
        Ok(SyncOrchestrator::new(client, self.link_store()?))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use datetrack_auth::{Profile, Session, CALENDAR_SCOPE};
    use tempfile::tempdir;

    fn context(dir: &std::path::Path) -> Context {
        let mut config = Config::default();
        config.config_dir = dir.to_path_buf();
        config.data.database_path = dir.join("dt.db").to_string_lossy().into_owned();
        Context::new(config)
    }

    fn profile() -> Profile {
        Profile {
            display_name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            avatar_url: None,
        }
    }

    // These run only when the override is absent so a developer's own
    // token never leaks into the assertions.
    #[test]
    fn test_access_token_requires_session() {
        if Config::access_token_from_env().is_some() {
            return;
        }
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());
        assert!(matches!(ctx.access_token(), Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn test_access_token_checks_expiry_and_scope() {
        if Config::access_token_from_env().is_some() {
            return;
        }
        let dir = tempdir().unwrap();
        let ctx = context(dir.path());

        let mut session = Session::new("tok", profile());
        session.expires_at = Some(chrono::Utc::now().timestamp() - 10);
        ctx.sessions.store(&session).unwrap();
        assert!(matches!(ctx.access_token(), Err(AuthError::TokenExpired)));

        session.expires_at = None;
        session.scopes = vec!["openid".to_string()];
        ctx.sessions.store(&session).unwrap();
        assert!(matches!(
            ctx.access_token(),
            Err(AuthError::MissingCalendarScope)
        ));

        session.scopes.push(CALENDAR_SCOPE.to_string());
        ctx.sessions.store(&session).unwrap();
        assert_eq!(ctx.access_token().unwrap(), "tok");
    }
}
