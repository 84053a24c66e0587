use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AuthConfig;

const ADMIN_DISPLAY_NAME: &str = "Administrator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Faculty,
    Admin,
}

/// Opaque bearer token handed out at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub String);

/// Signed-in context passed to every handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: SessionToken,
    pub role: Role,
    /// Login name for faculty, a fixed label for the admin.
    pub username: String,
}

/// Where a browser stands: signed out, or signed in with one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Faculty(Session),
    Admin(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::LoggedOut => None,
            SessionState::Faculty(session) | SessionState::Admin(session) => Some(session),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("not signed in")]
    Unauthenticated,
    #[error("this action requires the {0:?} role")]
    Forbidden(Role),
}

/// Check a username/password pair against the configured accounts.
pub fn authenticate(auth: &AuthConfig, username: &str, password: &str) -> Option<(Role, String)> {
    if username == auth.admin_username && password == auth.admin_password {
        return Some((Role::Admin, ADMIN_DISPLAY_NAME.to_string()));
    }

    if username.starts_with(&auth.faculty_prefix) && password == auth.faculty_password {
        return Some((Role::Faculty, username.to_string()));
    }

    None
}

/// Live sessions keyed by token.
#[derive(Debug)]
pub struct SessionRegistry {
    auth: AuthConfig,
    sessions: Mutex<HashMap<SessionToken, Session>>,
    sequence: AtomicU64,
}

impl SessionRegistry {
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            auth,
            sessions: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }

    fn next_token(&self) -> SessionToken {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SessionToken(format!("session-{id:06}"))
    }

    pub fn login(&self, username: &str, password: &str) -> Result<SessionState, SessionError> {
        let (role, display) = authenticate(&self.auth, username, password).ok_or_else(|| {
            debug!(%username, "rejected sign-in");
            SessionError::InvalidCredentials
        })?;

        let session = Session {
            token: self.next_token(),
            role,
            username: display,
        };
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.token.clone(), session.clone());
        info!(?role, username = %session.username, "signed in");

        Ok(match role {
            Role::Faculty => SessionState::Faculty(session),
            Role::Admin => SessionState::Admin(session),
        })
    }

    pub fn state(&self, token: &SessionToken) -> SessionState {
        let guard = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.get(token) {
            Some(session) if session.role == Role::Admin => SessionState::Admin(session.clone()),
            Some(session) => SessionState::Faculty(session.clone()),
            None => SessionState::LoggedOut,
        }
    }

    pub fn resolve(&self, token: &SessionToken) -> Result<Session, SessionError> {
        self.state(token)
            .session()
            .cloned()
            .ok_or(SessionError::Unauthenticated)
    }

    /// Resolve a token and require a specific role.
    pub fn require(&self, token: &SessionToken, role: Role) -> Result<Session, SessionError> {
        let session = self.resolve(token)?;
        if session.role == role {
            Ok(session)
        } else {
            Err(SessionError::Forbidden(role))
        }
    }

    /// Signing out an unknown token is a no-op.
    pub fn logout(&self, token: &SessionToken) -> SessionState {
        if let Some(session) = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
        {
            info!(role = ?session.role, username = %session.username, "signed out");
        }
        SessionState::LoggedOut
    }
}
