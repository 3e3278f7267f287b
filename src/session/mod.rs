use crate::model::UserId;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

pub mod store;

use store::{SessionPersistence, SessionStoreError};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub token: String,
    pub user_id: UserId,
    pub display_name: String,
}

/// Authentication state. Either every credential field is present or none is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.token.as_str())
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|identity| identity.user_id)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .map(|identity| identity.display_name.as_str())
    }
}

/// On-disk form of the session. Each field is optional so that a partially
/// written file can be recognised and treated as logged out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub schema_version: u32,
    pub token: Option<String>,
    pub user_id: Option<UserId>,
    pub display_name: Option<String>,
}

impl PersistedSession {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            token: Some(identity.token.clone()),
            user_id: Some(identity.user_id),
            display_name: Some(identity.display_name.clone()),
        }
    }

    pub fn into_identity(self) -> Option<Identity> {
        match (self.token, self.user_id, self.display_name) {
            (Some(token), Some(user_id), Some(display_name)) if !token.is_empty() => {
                Some(Identity {
                    token,
                    user_id,
                    display_name,
                })
            }
            _ => None,
        }
    }
}

/// Process-wide authentication state with a single entry point per transition.
pub struct SessionStore {
    state: RwLock<Session>,
    persistence: Box<dyn SessionPersistence>,
}

impl SessionStore {
    /// Reads the persisted session once. Unreadable or partial state starts
    /// the process logged out.
    pub fn load(persistence: Box<dyn SessionPersistence>) -> Self {
        let session = match persistence.load() {
            Ok(Some(persisted)) => match persisted.into_identity() {
                Some(identity) => {
                    tracing::info!(user_id = %identity.user_id, "Restored persisted session");
                    Session::authenticated(identity)
                }
                None => {
                    tracing::warn!("Persisted session is incomplete, starting logged out");
                    Session::anonymous()
                }
            },
            Ok(None) => Session::anonymous(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load persisted session");
                Session::anonymous()
            }
        };

        Self {
            state: RwLock::new(session),
            persistence,
        }
    }

    pub fn current(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persists the credentials as a group, then publishes them.
    pub fn set_authenticated(
        &self,
        token: impl Into<String>,
        user_id: UserId,
        display_name: impl Into<String>,
    ) -> Result<Session, SessionStoreError> {
        let identity = Identity {
            token: token.into(),
            user_id,
            display_name: display_name.into(),
        };
        self.persistence
            .save(&PersistedSession::from_identity(&identity))?;

        let session = Session::authenticated(identity);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = session.clone();
        tracing::info!(%user_id, "Session authenticated");
        Ok(session)
    }

    /// Drops the in-memory credentials first so no caller can observe a
    /// stale token, then removes the persisted copy. Safe to call repeatedly.
    pub fn clear(&self) {
        let was_authenticated = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let was_authenticated = state.is_authenticated();
            *state = Session::anonymous();
            was_authenticated
        };

        if let Err(err) = self.persistence.clear() {
            tracing::warn!(error = %err, "Failed to remove persisted session");
        }
        if was_authenticated {
            tracing::info!("Session cleared");
        }
    }
}
