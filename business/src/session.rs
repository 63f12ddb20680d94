//! The persisted session record and the gate that consults it on screen entry.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{KeyValueStore, Role, SessionError, StoreError};

/// Local evidence that a user completed authentication.
///
/// Stored as JSON with camelCase keys; `loginTimestamp` is ISO-8601.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub login_timestamp: DateTime<Utc>,
    pub remember_me: bool,
}

impl SessionRecord {
    pub fn new(
        email: impl Into<String>,
        role: Role,
        name: impl Into<String>,
        remember_me: bool,
    ) -> Self {
        Self::at(email, role, name, remember_me, Utc::now())
    }

    pub fn at(
        email: impl Into<String>,
        role: Role,
        name: impl Into<String>,
        remember_me: bool,
        login_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            role,
            name: name.into(),
            login_timestamp,
            remember_me,
        }
    }
}

/// Outcome of [`SessionGate::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A readable session exists; leave the login screen.
    AlreadyAuthenticated(SessionRecord),
    ShowForm,
}

/// Reads and writes the session record under one key of a [`KeyValueStore`].
pub struct SessionGate<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> SessionGate<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    pub fn load(&self) -> Result<Option<SessionRecord>, SessionError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(SessionError::Parse)
    }

    /// Decides whether the form is needed.
    ///
    /// Neither credentials nor age of a readable record are re-checked. An
    /// unreadable record is deleted and the form is shown.
    pub fn check(&self) -> GateDecision {
        match self.load() {
            Ok(Some(record)) => {
                info!("SessionGate: found session for '{}'", record.email);
                GateDecision::AlreadyAuthenticated(record)
            }
            Ok(None) => GateDecision::ShowForm,
            Err(
                err @ (SessionError::Parse(_) | SessionError::Store(StoreError::Corrupt { .. })),
            ) => {
                warn!("SessionGate: discarding unreadable session: {err}");
                if let Err(err) = self.clear() {
                    warn!("SessionGate: failed to discard session: {err}");
                }
                GateDecision::ShowForm
            }
            Err(err) => {
                warn!("SessionGate: cannot read session, showing form: {err}");
                GateDecision::ShowForm
            }
        }
    }

    pub fn persist(&self, record: &SessionRecord) -> Result<(), SessionError> {
        let raw = serde_json::to_string(record).map_err(SessionError::Encode)?;
        self.store.set(self.key, &raw)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(self.key)
    }
}
