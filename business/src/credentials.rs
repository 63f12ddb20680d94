//! Credential records and the lookup capability the simulator authenticates against.
//!
//! [`StaticCredentials`] is the seeded in-memory table. A real deployment swaps it for
//! a [`CredentialLookup`] backed by the identity provider; nothing else changes.

use std::{collections::BTreeMap, fmt};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role attached to a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Hr,
    Manager,
    Employee,
    Auditor,
}

impl Role {
    /// Roles that must pass the verification-code step after their password.
    pub fn requires_mfa(self) -> bool {
        matches!(self, Self::Admin | Self::Hr | Self::Auditor)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Hr => "Human Resources",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
            Self::Auditor => "Auditor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the identity store.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub email: String,
    /// Plaintext; the table only simulates an identity provider.
    pub password: String,
    pub role: Role,
    pub name: String,
}

impl CredentialRecord {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
            name: name.into(),
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("name", &self.name)
            .finish()
    }
}

/// Case-folds an email address for use as a lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Maps an email address to its credential record.
#[async_trait]
pub trait CredentialLookup: Send + Sync {
    /// Emails are matched case-insensitively.
    async fn find(&self, email: &str) -> Option<CredentialRecord>;
}

/// Immutable in-memory credential table.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    records: BTreeMap<String, CredentialRecord>,
}

impl StaticCredentials {
    pub fn from_records(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (normalize_email(&record.email), record))
                .collect(),
        }
    }

    /// The table the login screen ships with.
    pub fn seeded() -> Self {
        Self::from_records([
            CredentialRecord::new(
                "admin@company.com",
                "AdminSecure123!",
                Role::Admin,
                "System Administrator",
            ),
            CredentialRecord::new("hr@company.com", "HRManager2024!", Role::Hr, "HR Manager"),
            CredentialRecord::new(
                "manager@company.com",
                "TeamLead456!",
                Role::Manager,
                "Team Manager",
            ),
            CredentialRecord::new(
                "employee@company.com",
                "Employee789!",
                Role::Employee,
                "John Employee",
            ),
            CredentialRecord::new(
                "auditor@company.com",
                "AuditCheck321!",
                Role::Auditor,
                "Compliance Auditor",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CredentialLookup for StaticCredentials {
    async fn find(&self, email: &str) -> Option<CredentialRecord> {
        self.records.get(&normalize_email(email)).cloned()
    }
}
