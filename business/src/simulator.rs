//! Simulated authentication against a [`CredentialLookup`].
//!
//! ```text
//! Idle --bad credentials--> Idle (failed_attempts + 1) --3rd failure--> Locked
//! Idle --good credentials, MFA role--> AwaitingMfa --bad code--> AwaitingMfa
//!                                                  --good code--> Authenticated
//! Idle --good credentials, other role--> Authenticated
//! ```
//!
//! `Locked` is terminal: once reached, attempts return it without consulting the
//! credential table or touching the counter.

use std::{fmt, sync::Arc, time::Duration};

use gatehouse_states::State;
use log::info;

use crate::{BusinessConfig, CredentialLookup, LoginForm, Role};

pub const LOCKOUT_MESSAGE: &str = "Account temporarily locked due to multiple failed attempts. \
     Please try again in 15 minutes or contact IT support.";
pub const MFA_PROMPT: &str = "Enter the 6-digit verification code from your authenticator app.";
pub const INVALID_MFA_MESSAGE: &str = "Invalid verification code. Please try again.";

/// Attempt bookkeeping for one login screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptState {
    pub failed_attempts: u32,
    pub mfa_required: bool,
    pub mfa_verified: bool,
}

impl AttemptState {
    pub fn is_locked(&self, max_attempts: u32) -> bool {
        self.failed_attempts >= max_attempts
    }

    /// Whether the verification-code step is showing.
    pub fn mfa_pending(&self) -> bool {
        self.mfa_required && !self.mfa_verified
    }
}

impl State for AttemptState {}

/// One submission as seen by the simulator.
#[derive(Clone)]
pub struct AttemptRequest {
    pub email: String,
    pub password: String,
    pub mfa_code: String,
    pub mfa_phase_active: bool,
}

impl AttemptRequest {
    pub fn from_form(form: &LoginForm, attempts: &AttemptState) -> Self {
        Self {
            email: form.email.trim().to_owned(),
            password: form.password.clone(),
            mfa_code: form.mfa_code.trim().to_owned(),
            mfa_phase_active: attempts.mfa_pending(),
        }
    }
}

impl fmt::Debug for AttemptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptRequest")
            .field("email", &self.email)
            .field("mfa_phase_active", &self.mfa_phase_active)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    InvalidCredentials { remaining: u32 },
    Locked,
    MfaChallenge,
    InvalidMfaCode,
    Authenticated { email: String, role: Role, name: String },
}

impl AuthResult {
    /// Text shown to the user for this outcome, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::InvalidCredentials { remaining } => Some(format!(
                "Invalid email or password. {remaining} attempt{} remaining.",
                if *remaining == 1 { "" } else { "s" }
            )),
            Self::Locked => Some(LOCKOUT_MESSAGE.to_owned()),
            Self::MfaChallenge => Some(MFA_PROMPT.to_owned()),
            Self::InvalidMfaCode => Some(INVALID_MFA_MESSAGE.to_owned()),
            Self::Authenticated { .. } => None,
        }
    }
}

pub struct AuthenticationSimulator {
    lookup: Arc<dyn CredentialLookup>,
    latency: Duration,
    mfa_code: String,
    max_attempts: u32,
}

impl AuthenticationSimulator {
    pub fn new(lookup: Arc<dyn CredentialLookup>, config: &BusinessConfig) -> Self {
        Self {
            lookup,
            latency: config.latency(),
            mfa_code: config.mfa_code.clone(),
            max_attempts: config.max_attempts,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs one submission after the artificial latency, updating `attempts`.
    pub async fn attempt(&self, attempts: &mut AttemptState, request: &AttemptRequest) -> AuthResult {
        if attempts.is_locked(self.max_attempts) {
            return AuthResult::Locked;
        }

        tokio::time::sleep(self.latency).await;

        let record = self
            .lookup
            .find(&request.email)
            .await
            .filter(|record| record.password == request.password);

        let Some(record) = record else {
            let prior = attempts.failed_attempts;
            attempts.failed_attempts += 1;
            info!(
                "Rejected credentials for '{}' ({} failed)",
                request.email, attempts.failed_attempts
            );
            if attempts.is_locked(self.max_attempts) {
                return AuthResult::Locked;
            }
            return AuthResult::InvalidCredentials {
                remaining: self.max_attempts - 1 - prior,
            };
        };

        if request.mfa_phase_active {
            if request.mfa_code != self.mfa_code {
                info!("Rejected verification code for '{}'", record.email);
                return AuthResult::InvalidMfaCode;
            }
            attempts.mfa_verified = true;
        } else if record.role.requires_mfa() {
            info!("'{}' must pass the verification-code step", record.email);
            attempts.mfa_required = true;
            return AuthResult::MfaChallenge;
        }

        info!("Authenticated '{}' as {}", record.email, record.role);
        AuthResult::Authenticated {
            email: record.email,
            role: record.role,
            name: record.name,
        }
    }
}

impl fmt::Debug for AuthenticationSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationSimulator")
            .field("latency", &self.latency)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticCredentials;

    fn simulator() -> AuthenticationSimulator {
        AuthenticationSimulator::new(
            Arc::new(StaticCredentials::seeded()),
            &BusinessConfig::default(),
        )
    }

    fn request(email: &str, password: &str, mfa_code: &str, mfa_phase_active: bool) -> AttemptRequest {
        AttemptRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            mfa_code: mfa_code.to_owned(),
            mfa_phase_active,
        }
    }

    #[test]
    fn remaining_attempts_are_pluralised() {
        assert_eq!(
            AuthResult::InvalidCredentials { remaining: 2 }.message().as_deref(),
            Some("Invalid email or password. 2 attempts remaining.")
        );
        assert_eq!(
            AuthResult::InvalidCredentials { remaining: 1 }.message().as_deref(),
            Some("Invalid email or password. 1 attempt remaining.")
        );
    }

    #[test]
    fn request_reads_mfa_phase_from_attempts() {
        let form = LoginForm {
            email: " hr@company.com ".to_owned(),
            password: "HRManager2024!".to_owned(),
            remember_me: true,
            mfa_code: " 123456".to_owned(),
        };
        let attempts = AttemptState {
            mfa_required: true,
            ..AttemptState::default()
        };

        let request = AttemptRequest::from_form(&form, &attempts);
        assert_eq!(request.email, "hr@company.com");
        assert_eq!(request.mfa_code, "123456");
        assert!(request.mfa_phase_active);
    }

    #[tokio::test(start_paused = true)]
    async fn non_mfa_role_authenticates_immediately() {
        let mut attempts = AttemptState::default();
        let result = simulator()
            .attempt(&mut attempts, &request("Employee@Company.com", "Employee789!", "", false))
            .await;

        assert_eq!(
            result,
            AuthResult::Authenticated {
                email: "employee@company.com".to_owned(),
                role: Role::Employee,
                name: "John Employee".to_owned(),
            }
        );
        assert_eq!(attempts, AttemptState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_elapses_before_resolving() {
        let sim = simulator().with_latency(Duration::from_millis(800));
        let mut attempts = AttemptState::default();
        let started = tokio::time::Instant::now();

        sim.attempt(&mut attempts, &request("manager@company.com", "TeamLead456!", "", false))
            .await;

        assert!(started.elapsed() >= Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_mfa_code_keeps_failure_counter() {
        let sim = simulator();
        let mut attempts = AttemptState::default();

        let first = sim
            .attempt(&mut attempts, &request("auditor@company.com", "AuditCheck321!", "", false))
            .await;
        assert_eq!(first, AuthResult::MfaChallenge);
        assert!(attempts.mfa_pending());

        let wrong = sim
            .attempt(&mut attempts, &request("auditor@company.com", "AuditCheck321!", "654321", true))
            .await;
        assert_eq!(wrong, AuthResult::InvalidMfaCode);
        assert_eq!(attempts.failed_attempts, 0);
        assert!(attempts.mfa_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn lockout_is_terminal() {
        let sim = simulator();
        let mut attempts = AttemptState {
            failed_attempts: 3,
            ..AttemptState::default()
        };

        let result = sim
            .attempt(&mut attempts, &request("employee@company.com", "Employee789!", "", false))
            .await;

        assert_eq!(result, AuthResult::Locked);
        assert_eq!(attempts.failed_attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_email_counts_as_failure() {
        let sim = simulator();
        let mut attempts = AttemptState::default();

        let result = sim
            .attempt(&mut attempts, &request("ghost@company.com", "Whatever12345", "", false))
            .await;

        assert_eq!(result, AuthResult::InvalidCredentials { remaining: 2 });
        assert_eq!(attempts.failed_attempts, 1);
    }
}
