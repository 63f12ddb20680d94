//! Login state machine for the login screen.
//!
//! This module wires the validator, the authentication simulator and the session
//! gate into states and commands on a [`StateCtx`]. It tracks:
//! - The form fields ([`LoginForm`]) and their validation messages ([`FieldErrors`])
//! - Attempt bookkeeping ([`AttemptState`]): failures, MFA step
//! - What the screen should say ([`LoginStatus`], [`Notice`])
//! - Where the user is ([`Route`]) and who they are ([`ActiveSession`])
//!
//! ## Security
//!
//! Nothing here authenticates anyone. Credentials are compared against the injected
//! [`CredentialLookup`](crate::CredentialLookup) and the session record is plain JSON
//! in a local store.

use std::sync::Arc;

use gatehouse_states::{Command, CommandStage, Dep, State, StateCtx, Updater};
use log::{info, warn};

use crate::{
    AttemptRequest, AttemptState, AuthResult, AuthenticationSimulator, BusinessConfig,
    FieldErrors, GateDecision, KeyValueStore, LoginForm, Role, Route, SessionGate,
    SessionRecord, validate,
};

pub const FORGOT_PASSWORD_NOTICE: &str =
    "Password reset instructions have been sent to your registered email address.";
pub const NEED_HELP_NOTICE: &str =
    "Contact IT Support at extension 4357 or support@company.com for assistance.";

/// What the login screen is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoginStatus {
    #[default]
    Idle,
    /// A submission is waiting on the simulated call.
    Authenticating,
    /// Password accepted; the verification code is needed.
    AwaitingMfa,
    /// The last submission failed; the user may try again.
    Rejected(String),
    /// Too many failures. Submissions are ignored from now on.
    Locked(String),
    Authenticated { name: String, role: Role },
}

impl LoginStatus {
    pub fn is_authenticating(&self) -> bool {
        matches!(self, Self::Authenticating)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) | Self::Locked(message) => Some(message.as_str()),
            Self::AwaitingMfa => Some(crate::simulator::MFA_PROMPT),
            Self::Idle | Self::Authenticating | Self::Authenticated { .. } => None,
        }
    }
}

impl State for LoginStatus {}

/// Informational banner raised by the help links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub message: Option<String>,
}

impl State for Notice {}

/// The session the dashboard shows, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSession {
    pub record: Option<SessionRecord>,
}

impl State for ActiveSession {}

/// Collaborators injected into the login commands.
#[derive(Clone)]
pub struct AuthServices {
    pub simulator: Arc<AuthenticationSimulator>,
    pub store: Arc<dyn KeyValueStore>,
}

impl AuthServices {
    pub fn new(simulator: AuthenticationSimulator, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            simulator: Arc::new(simulator),
            store,
        }
    }
}

impl std::fmt::Debug for AuthServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServices")
            .field("simulator", &self.simulator)
            .finish_non_exhaustive()
    }
}

impl State for AuthServices {}

/// Registers every state the login screen reads or writes.
pub fn register_login_states(ctx: &mut StateCtx, config: BusinessConfig, services: AuthServices) {
    ctx.add_state(config);
    ctx.add_state(services);
    ctx.add_state(Route::default());
    ctx.add_state(ActiveSession::default());
    reset_login_screen(ctx);
}

fn reset_login_screen(ctx: &mut StateCtx) {
    ctx.add_state(LoginForm::default());
    ctx.add_state(AttemptState::default());
    ctx.add_state(FieldErrors::default());
    ctx.add_state(LoginStatus::default());
    ctx.add_state(Notice::default());
}

/// Manual-only command run when the login screen is entered.
///
/// ## Flow
///
/// 1. Reads the session record through [`SessionGate`]
/// 2. A readable record routes to [`Route::Dashboard`] without re-validation
/// 3. Otherwise (absent, or unreadable and now deleted) stays on [`Route::Login`]
///
/// Dispatch explicitly via `ctx.dispatch::<EnterLoginScreenCommand>()`.
#[derive(Default, Debug)]
pub struct EnterLoginScreenCommand;

impl Command for EnterLoginScreenCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) -> CommandStage {
        let config = deps.get_state_ref::<BusinessConfig>();
        let services = deps.get_state_ref::<AuthServices>();

        match SessionGate::new(services.store.as_ref(), &config.session_key).check() {
            GateDecision::AlreadyAuthenticated(record) => {
                info!("EnterLoginScreenCommand: session present, skipping form");
                updater.set(ActiveSession {
                    record: Some(record),
                });
                updater.set(Route::Dashboard);
            }
            GateDecision::ShowForm => {
                info!("EnterLoginScreenCommand: no session, showing form");
                updater.set(Route::Login);
            }
        }
        CommandStage::Finished
    }
}

/// Manual-only command that submits the login form.
///
/// ## Flow
///
/// 1. Once locked, does nothing but restate the lockout
/// 2. Replaces [`FieldErrors`] with a fresh validation pass; if any, clears the
///    banner back to idle (or the MFA prompt) and stops
/// 3. Sets [`LoginStatus::Authenticating`] and spawns the simulated call
/// 4. Publishes the new [`AttemptState`] and the outcome
/// 5. On success writes the session record and routes to the dashboard; a failed
///    write is logged and does not block navigation
///
/// While the call is outstanding, further dispatches are rejected by the context.
#[derive(Default, Debug)]
pub struct SubmitLoginCommand;

impl Command for SubmitLoginCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) -> CommandStage {
        let form = deps.get_state_ref::<LoginForm>();
        let attempts = *deps.get_state_ref::<AttemptState>();
        let config = deps.get_state_ref::<BusinessConfig>();

        if attempts.is_locked(config.max_attempts) {
            info!("SubmitLoginCommand: locked, ignoring submission");
            updater.set(LoginStatus::Locked(
                crate::simulator::LOCKOUT_MESSAGE.to_owned(),
            ));
            return CommandStage::Finished;
        }

        let errors = validate(form, attempts.mfa_pending());
        if !errors.is_empty() {
            info!(
                "SubmitLoginCommand: {} field(s) failed validation",
                errors.len()
            );
            updater.set(errors);
            updater.set(if attempts.mfa_pending() {
                LoginStatus::AwaitingMfa
            } else {
                LoginStatus::Idle
            });
            return CommandStage::Finished;
        }
        updater.set(errors);

        let request = AttemptRequest::from_form(form, &attempts);
        let remember_me = form.remember_me;
        let session_key = config.session_key.clone();
        let services = deps.get_state_ref::<AuthServices>().clone();

        info!("SubmitLoginCommand: submitting for '{}'", request.email);
        updater.set(LoginStatus::Authenticating);

        CommandStage::pending(async move {
            let mut attempts = attempts;
            let result = services.simulator.attempt(&mut attempts, &request).await;
            updater.set(attempts);

            match result {
                AuthResult::Authenticated { email, role, name } => {
                    let record = SessionRecord::new(email, role, name.clone(), remember_me);
                    if let Err(err) =
                        SessionGate::new(services.store.as_ref(), &session_key).persist(&record)
                    {
                        warn!("SubmitLoginCommand: session not persisted: {err}");
                    }
                    updater.set(LoginStatus::Authenticated { name, role });
                    updater.set(ActiveSession {
                        record: Some(record),
                    });
                    updater.set(Route::Dashboard);
                }
                AuthResult::MfaChallenge => updater.set(LoginStatus::AwaitingMfa),
                AuthResult::Locked => {
                    warn!("SubmitLoginCommand: too many failed attempts, locking");
                    updater.set(LoginStatus::Locked(
                        crate::simulator::LOCKOUT_MESSAGE.to_owned(),
                    ));
                }
                rejected @ (AuthResult::InvalidCredentials { .. } | AuthResult::InvalidMfaCode) => {
                    updater.set(LoginStatus::Rejected(
                        rejected.message().unwrap_or_default(),
                    ));
                }
            }
        })
    }
}

/// Manual-only command behind the "Forgot password?" link.
#[derive(Default, Debug)]
pub struct ForgotPasswordCommand;

impl Command for ForgotPasswordCommand {
    fn run(&self, _deps: Dep<'_>, updater: Updater) -> CommandStage {
        updater.set(Notice {
            message: Some(FORGOT_PASSWORD_NOTICE.to_owned()),
        });
        CommandStage::Finished
    }
}

/// Manual-only command behind the "Need help?" link.
#[derive(Default, Debug)]
pub struct NeedHelpCommand;

impl Command for NeedHelpCommand {
    fn run(&self, _deps: Dep<'_>, updater: Updater) -> CommandStage {
        updater.set(Notice {
            message: Some(NEED_HELP_NOTICE.to_owned()),
        });
        CommandStage::Finished
    }
}

#[derive(Default, Debug)]
pub struct DismissNoticeCommand;

impl Command for DismissNoticeCommand {
    fn run(&self, _deps: Dep<'_>, updater: Updater) -> CommandStage {
        updater.set(Notice::default());
        CommandStage::Finished
    }
}

/// Manual-only command that signs out.
///
/// Deletes the session record and returns to a fresh login screen, which starts
/// with its own attempt counter.
#[derive(Default, Debug)]
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) -> CommandStage {
        let config = deps.get_state_ref::<BusinessConfig>();
        let services = deps.get_state_ref::<AuthServices>();

        if let Err(err) = SessionGate::new(services.store.as_ref(), &config.session_key).clear() {
            warn!("LogoutCommand: failed to delete session: {err}");
        }
        info!("LogoutCommand: user signed out");

        updater.set(ActiveSession::default());
        updater.set(LoginForm::default());
        updater.set(AttemptState::default());
        updater.set(FieldErrors::default());
        updater.set(LoginStatus::default());
        updater.set(Notice::default());
        updater.set(Route::Login);
        CommandStage::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages() {
        assert_eq!(LoginStatus::Idle.message(), None);
        assert_eq!(LoginStatus::Authenticating.message(), None);
        assert_eq!(
            LoginStatus::Rejected("nope".to_owned()).message(),
            Some("nope")
        );
        assert!(LoginStatus::AwaitingMfa.message().is_some());
        assert!(LoginStatus::Locked("x".to_owned()).is_locked());
        assert!(
            LoginStatus::Authenticated {
                name: "A".to_owned(),
                role: Role::Manager
            }
            .message()
            .is_none()
        );
    }
}
