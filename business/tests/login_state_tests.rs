//! Integration tests for the login state machine driven through a `StateCtx`.

use std::sync::Arc;

use gatehouse_business::{
    ActiveSession, AttemptState, AuthServices, AuthenticationSimulator, BusinessConfig,
    DismissNoticeCommand, EnterLoginScreenCommand, FORGOT_PASSWORD_NOTICE, Field, FieldErrors,
    ForgotPasswordCommand, KeyValueStore, LoginForm, LoginStatus, LogoutCommand, MemoryStore,
    NEED_HELP_NOTICE, NeedHelpCommand, Notice, Role, Route, SessionRecord, StaticCredentials,
    StoreError, SubmitLoginCommand, register_login_states, simulator,
};
use gatehouse_states::{Error, StateCtx};

const SESSION_KEY: &str = "gatehouse.session";

fn login_ctx_with_store(store: Arc<dyn KeyValueStore>) -> StateCtx {
    let config = BusinessConfig::default();
    let simulator = AuthenticationSimulator::new(Arc::new(StaticCredentials::seeded()), &config);

    let mut ctx = StateCtx::new();
    register_login_states(&mut ctx, config, AuthServices::new(simulator, store));
    ctx
}

fn login_ctx() -> (StateCtx, MemoryStore) {
    let store = MemoryStore::new();
    (login_ctx_with_store(Arc::new(store.clone())), store)
}

fn fill(ctx: &mut StateCtx, email: &str, password: &str) {
    ctx.update::<LoginForm>(|form| {
        form.email = email.to_owned();
        form.password = password.to_owned();
    });
}

async fn submit(ctx: &mut StateCtx) {
    ctx.dispatch::<SubmitLoginCommand>()
        .expect("no submission should be in flight");
    ctx.wait_idle().await;
}

/// Tests for the credential step
mod credential_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_non_mfa_role_signs_in_on_first_submit() {
        let (mut ctx, store) = login_ctx();
        fill(&mut ctx, "employee@company.com", "Employee789!");
        ctx.update::<LoginForm>(|form| form.remember_me = true);

        submit(&mut ctx).await;

        assert_eq!(ctx.state::<Route>(), &Route::Dashboard);
        assert_eq!(
            ctx.state::<LoginStatus>(),
            &LoginStatus::Authenticated {
                name: "John Employee".to_owned(),
                role: Role::Employee,
            }
        );

        let raw = store
            .get(SESSION_KEY)
            .unwrap()
            .expect("session should be written");
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["email"], "employee@company.com");
        assert_eq!(json["role"], "employee");
        assert_eq!(json["name"], "John Employee");
        assert_eq!(json["rememberMe"], true);
        assert!(json["loginTimestamp"].is_string());

        let session = ctx.state::<ActiveSession>().record.as_ref().unwrap();
        assert_eq!(session.name, "John Employee");
    }

    #[tokio::test(start_paused = true)]
    async fn test_manager_login_is_case_insensitive() {
        let (mut ctx, _store) = login_ctx();
        fill(&mut ctx, "MANAGER@company.com", "TeamLead456!");

        submit(&mut ctx).await;

        assert_eq!(ctx.state::<Route>(), &Route::Dashboard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_wrong_passwords_lock_the_form() {
        let (mut ctx, store) = login_ctx();
        fill(&mut ctx, "manager@company.com", "WrongPassword1!");

        submit(&mut ctx).await;
        assert_eq!(
            ctx.state::<LoginStatus>(),
            &LoginStatus::Rejected("Invalid email or password. 2 attempts remaining.".to_owned())
        );

        submit(&mut ctx).await;
        assert_eq!(
            ctx.state::<LoginStatus>(),
            &LoginStatus::Rejected("Invalid email or password. 1 attempt remaining.".to_owned())
        );

        submit(&mut ctx).await;
        assert_eq!(
            ctx.state::<LoginStatus>(),
            &LoginStatus::Locked(simulator::LOCKOUT_MESSAGE.to_owned())
        );
        assert_eq!(ctx.state::<AttemptState>().failed_attempts, 3);
        assert_eq!(ctx.state::<Route>(), &Route::Login);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lockout_survives_correct_credentials() {
        let (mut ctx, store) = login_ctx();
        fill(&mut ctx, "ghost@company.com", "Nobody123456!");
        for _ in 0..3 {
            submit(&mut ctx).await;
        }

        fill(&mut ctx, "employee@company.com", "Employee789!");
        ctx.dispatch::<SubmitLoginCommand>().expect("dispatch");

        // Nothing is spawned once locked.
        assert_eq!(ctx.in_flight(), 0);
        assert!(ctx.state::<LoginStatus>().is_locked());
        assert_eq!(ctx.state::<AttemptState>().failed_attempts, 3);
        assert_eq!(ctx.state::<Route>(), &Route::Login);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_is_not_submitted() {
        let (mut ctx, _store) = login_ctx();
        fill(&mut ctx, "not-an-email", "short");

        ctx.dispatch::<SubmitLoginCommand>().expect("dispatch");

        assert_eq!(ctx.in_flight(), 0);
        let errors = ctx.state::<FieldErrors>();
        assert!(errors.contains(Field::Email));
        assert!(errors.contains(Field::Password));
        assert!(!errors.contains(Field::MfaCode));
        assert_eq!(ctx.state::<AttemptState>().failed_attempts, 0);
        assert_eq!(ctx.state::<LoginStatus>(), &LoginStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_replaced_on_each_pass() {
        let (mut ctx, _store) = login_ctx();
        fill(&mut ctx, "", "");
        ctx.dispatch::<SubmitLoginCommand>().expect("dispatch");
        assert_eq!(ctx.state::<FieldErrors>().len(), 2);

        fill(&mut ctx, "employee@company.com", "");
        ctx.dispatch::<SubmitLoginCommand>().expect("dispatch");
        assert_eq!(ctx.state::<FieldErrors>().len(), 1);
        assert!(ctx.state::<FieldErrors>().contains(Field::Password));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_clears_previous_rejection() {
        let (mut ctx, _store) = login_ctx();
        fill(&mut ctx, "employee@company.com", "WrongPassword1!");
        submit(&mut ctx).await;
        assert!(matches!(
            ctx.state::<LoginStatus>(),
            LoginStatus::Rejected(_)
        ));

        fill(&mut ctx, "employee@company.com", "");
        ctx.dispatch::<SubmitLoginCommand>().expect("dispatch");

        assert!(ctx.state::<FieldErrors>().contains(Field::Password));
        assert_eq!(
            ctx.state::<LoginStatus>(),
            &LoginStatus::Idle,
            "the old rejection should not sit next to the new field errors"
        );
        assert_eq!(ctx.state::<AttemptState>().failed_attempts, 1);
    }
}

/// Tests for the verification-code step
mod mfa_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_admin_must_pass_verification_code() {
        let (mut ctx, store) = login_ctx();
        fill(&mut ctx, "admin@company.com", "AdminSecure123!");

        submit(&mut ctx).await;
        assert_eq!(ctx.state::<LoginStatus>(), &LoginStatus::AwaitingMfa);
        assert!(ctx.state::<AttemptState>().mfa_pending());
        assert_eq!(ctx.state::<Route>(), &Route::Login);
        assert!(store.is_empty());

        // The code is now required.
        ctx.dispatch::<SubmitLoginCommand>().expect("dispatch");
        assert_eq!(ctx.in_flight(), 0);
        assert!(ctx.state::<FieldErrors>().contains(Field::MfaCode));
        assert_eq!(ctx.state::<LoginStatus>(), &LoginStatus::AwaitingMfa);

        ctx.update::<LoginForm>(|form| form.mfa_code = "123456".to_owned());
        submit(&mut ctx).await;

        assert_eq!(ctx.state::<Route>(), &Route::Dashboard);
        assert!(!ctx.state::<AttemptState>().mfa_pending());
        assert!(ctx.state::<AttemptState>().mfa_verified);
        assert!(store.get(SESSION_KEY).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_code_keeps_challenge_open() {
        let (mut ctx, _store) = login_ctx();
        fill(&mut ctx, "hr@company.com", "HRManager2024!");
        submit(&mut ctx).await;

        for _ in 0..4 {
            ctx.update::<LoginForm>(|form| form.mfa_code = "999999".to_owned());
            submit(&mut ctx).await;
            assert_eq!(
                ctx.state::<LoginStatus>(),
                &LoginStatus::Rejected(simulator::INVALID_MFA_MESSAGE.to_owned())
            );
        }

        // Wrong codes never count towards the lockout.
        assert_eq!(ctx.state::<AttemptState>().failed_attempts, 0);
        assert!(ctx.state::<AttemptState>().mfa_pending());

        ctx.update::<LoginForm>(|form| form.mfa_code = "123456".to_owned());
        submit(&mut ctx).await;
        assert_eq!(ctx.state::<Route>(), &Route::Dashboard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_password_during_challenge_counts_as_failure() {
        let (mut ctx, _store) = login_ctx();
        fill(&mut ctx, "auditor@company.com", "AuditCheck321!");
        submit(&mut ctx).await;

        ctx.update::<LoginForm>(|form| {
            form.password = "NotThePassword!".to_owned();
            form.mfa_code = "123456".to_owned();
        });
        submit(&mut ctx).await;

        assert_eq!(ctx.state::<AttemptState>().failed_attempts, 1);
        assert_eq!(ctx.state::<Route>(), &Route::Login);
    }
}

/// Tests for the in-flight guard
mod in_flight_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_is_rejected_while_pending() {
        let (mut ctx, _store) = login_ctx();
        fill(&mut ctx, "employee@company.com", "Employee789!");

        ctx.dispatch::<SubmitLoginCommand>().expect("first dispatch");
        assert!(ctx.is_running::<SubmitLoginCommand>());
        assert!(ctx.state::<LoginStatus>().is_authenticating());

        assert!(matches!(
            ctx.dispatch::<SubmitLoginCommand>(),
            Err(Error::CommandInFlight { .. })
        ));

        ctx.wait_idle().await;
        assert!(!ctx.is_running::<SubmitLoginCommand>());
        assert_eq!(ctx.state::<Route>(), &Route::Dashboard);
    }
}

/// Tests for the session gate and sign-out
mod session_tests {
    use super::*;

    #[test]
    fn test_unreadable_session_is_discarded() {
        let (mut ctx, store) = login_ctx();
        store.set(SESSION_KEY, "{\"email\": 42").unwrap();

        ctx.dispatch::<EnterLoginScreenCommand>().expect("dispatch");

        assert_eq!(ctx.state::<Route>(), &Route::Login);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
        assert!(ctx.state::<ActiveSession>().record.is_none());
    }

    #[test]
    fn test_stored_session_skips_the_form() {
        let (mut ctx, store) = login_ctx();
        let record = SessionRecord::new("hr@company.com", Role::Hr, "HR Manager", false);
        store
            .set(SESSION_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();

        ctx.dispatch::<EnterLoginScreenCommand>().expect("dispatch");

        assert_eq!(ctx.state::<Route>(), &Route::Dashboard);
        assert_eq!(ctx.state::<ActiveSession>().record.as_ref(), Some(&record));
    }

    #[test]
    fn test_empty_store_shows_the_form() {
        let (mut ctx, _store) = login_ctx();
        ctx.dispatch::<EnterLoginScreenCommand>().expect("dispatch");
        assert_eq!(ctx.state::<Route>(), &Route::Login);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_deletes_session_and_resets_screen() {
        let (mut ctx, store) = login_ctx();
        fill(&mut ctx, "employee@company.com", "Employee789!");
        submit(&mut ctx).await;
        assert!(store.get(SESSION_KEY).unwrap().is_some());

        ctx.dispatch::<LogoutCommand>().expect("dispatch");

        assert_eq!(ctx.state::<Route>(), &Route::Login);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
        assert_eq!(ctx.state::<LoginForm>(), &LoginForm::default());
        assert_eq!(ctx.state::<LoginStatus>(), &LoginStatus::Idle);
        assert!(ctx.state::<ActiveSession>().record.is_none());

        // A new screen entry finds nothing to restore.
        ctx.dispatch::<EnterLoginScreenCommand>().expect("dispatch");
        assert_eq!(ctx.state::<Route>(), &Route::Login);
    }

    /// A store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::io(
                key,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }

        fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_session_write_still_navigates() {
        let mut ctx = login_ctx_with_store(Arc::new(ReadOnlyStore));
        fill(&mut ctx, "employee@company.com", "Employee789!");

        submit(&mut ctx).await;

        assert_eq!(ctx.state::<Route>(), &Route::Dashboard);
    }
}

/// Tests for the help links
mod notice_tests {
    use super::*;

    #[test]
    fn test_help_links_raise_notices() {
        let (mut ctx, _store) = login_ctx();

        ctx.dispatch::<ForgotPasswordCommand>().expect("dispatch");
        assert_eq!(
            ctx.state::<Notice>().message.as_deref(),
            Some(FORGOT_PASSWORD_NOTICE)
        );

        ctx.dispatch::<NeedHelpCommand>().expect("dispatch");
        assert_eq!(
            ctx.state::<Notice>().message.as_deref(),
            Some(NEED_HELP_NOTICE)
        );

        ctx.dispatch::<DismissNoticeCommand>().expect("dispatch");
        assert_eq!(ctx.state::<Notice>(), &Notice::default());
    }
}
