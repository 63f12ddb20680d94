//! Business logic of the Gatehouse login screen.
//!
//! Everything the screen decides lives here: validation, the simulated
//! authentication flow, the session gate and the commands that tie them to a
//! [`StateCtx`](gatehouse_states::StateCtx). The `ui` crate only renders these
//! states and dispatches these commands.

mod config;
mod credentials;
mod error;
mod login_state;
mod route;
mod session;
pub mod simulator;
mod store;
mod validation;

pub use config::{BusinessConfig, ENV_PREFIX};
pub use credentials::{
    CredentialLookup, CredentialRecord, Role, StaticCredentials, normalize_email,
};
pub use error::{SessionError, StoreError};
pub use login_state::{
    ActiveSession, AuthServices, DismissNoticeCommand, EnterLoginScreenCommand,
    FORGOT_PASSWORD_NOTICE, ForgotPasswordCommand, LoginStatus, LogoutCommand,
    NEED_HELP_NOTICE, NeedHelpCommand, Notice, SubmitLoginCommand, register_login_states,
};
pub use route::Route;
pub use session::{GateDecision, SessionGate, SessionRecord};
pub use simulator::{AttemptRequest, AttemptState, AuthResult, AuthenticationSimulator};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use validation::{
    Field, FieldErrors, LoginForm, MFA_CODE_LEN, MIN_PASSWORD_LEN, is_email_shaped, validate,
};
