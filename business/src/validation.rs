//! Client-side form validation.

use std::{collections::BTreeMap, sync::LazyLock};

use gatehouse_states::State;
use regex::Regex;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 12;
/// Length of a verification code.
pub const MFA_CODE_LEN: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern should compile")
});

/// The editable fields of the login form.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
    pub mfa_code: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .field("mfa_code", &"<redacted>")
            .finish()
    }
}

impl State for LoginForm {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    MfaCode,
}

/// Per-field messages from the latest validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl State for FieldErrors {}

pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Checks every field of `form` and collects all failures.
///
/// The verification code is only checked when `mfa_expected` is set. An empty
/// result means the form may be submitted.
pub fn validate(form: &LoginForm, mfa_expected: bool) -> FieldErrors {
    let mut errors = FieldErrors::default();

    let email = form.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "Email address is required");
    } else if !is_email_shaped(email) {
        errors.insert(Field::Email, "Please enter a valid email address");
    }

    // Only the length is enforced; the wording is what users are shown.
    if form.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            Field::Password,
            "Password must be at least 12 characters with uppercase, lowercase, number, and special character",
        );
    }

    if mfa_expected {
        let code = form.mfa_code.trim();
        if code.is_empty() {
            errors.insert(Field::MfaCode, "Verification code is required");
        } else if code.len() != MFA_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            errors.insert(Field::MfaCode, "Verification code must be 6 digits");
        }
    }

    errors
}
