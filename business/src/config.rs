use std::time::Duration;

use anyhow::bail;
use gatehouse_states::State;
use log::info;
use serde::Deserialize;

/// Prefix of the environment variables read by [`BusinessConfig::from_env`].
pub const ENV_PREFIX: &str = "GATEHOUSE_";

/// Tunables of the simulated login flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BusinessConfig {
    /// Artificial delay before a login attempt resolves, in milliseconds.
    pub latency_ms: u64,
    /// The one verification code the simulated MFA step accepts.
    pub mfa_code: String,
    /// Failed credential checks allowed before the form locks.
    pub max_attempts: u32,
    /// Key of the session record in the local key-value store.
    pub session_key: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            mfa_code: "123456".to_owned(),
            max_attempts: 3,
            session_key: "gatehouse.session".to_owned(),
        }
    }
}

impl BusinessConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Reads `GATEHOUSE_*` variables from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Builds the configuration from `(name, value)` pairs, keeping only
    /// `GATEHOUSE_*` names. Unset values fall back to the defaults.
    pub fn from_vars<I, K, V>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_owned(), value.as_ref().to_owned()))
            })
            .collect();

        if !scoped.is_empty() {
            info!(
                "Loading {} {ENV_PREFIX}* configuration override(s)",
                scoped.len()
            );
        }

        let config: Self = serde_env::from_iter(scoped)?;
        config.validated()
    }

    fn validated(self) -> anyhow::Result<Self> {
        if self.max_attempts == 0 {
            bail!("{ENV_PREFIX}MAX_ATTEMPTS must be at least 1");
        }
        if self.mfa_code.len() != 6 || !self.mfa_code.bytes().all(|b| b.is_ascii_digit()) {
            bail!("{ENV_PREFIX}MFA_CODE must be exactly 6 digits");
        }
        if self.session_key.trim().is_empty() {
            bail!("{ENV_PREFIX}SESSION_KEY must not be empty");
        }
        Ok(self)
    }
}

impl State for BusinessConfig {}
