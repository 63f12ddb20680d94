use std::sync::Arc;

use gatehouse_business::{
    AuthServices, AuthenticationSimulator, BusinessConfig, EnterLoginScreenCommand, FileStore,
    KeyValueStore, MemoryStore, StaticCredentials, register_login_states,
};
use gatehouse_states::{StateCtx, Time};
use log::{info, warn};

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

impl Default for State {
    fn default() -> Self {
        let config = BusinessConfig::from_env().unwrap_or_else(|err| {
            warn!("Ignoring GATEHOUSE_* overrides: {err:#}");
            BusinessConfig::default()
        });

        let store: Arc<dyn KeyValueStore> = match FileStore::in_config_dir() {
            Some(store) => {
                info!("Session store at {}", store.path().display());
                Arc::new(store)
            }
            None => {
                warn!("No config directory, sessions will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        };

        Self::new(config, store)
    }
}

impl State {
    /// Builds the state context and runs the session gate once.
    pub fn new(config: BusinessConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let simulator = AuthenticationSimulator::new(Arc::new(StaticCredentials::seeded()), &config);

        let mut ctx = StateCtx::new();
        ctx.add_state(Time::default());
        register_login_states(&mut ctx, config, AuthServices::new(simulator, store));

        if let Err(err) = ctx.dispatch::<EnterLoginScreenCommand>() {
            warn!("Session gate did not run: {err}");
        }

        Self { ctx }
    }

    pub fn test(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(BusinessConfig::default(), store)
    }
}
