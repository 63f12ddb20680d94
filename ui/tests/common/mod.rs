use std::sync::Arc;

use egui_kittest::Harness;
use gatehouse_business::{KeyValueStore, MemoryStore};
use gatehouse_ui::GatehouseApp;
use gatehouse_ui::state::State;

pub struct TestCtx<'a, T = State> {
    store: MemoryStore,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }

    /// The store backing the session gate.
    #[allow(unused)]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl<'a> TestCtx<'a, State> {
    #[allow(unused)]
    pub fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        let store = MemoryStore::new();
        let harness = Harness::new_ui_state(app, test_state(&store));
        Self { store, harness }
    }
}

impl<'a> TestCtx<'a, GatehouseApp> {
    #[allow(unused)]
    pub fn new_app() -> Self {
        Self::new_app_with_store(MemoryStore::new())
    }

    /// Starts the app on top of an existing store, e.g. one holding a session.
    #[allow(unused)]
    pub fn new_app_with_store(store: MemoryStore) -> Self {
        let app = GatehouseApp::new(test_state(&store));
        let harness = Harness::new_eframe(|_| app);
        Self { store, harness }
    }
}

fn test_state(store: &MemoryStore) -> State {
    let store: Arc<dyn KeyValueStore> = Arc::new(store.clone());
    State::test(store)
}
