//! Shared application state for all routes: the store handle and the password hasher.

use crate::password::{BcryptHasher, PasswordHasher};
use crate::store::{MemoryStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>) -> Self {
        AppState { store, hasher }
    }

    /// Fresh in-memory store with bcrypt at `cost`.
    pub fn in_memory(cost: u32) -> Self {
        AppState::new(Arc::new(MemoryStore::new()), Arc::new(BcryptHasher::new(cost)))
    }
}
