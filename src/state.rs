//! Shared application state for all routes.

use crate::gateway::Gateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
}

impl AppState {
    pub fn new(gateway: impl Gateway + 'static) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
