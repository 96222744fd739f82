pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use services::{ChatRelay, DiseaseCatalog, Translations};
use std::sync::Arc;

/// Shared application state: static site data and the chat relay.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<DiseaseCatalog>,
    pub translations: Arc<Translations>,
    pub chat_relay: Arc<ChatRelay>,
}

impl AppState {
    pub fn new(
        catalog: Arc<DiseaseCatalog>,
        translations: Arc<Translations>,
        chat_relay: Arc<ChatRelay>,
    ) -> Self {
        Self {
            catalog,
            translations,
            chat_relay,
        }
    }
}
