use std::sync::Arc;

use plover::provider::CompletionProvider;
use plover::store::ChatStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChatStore>,
    pub provider: Arc<dyn CompletionProvider>,
}
