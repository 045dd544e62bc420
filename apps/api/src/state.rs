use std::sync::Arc;

use crate::comments::store::CommentStore;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum
/// extractors. Both collaborators sit behind traits so tests can swap in
/// a scripted generator and an in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn TextGenerator>,
    pub store: Arc<dyn CommentStore>,
}
