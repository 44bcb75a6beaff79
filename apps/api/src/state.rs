use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::session::SessionStore;
use crate::whatsapp::WhatsAppClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub whatsapp: WhatsAppClient,
    /// Per-session avoid-list of generated profiles. The only shared
    /// mutable state in the service.
    pub sessions: Arc<SessionStore>,
}
