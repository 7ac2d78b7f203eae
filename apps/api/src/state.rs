use std::sync::Arc;

use crate::pipeline::orchestrator::Orchestrator;
use crate::tools::ToolRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub tools: ToolRegistry,
}
