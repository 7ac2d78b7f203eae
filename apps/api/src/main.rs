mod config;
mod directory;
mod document;
mod errors;
mod models;
mod pipeline;
mod policy;
mod routes;
mod services;
mod state;
mod tools;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::directory::DirectoryStore;
use crate::pipeline::orchestrator::Orchestrator;
use crate::policy::GuardrailPolicy;
use crate::routes::build_router;
use crate::services::duckduckgo::DuckDuckGoClient;
use crate::services::groq::GroqClient;
use crate::services::retrieval::RetrievalServiceClient;
use crate::services::{SemanticRetrieval, TextGenerator, WebSearch};
use crate::state::AppState;
use crate::tools::{ToolRegistry, KNOWLEDGE_STORAGE_KEY};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (aborts on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pendo API v{}", env!("CARGO_PKG_VERSION"));

    // Load the approved directory
    let directory = Arc::new(DirectoryStore::approved());
    info!(
        "Approved directory loaded: {} member companies, {} training programs, {} internships",
        directory.members().len(),
        directory.programs().len(),
        directory.internships().len()
    );

    let policy = Arc::new(GuardrailPolicy::massachusetts_clean_energy());

    // Initialize the text generation client
    let generator: Arc<dyn TextGenerator> = Arc::new(GroqClient::new(config.groq_api_key.clone()));
    info!("Groq client initialized (model: {})", services::groq::MODEL);

    // Initialize the web search client
    let search: Arc<dyn WebSearch> = Arc::new(DuckDuckGoClient::new());

    // Initialize the semantic retrieval client
    let retrieval: Arc<dyn SemanticRetrieval> = Arc::new(RetrievalServiceClient::new(
        config.retrieval_service_url.clone(),
    ));

    // Build the knowledge index; the API still serves without it
    let knowledge_index = match retrieval
        .build(&directory.knowledge_corpus(), KNOWLEDGE_STORAGE_KEY)
        .await
    {
        Ok(index) => {
            info!("Knowledge base index built ({})", index.key());
            Some(index)
        }
        Err(e) => {
            warn!("Knowledge base build failed, continuing without it: {e}");
            None
        }
    };

    let tools = ToolRegistry::new(
        Arc::clone(&directory),
        Arc::clone(&search),
        Arc::clone(&retrieval),
        knowledge_index,
    );
    let capability_names: Vec<&str> = tools.descriptors().iter().map(|d| d.name).collect();
    info!("Registered capabilities: {}", capability_names.join(", "));

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&directory),
        policy,
        generator,
        search,
        &tools,
    ));

    // Build app state
    let state = AppState {
        orchestrator,
        tools,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
