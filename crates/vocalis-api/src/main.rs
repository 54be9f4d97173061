use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vocalis_api::{build_router, config::Config, state::AppState};
use vocalis_llm::{ClientFactory, OpenAIConfig};
use vocalis_persist::{ExchangeStore, StoreBuilder};
use vocalis_reply::{Encyclopedia, ReplyGenerator, WikipediaClient, WikipediaConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Vocalis API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Persistence
    tracing::info!("Opening database at {}", config.database.path.display());
    let store: Arc<dyn ExchangeStore> =
        Arc::new(StoreBuilder::new().path(&config.database.path).build()?);

    // Optional external model
    let chat_client = match OpenAIConfig::from_optional_key(config.openai_api_key.as_deref()) {
        Some(openai) => {
            let mut openai = openai.with_timeout(config.llm_timeout());
            if let Some(base_url) = &config.openai_base_url {
                openai = openai.with_base_url(base_url.clone());
            }
            tracing::info!(model = %config.llm.model, "External reply generation enabled");
            Some(ClientFactory::create_chat_client(openai)?)
        }
        None => {
            tracing::info!("OPENAI_API_KEY not set, using rule-based replies");
            None
        }
    };

    let encyclopedia: Option<Arc<dyn Encyclopedia>> = if config.encyclopedia.enabled {
        let wiki = WikipediaClient::new(WikipediaConfig::from(&config.encyclopedia))?;
        Some(Arc::new(wiki))
    } else {
        None
    };

    let generator = ReplyGenerator::builder()
        .chat_client(chat_client)
        .generation(config.generation())
        .encyclopedia(encyclopedia)
        .summary_sentences(config.encyclopedia.sentences)
        .source_timeout(config.source_timeout())
        .build();
    tracing::info!(sources = ?generator.source_kinds(), "Reply chain ready");

    let state = Arc::new(AppState::new(config.clone(), store, generator));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
