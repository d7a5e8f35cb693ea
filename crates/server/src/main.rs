use clap::Parser;
use extknowledge_server::api::create_router;
use extknowledge_server::api::handlers::AppState;
use extknowledge_server::engine::fixture::StaticEngine;
use extknowledge_server::engine::lightrag::LightRagEngine;
use extknowledge_server::engine::RetrievalEngine;
use extknowledge_server::registry::{KnowledgeBaseRegistry, KnowledgeStore};
use extknowledge_server::service::RetrievalService;
use extknowledge_server::settings::{Args, EngineSource, ServerSettings};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(
                    "extknowledge_server=info"
                        .parse()
                        .expect("valid directive literal"),
                )
                .add_directive(
                    "extknowledge_core=info"
                        .parse()
                        .expect("valid directive literal"),
                ),
        )
        .init();

    let settings = ServerSettings::from_args(Args::parse()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let (engine, registry): (Arc<dyn RetrievalEngine>, KnowledgeBaseRegistry) =
        match settings.engine {
            EngineSource::Fixture(ref path) => {
                let engine = StaticEngine::from_json_file(path).unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });
                let registry = KnowledgeBaseRegistry::from_stores(
                    engine
                        .knowledge_base_ids()
                        .into_iter()
                        .map(|id| KnowledgeStore::new(id.clone(), format!("fixture://{}", id))),
                );
                tracing::info!(fixture = %path.display(), "Serving passages from fixture");
                (Arc::new(engine), registry)
            }
            EngineSource::Http { ref mode, timeout } => {
                let engine = LightRagEngine::new(mode.clone(), timeout)?;
                let registry = KnowledgeBaseRegistry::from_stores(settings.knowledge_bases.clone());
                tracing::info!(
                    mode = %mode,
                    timeout_secs = timeout.as_secs(),
                    "Using LightRAG engine"
                );
                (Arc::new(engine), registry)
            }
        };

    tracing::info!(knowledge_bases = ?registry.ids(), "Knowledge bases registered");
    if !registry.has_default() {
        tracing::warn!("No default knowledge base; unknown ids will return 404");
    }
    if settings.api_keys.is_empty() {
        tracing::warn!("No API keys configured, authentication disabled (dev mode)");
    }

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let state = AppState {
        service: Arc::new(RetrievalService::new(registry, engine)),
        api_keys: Arc::new(settings.api_keys.clone()),
        prometheus_handle,
        start_time: Instant::now(),
    };

    let app = create_router(state);
    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("extknowledge listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
