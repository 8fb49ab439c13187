use kb_relay::api::{create_router, AppState};
use kb_relay::domain::ports::DocumentStore;
use kb_relay::infrastructure::{
    AppConfig, InMemoryDocumentStore, StoreBackend, SupabaseDocumentStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let store = build_store(&config).await?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let app = create_router(AppState::new(store, config));

    info!("KB server running on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kb_relay=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match (config.store, &config.supabase) {
        (StoreBackend::Supabase, Some(supabase)) => {
            info!(
                url = %supabase.url,
                table = %supabase.table,
                key = if supabase.key.is_empty() { "Missing" } else { "Loaded" },
                "Supabase document store configured"
            );
            Ok(Arc::new(SupabaseDocumentStore::new(supabase)?))
        }
        (StoreBackend::Supabase, None) => {
            anyhow::bail!("Supabase document store selected without connection settings")
        }
        (StoreBackend::Memory, _) => {
            let store = match &config.seed_path {
                Some(path) => InMemoryDocumentStore::from_seed_file(path).await?,
                None => {
                    warn!("In-memory document store started empty");
                    InMemoryDocumentStore::new()
                }
            };
            info!("In-memory document store configured");
            Ok(Arc::new(store))
        }
    }
}
