use recruitment_hub::{
    config::{get_config, init_config},
    database::{pool::create_pool, JsonFileRepository, PgSnapshotRepository, SnapshotRepository},
    middleware::auth::AuthSettings,
    routes,
    services::{
        ai_service::{AiAssistant, OpenAiAssistant},
        store_service::StateStore,
    },
    AppState,
};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn snapshot_repository() -> anyhow::Result<Arc<dyn SnapshotRepository>> {
    let config = get_config();
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            let repo = PgSnapshotRepository::new(pool, config.snapshot_key.clone());
            repo.ensure_schema().await?;
            info!(key = %config.snapshot_key, "persisting snapshots to PostgreSQL");
            Ok(Arc::new(repo))
        }
        None => {
            info!(path = %config.snapshot_path, "persisting snapshots to JSON file");
            Ok(Arc::new(JsonFileRepository::new(&config.snapshot_path)))
        }
    }
}

fn ai_assistant() -> anyhow::Result<Option<Arc<dyn AiAssistant>>> {
    let config = get_config();
    let Some(api_key) = config.openai_api_key.clone() else {
        tracing::warn!("OPENAI_API_KEY not set; AI features are disabled");
        return Ok(None);
    };
    let http_client = Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;
    Ok(Some(Arc::new(OpenAiAssistant::new(
        api_key,
        config.ai_model.clone(),
        http_client,
    ))))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let store = StateStore::load(snapshot_repository().await?).await;
    let app_state = AppState::new(store, ai_assistant()?, AuthSettings::from_config(config));
    let app = routes::router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
