// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use brain_dashboard::application::layout_store::{IdGenerator, LayoutStore, SettingsCell};
use brain_dashboard::application::settings_repository::{SettingsRepository, SourceRepository};
use brain_dashboard::application::source_feed::SourceFeed;
use brain_dashboard::domain::settings::UserSettings;
use brain_dashboard::infrastructure::config::{load_app_config, AppConfig, StoreKind};
use brain_dashboard::infrastructure::firestore_store::FirestoreStore;
use brain_dashboard::infrastructure::json_store::JsonFileStore;
use brain_dashboard::infrastructure::memory_store::MemoryStore;
use brain_dashboard::presentation::app_state::AppState;
use brain_dashboard::presentation::handlers::{
    add_widget, begin_editing, finish_editing, get_page, habit_report, health_check,
    remove_widget, stream_page, wallet_report, widget_svg,
};
use brain_dashboard::presentation::page_controller::PageController;

type Repositories = (Arc<dyn SettingsRepository>, Arc<dyn SourceRepository>);

fn repositories<S>(store: Arc<S>) -> Repositories
where
    S: SettingsRepository + SourceRepository + 'static,
{
    let settings: Arc<dyn SettingsRepository> = store.clone();
    let source: Arc<dyn SourceRepository> = store;
    (settings, source)
}

fn open_store(config: &AppConfig) -> anyhow::Result<Repositories> {
    match config.store.kind {
        StoreKind::File => {
            tracing::info!("Using JSON file store at {}", config.store.path);
            Ok(repositories(Arc::new(JsonFileStore::new(&config.store.path))))
        }
        StoreKind::Firestore => {
            let firestore = config
                .firestore
                .as_ref()
                .context("store.kind is firestore but the [firestore] section is missing")?;
            tracing::info!("Using Firestore project {}", firestore.project);
            Ok(repositories(Arc::new(FirestoreStore::new(
                firestore.host.clone(),
                firestore.project.clone(),
                firestore.token.clone(),
            ))))
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, layout changes are lost on exit");
            Ok(repositories(Arc::new(MemoryStore::new())))
        }
    }
}

async fn load_settings(
    repository: &dyn SettingsRepository,
    user_id: &str,
    timeout: std::time::Duration,
) -> UserSettings {
    match tokio::time::timeout(timeout, repository.load_settings(user_id)).await {
        Ok(Ok(settings)) => settings,
        Ok(Err(e)) => {
            tracing::error!("Failed to load settings for {}, using defaults: {:#}", user_id, e);
            UserSettings::default()
        }
        Err(_) => {
            tracing::error!("Loading settings for {} timed out, using defaults", user_id);
            UserSettings::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load config/app.toml")?;
    let user_id = config.user.id.clone();
    let timeout = config.persist_timeout();

    // Create repositories (infrastructure layer)
    let (settings_repository, source_repository) = open_store(&config)?;

    // Local state (application layer)
    let settings = SettingsCell::new(load_settings(settings_repository.as_ref(), &user_id, timeout).await);
    let ids = Arc::new(IdGenerator::new());
    let feed = SourceFeed::default();
    if let Err(e) = feed.refresh(source_repository.as_ref(), &user_id, timeout).await {
        tracing::error!("Initial source read failed: {:#}", e);
    }
    let _refresh = feed.spawn_refresh(
        source_repository,
        user_id.clone(),
        config.refresh_interval(),
        timeout,
    );

    let dashboard = PageController::new(LayoutStore::new(
        settings.clone(),
        settings_repository.clone(),
        ids.clone(),
        user_id.clone(),
        timeout,
    ));
    let analytics = PageController::new(LayoutStore::new(
        settings.clone(),
        settings_repository,
        ids,
        user_id,
        timeout,
    ));

    // Create application state
    let state = Arc::new(AppState {
        dashboard: Arc::new(dashboard),
        analytics: Arc::new(analytics),
        feed,
        settings,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/pages/:page", get(get_page))
        .route("/pages/:page/edit", post(begin_editing))
        .route("/pages/:page/done", post(finish_editing))
        .route("/pages/:page/widgets", post(add_widget))
        .route("/pages/:page/widgets/:id", delete(remove_widget))
        .route("/pages/:page/widgets/:id/svg", get(widget_svg))
        .route("/pages/:page/stream", get(stream_page))
        .route("/analytics/habits", get(habit_report))
        .route("/analytics/wallet", get(wallet_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .addr
        .parse()
        .with_context(|| format!("Invalid server.addr {}", config.server.addr))?;
    tracing::info!("Starting brain-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
