use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use spice_drawers::domain::ports::DocumentStorePort;
use spice_drawers::infrastructure::{
    AppConfig, CliArgs, ConfigStore, FirestoreClient, InMemoryDocumentStore,
};
use spice_drawers::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let config_store = ConfigStore::new()?;
    let mut config = config_store.load(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_store(config: &AppConfig) -> Result<Arc<dyn DocumentStorePort>> {
    if config.memory {
        info!(collection = %config.store.collection, "Using in-memory store");
        return Ok(Arc::new(InMemoryDocumentStore::new(
            config.store.collection.clone(),
        )));
    }

    let client = FirestoreClient::new(&config.store)?;
    info!(
        project = %config.store.project_id,
        collection = %config.store.collection,
        "Using Cloud Firestore"
    );
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let config = load_config()?;
    init_logging(&config)?;
    info!(version = spice_drawers::VERSION, "Starting {}", spice_drawers::NAME);

    let store = create_store(&config)?;
    let app = App::new(store, &config);

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
