use std::sync::Arc;

use crate::config::{Config, LogFormat, StoreLocation};
use crate::scheduler::SchedulerHandle;
use cotizaciones_core::{SeriesProjector, SeriesStore, UpdateOrchestrator};
use cotizaciones_market_data::AdapterRegistry;
use cotizaciones_storage_csv::CsvSeriesStore;
use cotizaciones_storage_sqlite::SqliteSeriesStore;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub store: Arc<dyn SeriesStore>,
    pub orchestrator: Arc<UpdateOrchestrator>,
    pub projector: SeriesProjector,
    pub scheduler: Arc<SchedulerHandle>,
}

pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `log` records from the library crates are bridged through tracing-log.
    let result = match log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }
}

/// Opens the series store named by the configuration.
pub fn open_store(location: &StoreLocation) -> anyhow::Result<Arc<dyn SeriesStore>> {
    let store: Arc<dyn SeriesStore> = match location {
        StoreLocation::Sqlite(path) => Arc::new(SqliteSeriesStore::open(path)?),
        StoreLocation::Csv(dir) => Arc::new(CsvSeriesStore::open(dir.clone())?),
    };
    tracing::info!("Series store in use: {} ({})", location, store.backend());
    Ok(store)
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = open_store(&config.store)?;
    let registry = AdapterRegistry::with_default_adapters(config.scraper_api_key.clone())?;
    if config.scraper_api_key.is_some() {
        tracing::info!("Routing investing.com requests through the scraping proxy");
    }
    Ok(build_state_with(config, store, registry))
}

/// Assembles the state from an already opened store and adapter registry.
pub fn build_state_with(
    config: &Config,
    store: Arc<dyn SeriesStore>,
    registry: AdapterRegistry,
) -> Arc<AppState> {
    let orchestrator = Arc::new(UpdateOrchestrator::new(store.clone(), Arc::new(registry)));
    Arc::new(AppState {
        store,
        orchestrator,
        projector: SeriesProjector::new(config.projection_years),
        scheduler: Arc::new(SchedulerHandle::new(config.update_schedule)),
    })
}
