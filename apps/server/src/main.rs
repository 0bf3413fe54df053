use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cotizaciones_core::quotes::migrate::migrate_series;
use cotizaciones_server::api::app_router;
use cotizaciones_server::config::Config;
use cotizaciones_server::scheduler::start_daily_update_scheduler;
use cotizaciones_server::{build_state, init_tracing, open_store};
use cotizaciones_storage_csv::CsvSeriesStore;

#[derive(Parser)]
#[command(name = "cotizaciones-server")]
#[command(about = "Daily Argentine quotes service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API and run the daily update (default)
    Serve,
    /// Copy legacy CSV files into the configured store, keeping existing days
    MigrateCsv {
        /// Directory holding uva.csv, dolar_mayorista.csv and dolar_mep.csv
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::MigrateCsv { dir } => migrate_csv(&config, dir).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;

    let scheduler_task = if config.scheduler_enabled {
        Some(start_daily_update_scheduler(state.clone()))
    } else {
        tracing::info!("Daily update scheduler disabled");
        None
    };

    let router = app_router(state.clone(), &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.scheduler.stop();
    if let Some(task) = scheduler_task {
        if let Err(e) = task.await {
            tracing::warn!("Scheduler task ended abnormally: {}", e);
        }
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate_csv(config: &Config, dir: PathBuf) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }
    let source = CsvSeriesStore::open(dir)?;
    let target = open_store(&config.store)?;
    tracing::info!(
        "Migrating {} into {}",
        source.dir().display(),
        config.store
    );

    let written = migrate_series(&source, target.as_ref()).await?;
    for (quote_type, count) in &written {
        println!("{}: {} rows migrated", quote_type, count);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
