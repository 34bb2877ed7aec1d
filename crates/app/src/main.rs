//! `flashquiz` entrypoint: parses flags, loads configuration, wires storage
//! and services together and dispatches the subcommand.

mod cli;
mod commands;
mod config;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use services::{CatalogService, Clock, QuizLoopService, TracingObserver};
use storage::repository::Storage;
use tracing::info;
use ui::{TerminalApp, UiApp, build_app_context};

use crate::cli::{Cli, Command};
use crate::config::{AppConfig, ConfigLoader, StoreKind, normalize_sqlite_url, prepare_sqlite_file};

struct TerminalUiApp {
    catalog: Arc<CatalogService>,
    session_loop: Arc<QuizLoopService>,
    feedback_delay: Duration,
}

impl UiApp for TerminalUiApp {
    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn session_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.session_loop)
    }

    fn feedback_delay(&self) -> Duration {
        self.feedback_delay
    }
}

async fn open_storage(config: &AppConfig) -> Result<Storage> {
    match config.store {
        StoreKind::Json => Ok(Storage::json(&config.flashcards_dir)),
        StoreKind::Sqlite => {
            // Keep file preparation in the binary glue so storage stays path-agnostic.
            let db_url = normalize_sqlite_url(&config.db_url);
            prepare_sqlite_file(&db_url)?;
            Storage::sqlite(&config.flashcards_dir, &db_url)
                .await
                .with_context(|| format!("opening {db_url}"))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::load(&cli)?;
    let command = cli.resolved_command();

    let interactive = matches!(command, Command::Study(_));
    let _log_guard = logging::init_tracing(
        logging::build_filter(cli.verbose, &config.log_level),
        config.log_dir.as_deref(),
        !interactive,
    );
    info!(
        flashcards_dir = %config.flashcards_dir.display(),
        store = ?config.store,
        "starting flashquiz"
    );

    let storage = open_storage(&config).await?;
    let catalog = Arc::new(CatalogService::new(
        Arc::clone(&storage.decks),
        Arc::clone(&storage.progress),
    ));

    match command {
        Command::Subjects => commands::list_subjects(&catalog).await,
        Command::Progress { subject } => commands::show_progress(&catalog, &subject).await,
        Command::Reset { subject } => commands::reset(&catalog, &subject).await,
        Command::Study(args) => {
            let session_loop = QuizLoopService::new(
                Clock::system(),
                Arc::clone(&storage.decks),
                Arc::clone(&storage.progress),
            )
            .with_observer(Arc::new(TracingObserver));

            let app: Arc<dyn UiApp> = Arc::new(TerminalUiApp {
                catalog,
                session_loop: Arc::new(session_loop),
                feedback_delay: config.feedback_delay(),
            });
            commands::study(&TerminalApp::from_context(build_app_context(&app)), args).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("error: {err:#}");
        std::process::exit(2);
    }
}
