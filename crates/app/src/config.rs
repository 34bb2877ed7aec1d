//! Configuration loading with multi-source merging.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

const APP_DIR: &str = "flashquiz";
const PROJECT_CONFIG: &str = "flashquiz.toml";
const ENV_PREFIX: &str = "FLASHQUIZ_";
const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// `progress.json` inside the flashcards directory
    #[default]
    Json,
    /// SQLite database at `db_url`
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub flashcards_dir: PathBuf,
    pub store: StoreKind,
    pub db_url: String,
    pub feedback_delay_ms: u64,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            flashcards_dir: PathBuf::from("flashcards"),
            store: StoreKind::Json,
            db_url: "sqlite://flashquiz.sqlite3".into(),
            feedback_delay_ms: 1500,
            log_level: "warn".into(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

/// Values given on the command line; unset flags leave lower layers alone.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    flashcards_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<StoreKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_url: Option<String>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            flashcards_dir: cli.flashcards_dir.clone(),
            store: cli.store,
            db_url: cli.db_url.clone(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    ///
    /// Priority (lowest to highest):
    /// 1. Default values
    /// 2. Global config: `<config_dir>/flashquiz/config.toml`
    /// 3. Project config: `./flashquiz.toml`
    /// 4. Explicit `--config` path
    /// 5. `FLASHQUIZ_*` environment variables
    /// 6. Command-line flags
    ///
    /// # Errors
    ///
    /// Fails if an explicit config file is missing or any source has invalid
    /// values.
    pub fn load(cli: &Cli) -> Result<AppConfig> {
        if let Some(path) = &cli.config {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
        }

        Self::figment(
            Self::global_config_path(),
            Path::new(PROJECT_CONFIG),
            cli.config.as_deref(),
            CliOverrides::from(cli),
        )
        .extract()
        .context("invalid configuration")
    }

    fn figment(
        global: Option<PathBuf>,
        project: &Path,
        explicit: Option<&Path>,
        overrides: CliOverrides,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(global_path) = global {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// `<config_dir>/flashquiz/config.toml`, e.g. `~/.config/flashquiz/config.toml`.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }
}

/// Turn a SQLite URL or bare path into an absolute `sqlite://` URL.
///
/// In-memory URLs and query strings are kept as given.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == MEMORY_URL || trimmed.starts_with("sqlite:file:") {
        return trimmed.to_string();
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}

/// Create the database file and its parent directory if missing.
///
/// # Errors
///
/// Fails for URLs without a path or when the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == MEMORY_URL || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("creating {}", path.display()))?;
    }

    Ok(())
}
