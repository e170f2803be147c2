use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::Catalog;

const CATALOG_FILE: &str = "catalog.json";
const LOG_FILE: &str = "cit.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub notify_ttl: Duration,
    pub log_path: PathBuf,
}

impl Config {
    /// An explicit catalog path wins; otherwise `catalog.json` in the config
    /// directory is used when present, and the built-in postings when not.
    pub fn resolve(explicit_catalog: Option<PathBuf>, notify_ms: i64) -> Result<Self> {
        if notify_ms <= 0 {
            return Err(anyhow!("Notification delay must be positive, got {}ms", notify_ms));
        }
        let dirs = directories::ProjectDirs::from("", "", "cit");

        let catalog_path = explicit_catalog.or_else(|| {
            dirs.as_ref()
                .map(|d| d.config_dir().join(CATALOG_FILE))
                .filter(|p| p.exists())
        });

        let log_path = match &dirs {
            Some(d) => d.data_dir().join(LOG_FILE),
            // Fallback to current directory
            None => PathBuf::from(LOG_FILE),
        };

        Ok(Self {
            catalog_path,
            notify_ttl: Duration::milliseconds(notify_ms),
            log_path,
        })
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => {
                let catalog = Catalog::load(path)?;
                info!(path = %path.display(), postings = catalog.len(), "catalog loaded");
                Ok(catalog)
            }
            None => Ok(Catalog::sample()),
        }
    }
}

/// Logs go to a file because the terminal UI owns stdout.
pub fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .try_init()
        .context("Failed to initialise logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cit-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_explicit_catalog_path_wins() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/custom.json")), 4000).unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/custom.json")));
        assert_eq!(config.notify_ttl, Duration::milliseconds(4000));
        assert!(config.log_path.ends_with(LOG_FILE));
    }

    #[test]
    fn test_rejects_non_positive_notify_delay() {
        assert!(Config::resolve(None, 0).is_err());
        assert!(Config::resolve(None, -5).is_err());
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut postings = Catalog::sample().postings().to_vec();
        postings.truncate(1);
        postings[0].title = "Rust Intern".to_string();
        let path = temp_file("one.json", &serde_json::to_string(&postings).unwrap());

        let config = Config::resolve(Some(path.clone()), 1000).unwrap();
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).map(|p| p.title.as_str()), Some("Rust Intern"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_catalog_reports_missing_file() {
        let config = Config {
            catalog_path: Some(PathBuf::from("/nonexistent/cit/catalog.json")),
            notify_ttl: Duration::milliseconds(1000),
            log_path: PathBuf::from(LOG_FILE),
        };
        let err = config.load_catalog().unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }

    #[test]
    fn test_no_catalog_path_uses_built_in_postings() {
        let config = Config {
            catalog_path: None,
            notify_ttl: Duration::milliseconds(1000),
            log_path: PathBuf::from(LOG_FILE),
        };
        assert_eq!(config.load_catalog().unwrap().len(), 3);
    }
}
