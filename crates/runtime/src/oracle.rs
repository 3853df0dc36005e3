//! Shared, hot-reloadable access to static game content.
//!
//! Requests take a [`ContentSnapshot`] and build a [`fray_core::Env`] from it,
//! so a reload never changes content underneath a running command.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use fray_content::ContentFactory;
use fray_core::{ContentRegistry, EngineConfig, Env};
use tracing::{info, warn};

use crate::api::{Result, RuntimeError};

/// Immutable content and configuration for one command.
#[derive(Clone, Debug)]
pub struct ContentSnapshot {
    pub content: Arc<ContentRegistry>,
    pub config: Arc<EngineConfig>,
}

impl ContentSnapshot {
    pub fn new(content: ContentRegistry, config: EngineConfig) -> Self {
        Self {
            content: Arc::new(content),
            config: Arc::new(config),
        }
    }

    pub fn env(&self) -> Env<'_> {
        Env::new(&self.content, &self.config)
    }
}

/// What a reload replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadReport {
    pub effects: usize,
    pub abilities: usize,
    pub items: usize,
    pub dangling: usize,
}

/// Current content snapshot, replaced wholesale on reload.
pub struct ContentHandle {
    data_dir: Option<PathBuf>,
    current: RwLock<ContentSnapshot>,
}

impl ContentHandle {
    /// Fixed content with no backing directory; [`ContentHandle::reload`]
    /// keeps it as is.
    pub fn fixed(snapshot: ContentSnapshot) -> Self {
        Self {
            data_dir: None,
            current: RwLock::new(snapshot),
        }
    }

    /// Loads `config.toml` and every `<kind>.ron` from `data_dir`.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let (snapshot, _) = load_snapshot(data_dir.clone()).await?;
        Ok(Self {
            data_dir: Some(data_dir),
            current: RwLock::new(snapshot),
        })
    }

    pub fn snapshot(&self) -> ContentSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in a new snapshot.
    pub fn replace(&self, snapshot: ContentSnapshot) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Re-reads the data directory and replaces the snapshot. On failure the
    /// previous content stays in place.
    pub async fn reload(&self) -> Result<ReloadReport> {
        let Some(data_dir) = self.data_dir.clone() else {
            let snapshot = self.snapshot();
            return Ok(report(&snapshot.content, 0));
        };

        let (snapshot, report) = load_snapshot(data_dir).await?;
        self.replace(snapshot);
        info!(
            target: "runtime::content",
            effects = report.effects,
            abilities = report.abilities,
            items = report.items,
            "Content reloaded"
        );
        Ok(report)
    }
}

fn report(content: &ContentRegistry, dangling: usize) -> ReloadReport {
    ReloadReport {
        effects: content.effects.len(),
        abilities: content.abilities.len(),
        items: content.items.len(),
        dangling,
    }
}

async fn load_snapshot(data_dir: PathBuf) -> Result<(ContentSnapshot, ReloadReport)> {
    let loaded = tokio::task::spawn_blocking(move || {
        let factory = ContentFactory::new(data_dir);
        let config = factory.load_config()?;
        let content = factory.load_registry()?;
        anyhow::Ok((content, config))
    })
    .await
    .map_err(RuntimeError::WorkerJoin)?;
    let (content, config) = loaded.map_err(RuntimeError::Content)?;

    let dangling = content.dangling_references();
    for reference in &dangling {
        warn!(
            target: "runtime::content",
            from = %reference.from,
            owner = %reference.owner,
            to = %reference.to,
            id = %reference.id,
            "Dangling content reference"
        );
    }

    let report = report(&content, dangling.len());
    Ok((ContentSnapshot::new(content, config), report))
}
