//! High-level runtime orchestrator.
//!
//! The runtime owns the store, the content handle, the fight cache and the
//! optional tick worker, and exposes a builder-based API for clients.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{Result, RuntimeError, RuntimeHandle, Shared};
use crate::dice::RandDice;
use crate::oracle::{ContentHandle, ContentSnapshot};
use crate::repository::{FightCache, InMemoryStore, JsonFileStore, Store};
use crate::workers::TickWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Directory holding `config.toml` and the `<kind>.ron` content files.
    /// Without one the runtime starts with empty content.
    pub data_dir: Option<PathBuf>,
    /// Root of the JSON file store. Without one documents stay in memory.
    pub store_dir: Option<PathBuf>,
    pub fight_cache_ttl: Duration,
    /// Period of the background bulk tick; `None` disables the worker.
    pub tick_interval: Option<Duration>,
    /// Fixed seed for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl RuntimeConfig {
    pub const DEFAULT_FIGHT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            store_dir: None,
            fight_cache_ttl: Self::DEFAULT_FIGHT_CACHE_TTL,
            tick_interval: None,
            rng_seed: None,
        }
    }
}

/// Main runtime that owns shared state and background workers.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    ticker: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Starts (or restarts) the bulk tick worker.
    pub fn start_ticker(&mut self, period: Duration) {
        self.stop_ticker();
        let worker = TickWorker::new(self.handle.clone(), period);
        self.ticker = Some(worker.spawn());
        info!(target: "runtime", period_ms = period.as_millis() as u64, "Tick worker started");
    }

    /// Cancels the tick worker, if running.
    pub fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops workers and waits for them to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            if let Err(e) = ticker.await
                && !e.is_cancelled()
            {
                return Err(RuntimeError::WorkerJoin(e));
            }
        }
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn Store>>,
    content: Option<ContentSnapshot>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            content: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing store instead of the one `config` describes.
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use fixed content instead of loading `config.data_dir`.
    pub fn content(mut self, content: ContentSnapshot) -> Self {
        self.content = Some(content);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let config = self.config;

        let store: Arc<dyn Store> = match (self.store, &config.store_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(JsonFileStore::open(dir).await?),
            (None, None) => Arc::new(InMemoryStore::new()),
        };

        let content = match (self.content, &config.data_dir) {
            (Some(snapshot), _) => ContentHandle::fixed(snapshot),
            (None, Some(dir)) => ContentHandle::open(dir.clone()).await?,
            (None, None) => ContentHandle::fixed(ContentSnapshot::new(
                Default::default(),
                Default::default(),
            )),
        };

        let dice = match config.rng_seed {
            Some(seed) => RandDice::seeded(seed),
            None => RandDice::from_entropy(),
        };

        let handle = RuntimeHandle::new(Shared {
            store,
            content,
            fights: FightCache::new(config.fight_cache_ttl),
            dice: Mutex::new(dice),
        });

        let mut runtime = Runtime {
            handle,
            ticker: None,
        };
        if let Some(period) = config.tick_interval {
            runtime.start_ticker(period);
        }
        Ok(runtime)
    }
}
