//! Content factory for building registries from data files.

use std::path::{Path, PathBuf};

use fray_core::{ContentRegistry, EngineConfig};

use crate::loaders::{ConfigLoader, LoadResult, RonContentSource};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── classes.ron
/// ├── effects.ron
/// ├── items.ron
/// ├── ...
/// └── directives.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Content source over the `<kind>.ron` files.
    pub fn source(&self) -> RonContentSource {
        RonContentSource::new(&self.data_dir)
    }

    /// Load every content kind into a fresh registry.
    pub fn load_registry(&self) -> LoadResult<ContentRegistry> {
        ContentRegistry::load(&self.source())
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The sample data set shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }
}
