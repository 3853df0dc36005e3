//! Engine configuration loader.

use std::path::Path;

use fray_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their [`EngineConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            xp_per_level = 250
            enabled_directives = ["hardcore"]
            "#,
        )
        .unwrap();

        assert_eq!(config.xp_per_level, 250);
        assert_eq!(config.enabled_directives, vec!["hardcore"]);
        assert_eq!(
            config.damage_to_injury_ratio,
            EngineConfig::DAMAGE_TO_INJURY_RATIO
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(&dir.path().join("config.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read file"));
    }
}
