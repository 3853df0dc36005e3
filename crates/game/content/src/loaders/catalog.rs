//! RON-backed [`ContentSource`].

use std::path::{Path, PathBuf};

use fray_core::ContentSource;
use fray_core::content::{Content, LoadableContent};

use crate::loaders::{LoadResult, read_file};

/// Reads one `<kind>.ron` file per content kind from a directory.
///
/// Each file holds a RON list of definitions. A missing file yields an empty
/// registry for that kind.
#[derive(Clone, Debug)]
pub struct RonContentSource {
    dir: PathBuf,
}

impl RonContentSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `T`'s content kind.
    pub fn path_for<T: Content>(&self) -> PathBuf {
        self.dir.join(format!("{}.ron", T::KIND))
    }

    /// Parse a definition list from a RON string.
    pub fn parse<T: LoadableContent>(content: &str) -> LoadResult<Vec<T>> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse RON: {}", e))
    }
}

impl ContentSource for RonContentSource {
    type Error = anyhow::Error;

    fn load_all<T>(&self) -> Result<Vec<T>, Self::Error>
    where
        T: Content + LoadableContent,
    {
        let path = self.path_for::<T>();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = read_file(&path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fray_core::ContentRegistry;
    use fray_core::content::{EffectDefinition, EffectKind, ItemDef, Passive};
    use fray_core::{DamageType, ShieldReaction, StatKind};

    const EFFECTS: &str = r#"[
        (
            id: "bleeding",
            name: "Bleeding",
            kind: DamageOverTime(
                damage_type: True,
                per_severity: 1.0,
                shield_reaction: Ignore,
            ),
            consecutive_limit: 3,
            display_severity: Arabic,
        ),
        (
            id: "exposed",
            name: "Exposed",
            kind: Passive,
            passives: [Scaled(stat: Vulnerability, kind: Add, per_severity: 5.0)],
        ),
    ]"#;

    #[test]
    fn parses_effect_definitions() {
        let effects: Vec<EffectDefinition> = RonContentSource::parse(EFFECTS).unwrap();
        assert_eq!(effects.len(), 2);

        let bleeding = &effects[0];
        assert_eq!(bleeding.consecutive_limit, 3);
        assert_eq!(
            bleeding.kind,
            EffectKind::DamageOverTime {
                damage_type: DamageType::True,
                per_severity: 1.0,
                shield_reaction: ShieldReaction::Ignore,
            }
        );
        // omitted fields fall back to their defaults
        assert_eq!(effects[1].consecutive_limit, 1);
        assert!(matches!(
            effects[1].passives[0],
            Passive::Scaled {
                stat: StatKind::Vulnerability,
                ..
            }
        ));
    }

    #[test]
    fn missing_files_load_as_empty_kinds() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("effects.ron"), EFFECTS).unwrap();

        let source = RonContentSource::new(dir.path());
        let registry = ContentRegistry::load(&source).unwrap();

        assert_eq!(registry.effects.len(), 2);
        assert!(registry.effects.contains("bleeding"));
        assert!(registry.items.is_empty());
        assert_eq!(source.path_for::<ItemDef>(), dir.path().join("items.ron"));
    }

    #[test]
    fn duplicate_ids_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("items.ron"),
            r#"[(id: "scrap", name: "Scrap"), (id: "scrap", name: "Scrap again")]"#,
        )
        .unwrap();

        let err = ContentRegistry::load(&RonContentSource::new(dir.path())).unwrap_err();
        assert!(err.to_string().contains("duplicate items id 'scrap'"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("perks.ron"), "[(id: )]").unwrap();

        let err = ContentRegistry::load(&RonContentSource::new(dir.path())).unwrap_err();
        assert!(err.to_string().contains("perks.ron"));
    }
}
