/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Share of health damage that becomes injuries before tenacity.
    pub damage_to_injury_ratio: f64,
    /// Share of health damage that becomes stress before stress resistance.
    pub stress_from_health_ratio: f64,
    /// Hit chance of a basic attack before accuracy and dodge.
    pub base_hit_chance: f64,
    /// Half-width of the initiative tie-break jitter.
    pub initiative_jitter: f64,
    /// Experience cost multiplier per level.
    pub xp_per_level: u64,
    /// Directive ids active for every creature.
    pub enabled_directives: Vec<String>,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on drawn abilities regardless of the HandSize stat.
    pub const MAX_HAND_SIZE: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DAMAGE_TO_INJURY_RATIO: f64 = 0.66;
    pub const STRESS_FROM_HEALTH_RATIO: f64 = 0.25;
    pub const DEFAULT_BASE_HIT_CHANCE: f64 = 90.0;
    pub const DEFAULT_INITIATIVE_JITTER: f64 = 0.5;
    pub const DEFAULT_XP_PER_LEVEL: u64 = 100;

    pub fn new() -> Self {
        Self {
            damage_to_injury_ratio: Self::DAMAGE_TO_INJURY_RATIO,
            stress_from_health_ratio: Self::STRESS_FROM_HEALTH_RATIO,
            base_hit_chance: Self::DEFAULT_BASE_HIT_CHANCE,
            initiative_jitter: Self::DEFAULT_INITIATIVE_JITTER,
            xp_per_level: Self::DEFAULT_XP_PER_LEVEL,
            enabled_directives: Vec::new(),
        }
    }

    pub fn with_directives(mut self, directives: impl IntoIterator<Item = String>) -> Self {
        self.enabled_directives = directives.into_iter().collect();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
