//! Immutable tuning tables injected into the engine at construction.
//!
//! Every table implements [`Default`] with the built-in balance and is
//! `#[serde(default)]`, so a partial TOML document only overrides the keys it
//! names. Templates are copied into entities through snapshot functions such
//! as [`EnemyCatalog::template`]; scaling never mutates the tables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    BossKind, ConfigError, EnemyClass, EnemyKind, EnemyTemplate, Formation, Rgb, TileCoord,
    TowerKind,
};

/// Complete configuration for a simulation instance.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the simulation's random source.
    pub seed: u64,
    /// Grid dimensions and enemy path.
    pub grid: GridConfig,
    /// Wave pacing, scaling and spawn patterns.
    pub waves: WaveConfig,
    /// Regular enemy templates.
    pub enemies: EnemyCatalog,
    /// Boss templates and abilities.
    pub bosses: BossCatalog,
    /// Tower templates and upgrade tuning.
    pub towers: TowerCatalog,
    /// Starting coins and lives.
    pub economy: EconomyConfig,
}

impl GameConfig {
    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.columns == 0 || self.grid.rows == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        positive("grid.tile_size", f64::from(self.grid.tile_size))?;
        self.waves.validate()?;
        if !(1..=3).contains(&self.towers.upgrade.max_level) {
            return Err(ConfigError::MaxLevel(self.towers.upgrade.max_level));
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Grid layout and the corner waypoints of the enemy path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in world units.
    pub tile_size: f32,
    /// Corner waypoints; consecutive entries must share a row or a column.
    pub waypoints: Vec<TileCoord>,
    /// Tiles that are never buildable in addition to the path itself.
    pub blocked: Vec<TileCoord>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 12,
            tile_size: 40.0,
            waypoints: vec![
                TileCoord::new(0, 2),
                TileCoord::new(15, 2),
                TileCoord::new(15, 6),
                TileCoord::new(3, 6),
                TileCoord::new(3, 10),
                TileCoord::new(19, 10),
            ],
            blocked: Vec::new(),
        }
    }
}

/// Wave pacing, difficulty scaling and the base spawn pattern table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Length of the preparation phase in milliseconds.
    pub preparation_ms: u64,
    /// Delay between wave completion and the next preparation phase.
    pub complete_delay_ms: u64,
    /// Global spawn interval before per-wave reduction.
    pub spawn_interval_ms: u64,
    /// Number of final preparation seconds that emit a countdown cue.
    pub countdown_cue_secs: u64,
    /// Per-wave growth of enemy counts.
    pub count_multiplier: f64,
    /// Per-wave growth of enemy health.
    pub health_multiplier: f64,
    /// Per-wave growth of enemy speed.
    pub speed_multiplier: f64,
    /// Per-wave growth of enemy rewards.
    pub reward_multiplier: f64,
    /// Per-wave reward decay applied against the uncapped wave number.
    pub reward_decay: f64,
    /// Extra multiplier applied to counts, health and rewards on boss waves.
    pub boss_wave_multiplier: f64,
    /// Wave number at which scaling stops growing.
    pub max_scaling_waves: u32,
    /// Per-wave shrink factor for the spawn interval.
    pub interval_reduction: f64,
    /// Spacing and layout of the non-single formations.
    pub formations: FormationTable,
    /// Base patterns indexed by wave; later waves reuse the last entry.
    pub patterns: Vec<WavePattern>,
    /// Bosses appended to boss waves, cycled in order.
    pub boss_rotation: Vec<BossKind>,
}

impl WaveConfig {
    /// Preparation phase length.
    #[must_use]
    pub const fn preparation(&self) -> Duration {
        Duration::from_millis(self.preparation_ms)
    }

    /// Delay after completion before the next wave prepares.
    #[must_use]
    pub const fn complete_delay(&self) -> Duration {
        Duration::from_millis(self.complete_delay_ms)
    }

    /// Unscaled global spawn interval.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.patterns.is_empty() {
            return Err(ConfigError::NoWavePatterns);
        }
        if let Some(index) = self.patterns.iter().position(|p| p.groups.is_empty()) {
            return Err(ConfigError::EmptyWavePattern { index });
        }
        if self.boss_rotation.is_empty() {
            return Err(ConfigError::NoBosses);
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "waves.spawn_interval_ms",
            });
        }
        positive("waves.count_multiplier", self.count_multiplier)?;
        positive("waves.health_multiplier", self.health_multiplier)?;
        positive("waves.speed_multiplier", self.speed_multiplier)?;
        positive("waves.reward_multiplier", self.reward_multiplier)?;
        positive("waves.reward_decay", self.reward_decay)?;
        positive("waves.boss_wave_multiplier", self.boss_wave_multiplier)?;
        positive("waves.interval_reduction", self.interval_reduction)?;
        if self.max_scaling_waves == 0 {
            return Err(ConfigError::NonPositive {
                name: "waves.max_scaling_waves",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        use EnemyKind::{Basic, Fast, Tank};
        use Formation::{Line, Phalanx, Single, Swarm, Wedge};

        Self {
            preparation_ms: 10_000,
            complete_delay_ms: 3_000,
            spawn_interval_ms: 1_000,
            countdown_cue_secs: 5,
            count_multiplier: 1.15,
            health_multiplier: 1.12,
            speed_multiplier: 1.03,
            reward_multiplier: 1.08,
            reward_decay: 0.95,
            boss_wave_multiplier: 1.5,
            max_scaling_waves: 20,
            interval_reduction: 0.95,
            formations: FormationTable::default(),
            patterns: vec![
                WavePattern::new(vec![SpawnGroup::new(Basic, 5, Single)]),
                WavePattern::new(vec![
                    SpawnGroup::new(Basic, 6, Line),
                    SpawnGroup::new(Fast, 3, Swarm),
                ]),
                WavePattern::new(vec![
                    SpawnGroup::new(Basic, 6, Wedge),
                    SpawnGroup::new(Fast, 4, Swarm),
                    SpawnGroup::new(Tank, 1, Single),
                ]),
                WavePattern::new(vec![
                    SpawnGroup::new(Tank, 3, Phalanx),
                    SpawnGroup::new(Fast, 6, Swarm),
                ]),
                WavePattern::new(vec![
                    SpawnGroup::new(Basic, 8, Line),
                    SpawnGroup::new(Fast, 6, Swarm),
                    SpawnGroup::new(Tank, 2, Phalanx),
                ]),
            ],
            boss_rotation: vec![BossKind::Guardian, BossKind::Juggernaut],
        }
    }
}

/// Group layout styles for the formations that have their own spacing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationTable {
    /// Enemies strung out one after another.
    pub line: FormationStyle,
    /// Arrowhead with a single leader.
    pub wedge: FormationStyle,
    /// Tight ranks of three.
    pub phalanx: FormationStyle,
    /// Loose cloud around the group centre.
    pub swarm: FormationStyle,
}

impl FormationTable {
    /// Style for a formation; `single` has none and yields `None`.
    #[must_use]
    pub const fn style(&self, formation: Formation) -> Option<FormationStyle> {
        match formation {
            Formation::Single => None,
            Formation::Line => Some(self.line),
            Formation::Wedge => Some(self.wedge),
            Formation::Phalanx => Some(self.phalanx),
            Formation::Swarm => Some(self.swarm),
        }
    }
}

impl Default for FormationTable {
    fn default() -> Self {
        Self {
            line: FormationStyle::new(200, 1.0, 0.6, 0.0),
            wedge: FormationStyle::new(300, 1.0, 0.8, 10.0),
            phalanx: FormationStyle::new(150, 1.0, 0.9, 9.0),
            swarm: FormationStyle::new(100, 1.0, 0.3, 12.0),
        }
    }
}

/// Spacing and layout parameters of a formation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormationStyle {
    /// Delay between consecutive members of the group.
    pub spacing_ms: u64,
    /// Multiplier applied to each member's movement speed.
    pub speed_multiplier: f32,
    /// How tightly members keep their slot, in `[0, 1]`.
    pub cohesion: f32,
    /// Distance between neighbouring slots in world units.
    pub offset_step: f32,
}

impl FormationStyle {
    /// Creates a new formation style.
    #[must_use]
    pub const fn new(
        spacing_ms: u64,
        speed_multiplier: f32,
        cohesion: f32,
        offset_step: f32,
    ) -> Self {
        Self {
            spacing_ms,
            speed_multiplier,
            cohesion,
            offset_step,
        }
    }

    /// Delay between consecutive members.
    #[must_use]
    pub const fn spacing(&self) -> Duration {
        Duration::from_millis(self.spacing_ms)
    }
}

/// Ordered spawn groups forming one wave's base composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WavePattern {
    /// Groups spawned in order.
    pub groups: Vec<SpawnGroup>,
}

impl WavePattern {
    /// Creates a pattern from the provided groups.
    #[must_use]
    pub fn new(groups: Vec<SpawnGroup>) -> Self {
        Self { groups }
    }
}

/// A batch of identical enemies sharing a formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnGroup {
    /// Enemy type spawned by the group.
    pub kind: EnemyKind,
    /// Unscaled number of enemies.
    pub count: u32,
    /// Intra-group spacing pattern.
    pub formation: Formation,
}

impl SpawnGroup {
    /// Creates a new spawn group.
    #[must_use]
    pub const fn new(kind: EnemyKind, count: u32, formation: Formation) -> Self {
        Self {
            kind,
            count,
            formation,
        }
    }
}

/// Base statistics shared by enemy and boss templates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Maximum health at wave one.
    pub health: f32,
    /// Movement speed in path segments per second.
    pub speed: f32,
    /// Coins credited when killed.
    pub reward: u32,
    /// Radius in world units.
    pub size: f32,
    /// Appearance.
    pub color: Rgb,
}

impl EnemyStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(health: f32, speed: f32, reward: u32, size: f32, color: Rgb) -> Self {
        Self {
            health,
            speed,
            reward,
            size,
            color,
        }
    }
}

/// Templates for the regular enemy kinds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyCatalog {
    /// Balanced baseline enemy.
    pub basic: EnemyStats,
    /// Fragile, quick enemy.
    pub fast: EnemyStats,
    /// Slow, durable enemy.
    pub tank: EnemyStats,
}

impl EnemyCatalog {
    /// Raw statistics for a kind.
    #[must_use]
    pub const fn stats(&self, kind: EnemyKind) -> EnemyStats {
        match kind {
            EnemyKind::Basic => self.basic,
            EnemyKind::Fast => self.fast,
            EnemyKind::Tank => self.tank,
        }
    }

    /// Produces an independent template snapshot for a kind.
    #[must_use]
    pub const fn template(&self, kind: EnemyKind) -> EnemyTemplate {
        EnemyTemplate::from_stats(EnemyClass::Regular(kind), self.stats(kind))
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self {
            basic: EnemyStats::new(100.0, 1.0, 3, 10.0, Rgb::from_rgb(0x2f, 0x95, 0x32)),
            fast: EnemyStats::new(60.0, 2.0, 4, 8.0, Rgb::from_rgb(0xff, 0xc1, 0x07)),
            tank: EnemyStats::new(300.0, 0.6, 8, 14.0, Rgb::from_rgb(0x58, 0x47, 0xff)),
        }
    }
}

/// Templates and abilities for the boss kinds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossCatalog {
    /// Shielded, regenerating boss.
    pub guardian: BossDefinition,
    /// Sprinting boss that splits on death.
    pub juggernaut: BossDefinition,
}

impl BossCatalog {
    /// Definition for a boss kind.
    #[must_use]
    pub const fn definition(&self, kind: BossKind) -> BossDefinition {
        match kind {
            BossKind::Guardian => self.guardian,
            BossKind::Juggernaut => self.juggernaut,
        }
    }

    /// Produces an independent template snapshot for a boss kind.
    #[must_use]
    pub const fn template(&self, kind: BossKind) -> EnemyTemplate {
        EnemyTemplate::from_stats(EnemyClass::Boss(kind), self.definition(kind).stats)
    }
}

impl Default for BossCatalog {
    fn default() -> Self {
        Self {
            guardian: BossDefinition {
                stats: EnemyStats::new(1_500.0, 0.6, 60, 22.0, Rgb::from_rgb(0xc8, 0x2a, 0x36)),
                abilities: BossAbilities {
                    shield: Some(ShieldAbility {
                        cooldown_ms: 4_000,
                        duration_ms: 2_000,
                    }),
                    speed_boost: None,
                    regeneration: Some(RegenerationAbility {
                        interval_ms: 1_000,
                        amount: 20.0,
                    }),
                    split: None,
                },
            },
            juggernaut: BossDefinition {
                stats: EnemyStats::new(2_200.0, 0.5, 80, 26.0, Rgb::from_rgb(0x8e, 0x24, 0xaa)),
                abilities: BossAbilities {
                    shield: None,
                    speed_boost: Some(SpeedBoostAbility {
                        cooldown_ms: 5_000,
                        duration_ms: 2_500,
                        multiplier: 1.8,
                    }),
                    regeneration: None,
                    split: Some(SplitAbility {
                        count: 4,
                        health_fraction: 0.5,
                        reward_fraction: 0.5,
                        radius: 18.0,
                    }),
                },
            },
        }
    }
}

/// Statistics and abilities of one boss kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossDefinition {
    /// Base statistics, scaled like any other enemy.
    pub stats: EnemyStats,
    /// Special abilities; absent entries are disabled.
    pub abilities: BossAbilities,
}

/// Optional per-boss abilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossAbilities {
    /// Damage immunity window.
    pub shield: Option<ShieldAbility>,
    /// Temporary speed multiplier.
    pub speed_boost: Option<SpeedBoostAbility>,
    /// Periodic healing.
    pub regeneration: Option<RegenerationAbility>,
    /// Minions released on death.
    pub split: Option<SplitAbility>,
}

/// Shield ability tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldAbility {
    /// Minimum time between the end of one shield and the next roll.
    pub cooldown_ms: u64,
    /// How long the shield lasts once raised.
    pub duration_ms: u64,
}

/// Speed boost ability tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedBoostAbility {
    /// Minimum time between the end of one boost and the next roll.
    pub cooldown_ms: u64,
    /// How long the boost lasts once triggered.
    pub duration_ms: u64,
    /// Factor applied to the base speed while active.
    pub multiplier: f32,
}

/// Regeneration ability tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegenerationAbility {
    /// Time between heals.
    pub interval_ms: u64,
    /// Health restored per heal.
    pub amount: f32,
}

/// Split-on-death ability tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitAbility {
    /// Number of minions released.
    pub count: u32,
    /// Fraction of the basic template's health each minion receives.
    pub health_fraction: f32,
    /// Fraction of the basic template's reward each minion carries.
    pub reward_fraction: f32,
    /// Distance of each minion from the boss's last position.
    pub radius: f32,
}

/// Templates for every tower kind plus upgrade tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerCatalog {
    /// General-purpose tower.
    pub basic: TowerStats,
    /// Long range, slow, heavy hitting tower.
    pub sniper: TowerStats,
    /// Short range, fast firing tower.
    pub rapid: TowerStats,
    /// Per-level upgrade tuning.
    pub upgrade: UpgradeTuning,
}

impl TowerCatalog {
    /// Statistics of a freshly built tower of the given kind.
    #[must_use]
    pub const fn stats(&self, kind: TowerKind) -> TowerStats {
        match kind {
            TowerKind::Basic => self.basic,
            TowerKind::Sniper => self.sniper,
            TowerKind::Rapid => self.rapid,
        }
    }
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self {
            basic: TowerStats {
                cost: 50,
                damage: 25.0,
                range: 120.0,
                fire_rate_ms: 800,
                projectile_speed: 300.0,
                size: 14.0,
                color: Rgb::from_rgb(0x3a, 0x7b, 0xd5),
            },
            sniper: TowerStats {
                cost: 100,
                damage: 90.0,
                range: 220.0,
                fire_rate_ms: 2_000,
                projectile_speed: 600.0,
                size: 14.0,
                color: Rgb::from_rgb(0x45, 0x5a, 0x64),
            },
            rapid: TowerStats {
                cost: 75,
                damage: 10.0,
                range: 100.0,
                fire_rate_ms: 250,
                projectile_speed: 400.0,
                size: 12.0,
                color: Rgb::from_rgb(0xe6, 0x51, 0x00),
            },
            upgrade: UpgradeTuning::default(),
        }
    }
}

/// Statistics of a level one tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Coins required to build.
    pub cost: u32,
    /// Damage per projectile.
    pub damage: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum time between shots in milliseconds.
    pub fire_rate_ms: u64,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Radius in world units.
    pub size: f32,
    /// Appearance.
    pub color: Rgb,
}

/// Multiplicative per-level upgrade steps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeTuning {
    /// Highest reachable level.
    pub max_level: u8,
    /// Upgrade cost as a fraction of build cost, times the current level.
    pub cost_factor: f32,
    /// Damage multiplier per upgrade.
    pub damage_factor: f32,
    /// Range multiplier per upgrade.
    pub range_factor: f32,
    /// Fire interval multiplier per upgrade.
    pub fire_rate_factor: f32,
    /// Size added per upgrade.
    pub size_step: f32,
    /// How far the color is lightened per upgrade.
    pub lighten_step: f32,
    /// Fraction of invested coins returned when a tower is removed.
    pub refund_fraction: f32,
}

impl Default for UpgradeTuning {
    fn default() -> Self {
        Self {
            max_level: 3,
            cost_factor: 0.75,
            damage_factor: 1.4,
            range_factor: 1.15,
            fire_rate_factor: 0.85,
            size_step: 2.0,
            lighten_step: 0.2,
            refund_fraction: 0.6,
        }
    }
}

/// Starting resources of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Coins available before the first wave.
    pub starting_coins: u32,
    /// Lives available before the game is lost.
    pub starting_lives: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_coins: 150,
            starting_lives: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_pattern_table_is_rejected() {
        let mut config = GameConfig::default();
        config.waves.patterns.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoWavePatterns));
    }

    #[test]
    fn non_positive_multiplier_is_rejected() {
        let mut config = GameConfig::default();
        config.waves.health_multiplier = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "waves.health_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: GameConfig = toml::from_str(
            r#"
            seed = 7

            [waves]
            preparation_ms = 2500

            [economy]
            starting_coins = 999
            "#,
        )
        .expect("parse partial config");

        assert_eq!(config.seed, 7);
        assert_eq!(config.waves.preparation(), Duration::from_millis(2_500));
        assert_eq!(config.waves.spawn_interval_ms, 1_000);
        assert_eq!(config.economy.starting_coins, 999);
        assert_eq!(config.economy.starting_lives, 20);
        assert_eq!(config.waves.patterns, WaveConfig::default().patterns);
    }

    #[test]
    fn game_config_round_trips_through_bincode() {
        let config = GameConfig::default();
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: GameConfig = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }

    #[test]
    fn catalog_templates_are_independent_copies() {
        let mut catalog = EnemyCatalog::default();
        let template = catalog.template(EnemyKind::Basic);
        catalog.basic.health = 1.0;
        assert!((template.health - 100.0).abs() < f32::EPSILON);
    }
}
