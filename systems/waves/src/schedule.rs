//! Difficulty scaling and spawn-queue construction.

use std::{f32::consts::PI, time::Duration};

use glam::Vec2;
use rampart_core::{
    is_boss_wave, BossCatalog, BossKind, EnemyCatalog, EnemyTemplate, Formation, FormationSlot,
    FormationStyle, FormationTable, WaveConfig, WavePattern, BOSS_WAVE_PERIOD,
};

const GOLDEN_ANGLE: f32 = PI * 0.763_932;

/// Difficulty multipliers for one wave.
///
/// Counts, health, speed and the spawn interval grow with the effective wave
/// (capped at `max_scaling_waves`). Reward decay uses the uncapped wave.
/// The scaled interval gates consecutive spawns; queue times always use the
/// configured interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveScaling {
    wave: u32,
    effective: u32,
    boss: f64,
    count: f64,
    health: f64,
    speed: f64,
    reward: f64,
    interval: f64,
    base_interval: Duration,
}

impl WaveScaling {
    /// Computes the multipliers for `wave` (1-based).
    #[must_use]
    pub fn new(config: &WaveConfig, wave: u32) -> Self {
        let wave = wave.max(1);
        let effective = wave.min(config.max_scaling_waves.max(1));
        let growth = (effective - 1) as i32;
        let boss = if is_boss_wave(wave) {
            config.boss_wave_multiplier
        } else {
            1.0
        };
        Self {
            wave,
            effective,
            boss,
            count: config.count_multiplier.powi(growth),
            health: config.health_multiplier.powi(growth),
            speed: config.speed_multiplier.powi(growth),
            reward: config.reward_multiplier.powi(growth)
                * config.reward_decay.powi((wave - 1) as i32),
            interval: config.interval_reduction.powi(growth),
            base_interval: config.spawn_interval(),
        }
    }

    /// Wave these multipliers belong to.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Wave number after the scaling cap.
    #[must_use]
    pub const fn effective_wave(&self) -> u32 {
        self.effective
    }

    /// Scaled group size.
    #[must_use]
    pub fn count(&self, base: u32) -> u32 {
        (f64::from(base) * self.count * self.boss).floor() as u32
    }

    /// Scaled maximum health.
    #[must_use]
    pub fn health(&self, base: f32) -> f32 {
        (f64::from(base) * self.health * self.boss).floor() as f32
    }

    /// Scaled speed; boss waves do not make enemies faster.
    #[must_use]
    pub fn speed(&self, base: f32) -> f32 {
        (f64::from(base) * self.speed) as f32
    }

    /// Scaled kill reward including the per-wave decay.
    #[must_use]
    pub fn reward(&self, base: u32) -> u32 {
        (f64::from(base) * self.reward * self.boss).floor() as u32
    }

    /// Minimum time between two spawns of this wave.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        self.base_interval.mul_f64(self.interval)
    }

    /// Returns an independent copy of `template` with scaled statistics.
    #[must_use]
    pub fn scale(&self, template: EnemyTemplate) -> EnemyTemplate {
        EnemyTemplate {
            health: self.health(template.health).max(1.0),
            speed: self.speed(template.speed),
            reward: self.reward(template.reward),
            ..template
        }
    }
}

/// One timed spawn in a wave's queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnDirective {
    /// Scaled statistics of the enemy to create.
    pub template: EnemyTemplate,
    /// Time after the wave's preparation phase began.
    pub scheduled: Duration,
    /// Formation the enemy belongs to.
    pub formation: Formation,
    /// Position of the enemy within its group.
    pub formation_index: u32,
    /// Layout data for grouped formations.
    pub slot: Option<FormationSlot>,
    /// Boss kind when the directive spawns a boss.
    pub boss: Option<BossKind>,
}

/// Builds the spawn queue for a wave, ordered by scheduled time.
pub(crate) fn build_queue(
    config: &WaveConfig,
    enemies: &EnemyCatalog,
    bosses: &BossCatalog,
    wave: u32,
) -> Vec<SpawnDirective> {
    let scaling = WaveScaling::new(config, wave);
    let interval = config.spawn_interval();
    let preparation = config.preparation();

    let mut queue = Vec::new();
    let Some(pattern) = pattern_for(config, wave) else {
        return queue;
    };

    for group in &pattern.groups {
        let template = scaling.scale(enemies.template(group.kind));
        push_group(
            &mut queue,
            &config.formations,
            group.formation,
            scaling.count(group.count),
            template,
            None,
            preparation,
            interval,
        );
    }

    if let Some(kind) = boss_for(config, wave) {
        let template = scaling.scale(bosses.template(kind));
        push_group(
            &mut queue,
            &config.formations,
            Formation::Single,
            1,
            template,
            Some(kind),
            preparation,
            interval,
        );
    }

    queue.sort_by_key(|directive| directive.scheduled);
    queue
}

/// Base pattern for a wave, reusing the last entry past the end of the table.
fn pattern_for(config: &WaveConfig, wave: u32) -> Option<&WavePattern> {
    let index = (wave.max(1) as usize - 1).min(config.patterns.len().checked_sub(1)?);
    config.patterns.get(index)
}

/// Boss appended to a boss wave, cycling through the rotation.
pub(crate) fn boss_for(config: &WaveConfig, wave: u32) -> Option<BossKind> {
    if !is_boss_wave(wave) || config.boss_rotation.is_empty() {
        return None;
    }
    let round = (wave / BOSS_WAVE_PERIOD - 1) as usize;
    config
        .boss_rotation
        .get(round % config.boss_rotation.len())
        .copied()
}

#[allow(clippy::too_many_arguments)]
fn push_group(
    queue: &mut Vec<SpawnDirective>,
    formations: &FormationTable,
    formation: Formation,
    count: u32,
    template: EnemyTemplate,
    boss: Option<BossKind>,
    preparation: Duration,
    interval: Duration,
) {
    let style = formations.style(formation);
    let spacing = style.map_or(interval, |style| style.spacing());
    let base = interval * queue.len() as u32;

    for index in 0..count {
        queue.push(SpawnDirective {
            template,
            scheduled: preparation + base + spacing * index,
            formation,
            formation_index: index,
            slot: style.map(|style| slot(formation, index, style)),
            boss,
        });
    }
}

fn slot(formation: Formation, index: u32, style: FormationStyle) -> FormationSlot {
    FormationSlot {
        formation,
        index,
        offset: formation_offset(formation, index, style.offset_step),
        cohesion: style.cohesion,
        speed_multiplier: style.speed_multiplier,
    }
}

/// Offset of a member from its group leader, in world units.
fn formation_offset(formation: Formation, index: u32, step: f32) -> Vec2 {
    let i = index as f32;
    match formation {
        Formation::Single => Vec2::ZERO,
        Formation::Line => Vec2::new(-i * step, 0.0),
        Formation::Wedge => {
            let rank = ((index + 1) / 2) as f32;
            let side = if index % 2 == 0 { 1.0 } else { -1.0 };
            Vec2::new(-rank * step, side * rank * step)
        }
        Formation::Phalanx => {
            let column = (index % 3) as f32 - 1.0;
            let row = (index / 3) as f32;
            Vec2::new(-row * step, column * step)
        }
        Formation::Swarm => {
            let angle = i * GOLDEN_ANGLE;
            Vec2::new(angle.cos(), angle.sin()) * step * i.sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{EnemyClass, EnemyKind, SpawnGroup};

    fn single_basic(count: u32) -> WaveConfig {
        WaveConfig {
            patterns: vec![WavePattern::new(vec![SpawnGroup::new(
                EnemyKind::Basic,
                count,
                Formation::Single,
            )])],
            ..WaveConfig::default()
        }
    }

    #[test]
    fn third_wave_basic_health_scales_to_125() {
        let scaling = WaveScaling::new(&WaveConfig::default(), 3);
        assert_eq!(scaling.health(100.0), 125.0);
    }

    #[test]
    fn third_wave_reward_decays_back_to_three() {
        let scaling = WaveScaling::new(&WaveConfig::default(), 3);
        assert_eq!(scaling.reward(3), 3);
    }

    #[test]
    fn scaling_caps_growth_but_not_reward_decay() {
        let config = WaveConfig::default();
        let capped = WaveScaling::new(&config, 22);
        let at_cap = WaveScaling::new(&config, 21);
        assert_eq!(capped.effective_wave(), 20);
        assert_eq!(at_cap.effective_wave(), 20);
        assert_eq!(capped.health(100.0), at_cap.health(100.0));
        assert_eq!(capped.spawn_interval(), at_cap.spawn_interval());
        assert!(capped.reward(1_000) < at_cap.reward(1_000));
    }

    #[test]
    fn boss_waves_multiply_count_health_and_reward_but_not_speed() {
        let config = WaveConfig::default();
        let boss = WaveScaling::new(&config, 5);
        assert_eq!(boss.count(4), (4.0 * 1.15f64.powi(4) * 1.5).floor() as u32);
        assert_eq!(boss.speed(1.0), 1.03f64.powi(4) as f32);
        let plain = WaveScaling::new(&config, 4);
        assert!(boss.health(100.0) > plain.health(100.0) * 1.4);
    }

    #[test]
    fn first_wave_queue_is_five_basics_one_interval_apart() {
        let config = single_basic(5);
        let queue = build_queue(&config, &EnemyCatalog::default(), &BossCatalog::default(), 1);

        assert_eq!(queue.len(), 5);
        for (index, directive) in queue.iter().enumerate() {
            assert_eq!(
                directive.scheduled,
                config.preparation() + config.spawn_interval() * index as u32
            );
            assert_eq!(directive.template.class, EnemyClass::Regular(EnemyKind::Basic));
            assert_eq!(directive.formation, Formation::Single);
            assert!(directive.slot.is_none());
            assert!(directive.boss.is_none());
        }
    }

    #[test]
    fn groups_start_after_queued_directives_and_use_formation_spacing() {
        let config = WaveConfig {
            patterns: vec![WavePattern::new(vec![
                SpawnGroup::new(EnemyKind::Basic, 2, Formation::Single),
                SpawnGroup::new(EnemyKind::Fast, 3, Formation::Swarm),
            ])],
            ..WaveConfig::default()
        };
        let queue = build_queue(&config, &EnemyCatalog::default(), &BossCatalog::default(), 1);
        let swarm: Vec<_> = queue.iter().skip(2).map(|d| d.scheduled).collect();
        let base = config.preparation() + config.spawn_interval() * 2;
        assert_eq!(
            swarm,
            vec![
                base,
                base + Duration::from_millis(100),
                base + Duration::from_millis(200)
            ]
        );
        assert!(queue[2..].iter().all(|d| d.slot.is_some()));
    }

    fn mixed_pattern() -> WaveConfig {
        WaveConfig {
            patterns: vec![WavePattern::new(vec![
                SpawnGroup::new(EnemyKind::Basic, 2, Formation::Single),
                SpawnGroup::new(EnemyKind::Fast, 2, Formation::Line),
                SpawnGroup::new(EnemyKind::Basic, 2, Formation::Swarm),
            ])],
            ..WaveConfig::default()
        }
    }

    fn offsets_ms(config: &WaveConfig, wave: u32) -> Vec<u128> {
        build_queue(config, &EnemyCatalog::default(), &BossCatalog::default(), wave)
            .iter()
            .map(|directive| (directive.scheduled - config.preparation()).as_millis())
            .collect()
    }

    #[test]
    fn second_wave_offsets_use_the_configured_interval() {
        let config = mixed_pattern();
        assert_eq!(
            offsets_ms(&config, 2),
            [0, 1_000, 2_000, 2_200, 4_000, 4_100]
        );
    }

    #[test]
    fn sixth_wave_scales_counts_but_keeps_queue_spacing() {
        let config = mixed_pattern();
        assert_eq!(
            offsets_ms(&config, 6),
            [
                0, 1_000, 2_000, 3_000, 4_000, 4_200, 4_400, 4_600, 8_000, 8_100, 8_200, 8_300,
            ]
        );

        let gate = WaveScaling::new(&config, 6).spawn_interval().as_secs_f64();
        assert!((gate - 0.95f64.powi(5)).abs() < 1e-6);
        let second = WaveScaling::new(&config, 2).spawn_interval().as_secs_f64();
        assert!((second - 0.95).abs() < 1e-6);
    }

    #[test]
    fn later_waves_reuse_the_last_pattern() {
        let config = single_basic(2);
        let queue = build_queue(&config, &EnemyCatalog::default(), &BossCatalog::default(), 3);
        assert_eq!(queue.len(), (2.0 * 1.15f64.powi(2)).floor() as usize);
    }

    #[test]
    fn boss_waves_append_a_rotating_boss() {
        let config = single_basic(1);
        let catalog = BossCatalog::default();
        let fifth = build_queue(&config, &EnemyCatalog::default(), &catalog, 5);
        let tenth = build_queue(&config, &EnemyCatalog::default(), &catalog, 10);
        let fifteenth = build_queue(&config, &EnemyCatalog::default(), &catalog, 15);

        assert_eq!(fifth.last().and_then(|d| d.boss), Some(BossKind::Guardian));
        assert_eq!(tenth.last().and_then(|d| d.boss), Some(BossKind::Juggernaut));
        assert_eq!(fifteenth.last().and_then(|d| d.boss), Some(BossKind::Guardian));
        assert_eq!(fifth.iter().filter(|d| d.boss.is_some()).count(), 1);
        assert!(build_queue(&config, &EnemyCatalog::default(), &catalog, 4)
            .iter()
            .all(|d| d.boss.is_none()));
    }

    #[test]
    fn scaling_leaves_catalog_templates_untouched() {
        let catalog = EnemyCatalog::default();
        let before = catalog.template(EnemyKind::Basic);
        let _ = build_queue(&single_basic(3), &catalog, &BossCatalog::default(), 7);
        assert_eq!(catalog.template(EnemyKind::Basic), before);
    }
}
