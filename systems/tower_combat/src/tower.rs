//! Tower state and upgrade arithmetic.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{
    EnemyId, Rgb, TileCoord, TowerId, TowerKind, TowerSnapshot, TowerStats, UpgradeInfo,
    UpgradeTuning,
};

#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) tile: TileCoord,
    pub(crate) position: Vec2,
    pub(crate) level: u8,
    pub(crate) damage: f32,
    pub(crate) range: f32,
    pub(crate) fire_rate: Duration,
    pub(crate) projectile_speed: f32,
    pub(crate) last_shot: Option<Duration>,
    pub(crate) target: Option<EnemyId>,
    pub(crate) size: f32,
    pub(crate) color: Rgb,
    base_color: Rgb,
    base_cost: u32,
    pub(crate) invested: u32,
}

impl Tower {
    pub(crate) fn new(
        id: TowerId,
        kind: TowerKind,
        tile: TileCoord,
        position: Vec2,
        stats: TowerStats,
    ) -> Self {
        Self {
            id,
            kind,
            tile,
            position,
            level: 1,
            damage: stats.damage,
            range: stats.range,
            fire_rate: Duration::from_millis(stats.fire_rate_ms),
            projectile_speed: stats.projectile_speed,
            last_shot: None,
            target: None,
            size: stats.size,
            color: stats.color,
            base_color: stats.color,
            base_cost: stats.cost,
            invested: stats.cost,
        }
    }

    /// A tower that never fired is ready immediately.
    pub(crate) fn ready(&self, now: Duration) -> bool {
        self.last_shot
            .map_or(true, |last| now.saturating_sub(last) >= self.fire_rate)
    }

    /// Cost of the next level, `None` at the cap.
    pub(crate) fn upgrade_cost(&self, tuning: &UpgradeTuning) -> Option<u32> {
        (self.level < tuning.max_level).then(|| {
            (self.base_cost as f32 * tuning.cost_factor * f32::from(self.level)).floor() as u32
        })
    }

    pub(crate) fn upgrade_info(&self, tuning: &UpgradeTuning) -> UpgradeInfo {
        let cost = self.upgrade_cost(tuning);
        let (next_damage, next_range, next_fire_rate) = if cost.is_some() {
            (
                self.damage * tuning.damage_factor,
                self.range * tuning.range_factor,
                self.fire_rate.mul_f32(tuning.fire_rate_factor),
            )
        } else {
            (self.damage, self.range, self.fire_rate)
        };
        UpgradeInfo {
            tower: self.id,
            level: self.level,
            max_level: tuning.max_level,
            cost,
            next_damage,
            next_range,
            next_fire_rate,
        }
    }

    /// Applies one level; the caller has already checked funds and the cap.
    pub(crate) fn apply_upgrade(&mut self, tuning: &UpgradeTuning, cost: u32) {
        self.level += 1;
        self.damage *= tuning.damage_factor;
        self.range *= tuning.range_factor;
        self.fire_rate = self.fire_rate.mul_f32(tuning.fire_rate_factor);
        self.size += tuning.size_step;
        self.color = self
            .base_color
            .lighten(tuning.lighten_step * f32::from(self.level - 1));
        self.invested += cost;
    }

    pub(crate) fn refund(&self, tuning: &UpgradeTuning) -> u32 {
        (self.invested as f32 * tuning.refund_fraction).floor() as u32
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            position: self.position,
            level: self.level,
            damage: self.damage,
            range: self.range,
            fire_rate: self.fire_rate,
            target: self.target,
            size: self.size,
            color: self.color,
        }
    }
}
