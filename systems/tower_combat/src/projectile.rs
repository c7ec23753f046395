//! Projectiles flying toward a frozen aim point.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{EnemyId, ProjectileId, ProjectileSnapshot, TowerId, PROJECTILE_ARRIVAL_EPSILON};

#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) position: Vec2,
    /// Fixed at launch; the projectile never homes.
    pub(crate) aim: Vec2,
    /// Only used to look the enemy up again on arrival.
    pub(crate) target: EnemyId,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
}

impl Projectile {
    /// Moves toward the aim point and reports whether it arrived.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        let remaining = self.aim - self.position;
        let distance = remaining.length();
        let step = self.speed * dt.as_secs_f32();
        if step >= distance {
            self.position = self.aim;
        } else {
            self.position += remaining / distance * step;
        }
        self.position.distance(self.aim) < PROJECTILE_ARRIVAL_EPSILON
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            position: self.position,
            aim: self.aim,
            target: self.target,
            damage: self.damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(aim: Vec2) -> Projectile {
        Projectile {
            id: ProjectileId::new(1),
            tower: TowerId::new(1),
            position: Vec2::ZERO,
            aim,
            target: EnemyId::new(1),
            speed: 100.0,
            damage: 10.0,
        }
    }

    #[test]
    fn travels_at_constant_speed_without_overshooting() {
        let mut shot = projectile(Vec2::new(30.0, 40.0));
        assert!(!shot.advance(Duration::from_millis(200)));
        assert!((shot.position.length() - 20.0).abs() < 1e-4);

        assert!(shot.advance(Duration::from_secs(5)));
        assert_eq!(shot.position, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn arrives_inside_the_epsilon() {
        let mut shot = projectile(Vec2::new(24.0, 0.0));
        assert!(shot.advance(Duration::from_millis(200)));
        assert_eq!(shot.position, Vec2::new(20.0, 0.0));
    }
}
