#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy registries: path movement, damage intake and boss abilities.
//!
//! [`EnemyRegistry`] owns plain enemies and moves them along a shared path.
//! [`BossDirector`] composes a registry with per-boss ability timers rather
//! than specialising it.

use std::{sync::Arc, time::Duration};

use glam::Vec2;
use rampart_core::{
    Departure, DepartureCause, EnemyId, EnemyIdAllocator, EnemySnapshot, EnemyTemplate, EnemyView,
    FormationSlot,
};

mod boss;

pub use boss::BossDirector;

/// A single enemy walking the path.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    template: EnemyTemplate,
    position: Vec2,
    path: Arc<[Vec2]>,
    path_index: usize,
    progress: f32,
    health: f32,
    speed: f32,
    alive: bool,
    reached_goal: bool,
    formation: Option<FormationSlot>,
}

impl Enemy {
    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Stat snapshot the enemy spawned with.
    #[must_use]
    pub const fn template(&self) -> &EnemyTemplate {
        &self.template
    }

    /// Position in world units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Index of the path node the enemy last passed.
    #[must_use]
    pub const fn path_index(&self) -> usize {
        self.path_index
    }

    /// Progress along the current segment, in `[0, 1)`.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.template.health
    }

    /// Current speed in path segments per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether the enemy has not been killed.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the enemy walked off the end of the path.
    #[must_use]
    pub const fn reached_goal(&self) -> bool {
        self.reached_goal
    }

    /// Whether the enemy still moves and takes damage.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.alive && !self.reached_goal
    }

    /// Formation slot, if the enemy spawned in one.
    #[must_use]
    pub const fn formation(&self) -> Option<FormationSlot> {
        self.formation
    }

    fn effective_speed(&self) -> f32 {
        let multiplier = self.formation.map_or(1.0, |slot| slot.speed_multiplier);
        self.speed * multiplier
    }

    fn advance(&mut self, dt: Duration) {
        let Some(last) = self.path.len().checked_sub(1) else {
            self.reached_goal = true;
            return;
        };
        if self.path_index >= last {
            self.path_index = last;
            self.position = self.path[last];
            self.reached_goal = true;
            return;
        }

        self.progress += self.effective_speed() * dt.as_secs_f32();
        if self.progress >= 1.0 {
            self.path_index += 1;
            self.progress = 0.0;
            self.position = self.path[self.path_index];
            if self.path_index == last {
                self.reached_goal = true;
            }
        } else {
            let from = self.path[self.path_index];
            let to = self.path[self.path_index + 1];
            self.position = from.lerp(to, self.progress);
        }
    }

    fn strike(&mut self, amount: f32) -> Strike {
        if !self.is_active() {
            return Strike::Ignored;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
            Strike::Killed {
                reward: self.template.reward,
            }
        } else {
            Strike::Wounded
        }
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            class: self.template.class,
            position: self.position,
            path_index: self.path_index,
            health: self.health,
            max_health: self.template.health,
            speed: self.speed,
            size: self.template.size,
            color: self.template.color,
            formation: self.formation,
            boss: None,
        }
    }
}

/// Result of applying damage to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strike {
    /// The enemy was missing, dead or already at the goal.
    Ignored,
    /// Health dropped but stayed above zero.
    Wounded,
    /// This hit took health to zero.
    Killed {
        /// Reward carried by the enemy.
        reward: u32,
    },
}

/// Placement of a new enemy on its path.
#[derive(Clone, Debug)]
pub struct SpawnPoint {
    /// Starting position in world units.
    pub position: Vec2,
    /// Shared path the enemy walks.
    pub path: Arc<[Vec2]>,
    /// Path node the enemy starts from.
    pub path_index: usize,
    /// Formation slot, if any.
    pub formation: Option<FormationSlot>,
}

impl SpawnPoint {
    /// Spawn at the first node of the path.
    #[must_use]
    pub fn path_start(path: Arc<[Vec2]>) -> Self {
        let position = path.first().copied().unwrap_or(Vec2::ZERO);
        Self {
            position,
            path,
            path_index: 0,
            formation: None,
        }
    }

    /// Attaches a formation slot.
    #[must_use]
    pub fn with_formation(mut self, formation: Option<FormationSlot>) -> Self {
        self.formation = formation;
        self
    }
}

/// Owns the active enemies and advances them along their path.
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    enemies: Vec<Enemy>,
    ids: EnemyIdAllocator,
}

impl EnemyRegistry {
    /// Creates an empty registry with its own id sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry drawing ids from a shared sequence.
    #[must_use]
    pub fn with_ids(ids: EnemyIdAllocator) -> Self {
        Self {
            enemies: Vec::new(),
            ids,
        }
    }

    /// Creates a new alive, non-arrived enemy at `position` walking `path`.
    pub fn create_enemy(
        &mut self,
        template: EnemyTemplate,
        position: Vec2,
        path: Arc<[Vec2]>,
    ) -> EnemyId {
        self.spawn(
            template,
            SpawnPoint {
                position,
                path,
                path_index: 0,
                formation: None,
            },
        )
    }

    /// Creates a new enemy at an arbitrary point along its path.
    pub fn spawn(&mut self, template: EnemyTemplate, spawn: SpawnPoint) -> EnemyId {
        let id = self.ids.allocate();
        let last = spawn.path.len().saturating_sub(1);
        self.enemies.push(Enemy {
            id,
            template,
            position: spawn.position,
            path: spawn.path,
            path_index: spawn.path_index.min(last),
            progress: 0.0,
            health: template.health,
            speed: template.speed,
            alive: true,
            reached_goal: false,
            formation: spawn.formation,
        });
        id
    }

    /// Advances every active enemy along its path by `dt` of frame time.
    pub fn update(&mut self, dt: Duration) {
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_active()) {
            enemy.advance(dt);
        }
    }

    /// Applies damage and returns the reward if this hit killed the enemy.
    ///
    /// The reward is returned exactly once per enemy; later hits, unknown ids
    /// and enemies that reached the goal yield zero.
    pub fn damage_enemy(&mut self, id: EnemyId, amount: f32) -> u32 {
        match self.strike(id, amount) {
            Strike::Killed { reward } => reward,
            Strike::Ignored | Strike::Wounded => 0,
        }
    }

    pub(crate) fn strike(&mut self, id: EnemyId, amount: f32) -> Strike {
        self.get_mut(id).map_or(Strike::Ignored, |enemy| enemy.strike(amount))
    }

    /// Restores health up to the maximum, returning the amount healed.
    pub fn heal(&mut self, id: EnemyId, amount: f32) -> f32 {
        let Some(enemy) = self.get_mut(id).filter(|enemy| enemy.is_active()) else {
            return 0.0;
        };
        let before = enemy.health;
        enemy.health = (enemy.health + amount.max(0.0)).min(enemy.template.health);
        enemy.health - before
    }

    /// Overrides the current speed of an enemy.
    pub fn set_speed(&mut self, id: EnemyId, speed: f32) {
        if let Some(enemy) = self.get_mut(id) {
            enemy.speed = speed;
        }
    }

    /// Looks up an enemy by identifier, including dead and arrived ones
    /// that have not been cleaned up yet.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    /// Enemies that are alive and have not reached the goal.
    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|enemy| enemy.is_active())
    }

    /// Number of enemies that are alive and have not reached the goal.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_enemies().count()
    }

    /// Captures the live enemies in spawn order.
    #[must_use]
    pub fn snapshot(&self) -> EnemyView {
        EnemyView::from_snapshots(self.alive_enemies().map(Enemy::snapshot).collect())
    }

    /// Removes dead and arrived enemies, reporting each departure once.
    pub fn cleanup(&mut self, out: &mut Vec<Departure>) {
        self.enemies.retain(|enemy| {
            let cause = if !enemy.alive {
                DepartureCause::Killed
            } else if enemy.reached_goal {
                DepartureCause::ReachedGoal
            } else {
                return true;
            };
            out.push(Departure {
                enemy: enemy.id,
                class: enemy.template.class,
                cause,
                position: enemy.position,
            });
            false
        });
    }

    /// Drops every enemy without reporting departures.
    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// Number of enemies held, including ones awaiting cleanup.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Reports whether the registry holds no enemies at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{EnemyClass, EnemyKind, Rgb};

    fn template(health: f32, speed: f32, reward: u32) -> EnemyTemplate {
        EnemyTemplate {
            class: EnemyClass::Regular(EnemyKind::Basic),
            health,
            speed,
            reward,
            size: 10.0,
            color: Rgb::from_rgb(0, 0, 0),
        }
    }

    fn straight_path(nodes: usize) -> Arc<[Vec2]> {
        (0..nodes)
            .map(|index| Vec2::new(index as f32 * 10.0, 0.0))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn created_enemies_are_alive_and_on_the_path() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(3);
        let id = registry.create_enemy(template(50.0, 1.0, 2), path[0], Arc::clone(&path));

        let enemy = registry.get(id).expect("enemy exists");
        assert!(enemy.is_alive());
        assert!(!enemy.reached_goal());
        assert_eq!(enemy.path_index(), 0);
        assert_eq!(enemy.health(), 50.0);
        assert_eq!(registry.alive_count(), 1);
    }

    #[test]
    fn each_registry_numbers_its_enemies_from_one() {
        let path = straight_path(3);
        let basic = template(5.0, 1.0, 1);
        let ids: Vec<_> = (0..2)
            .map(|_| {
                let mut registry = EnemyRegistry::new();
                let first = registry.create_enemy(basic, path[0], Arc::clone(&path));
                let second = registry.create_enemy(basic, path[0], Arc::clone(&path));
                (first, second)
            })
            .collect();
        assert_eq!(ids, [(EnemyId::new(1), EnemyId::new(2)); 2]);
    }

    #[test]
    fn movement_interpolates_within_a_segment() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(3);
        let id = registry.create_enemy(template(50.0, 1.0, 2), path[0], Arc::clone(&path));

        registry.update(Duration::from_millis(250));

        let enemy = registry.get(id).expect("enemy exists");
        assert_eq!(enemy.path_index(), 0);
        assert!((enemy.progress() - 0.25).abs() < 1e-6);
        assert!((enemy.position().x - 2.5).abs() < 1e-4);
    }

    #[test]
    fn overflow_snaps_to_next_node_and_resets_progress() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(4);
        let id = registry.create_enemy(template(50.0, 1.0, 2), path[0], Arc::clone(&path));

        registry.update(Duration::from_millis(1_600));

        let enemy = registry.get(id).expect("enemy exists");
        assert_eq!(enemy.path_index(), 1);
        assert_eq!(enemy.progress(), 0.0);
        assert_eq!(enemy.position(), path[1]);
    }

    #[test]
    fn reaching_last_node_stops_movement_and_damage() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(2);
        let id = registry.create_enemy(template(50.0, 4.0, 2), path[0], Arc::clone(&path));

        registry.update(Duration::from_millis(300));
        let enemy = registry.get(id).expect("enemy exists");
        assert!(enemy.reached_goal());
        assert_eq!(enemy.position(), path[1]);
        assert_eq!(registry.alive_count(), 0);

        assert_eq!(registry.damage_enemy(id, 500.0), 0);
        assert_eq!(registry.get(id).expect("enemy exists").health(), 50.0);
    }

    #[test]
    fn reward_is_returned_exactly_once() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(3);
        let id = registry.create_enemy(template(30.0, 1.0, 7), path[0], Arc::clone(&path));

        assert_eq!(registry.damage_enemy(id, 10.0), 0);
        assert_eq!(registry.damage_enemy(id, 25.0), 7);
        assert_eq!(registry.damage_enemy(id, 25.0), 0);
        assert_eq!(registry.get(id).expect("enemy exists").health(), 0.0);
        assert_eq!(registry.damage_enemy(EnemyId::new(u32::MAX), 5.0), 0);
    }

    #[test]
    fn health_never_increases_from_damage_and_never_goes_negative() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(3);
        let id = registry.create_enemy(template(40.0, 0.0, 1), path[0], Arc::clone(&path));

        let mut previous = registry.get(id).expect("enemy").health();
        for amount in [5.0, -20.0, 0.0, 12.5, 100.0, 3.0] {
            let _ = registry.damage_enemy(id, amount);
            let health = registry.get(id).expect("enemy").health();
            assert!(health <= previous);
            assert!(health >= 0.0);
            previous = health;
        }
    }

    #[test]
    fn heal_is_capped_at_max_health() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(3);
        let id = registry.create_enemy(template(40.0, 0.0, 1), path[0], Arc::clone(&path));

        let _ = registry.damage_enemy(id, 15.0);
        assert_eq!(registry.heal(id, 10.0), 10.0);
        assert_eq!(registry.heal(id, 10.0), 5.0);
        assert_eq!(registry.get(id).expect("enemy").health(), 40.0);
    }

    #[test]
    fn cleanup_partitions_dead_and_arrived_enemies() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(2);
        let killed = registry.create_enemy(template(10.0, 0.0, 1), path[0], Arc::clone(&path));
        let runner = registry.create_enemy(template(10.0, 10.0, 1), path[0], Arc::clone(&path));
        let survivor = registry.create_enemy(template(10.0, 0.0, 1), path[0], Arc::clone(&path));

        let _ = registry.damage_enemy(killed, 10.0);
        registry.update(Duration::from_millis(200));

        let mut departures = Vec::new();
        registry.cleanup(&mut departures);

        assert_eq!(departures.len(), 2);
        assert_eq!(departures[0].enemy, killed);
        assert_eq!(departures[0].cause, DepartureCause::Killed);
        assert_eq!(departures[1].enemy, runner);
        assert_eq!(departures[1].cause, DepartureCause::ReachedGoal);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(survivor).is_some());

        departures.clear();
        registry.cleanup(&mut departures);
        assert!(departures.is_empty());
    }

    #[test]
    fn snapshot_preserves_spawn_order() {
        let mut registry = EnemyRegistry::new();
        let path = straight_path(3);
        let first = registry.create_enemy(template(10.0, 0.0, 1), path[0], Arc::clone(&path));
        let second = registry.create_enemy(template(10.0, 0.0, 1), path[0], Arc::clone(&path));

        let ids: Vec<_> = registry.snapshot().iter().map(|snapshot| snapshot.id).collect();
        assert_eq!(ids, vec![first, second]);
    }
}
