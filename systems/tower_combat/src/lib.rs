#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower ownership, firing and projectile resolution.
//!
//! The engine works in two phases. Firing freezes the aim point at the
//! target's position at that instant. Resolution looks the target up again by
//! id on arrival, so an enemy that moved away still takes the hit and one
//! that died or left the field turns the shot into a miss.

use std::time::Duration;

use rampart_core::{
    EnemyId, EnemyView, Event, PlacementError, ProjectileId, ProjectileView, RemovalError,
    RewardSink, TileCoord, TowerCatalog, TowerId, TowerKind, TowerSites, TowerSnapshot,
    TowerView, UpgradeError, UpgradeInfo,
};
use rampart_system_tower_targeting::{TargetRequest, TowerTarget, TowerTargeting};

mod projectile;
mod tower;

use projectile::Projectile;
use tower::Tower;

/// Result of a successful placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerPlacement {
    /// Identifier of the new tower.
    pub tower: TowerId,
    /// Coins to debit.
    pub cost: u32,
}

/// Result of a successful upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerUpgrade {
    /// Upgraded tower.
    pub tower: TowerId,
    /// Level reached.
    pub level: u8,
    /// Coins to debit.
    pub cost: u32,
}

/// Result of a successful removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerRemoval {
    /// Removed tower.
    pub tower: TowerId,
    /// Coins to credit back.
    pub refund: u32,
}

/// Owns towers and projectiles and runs the combat pipeline.
#[derive(Debug)]
pub struct TargetingEngine {
    catalog: TowerCatalog,
    towers: Vec<Tower>,
    projectiles: Vec<Projectile>,
    targeting: TowerTargeting,
    requests: Vec<TargetRequest>,
    targets: Vec<TowerTarget>,
    next_tower: u32,
    next_projectile: u32,
}

impl TargetingEngine {
    /// Creates an engine with no towers.
    #[must_use]
    pub fn new(catalog: TowerCatalog) -> Self {
        Self {
            catalog,
            towers: Vec::new(),
            projectiles: Vec::new(),
            targeting: TowerTargeting::new(),
            requests: Vec::new(),
            targets: Vec::new(),
            next_tower: 1,
            next_projectile: 1,
        }
    }

    /// Builds a tower if the tile is free and `funds` cover its cost.
    ///
    /// On success the tile is marked occupied in `world`; debiting the
    /// returned cost is left to the caller.
    pub fn try_place_tower<G>(
        &mut self,
        world: &mut G,
        kind: TowerKind,
        tile: TileCoord,
        funds: u32,
    ) -> Result<TowerPlacement, PlacementError>
    where
        G: TowerSites + ?Sized,
    {
        if let Some(error) = world.placement_error(tile) {
            return Err(error);
        }
        let stats = self.catalog.stats(kind);
        if funds < stats.cost {
            return Err(PlacementError::InsufficientFunds);
        }

        let id = TowerId::new(self.next_tower);
        world.occupy(tile, id)?;
        self.next_tower += 1;
        self.towers
            .push(Tower::new(id, kind, tile, world.tile_center(tile), stats));
        tracing::debug!(
            tower = id.get(),
            ?kind,
            column = tile.column(),
            row = tile.row(),
            "tower placed"
        );
        Ok(TowerPlacement {
            tower: id,
            cost: stats.cost,
        })
    }

    /// Upgrade preview for the tower on `tile`.
    #[must_use]
    pub fn tower_upgrade_info<G>(&self, world: &G, tile: TileCoord) -> Option<UpgradeInfo>
    where
        G: TowerSites + ?Sized,
    {
        let tower = self.tower_on(world, tile)?;
        Some(tower.upgrade_info(&self.catalog.upgrade))
    }

    /// Raises the tower on `tile` by one level if `funds` cover the cost.
    pub fn try_upgrade_tower<G>(
        &mut self,
        world: &G,
        tile: TileCoord,
        funds: u32,
    ) -> Result<TowerUpgrade, UpgradeError>
    where
        G: TowerSites + ?Sized,
    {
        let id = world.tower_at(tile).ok_or(UpgradeError::MissingTower)?;
        let tuning = self.catalog.upgrade;
        let tower = self
            .towers
            .iter_mut()
            .find(|tower| tower.id == id)
            .ok_or(UpgradeError::MissingTower)?;
        let cost = tower.upgrade_cost(&tuning).ok_or(UpgradeError::MaxLevel)?;
        if funds < cost {
            return Err(UpgradeError::InsufficientFunds);
        }

        tower.apply_upgrade(&tuning, cost);
        tracing::debug!(tower = id.get(), level = tower.level, cost, "tower upgraded");
        Ok(TowerUpgrade {
            tower: id,
            level: tower.level,
            cost,
        })
    }

    /// Removes the tower on `tile`, returning its refund.
    ///
    /// Projectiles it already fired keep flying.
    pub fn try_remove_tower<G>(
        &mut self,
        world: &mut G,
        tile: TileCoord,
    ) -> Result<TowerRemoval, RemovalError>
    where
        G: TowerSites + ?Sized,
    {
        let id = world.tower_at(tile).ok_or(RemovalError::MissingTower)?;
        let index = self
            .towers
            .iter()
            .position(|tower| tower.id == id)
            .ok_or(RemovalError::MissingTower)?;
        let tower = self.towers.remove(index);
        let _ = world.vacate(tile);
        let refund = tower.refund(&self.catalog.upgrade);
        tracing::debug!(tower = id.get(), refund, "tower removed");
        Ok(TowerRemoval { tower: id, refund })
    }

    /// Runs one combat step against the live enemies.
    ///
    /// Targets are revalidated, ready towers fire, and projectiles move and
    /// resolve. `damage` applies a hit to the enemy with the given id and
    /// returns the kill reward, zero when the hit did not kill.
    pub fn update<F, S>(
        &mut self,
        now: Duration,
        dt: Duration,
        enemies: &EnemyView,
        mut damage: F,
        sink: &mut S,
        out: &mut Vec<Event>,
    ) where
        F: FnMut(EnemyId, f32) -> u32,
        S: RewardSink + ?Sized,
    {
        self.acquire_targets(enemies);
        self.fire(now, out);
        self.resolve_projectiles(dt, enemies, &mut damage, sink, out);
    }

    fn acquire_targets(&mut self, enemies: &EnemyView) {
        self.requests.clear();
        self.requests.extend(self.towers.iter().map(|tower| TargetRequest {
            tower: tower.id,
            position: tower.position,
            range: tower.range,
            current: tower.target,
        }));
        self.targeting
            .handle(&self.requests, enemies, &mut self.targets);

        for tower in &mut self.towers {
            tower.target = self
                .targets
                .iter()
                .find(|target| target.tower == tower.id)
                .map(|target| target.enemy);
        }
    }

    fn fire(&mut self, now: Duration, out: &mut Vec<Event>) {
        for target in &self.targets {
            let Some(tower) = self.towers.iter_mut().find(|tower| tower.id == target.tower) else {
                continue;
            };
            if !tower.ready(now) {
                continue;
            }
            tower.last_shot = Some(now);

            let id = ProjectileId::new(self.next_projectile);
            self.next_projectile += 1;
            self.projectiles.push(Projectile {
                id,
                tower: tower.id,
                position: tower.position,
                aim: target.enemy_position,
                target: target.enemy,
                speed: tower.projectile_speed,
                damage: tower.damage,
            });
            tracing::trace!(tower = tower.id.get(), projectile = id.get(), "projectile fired");
            out.push(Event::ProjectileFired {
                tower: tower.id,
                projectile: id,
                target: target.enemy,
            });
        }
    }

    fn resolve_projectiles<F, S>(
        &mut self,
        dt: Duration,
        enemies: &EnemyView,
        damage: &mut F,
        sink: &mut S,
        out: &mut Vec<Event>,
    ) where
        F: FnMut(EnemyId, f32) -> u32,
        S: RewardSink + ?Sized,
    {
        self.projectiles.retain_mut(|projectile| {
            if !projectile.advance(dt) {
                return true;
            }
            match enemies.get(projectile.target) {
                Some(enemy) => {
                    let reward = damage(projectile.target, projectile.damage);
                    if reward > 0 {
                        sink.credit(reward);
                        out.push(Event::RewardEarned {
                            amount: reward,
                            position: enemy.position,
                        });
                    }
                }
                None => out.push(Event::ProjectileMissed {
                    projectile: projectile.id,
                }),
            }
            false
        });
    }

    /// Snapshot of one tower.
    #[must_use]
    pub fn tower(&self, id: TowerId) -> Option<TowerSnapshot> {
        self.towers
            .iter()
            .find(|tower| tower.id == id)
            .map(Tower::snapshot)
    }

    /// Captures every tower, ordered by id.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        TowerView::from_snapshots(self.towers.iter().map(Tower::snapshot).collect())
    }

    /// Captures every projectile in flight, ordered by id.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        ProjectileView::from_snapshots(self.projectiles.iter().map(Projectile::snapshot).collect())
    }

    /// Number of placed towers.
    #[must_use]
    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    /// Removes every tower and projectile. Tile occupancy lives in the world
    /// and must be cleared there.
    pub fn clear(&mut self) {
        self.towers.clear();
        self.projectiles.clear();
        self.targets.clear();
    }

    fn tower_on<G>(&self, world: &G, tile: TileCoord) -> Option<&Tower>
    where
        G: TowerSites + ?Sized,
    {
        let id = world.tower_at(tile)?;
        self.towers.iter().find(|tower| tower.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rampart_core::{EnemyClass, EnemyKind, EnemySnapshot, GridConfig, PathProvider, Rgb};
    use rampart_world::World;
    use std::sync::Arc;

    #[derive(Default)]
    struct Purse {
        coins: u32,
    }

    impl RewardSink for Purse {
        fn credit(&mut self, coins: u32) {
            self.coins += coins;
        }

        fn lose_lives(&mut self, _lives: u32) {}
    }

    fn world() -> World {
        World::new(&GridConfig {
            columns: 10,
            rows: 5,
            tile_size: 40.0,
            waypoints: vec![TileCoord::new(0, 0), TileCoord::new(9, 0)],
            blocked: Vec::new(),
        })
    }

    fn enemy(id: EnemyId, position: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id,
            class: EnemyClass::Regular(EnemyKind::Basic),
            position,
            path_index: 0,
            health: 100.0,
            max_health: 100.0,
            speed: 1.0,
            size: 10.0,
            color: Rgb::from_rgb(0, 0, 0),
            formation: None,
            boss: None,
        }
    }

    fn engine_with_tower(kind: TowerKind, tile: TileCoord) -> (TargetingEngine, World) {
        let mut world = world();
        let mut engine = TargetingEngine::new(TowerCatalog::default());
        let _ = engine
            .try_place_tower(&mut world, kind, tile, u32::MAX)
            .expect("placement");
        (engine, world)
    }

    #[test]
    fn placement_is_rejected_on_path_occupied_or_unaffordable_tiles() {
        let mut world = world();
        let mut engine = TargetingEngine::new(TowerCatalog::default());

        assert_eq!(
            engine.try_place_tower(&mut world, TowerKind::Basic, TileCoord::new(3, 0), 500),
            Err(PlacementError::Unbuildable)
        );
        assert_eq!(
            engine.try_place_tower(&mut world, TowerKind::Sniper, TileCoord::new(3, 2), 99),
            Err(PlacementError::InsufficientFunds)
        );
        let placed = engine
            .try_place_tower(&mut world, TowerKind::Sniper, TileCoord::new(3, 2), 100)
            .expect("affordable");
        assert_eq!(placed.cost, 100);
        assert_eq!(
            engine.try_place_tower(&mut world, TowerKind::Basic, TileCoord::new(3, 2), 500),
            Err(PlacementError::Occupied)
        );
        assert_eq!(engine.tower_count(), 1);
    }

    /// A single buildable pad with no enemy path.
    #[derive(Default)]
    struct Pad {
        tower: Option<TowerId>,
    }

    impl PathProvider for Pad {
        fn enemy_path(&self) -> &[TileCoord] {
            &[]
        }

        fn path_points(&self) -> Arc<[Vec2]> {
            Vec::new().into()
        }

        fn is_on_enemy_path(&self, _tile: TileCoord) -> bool {
            false
        }

        fn placement_error(&self, tile: TileCoord) -> Option<PlacementError> {
            if tile != TileCoord::new(0, 0) {
                Some(PlacementError::OutOfBounds)
            } else if self.tower.is_some() {
                Some(PlacementError::Occupied)
            } else {
                None
            }
        }
    }

    impl TowerSites for Pad {
        fn tile_center(&self, _tile: TileCoord) -> Vec2 {
            Vec2::new(7.0, 7.0)
        }

        fn tower_at(&self, tile: TileCoord) -> Option<TowerId> {
            self.tower.filter(|_| tile == TileCoord::new(0, 0))
        }

        fn occupy(&mut self, tile: TileCoord, tower: TowerId) -> Result<(), PlacementError> {
            if let Some(error) = self.placement_error(tile) {
                return Err(error);
            }
            self.tower = Some(tower);
            Ok(())
        }

        fn vacate(&mut self, tile: TileCoord) -> Option<TowerId> {
            if tile == TileCoord::new(0, 0) {
                self.tower.take()
            } else {
                None
            }
        }
    }

    #[test]
    fn placement_works_against_any_tower_site_grid() {
        let mut pad = Pad::default();
        let mut engine = TargetingEngine::new(TowerCatalog::default());
        let origin = TileCoord::new(0, 0);

        assert_eq!(
            engine.try_place_tower(&mut pad, TowerKind::Basic, TileCoord::new(1, 0), 500),
            Err(PlacementError::OutOfBounds)
        );
        let placed = engine
            .try_place_tower(&mut pad, TowerKind::Basic, origin, 500)
            .expect("free pad");
        assert_eq!(pad.tower, Some(placed.tower));
        assert_eq!(
            engine.towers().iter().map(|tower| tower.position).collect::<Vec<_>>(),
            [Vec2::new(7.0, 7.0)]
        );
        assert!(!pad.can_place_tower(origin));

        let _ = engine.try_remove_tower(&mut pad, origin).expect("tower");
        assert!(pad.can_place_tower(origin));
    }

    #[test]
    fn upgrades_stop_at_max_level_and_require_funds() {
        let tile = TileCoord::new(2, 2);
        let (mut engine, world) = engine_with_tower(TowerKind::Basic, tile);

        assert_eq!(
            engine.try_upgrade_tower(&world, tile, 10),
            Err(UpgradeError::InsufficientFunds)
        );
        assert_eq!(engine.try_upgrade_tower(&world, tile, 1_000).map(|u| u.level), Ok(2));
        assert_eq!(engine.try_upgrade_tower(&world, tile, 1_000).map(|u| u.level), Ok(3));
        assert_eq!(
            engine.try_upgrade_tower(&world, tile, 1_000),
            Err(UpgradeError::MaxLevel)
        );
        assert_eq!(
            engine.try_upgrade_tower(&world, TileCoord::new(5, 3), 1_000),
            Err(UpgradeError::MissingTower)
        );
        let info = engine.tower_upgrade_info(&world, tile).expect("tower");
        assert_eq!(info.level, 3);
        assert!(!info.can_upgrade());
    }

    #[test]
    fn removal_frees_the_tile_and_refunds() {
        let tile = TileCoord::new(2, 2);
        let (mut engine, mut world) = engine_with_tower(TowerKind::Basic, tile);

        let removal = engine.try_remove_tower(&mut world, tile).expect("tower");
        assert_eq!(removal.refund, 30);
        assert!(world.placement_error(tile).is_none());
        assert_eq!(
            engine.try_remove_tower(&mut world, tile),
            Err(RemovalError::MissingTower)
        );
    }

    #[test]
    fn towers_never_fire_faster_than_their_fire_rate() {
        let tile = TileCoord::new(2, 1);
        let (mut engine, _) = engine_with_tower(TowerKind::Rapid, tile);
        let target = EnemyId::new(1);
        let enemies = EnemyView::from_snapshots(vec![enemy(target, Vec2::new(100.0, 20.0))]);
        let mut purse = Purse::default();
        let mut events = Vec::new();

        let mut shots = Vec::new();
        for frame in 0..100u64 {
            let now = Duration::from_millis(frame * 16);
            events.clear();
            engine.update(
                now,
                Duration::from_millis(16),
                &enemies,
                |_, _| 0,
                &mut purse,
                &mut events,
            );
            if events
                .iter()
                .any(|event| matches!(event, Event::ProjectileFired { .. }))
            {
                shots.push(now);
            }
        }

        assert!(shots.len() >= 2);
        let fire_rate = Duration::from_millis(250);
        assert!(shots.windows(2).all(|pair| pair[1] - pair[0] >= fire_rate));
    }

    #[test]
    fn aim_is_frozen_and_kill_reward_is_paid_once() {
        let tile = TileCoord::new(2, 1);
        let (mut engine, _) = engine_with_tower(TowerKind::Basic, tile);
        let id = EnemyId::new(1);
        let mut purse = Purse::default();
        let mut events = Vec::new();
        let mut hits = 0;

        let fired_at = Vec2::new(140.0, 60.0);
        let start = EnemyView::from_snapshots(vec![enemy(id, fired_at)]);
        engine.update(Duration::ZERO, Duration::ZERO, &start, |_, _| 0, &mut purse, &mut events);
        let aim = engine.projectiles().iter().next().expect("shot").aim;
        assert_eq!(aim, fired_at);

        let moved = EnemyView::from_snapshots(vec![enemy(id, Vec2::new(200.0, 60.0))]);
        for frame in 1..30u64 {
            engine.update(
                Duration::from_millis(frame * 10),
                Duration::from_millis(100),
                &moved,
                |_, _| {
                    hits += 1;
                    if hits == 1 { 7 } else { 0 }
                },
                &mut purse,
                &mut events,
            );
        }

        assert_eq!(purse.coins, 7);
        let rewards: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::RewardEarned { amount, position } => Some((*amount, *position)),
                _ => None,
            })
            .collect();
        assert_eq!(rewards, vec![(7, Vec2::new(200.0, 60.0))]);
    }

    #[test]
    fn shots_at_vanished_enemies_are_phantom_misses() {
        let tile = TileCoord::new(2, 1);
        let (mut engine, _) = engine_with_tower(TowerKind::Basic, tile);
        let id = EnemyId::new(1);
        let mut purse = Purse::default();
        let mut events = Vec::new();

        let start = EnemyView::from_snapshots(vec![enemy(id, Vec2::new(140.0, 60.0))]);
        engine.update(Duration::ZERO, Duration::ZERO, &start, |_, _| 0, &mut purse, &mut events);

        let mut damaged = false;
        engine.update(
            Duration::from_millis(100),
            Duration::from_secs(1),
            &EnemyView::default(),
            |_, _| {
                damaged = true;
                0
            },
            &mut purse,
            &mut events,
        );

        assert!(!damaged);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ProjectileMissed { .. })));
        assert_eq!(engine.projectiles().iter().count(), 0);
    }
}
