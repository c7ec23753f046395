#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven Rampart simulation.
//!
//! [`Simulation`] owns the world, both enemy registries, the wave director,
//! the targeting engine and the player's ledger, and advances them in a fixed
//! order every tick:
//!
//! 1. boss abilities, then movement of bosses and regular enemies;
//! 2. targeting, firing and projectile resolution, then minions released by
//!    bosses killed in that step;
//! 3. departure cleanup, lives lost and the wave phase checks, which thus see
//!    the alive counts left by this tick's kills.

use rampart_core::{
    Clock, Command, ConfigError, Departure, EnemyIdAllocator, EnemyView, Event, GameConfig,
    PlacementError, ProjectileView, RemovalError, TileCoord, TowerId, TowerKind, TowerView,
    UpgradeError, UpgradeInfo, WaveInfo,
};
use rampart_system_enemies::{BossDirector, EnemyRegistry};
use rampart_system_tower_combat::TargetingEngine;
use rampart_system_waves::{Config as WaveDirectorConfig, WaveDirector};
use rampart_world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

mod ledger;

pub use ledger::Ledger;

/// Complete game state driven by an external frame loop.
#[derive(Debug)]
pub struct Simulation<C: Clock> {
    config: GameConfig,
    clock: C,
    rng: ChaCha8Rng,
    world: World,
    enemy_ids: EnemyIdAllocator,
    enemies: EnemyRegistry,
    bosses: BossDirector,
    waves: WaveDirector,
    combat: TargetingEngine,
    ledger: Ledger,
    game_over: bool,
    departures: Vec<Departure>,
}

impl<C: Clock> Simulation<C> {
    /// Builds a simulation after validating `config`.
    pub fn new(config: GameConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let now = clock.now();
        let enemy_ids = EnemyIdAllocator::new();
        tracing::info!(seed = config.seed, "simulation created");
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            world: World::new(&config.grid),
            enemies: EnemyRegistry::with_ids(enemy_ids.clone()),
            bosses: BossDirector::with_ids(enemy_ids.clone()),
            enemy_ids,
            waves: WaveDirector::new(WaveDirectorConfig::from_game(&config), now),
            combat: TargetingEngine::new(config.towers),
            ledger: Ledger::new(&config.economy),
            game_over: false,
            departures: Vec::new(),
            clock,
            config,
        })
    }

    /// Advances the simulation by one frame of `dt`.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.game_over {
            return;
        }
        let now = self.clock.now();

        self.bosses.update(now, dt, &mut self.rng);
        self.enemies.update(dt);

        let view = self.enemies();
        let Self {
            enemies,
            bosses,
            combat,
            ledger,
            ..
        } = self;
        combat.update(
            now,
            dt,
            &view,
            |id, amount| {
                if bosses.registry().get(id).is_some() {
                    bosses.damage_enemy(id, amount)
                } else {
                    enemies.damage_enemy(id, amount)
                }
            },
            ledger,
            out,
        );
        self.bosses.drain_events(out);
        self.bosses.release_minions(&mut self.enemies, out);

        self.departures.clear();
        self.enemies.cleanup(&mut self.departures);
        self.bosses.cleanup(&mut self.departures);
        self.waves
            .record_departures(&self.departures, &mut self.ledger, out);

        if self.ledger.is_depleted() {
            self.game_over = true;
            let wave = self.waves.current_wave();
            tracing::warn!(wave, "all lives lost");
            out.push(Event::GameOver { wave });
            return;
        }

        self.waves
            .update(now, &self.world, &mut self.enemies, &mut self.bosses, out);
    }

    /// Applies a player command, reporting the outcome as events.
    pub fn apply(&mut self, command: Command, out: &mut Vec<Event>) {
        match command {
            Command::PlaceTower { kind, tile } => match self.try_place_tower(kind, tile) {
                Ok(tower) => out.push(Event::TowerPlaced { tower, kind, tile }),
                Err(reason) => out.push(Event::TowerPlacementRejected { kind, tile, reason }),
            },
            Command::UpgradeTower { tile } => match self.try_upgrade_tower(tile) {
                Ok((tower, level)) => out.push(Event::TowerUpgraded { tower, level }),
                Err(reason) => out.push(Event::TowerUpgradeRejected { tile, reason }),
            },
            Command::RemoveTower { tile } => match self.try_remove_tower(tile) {
                Ok((tower, refund)) => out.push(Event::TowerRemoved { tower, refund }),
                Err(reason) => out.push(Event::TowerRemovalRejected { tile, reason }),
            },
            Command::StartWaveNow => {
                let _ = self.start_wave_now(out);
            }
            Command::SkipWave => {
                let _ = self.skip_wave(out);
            }
            Command::Reset => self.reset(out),
        }
    }

    /// Builds a tower and pays for it.
    pub fn try_place_tower(
        &mut self,
        kind: TowerKind,
        tile: TileCoord,
    ) -> Result<TowerId, PlacementError> {
        let placement =
            self.combat
                .try_place_tower(&mut self.world, kind, tile, self.ledger.coins())?;
        self.ledger.spend(placement.cost);
        Ok(placement.tower)
    }

    /// Upgrades the tower on `tile`, returning it and its new level.
    pub fn try_upgrade_tower(&mut self, tile: TileCoord) -> Result<(TowerId, u8), UpgradeError> {
        let upgrade = self
            .combat
            .try_upgrade_tower(&self.world, tile, self.ledger.coins())?;
        self.ledger.spend(upgrade.cost);
        Ok((upgrade.tower, upgrade.level))
    }

    /// Upgrade preview for the tower on `tile`.
    #[must_use]
    pub fn tower_upgrade_info(&self, tile: TileCoord) -> Option<UpgradeInfo> {
        self.combat.tower_upgrade_info(&self.world, tile)
    }

    /// Sells the tower on `tile`, returning it and the refund.
    pub fn try_remove_tower(&mut self, tile: TileCoord) -> Result<(TowerId, u32), RemovalError> {
        let removal = self.combat.try_remove_tower(&mut self.world, tile)?;
        rampart_core::RewardSink::credit(&mut self.ledger, removal.refund);
        Ok((removal.tower, removal.refund))
    }

    /// Ends the preparation phase early.
    pub fn start_wave_now(&mut self, out: &mut Vec<Event>) -> bool {
        self.waves.start_wave_now(self.clock.now(), out)
    }

    /// Forces the active wave to complete.
    pub fn skip_wave(&mut self, out: &mut Vec<Event>) -> bool {
        self.waves.skip_wave(self.clock.now(), out)
    }

    /// Clears every enemy, tower and projectile and restarts from wave one.
    pub fn reset(&mut self, out: &mut Vec<Event>) {
        self.enemies.clear();
        self.bosses.clear();
        self.combat.clear();
        self.enemy_ids.restart();
        self.world.clear_towers();
        self.ledger = Ledger::new(&self.config.economy);
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.waves.reset(self.clock.now());
        self.game_over = false;
        tracing::info!("simulation reset");
        out.push(Event::SimulationReset);
    }

    /// Live enemies: regular ones in spawn order, then bosses.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        let mut view = self.enemies.snapshot();
        view.extend(self.bosses.snapshot());
        view
    }

    /// Every placed tower.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        self.combat.towers()
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        self.combat.projectiles()
    }

    /// HUD summary of the current wave.
    #[must_use]
    pub fn wave_info(&self) -> WaveInfo {
        let alive = self.enemies.alive_count() + self.bosses.alive_count();
        self.waves.wave_info(self.clock.now(), alive)
    }

    /// Coins and lives.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Grid layout and enemy path.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether the player ran out of lives.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }
}
