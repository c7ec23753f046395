#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart engine.
//!
//! This crate defines the vocabulary that connects the authoritative
//! registries, the pure systems and the adapters. Adapters submit
//! [`Command`] values describing desired mutations, the simulation executes
//! them between ticks, and every observable change is broadcast as an
//! [`Event`] for renderers and audio to react to. Read-only views such as
//! [`EnemyView`] are the only way systems observe entities owned elsewhere;
//! cross-tick references are always ids, never borrowed entities.

use std::{cell::Cell, rc::Rc, sync::Arc, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod config;
pub mod error;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{
    BossAbilities, BossCatalog, BossDefinition, EconomyConfig, EnemyCatalog, EnemyStats,
    FormationStyle, FormationTable, GameConfig, GridConfig, RegenerationAbility, ShieldAbility,
    SpawnGroup, SpeedBoostAbility, SplitAbility, TowerCatalog, TowerStats, UpgradeTuning,
    WaveConfig, WavePattern,
};
pub use error::{ConfigError, PlacementError, RemovalError, UpgradeError};

/// Every n-th wave is a boss wave.
pub const BOSS_WAVE_PERIOD: u32 = 5;

/// Chance per tick that an off-cooldown shield activates.
pub const SHIELD_ACTIVATION_CHANCE: f64 = 0.30;

/// Chance per tick that an off-cooldown speed boost activates.
pub const SPEED_BOOST_ACTIVATION_CHANCE: f64 = 0.25;

/// Remaining distance under which a projectile counts as arrived.
pub const PROJECTILE_ARRIVAL_EPSILON: f32 = 5.0;

/// Reports whether the provided wave number is a boss wave.
#[must_use]
pub const fn is_boss_wave(wave: u32) -> bool {
    wave != 0 && wave % BOSS_WAVE_PERIOD == 0
}

/// Lives lost when a regular enemy reaches the goal.
pub const GOAL_PENALTY: u32 = 1;

/// Lives lost when a boss reaches the goal during the provided wave.
///
/// Before the first boss wave a boss costs no more than a regular enemy.
#[must_use]
pub const fn boss_goal_penalty(wave: u32) -> u32 {
    if wave >= 15 {
        5
    } else if wave >= 10 {
        4
    } else if wave >= 5 {
        3
    } else {
        GOAL_PENALTY
    }
}

/// Identifier assigned to an enemy, unique within one [`EnemyIdAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates an identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Sequence of enemy identifiers starting at 1.
///
/// Clones share the sequence, so registries holding clones of one allocator
/// never hand out the same id twice.
#[derive(Clone, Debug, Default)]
pub struct EnemyIdAllocator {
    last: Rc<Cell<u32>>,
}

impl EnemyIdAllocator {
    /// Creates a sequence whose first identifier is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next identifier.
    #[must_use]
    pub fn allocate(&self) -> EnemyId {
        let id = self.last.get().wrapping_add(1).max(1);
        self.last.set(id);
        EnemyId(id)
    }

    /// Restarts the sequence at 1 for every clone.
    pub fn restart(&self) {
        self.last.set(0);
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether `other` shares an edge with this tile.
    #[must_use]
    pub fn is_adjacent(self, other: TileCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn center(self, tile_size: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * tile_size,
            (self.row as f32 + 0.5) * tile_size,
        )
    }
}

/// Visual appearance applied to enemies and towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
        }
    }
}

fn lighten_channel(channel: u8, amount: f32) -> u8 {
    let channel = f32::from(channel);
    (channel + (255.0 - channel) * amount).round().clamp(0.0, 255.0) as u8
}

/// Regular enemy kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Balanced baseline enemy.
    Basic,
    /// Fragile, quick enemy.
    Fast,
    /// Slow, durable enemy.
    Tank,
}

/// Boss kinds appended to boss waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    /// Shielded, regenerating boss.
    Guardian,
    /// Sprinting boss that splits on death.
    Juggernaut,
}

/// Distinguishes regular enemies from bosses in snapshots and directives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyClass {
    /// A regular enemy of the given kind.
    Regular(EnemyKind),
    /// A boss of the given kind.
    Boss(BossKind),
}

impl EnemyClass {
    /// Reports whether the class is a boss.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        matches!(self, Self::Boss(_))
    }
}

/// Intra-group spacing pattern for a spawn group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formation {
    /// One enemy per global spawn interval.
    Single,
    /// Members strung out one after another.
    Line,
    /// Arrowhead behind a leader.
    Wedge,
    /// Tight ranks.
    Phalanx,
    /// Loose cloud.
    Swarm,
}

/// Immutable stat snapshot copied into an enemy when it spawns.
///
/// Templates are plain values: scaling produces a new template and never
/// touches the catalog it was copied from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTemplate {
    /// Kind of enemy described by the template.
    pub class: EnemyClass,
    /// Maximum and starting health.
    pub health: f32,
    /// Movement speed in path segments per second.
    pub speed: f32,
    /// Coins credited once on death.
    pub reward: u32,
    /// Radius in world units.
    pub size: f32,
    /// Appearance.
    pub color: Rgb,
}

impl EnemyTemplate {
    /// Copies a stat block into a template of the provided class.
    #[must_use]
    pub const fn from_stats(class: EnemyClass, stats: EnemyStats) -> Self {
        Self {
            class,
            health: stats.health,
            speed: stats.speed,
            reward: stats.reward,
            size: stats.size,
            color: stats.color,
        }
    }
}

/// Slot an enemy occupies inside its spawn formation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationSlot {
    /// Formation the enemy spawned in.
    pub formation: Formation,
    /// Position within the group.
    pub index: u32,
    /// Presentation offset from the enemy's path position.
    pub offset: Vec2,
    /// How tightly the member keeps its slot.
    pub cohesion: f32,
    /// Multiplier applied to the member's movement speed.
    pub speed_multiplier: f32,
}

/// Phase of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePhase {
    /// Countdown before spawning begins.
    Preparation,
    /// Spawn queue is being drained.
    Spawning,
    /// Every enemy has spawned; waiting for the field to clear.
    Active,
    /// Field is clear; waiting before the next preparation.
    Complete,
}

impl WavePhase {
    /// Phase that follows this one in the fixed cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Preparation => Self::Spawning,
            Self::Spawning => Self::Active,
            Self::Active => Self::Complete,
            Self::Complete => Self::Preparation,
        }
    }
}

/// Timed boss abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossAbility {
    /// Damage immunity.
    Shield,
    /// Temporary speed multiplier.
    SpeedBoost,
    /// Periodic healing.
    Regeneration,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// General-purpose tower.
    Basic,
    /// Long range, slow, heavy hitting tower.
    Sniper,
    /// Short range, fast firing tower.
    Rapid,
}

/// Why an enemy left the active set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepartureCause {
    /// Health reached zero.
    Killed,
    /// The enemy walked off the end of the path.
    ReachedGoal,
}

/// Record of an enemy removed from a registry by a cleanup pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Departure {
    /// Enemy that left.
    pub enemy: EnemyId,
    /// Kind of enemy that left.
    pub class: EnemyClass,
    /// Why it left.
    pub cause: DepartureCause,
    /// Last known position.
    pub position: Vec2,
}

/// Commands that express all permissible player-driven mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Requests construction of a tower on a tile.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Tile that receives the tower.
        tile: TileCoord,
    },
    /// Requests an upgrade of the tower standing on a tile.
    UpgradeTower {
        /// Tile that holds the tower.
        tile: TileCoord,
    },
    /// Requests removal of the tower standing on a tile.
    RemoveTower {
        /// Tile that holds the tower.
        tile: TileCoord,
    },
    /// Ends the preparation countdown immediately.
    StartWaveNow,
    /// Forces the active wave to complete.
    SkipWave,
    /// Clears every enemy, tower and projectile and restarts at wave one.
    Reset,
}

/// Events broadcast by the engine after processing commands or ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The wave state machine entered a new phase.
    WavePhaseChanged {
        /// Wave the phase belongs to.
        wave: u32,
        /// Phase that became active.
        phase: WavePhase,
    },
    /// One of the final preparation seconds elapsed.
    CountdownCue {
        /// Wave about to start.
        wave: u32,
        /// Whole seconds left before spawning.
        seconds_remaining: u64,
    },
    /// The active wave was forced to complete.
    WaveSkipped {
        /// Wave that was skipped.
        wave: u32,
    },
    /// An enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy.
        class: EnemyClass,
        /// Spawn position.
        position: Vec2,
    },
    /// An enemy died.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Position where it died.
        position: Vec2,
    },
    /// An enemy reached the end of the path.
    EnemyReachedGoal {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives charged for the escape.
        lives_lost: u32,
    },
    /// A boss ability switched on.
    BossAbilityActivated {
        /// Boss that activated the ability.
        enemy: EnemyId,
        /// Ability that activated.
        ability: BossAbility,
    },
    /// A boss ability ran out.
    BossAbilityExpired {
        /// Boss whose ability expired.
        enemy: EnemyId,
        /// Ability that expired.
        ability: BossAbility,
    },
    /// A shield absorbed a hit.
    DamageBlocked {
        /// Shielded boss.
        enemy: EnemyId,
    },
    /// A dead boss released minions.
    BossSplit {
        /// Boss that split.
        boss: EnemyId,
        /// Minions that were spawned.
        minions: Vec<EnemyId>,
    },
    /// A tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Projectile that was launched.
        projectile: ProjectileId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// A projectile arrived but its target was gone.
    ProjectileMissed {
        /// Projectile that missed.
        projectile: ProjectileId,
    },
    /// A kill credited coins.
    RewardEarned {
        /// Coins credited.
        amount: u32,
        /// Position of the enemy when it died.
        position: Vec2,
    },
    /// A tower was constructed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower.
        kind: TowerKind,
        /// Tile the tower occupies.
        tile: TileCoord,
    },
    /// A placement request was rejected.
    TowerPlacementRejected {
        /// Type requested.
        kind: TowerKind,
        /// Tile requested.
        tile: TileCoord,
        /// Reason for the rejection.
        reason: PlacementError,
    },
    /// A tower gained a level.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// New level.
        level: u8,
    },
    /// An upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tile requested.
        tile: TileCoord,
        /// Reason for the rejection.
        reason: UpgradeError,
    },
    /// A tower was removed.
    TowerRemoved {
        /// Tower that was removed.
        tower: TowerId,
        /// Coins refunded.
        refund: u32,
    },
    /// A removal request was rejected.
    TowerRemovalRejected {
        /// Tile requested.
        tile: TileCoord,
        /// Reason for the rejection.
        reason: RemovalError,
    },
    /// The simulation was reset to its initial state.
    SimulationReset,
    /// The last life was lost.
    GameOver {
        /// Wave during which the game ended.
        wave: u32,
    },
}

/// Provides the enemy path and tile buildability.
pub trait PathProvider {
    /// Ordered, orthogonally adjacent tiles from spawn to goal.
    fn enemy_path(&self) -> &[TileCoord];

    /// World-space centres of [`PathProvider::enemy_path`], shared by every
    /// enemy walking it.
    fn path_points(&self) -> Arc<[Vec2]>;

    /// Reports whether the tile belongs to the enemy path.
    fn is_on_enemy_path(&self, tile: TileCoord) -> bool;

    /// Explains why a tower cannot be built on the tile, if it cannot.
    fn placement_error(&self, tile: TileCoord) -> Option<PlacementError>;

    /// Reports whether a tower may be built on the tile right now.
    fn can_place_tower(&self, tile: TileCoord) -> bool {
        self.placement_error(tile).is_none()
    }
}

/// Tile occupancy written by tower placement and removal.
pub trait TowerSites: PathProvider {
    /// World-space centre of the tile.
    fn tile_center(&self, tile: TileCoord) -> Vec2;

    /// Tower standing on the tile, if any.
    fn tower_at(&self, tile: TileCoord) -> Option<TowerId>;

    /// Marks the tile as occupied, refusing tiles that cannot be built on.
    fn occupy(&mut self, tile: TileCoord, tower: TowerId) -> Result<(), PlacementError>;

    /// Frees the tile, returning the tower that stood on it.
    fn vacate(&mut self, tile: TileCoord) -> Option<TowerId>;
}

/// Receives coin credits and life losses produced by the simulation.
pub trait RewardSink {
    /// Adds coins earned from a kill.
    fn credit(&mut self, coins: u32);

    /// Records lives lost to enemies reaching the goal.
    fn lose_lives(&mut self, lives: u32);
}

/// Transient presentation effect attached to a boss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualEffect {
    /// What the effect depicts.
    pub kind: VisualEffectKind,
    /// Accumulated frame time since the effect started.
    pub age: Duration,
    /// Total frame time the effect lives for.
    pub lifetime: Duration,
}

impl VisualEffect {
    /// Fraction of the lifetime already elapsed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.lifetime.is_zero() {
            return 1.0;
        }
        (self.age.as_secs_f32() / self.lifetime.as_secs_f32()).min(1.0)
    }
}

/// Kinds of boss visual effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualEffectKind {
    /// Shield raised.
    ShieldUp,
    /// A hit bounced off the shield.
    ShieldHit,
    /// Speed boost started.
    SpeedBurst,
    /// Health restored.
    Heal,
}

/// Boss specific state exposed to presentation.
#[derive(Clone, Debug, PartialEq)]
pub struct BossStatus {
    /// Boss kind.
    pub kind: BossKind,
    /// Whether the shield is currently up.
    pub shielded: bool,
    /// Whether the speed boost is currently active.
    pub boosted: bool,
    /// Effects currently playing.
    pub effects: Vec<VisualEffect>,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub class: EnemyClass,
    /// Position in world units.
    pub position: Vec2,
    /// Index of the path node the enemy last passed.
    pub path_index: usize,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Current movement speed.
    pub speed: f32,
    /// Radius in world units.
    pub size: f32,
    /// Appearance.
    pub color: Rgb,
    /// Formation slot, if the enemy spawned in one.
    pub formation: Option<FormationSlot>,
    /// Boss state, if the enemy is a boss.
    pub boss: Option<BossStatus>,
}

/// Read-only snapshot of the live enemies in registry order.
///
/// Order is significant: target acquisition breaks distance ties in favour of
/// the first snapshot encountered.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new view from snapshots, preserving their order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a live enemy by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of live enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Appends the snapshots of another view after this one's.
    pub fn extend(&mut self, other: EnemyView) {
        self.snapshots.extend(other.snapshots);
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower.
    pub id: TowerId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Tile the tower occupies.
    pub tile: TileCoord,
    /// World-space centre of the tower.
    pub position: Vec2,
    /// Upgrade level, starting at one.
    pub level: u8,
    /// Damage per projectile.
    pub damage: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum time between shots.
    pub fire_rate: Duration,
    /// Enemy currently targeted.
    pub target: Option<EnemyId>,
    /// Radius in world units.
    pub size: f32,
    /// Appearance.
    pub color: Rgb,
}

/// Read-only snapshot describing all towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Current position.
    pub position: Vec2,
    /// Point the projectile was aimed at when fired.
    pub aim: Vec2,
    /// Enemy the projectile was fired at.
    pub target: EnemyId,
    /// Damage applied on arrival.
    pub damage: f32,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Summary of the wave state for the HUD.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveInfo {
    /// Current wave number, starting at one.
    pub current_wave: u32,
    /// Current phase.
    pub phase: WavePhase,
    /// Live regular and boss enemies.
    pub enemies_alive: usize,
    /// Directives fired so far this wave.
    pub enemies_spawned: u32,
    /// Directives queued for this wave.
    pub total_enemies: u32,
    /// Banner text shown during preparation.
    pub announcement: Option<String>,
}

/// Read-only preview of the next upgrade for a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeInfo {
    /// Tower the preview describes.
    pub tower: TowerId,
    /// Current level.
    pub level: u8,
    /// Highest reachable level.
    pub max_level: u8,
    /// Cost of the next level, if one exists.
    pub cost: Option<u32>,
    /// Damage after upgrading.
    pub next_damage: f32,
    /// Range after upgrading.
    pub next_range: f32,
    /// Fire interval after upgrading.
    pub next_fire_rate: Duration,
}

impl UpgradeInfo {
    /// Reports whether another level is available.
    #[must_use]
    pub const fn can_upgrade(&self) -> bool {
        self.cost.is_some()
    }
}
