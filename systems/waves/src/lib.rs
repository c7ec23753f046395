#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave phase state machine and spawn scheduling.
//!
//! [`WaveDirector`] cycles every wave through preparation, spawning, active
//! and complete. It owns the wave's spawn queue, fires directives into the
//! enemy and boss registries as they fall due, and charges lives for enemies
//! that reach the goal.

use std::{collections::VecDeque, time::Duration};

use rampart_core::{
    boss_goal_penalty, BossCatalog, Departure, DepartureCause, EnemyCatalog, EnemyClass,
    EnemyKind, Event, GameConfig, PathProvider, RewardSink, WaveConfig, WaveInfo, WavePhase,
    GOAL_PENALTY,
};
use rampart_system_enemies::{BossDirector, EnemyRegistry, SpawnPoint};

mod announcement;
mod schedule;

pub use announcement::announcement;
pub use schedule::{SpawnDirective, WaveScaling};

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Debug)]
pub struct Config {
    waves: WaveConfig,
    enemies: EnemyCatalog,
    bosses: BossCatalog,
}

impl Config {
    /// Creates a new configuration from its parts.
    #[must_use]
    pub const fn new(waves: WaveConfig, enemies: EnemyCatalog, bosses: BossCatalog) -> Self {
        Self {
            waves,
            enemies,
            bosses,
        }
    }

    /// Extracts the wave-related sections of a game configuration.
    #[must_use]
    pub fn from_game(config: &GameConfig) -> Self {
        Self::new(config.waves.clone(), config.enemies, config.bosses)
    }
}

/// Drives the wave lifecycle.
#[derive(Clone, Debug)]
pub struct WaveDirector {
    config: Config,
    current_wave: u32,
    phase: WavePhase,
    phase_started: Duration,
    wave_started: Duration,
    schedule_shift: Duration,
    queue: VecDeque<SpawnDirective>,
    spawned: u32,
    total: u32,
    last_spawn: Option<Duration>,
    last_cue: Option<u64>,
}

impl WaveDirector {
    /// Creates a director preparing the first wave.
    #[must_use]
    pub fn new(config: Config, now: Duration) -> Self {
        Self::starting_at(config, 1, now)
    }

    /// Creates a director preparing an arbitrary wave.
    #[must_use]
    pub fn starting_at(config: Config, wave: u32, now: Duration) -> Self {
        let mut director = Self {
            config,
            current_wave: wave.max(1),
            phase: WavePhase::Preparation,
            phase_started: now,
            wave_started: now,
            schedule_shift: Duration::ZERO,
            queue: VecDeque::new(),
            spawned: 0,
            total: 0,
            last_spawn: None,
            last_cue: None,
        };
        director.begin_wave(now);
        director
    }

    /// Wave currently being prepared or played.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Current phase of the wave.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Directives fired so far this wave.
    #[must_use]
    pub const fn enemies_spawned(&self) -> u32 {
        self.spawned
    }

    /// Directives scheduled for this wave.
    #[must_use]
    pub const fn total_enemies(&self) -> u32 {
        self.total
    }

    /// Directives not fired yet, in firing order.
    pub fn pending(&self) -> impl Iterator<Item = &SpawnDirective> {
        self.queue.iter()
    }

    /// Advances the state machine by one tick.
    ///
    /// Must run after combat and departure cleanup so the active phase sees
    /// the alive counts left by this tick's kills.
    pub fn update<P>(
        &mut self,
        now: Duration,
        path: &P,
        regular: &mut EnemyRegistry,
        bosses: &mut BossDirector,
        out: &mut Vec<Event>,
    ) where
        P: PathProvider + ?Sized,
    {
        match self.phase {
            WavePhase::Preparation => {
                let preparation = self.config.waves.preparation();
                let elapsed = now.saturating_sub(self.phase_started);
                if elapsed >= preparation {
                    self.enter(WavePhase::Spawning, now, out);
                } else {
                    self.countdown(preparation - elapsed, out);
                }
            }
            WavePhase::Spawning => {
                self.spawn_due(now, path, regular, bosses, out);
                if self.spawned >= self.total {
                    self.enter(WavePhase::Active, now, out);
                }
            }
            WavePhase::Active => {
                if regular.alive_count() + bosses.alive_count() == 0 {
                    self.enter(WavePhase::Complete, now, out);
                }
            }
            WavePhase::Complete => {
                if now.saturating_sub(self.phase_started) >= self.config.waves.complete_delay() {
                    regular.clear();
                    bosses.clear();
                    self.current_wave += 1;
                    self.begin_wave(now);
                    self.enter(WavePhase::Preparation, now, out);
                }
            }
        }
    }

    /// Forces an active wave to complete; the usual delay still applies
    /// before the next wave prepares.
    pub fn skip_wave(&mut self, now: Duration, out: &mut Vec<Event>) -> bool {
        if self.phase != WavePhase::Active {
            return false;
        }
        tracing::info!(wave = self.current_wave, "wave skipped");
        out.push(Event::WaveSkipped {
            wave: self.current_wave,
        });
        self.enter(WavePhase::Complete, now, out);
        true
    }

    /// Cuts the preparation phase short and starts spawning immediately.
    ///
    /// Directive times are shifted so the first spawn is due on the next tick.
    pub fn start_wave_now(&mut self, now: Duration, out: &mut Vec<Event>) -> bool {
        if self.phase != WavePhase::Preparation {
            return false;
        }
        let elapsed = now.saturating_sub(self.phase_started);
        self.schedule_shift = self.config.waves.preparation().saturating_sub(elapsed);
        self.enter(WavePhase::Spawning, now, out);
        true
    }

    /// Returns to the preparation of wave one.
    pub fn reset(&mut self, now: Duration) {
        self.current_wave = 1;
        self.phase = WavePhase::Preparation;
        self.phase_started = now;
        self.begin_wave(now);
    }

    /// Lives lost when an enemy of `class` reaches the goal this wave.
    #[must_use]
    pub const fn goal_penalty(&self, class: EnemyClass) -> u32 {
        if class.is_boss() {
            boss_goal_penalty(self.current_wave)
        } else {
            GOAL_PENALTY
        }
    }

    /// Reports departures and charges lives for enemies that reached the goal.
    ///
    /// Kill rewards are credited by combat, so only the goal loss is written
    /// to the sink here.
    pub fn record_departures<S>(
        &self,
        departures: &[Departure],
        sink: &mut S,
        out: &mut Vec<Event>,
    ) where
        S: RewardSink + ?Sized,
    {
        for departure in departures {
            match departure.cause {
                DepartureCause::Killed => {
                    tracing::debug!(enemy = departure.enemy.get(), "enemy killed");
                    out.push(Event::EnemyKilled {
                        enemy: departure.enemy,
                        position: departure.position,
                    });
                }
                DepartureCause::ReachedGoal => {
                    let lives_lost = self.goal_penalty(departure.class);
                    sink.lose_lives(lives_lost);
                    tracing::debug!(
                        enemy = departure.enemy.get(),
                        lives_lost,
                        "enemy reached goal"
                    );
                    out.push(Event::EnemyReachedGoal {
                        enemy: departure.enemy,
                        lives_lost,
                    });
                }
            }
        }
    }

    /// Summary for the HUD.
    #[must_use]
    pub fn wave_info(&self, now: Duration, enemies_alive: usize) -> WaveInfo {
        let announcement = (self.phase == WavePhase::Preparation).then(|| {
            let remaining = self
                .config
                .waves
                .preparation()
                .saturating_sub(now.saturating_sub(self.phase_started));
            announcement(
                self.current_wave,
                schedule::boss_for(&self.config.waves, self.current_wave),
                remaining,
            )
        });
        WaveInfo {
            current_wave: self.current_wave,
            phase: self.phase,
            enemies_alive,
            enemies_spawned: self.spawned,
            total_enemies: self.total,
            announcement,
        }
    }

    fn begin_wave(&mut self, now: Duration) {
        self.wave_started = now;
        self.schedule_shift = Duration::ZERO;
        self.queue = schedule::build_queue(
            &self.config.waves,
            &self.config.enemies,
            &self.config.bosses,
            self.current_wave,
        )
        .into();
        self.spawned = 0;
        self.total = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
        self.last_spawn = None;
        self.last_cue = None;
    }

    fn enter(&mut self, phase: WavePhase, now: Duration, out: &mut Vec<Event>) {
        self.phase = phase;
        self.phase_started = now;
        tracing::info!(wave = self.current_wave, ?phase, "wave phase changed");
        out.push(Event::WavePhaseChanged {
            wave: self.current_wave,
            phase,
        });
    }

    fn countdown(&mut self, remaining: Duration, out: &mut Vec<Event>) {
        let seconds = announcement::seconds_remaining(remaining);
        if seconds == 0 || seconds > self.config.waves.countdown_cue_secs {
            return;
        }
        if self.last_cue != Some(seconds) {
            self.last_cue = Some(seconds);
            out.push(Event::CountdownCue {
                wave: self.current_wave,
                seconds_remaining: seconds,
            });
        }
    }

    /// Fires the next directive once it is due and the wave's spawn interval
    /// has passed since the previous spawn.
    fn spawn_due<P>(
        &mut self,
        now: Duration,
        path: &P,
        regular: &mut EnemyRegistry,
        bosses: &mut BossDirector,
        out: &mut Vec<Event>,
    ) where
        P: PathProvider + ?Sized,
    {
        let points = path.path_points();
        if points.is_empty() {
            return;
        }
        let scaling = WaveScaling::new(&self.config.waves, self.current_wave);
        if self
            .last_spawn
            .is_some_and(|last| now.saturating_sub(last) < scaling.spawn_interval())
        {
            return;
        }
        let elapsed = now.saturating_sub(self.wave_started) + self.schedule_shift;
        if !self
            .queue
            .front()
            .is_some_and(|directive| directive.scheduled <= elapsed)
        {
            return;
        }
        let Some(directive) = self.queue.pop_front() else {
            return;
        };

        let spawn = SpawnPoint::path_start(points).with_formation(directive.slot);
        let position = spawn.position;
        let enemy = match directive.boss {
            Some(kind) => bosses.spawn_boss(
                kind,
                directive.template,
                self.config.bosses.definition(kind).abilities,
                scaling.scale(self.config.enemies.template(EnemyKind::Basic)),
                spawn,
                now,
            ),
            None => regular.spawn(directive.template, spawn),
        };
        self.spawned += 1;
        self.last_spawn = Some(now);
        tracing::debug!(
            enemy = enemy.get(),
            wave = self.current_wave,
            spawned = self.spawned,
            total = self.total,
            "enemy spawned"
        );
        out.push(Event::EnemySpawned {
            enemy,
            class: directive.template.class,
            position,
        });
    }
}
