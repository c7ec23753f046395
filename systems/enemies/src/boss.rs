//! Boss layer composed over an [`EnemyRegistry`].
//!
//! Ability windows (shield, speed boost, regeneration) are gated on the
//! monotonic clock passed as `now`. Visual effects age by the frame `dt`
//! instead, so a stalled frame stretches an effect but never an ability.

use std::{collections::BTreeMap, f32::consts::TAU, sync::Arc, time::Duration};

use glam::Vec2;
use rampart_core::{
    BossAbilities, BossAbility, BossKind, BossStatus, Departure, EnemyClass, EnemyId,
    EnemyIdAllocator, EnemyKind, EnemyTemplate, EnemyView, Event, SplitAbility, VisualEffect,
    VisualEffectKind, SHIELD_ACTIVATION_CHANCE, SPEED_BOOST_ACTIVATION_CHANCE,
};
use rand::Rng;

use crate::{EnemyRegistry, SpawnPoint, Strike};

const SHIELD_UP_EFFECT: Duration = Duration::from_millis(600);
const SHIELD_HIT_EFFECT: Duration = Duration::from_millis(250);
const SPEED_BURST_EFFECT: Duration = Duration::from_millis(500);
const HEAL_EFFECT: Duration = Duration::from_millis(400);

/// Owns boss enemies and drives their abilities.
#[derive(Clone, Debug, Default)]
pub struct BossDirector {
    registry: EnemyRegistry,
    bosses: BTreeMap<EnemyId, BossState>,
    pending_splits: Vec<PendingSplit>,
    events: Vec<Event>,
}

impl BossDirector {
    /// Creates an empty director.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty director drawing boss ids from a shared sequence.
    ///
    /// Share the sequence with the registry receiving split minions so an
    /// id always names one enemy.
    #[must_use]
    pub fn with_ids(ids: EnemyIdAllocator) -> Self {
        Self {
            registry: EnemyRegistry::with_ids(ids),
            ..Self::default()
        }
    }

    /// Spawns a boss.
    ///
    /// `minion_template` is the regular enemy released by a split ability; it
    /// is captured now so later config or wave changes cannot affect it.
    pub fn spawn_boss(
        &mut self,
        kind: BossKind,
        template: EnemyTemplate,
        abilities: BossAbilities,
        minion_template: EnemyTemplate,
        spawn: SpawnPoint,
        now: Duration,
    ) -> EnemyId {
        let id = self.registry.spawn(template, spawn);
        let _ = self.bosses.insert(
            id,
            BossState {
                kind,
                abilities,
                minion_template,
                shield: AbilityWindow::ready_from(now),
                speed_boost: AbilityWindow::ready_from(now),
                last_regeneration: now,
                effects: Vec::new(),
            },
        );
        id
    }

    /// Runs ability timers, ages effects and moves every boss.
    pub fn update<R>(&mut self, now: Duration, dt: Duration, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let Self {
            registry,
            bosses,
            events,
            ..
        } = self;

        for (&id, state) in bosses.iter_mut() {
            state.age_effects(dt);

            let Some(enemy) = registry.get(id).filter(|enemy| enemy.is_active()) else {
                continue;
            };
            let base_speed = enemy.template().speed;

            if let Some(shield) = state.abilities.shield {
                let window = &mut state.shield;
                if window.expire(now) {
                    events.push(Event::BossAbilityExpired {
                        enemy: id,
                        ability: BossAbility::Shield,
                    });
                } else if window.ready(now, shield.cooldown_ms)
                    && rng.gen_bool(SHIELD_ACTIVATION_CHANCE)
                {
                    window.activate(now, Duration::from_millis(shield.duration_ms));
                    state.effects.push(effect(VisualEffectKind::ShieldUp, SHIELD_UP_EFFECT));
                    tracing::debug!(enemy = id.get(), "boss shield raised");
                    events.push(Event::BossAbilityActivated {
                        enemy: id,
                        ability: BossAbility::Shield,
                    });
                }
            }

            if let Some(boost) = state.abilities.speed_boost {
                let window = &mut state.speed_boost;
                if window.expire(now) {
                    registry.set_speed(id, base_speed);
                    events.push(Event::BossAbilityExpired {
                        enemy: id,
                        ability: BossAbility::SpeedBoost,
                    });
                } else if window.ready(now, boost.cooldown_ms)
                    && rng.gen_bool(SPEED_BOOST_ACTIVATION_CHANCE)
                {
                    window.activate(now, Duration::from_millis(boost.duration_ms));
                    registry.set_speed(id, base_speed * boost.multiplier);
                    state.effects.push(effect(VisualEffectKind::SpeedBurst, SPEED_BURST_EFFECT));
                    tracing::debug!(enemy = id.get(), "boss speed boost triggered");
                    events.push(Event::BossAbilityActivated {
                        enemy: id,
                        ability: BossAbility::SpeedBoost,
                    });
                }
            }

            if let Some(regeneration) = state.abilities.regeneration {
                let interval = Duration::from_millis(regeneration.interval_ms);
                if now.saturating_sub(state.last_regeneration) >= interval {
                    state.last_regeneration = now;
                    if registry.heal(id, regeneration.amount) > 0.0 {
                        state.effects.push(effect(VisualEffectKind::Heal, HEAL_EFFECT));
                    }
                }
            }
        }

        registry.update(dt);
    }

    /// Reports whether a hit on the enemy should reduce its health.
    ///
    /// Only a raised shield refuses damage; ids this director does not know
    /// are not shielded.
    #[must_use]
    pub fn should_take_damage(&self, id: EnemyId) -> bool {
        self.bosses.get(&id).map_or(true, |state| !state.shield.active)
    }

    /// Applies damage through the shield gate and returns the kill reward.
    ///
    /// A killing blow on a boss with a split ability queues its minions for
    /// [`BossDirector::release_minions`].
    pub fn damage_enemy(&mut self, id: EnemyId, amount: f32) -> u32 {
        if !self.should_take_damage(id) {
            if let Some(state) = self.bosses.get_mut(&id) {
                state.effects.push(effect(VisualEffectKind::ShieldHit, SHIELD_HIT_EFFECT));
            }
            self.events.push(Event::DamageBlocked { enemy: id });
            return 0;
        }

        match self.registry.strike(id, amount) {
            Strike::Killed { reward } => {
                self.queue_split(id);
                reward
            }
            Strike::Ignored | Strike::Wounded => 0,
        }
    }

    fn queue_split(&mut self, id: EnemyId) {
        let Some(state) = self.bosses.get(&id) else {
            return;
        };
        let Some(split) = state.abilities.split else {
            return;
        };
        let Some(enemy) = self.registry.get(id) else {
            return;
        };
        self.pending_splits.push(PendingSplit {
            boss: id,
            split,
            minion: minion_template(state.minion_template, split),
            position: enemy.position(),
            path: Arc::clone(&enemy.path),
            path_index: enemy.path_index(),
        });
    }

    /// Spawns the minions of bosses killed since the last call.
    ///
    /// Minions are regular enemies, so they go into the provided registry,
    /// arranged on a circle around the boss and resuming from its path node.
    pub fn release_minions(&mut self, regular: &mut EnemyRegistry, out_events: &mut Vec<Event>) {
        for pending in self.pending_splits.drain(..) {
            let count = pending.split.count;
            let mut minions = Vec::with_capacity(count as usize);
            for index in 0..count {
                let angle = TAU * index as f32 / count as f32;
                let offset = Vec2::new(angle.cos(), angle.sin()) * pending.split.radius;
                let id = regular.spawn(
                    pending.minion,
                    SpawnPoint {
                        position: pending.position + offset,
                        path: Arc::clone(&pending.path),
                        path_index: pending.path_index,
                        formation: None,
                    },
                );
                out_events.push(Event::EnemySpawned {
                    enemy: id,
                    class: pending.minion.class,
                    position: pending.position + offset,
                });
                minions.push(id);
            }
            tracing::debug!(boss = pending.boss.get(), minions = minions.len(), "boss split");
            out_events.push(Event::BossSplit {
                boss: pending.boss,
                minions,
            });
        }
    }

    /// Moves buffered ability events into `out`.
    pub fn drain_events(&mut self, out: &mut Vec<Event>) {
        out.append(&mut self.events);
    }

    /// Number of bosses alive and still walking.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.registry.alive_count()
    }

    /// Captures live bosses, including their ability state.
    #[must_use]
    pub fn snapshot(&self) -> EnemyView {
        let snapshots = self
            .registry
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|mut snapshot| {
                snapshot.boss = self.status(snapshot.id);
                snapshot
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Ability state of a boss, if the id belongs to one.
    #[must_use]
    pub fn status(&self, id: EnemyId) -> Option<BossStatus> {
        self.bosses.get(&id).map(|state| BossStatus {
            kind: state.kind,
            shielded: state.shield.active,
            boosted: state.speed_boost.active,
            effects: state.effects.clone(),
        })
    }

    /// Read access to the underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &EnemyRegistry {
        &self.registry
    }

    /// Removes dead and arrived bosses along with their ability state.
    pub fn cleanup(&mut self, out: &mut Vec<Departure>) {
        let start = out.len();
        self.registry.cleanup(out);
        for departure in &out[start..] {
            let _ = self.bosses.remove(&departure.enemy);
        }
    }

    /// Drops every boss, queued split and buffered event.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.bosses.clear();
        self.pending_splits.clear();
        self.events.clear();
    }
}

#[derive(Clone, Debug)]
struct BossState {
    kind: BossKind,
    abilities: BossAbilities,
    minion_template: EnemyTemplate,
    shield: AbilityWindow,
    speed_boost: AbilityWindow,
    last_regeneration: Duration,
    effects: Vec<VisualEffect>,
}

impl BossState {
    fn age_effects(&mut self, dt: Duration) {
        for effect in &mut self.effects {
            effect.age = effect.age.saturating_add(dt);
        }
        self.effects.retain(|effect| effect.age < effect.lifetime);
    }
}

/// Clock-gated activation window of a probabilistic ability.
#[derive(Clone, Copy, Debug)]
struct AbilityWindow {
    active: bool,
    start_time: Duration,
    duration: Duration,
    last_ended: Duration,
}

impl AbilityWindow {
    const fn ready_from(now: Duration) -> Self {
        Self {
            active: false,
            start_time: now,
            duration: Duration::ZERO,
            last_ended: now,
        }
    }

    fn ready(&self, now: Duration, cooldown_ms: u64) -> bool {
        !self.active && now.saturating_sub(self.last_ended) >= Duration::from_millis(cooldown_ms)
    }

    fn activate(&mut self, now: Duration, duration: Duration) {
        self.active = true;
        self.start_time = now;
        self.duration = duration;
    }

    /// Ends an active window whose duration has elapsed; true if it just ended.
    fn expire(&mut self, now: Duration) -> bool {
        if self.active && now.saturating_sub(self.start_time) >= self.duration {
            self.active = false;
            self.last_ended = now;
            return true;
        }
        false
    }
}

#[derive(Clone, Debug)]
struct PendingSplit {
    boss: EnemyId,
    split: SplitAbility,
    minion: EnemyTemplate,
    position: Vec2,
    path: Arc<[Vec2]>,
    path_index: usize,
}

fn minion_template(base: EnemyTemplate, split: SplitAbility) -> EnemyTemplate {
    EnemyTemplate {
        class: EnemyClass::Regular(EnemyKind::Basic),
        health: (base.health * split.health_fraction).floor().max(1.0),
        reward: (base.reward as f32 * split.reward_fraction).floor() as u32,
        ..base
    }
}

const fn effect(kind: VisualEffectKind, lifetime: Duration) -> VisualEffect {
    VisualEffect {
        kind,
        age: Duration::ZERO,
        lifetime,
    }
}
