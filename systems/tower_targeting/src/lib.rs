#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that assigns towers to the nearest enemy in range.
//!
//! Targets are held by id only. Every call revalidates a tower's previous
//! target against the live enemy snapshot and re-acquires when it vanished
//! or walked out of range.

use glam::Vec2;
use rampart_core::{EnemyId, EnemyView, TowerId};

/// Targeting inputs for one tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetRequest {
    /// Tower asking for a target.
    pub tower: TowerId,
    /// Tower centre in world units.
    pub position: Vec2,
    /// Inclusive engagement radius in world units.
    pub range: f32,
    /// Target kept from the previous tick, if any.
    pub current: Option<EnemyId>,
}

/// Target chosen for a tower this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower the assignment belongs to.
    pub tower: TowerId,
    /// Enemy the tower engages.
    pub enemy: EnemyId,
    /// Enemy position at the time of assignment.
    pub enemy_position: Vec2,
    /// Whether the previous target was kept rather than re-acquired.
    pub retained: bool,
}

/// Tower targeting system that reuses a scratch buffer between ticks.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a target for every request that has one.
    ///
    /// The output buffer is cleared before populating it. Towers with no
    /// enemy in range produce no entry.
    pub fn handle(
        &mut self,
        requests: &[TargetRequest],
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();
        if requests.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_candidates(enemies);
        for request in requests {
            if let Some(target) = self.resolve(request) {
                out.push(target);
            }
        }
    }

    fn prepare_candidates(&mut self, enemies: &EnemyView) {
        self.candidates.clear();
        self.candidates.reserve(enemies.len());
        self.candidates
            .extend(enemies.iter().map(|snapshot| Candidate {
                id: snapshot.id,
                position: snapshot.position,
            }));
    }

    fn resolve(&self, request: &TargetRequest) -> Option<TowerTarget> {
        let range_sq = request.range * request.range;

        if let Some(current) = request.current {
            let kept = self.candidates.iter().find(|candidate| {
                candidate.id == current
                    && candidate.position.distance_squared(request.position) <= range_sq
            });
            if let Some(candidate) = kept {
                return Some(TowerTarget {
                    tower: request.tower,
                    enemy: candidate.id,
                    enemy_position: candidate.position,
                    retained: true,
                });
            }
        }

        nearest_in_range(
            request.position,
            request.range,
            self.candidates.iter().map(|c| (c.id, c.position)),
        )
        .map(|(enemy, enemy_position)| TowerTarget {
            tower: request.tower,
            enemy,
            enemy_position,
            retained: false,
        })
    }
}

/// Closest enemy within `range` of `origin`.
///
/// Ties go to the enemy encountered first, so callers control precedence
/// through iteration order.
pub fn nearest_in_range<I>(origin: Vec2, range: f32, enemies: I) -> Option<(EnemyId, Vec2)>
where
    I: IntoIterator<Item = (EnemyId, Vec2)>,
{
    let range_sq = range * range;
    let mut best: Option<(f32, EnemyId, Vec2)> = None;
    for (id, position) in enemies {
        let distance_sq = position.distance_squared(origin);
        if distance_sq > range_sq {
            continue;
        }
        if best.map_or(true, |(closest, _, _)| distance_sq < closest) {
            best = Some((distance_sq, id, position));
        }
    }
    best.map(|(_, id, position)| (id, position))
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EnemyId,
    position: Vec2,
}
