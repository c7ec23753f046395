//! Player-facing wave banners.

use std::time::Duration;

use rampart_core::{is_boss_wave, BossKind};

/// Whole seconds left, rounded up so a banner never reads zero early.
pub(crate) fn seconds_remaining(remaining: Duration) -> u64 {
    let millis = remaining.as_millis();
    u64::try_from((millis + 999) / 1_000).unwrap_or(u64::MAX)
}

/// Banner shown while a wave is preparing.
///
/// The text depends only on the wave number and the time left, so the
/// presentation layer can re-render it every frame.
#[must_use]
pub fn announcement(wave: u32, boss: Option<BossKind>, remaining: Duration) -> String {
    let seconds = seconds_remaining(remaining);
    if is_boss_wave(wave) {
        let name = match boss {
            Some(BossKind::Guardian) => "the Guardian",
            Some(BossKind::Juggernaut) => "the Juggernaut",
            None => "a boss",
        };
        if seconds == 0 {
            format!("BOSS WAVE {wave}: {name} is here!")
        } else {
            format!("BOSS WAVE {wave}: {name} arrives in {seconds}s")
        }
    } else if seconds == 0 {
        format!("Wave {wave} incoming!")
    } else {
        format!("Wave {wave} starts in {seconds}s")
    }
}
