#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Rampart headlessly.
//!
//! Runs the simulation on a manual clock with a fixed frame length, builds a
//! scripted tower layout before the first wave and logs progress through
//! `tracing` (filtered by `RUST_LOG`).

mod layout;

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use rampart_core::{Event, GameConfig, ManualClock, WavePhase};
use rampart_simulation::Simulation;
use tracing_subscriber::EnvFilter;

use crate::layout::TowerLayout;

/// Headless Rampart runner.
#[derive(Debug, Parser)]
#[command(name = "rampart")]
#[command(about = "Plays Rampart waves headlessly and reports the outcome")]
struct Args {
    /// TOML file overriding the built-in balance.
    #[arg(long)]
    config: Option<PathBuf>,
    /// TOML file listing `[[towers]]` to build before the first wave.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of waves to play.
    #[arg(long, default_value_t = 5)]
    waves: u32,
    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Starts every wave as soon as its preparation begins.
    #[arg(long)]
    rush: bool,
}

/// Running totals collected from simulation events.
#[derive(Debug, Default)]
struct Tally {
    kills: u32,
    escapes: u32,
    coins_earned: u32,
    blocked_hits: u32,
    splits: u32,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemyKilled { .. } => self.kills += 1,
            Event::EnemyReachedGoal { .. } => self.escapes += 1,
            Event::RewardEarned { amount, .. } => self.coins_earned += amount,
            Event::DamageBlocked { .. } => self.blocked_hits += 1,
            Event::BossSplit { .. } => self.splits += 1,
            Event::TowerPlacementRejected { kind, tile, reason } => {
                tracing::warn!(?kind, ?tile, %reason, "layout tower rejected");
            }
            Event::WavePhaseChanged { wave, phase } => {
                tracing::debug!(wave, ?phase, "phase changed");
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let layout = match &args.layout {
        Some(path) => TowerLayout::load(path)?,
        None => TowerLayout::default(),
    };

    let clock = ManualClock::new();
    let mut simulation =
        Simulation::new(config, clock.clone()).context("configuration rejected")?;
    let mut tally = Tally::default();
    let mut events = Vec::new();
    for command in layout.commands() {
        simulation.apply(command, &mut events);
    }

    let tick = Duration::from_millis(args.tick_ms.max(1));
    let mut last_wave = 0;
    while !simulation.is_game_over() && simulation.wave_info().current_wave <= args.waves {
        let info = simulation.wave_info();
        if info.current_wave != last_wave {
            last_wave = info.current_wave;
            if let Some(announcement) = &info.announcement {
                tracing::info!("{announcement}");
            }
        }
        if args.rush && info.phase == WavePhase::Preparation {
            let _ = simulation.start_wave_now(&mut events);
        }

        clock.advance(tick);
        simulation.update(tick, &mut events);
        for event in events.drain(..) {
            tally.record(&event);
        }
    }

    let ledger = simulation.ledger();
    let wave = simulation.wave_info().current_wave;
    if simulation.is_game_over() {
        println!("Defeated during wave {wave}.");
    } else {
        println!("Survived {} waves.", args.waves);
    }
    println!("  Kills:        {}", tally.kills);
    println!("  Escapes:      {}", tally.escapes);
    println!("  Coins earned: {}", tally.coins_earned);
    println!("  Shield hits:  {}", tally.blocked_hits);
    println!("  Boss splits:  {}", tally.splits);
    println!("  Coins left:   {}", ledger.coins());
    println!("  Lives left:   {}", ledger.lives());
    Ok(())
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
