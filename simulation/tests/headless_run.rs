use std::time::Duration;

use rampart_core::{
    BossKind, Command, EconomyConfig, EnemyClass, EnemyId, Event, GameConfig, ManualClock,
    TileCoord, TowerKind, WavePhase,
};
use rampart_simulation::Simulation;

const TICK: Duration = Duration::from_millis(100);

fn rich_config(seed: u64) -> GameConfig {
    GameConfig {
        seed,
        economy: EconomyConfig {
            starting_coins: 5_000,
            starting_lives: 1_000,
        },
        ..GameConfig::default()
    }
}

fn fortify(simulation: &mut Simulation<ManualClock>, out: &mut Vec<Event>) {
    for row in [4, 8] {
        for column in [5, 8, 11, 14] {
            let kind = if column % 2 == 0 {
                TowerKind::Sniper
            } else {
                TowerKind::Rapid
            };
            simulation.apply(
                Command::PlaceTower {
                    kind,
                    tile: TileCoord::new(column, row),
                },
                out,
            );
        }
    }
}

fn run(seed: u64, until_wave: u32) -> (Vec<Event>, u32, u32) {
    let clock = ManualClock::new();
    let mut simulation = Simulation::new(rich_config(seed), clock.clone()).expect("valid config");
    let mut events = Vec::new();
    fortify(&mut simulation, &mut events);

    for _ in 0..20_000 {
        if simulation.wave_info().current_wave >= until_wave {
            break;
        }
        if simulation.wave_info().phase == WavePhase::Preparation {
            simulation.apply(Command::StartWaveNow, &mut events);
        }
        clock.advance(TICK);
        simulation.update(TICK, &mut events);
    }
    assert_eq!(simulation.wave_info().current_wave, until_wave);

    let ledger = simulation.ledger();
    (events, ledger.coins(), ledger.lives())
}

#[test]
fn identical_seeds_replay_identically_through_a_boss_wave() {
    let first = run(7, 6);
    let second = run(7, 6);

    assert_eq!(first, second);
    assert!(first.0.iter().any(|event| matches!(
        event,
        Event::EnemySpawned {
            class: EnemyClass::Boss(BossKind::Guardian),
            ..
        }
    )));
    assert!(first
        .0
        .iter()
        .any(|event| matches!(event, Event::RewardEarned { .. })));
    assert!(first.0.iter().any(|event| matches!(
        event,
        Event::EnemySpawned { enemy, .. } if *enemy == EnemyId::new(1)
    )));
}

#[test]
fn undefended_base_loses_once_and_then_freezes() {
    let clock = ManualClock::new();
    let mut simulation =
        Simulation::new(GameConfig::default(), clock.clone()).expect("valid config");
    let mut events = Vec::new();

    for _ in 0..6_000 {
        if simulation.is_game_over() {
            break;
        }
        clock.advance(TICK);
        simulation.update(TICK, &mut events);
    }

    assert!(simulation.is_game_over());
    assert_eq!(simulation.ledger().lives(), 0);
    let game_overs = events
        .iter()
        .filter(|event| matches!(event, Event::GameOver { .. }))
        .count();
    assert_eq!(game_overs, 1);
    assert_eq!(events.last(), Some(&Event::GameOver { wave: 3 }));

    let before = simulation.enemies().len();
    let mut after = Vec::new();
    clock.advance(TICK);
    simulation.update(TICK, &mut after);
    assert!(after.is_empty());
    assert_eq!(simulation.enemies().len(), before);
}

#[test]
fn skipping_waves_reaches_the_first_boss() {
    let clock = ManualClock::new();
    let mut simulation =
        Simulation::new(GameConfig::default(), clock.clone()).expect("valid config");
    let mut events = Vec::new();

    for _ in 0..2_000 {
        let info = simulation.wave_info();
        if info.current_wave == 5 && info.phase == WavePhase::Active {
            break;
        }
        match info.phase {
            WavePhase::Preparation => simulation.apply(Command::StartWaveNow, &mut events),
            WavePhase::Active if info.current_wave < 5 => {
                simulation.apply(Command::SkipWave, &mut events);
            }
            _ => {}
        }
        clock.advance(TICK);
        simulation.update(TICK, &mut events);
    }

    let skipped: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::WaveSkipped { wave } => Some(*wave),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, [1, 2, 3, 4]);

    let bosses: Vec<_> = simulation
        .enemies()
        .iter()
        .filter(|enemy| enemy.class.is_boss())
        .map(|enemy| (enemy.class, enemy.boss.is_some()))
        .collect();
    assert_eq!(
        bosses,
        [(EnemyClass::Boss(BossKind::Guardian), true)]
    );
    let info = simulation.wave_info();
    assert_eq!(info.enemies_spawned, info.total_enemies);
}
