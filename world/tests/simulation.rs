mod common;

use std::time::Duration;

use common::{center, level_with};
use screamporium_core::{BlockId, Command, Event, GridPos};
use screamporium_world::{self as world, query, Outcome, UNREACHABLE};

const TICK: Duration = Duration::from_millis(33);

const SINGLE_SOURCE: &str = r#"
[layout]
sources = [[4, 9]]
sink = [24, 9]
"#;

fn tick(level: &mut world::Level) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(level, Command::Tick { dt: TICK }, &mut events);
    events
}

#[test]
fn first_mob_spawns_on_fiftieth_tick() {
    let mut level = level_with(SINGLE_SOURCE);
    assert_eq!(query::rating(&level), 5);

    for tick_number in 1..=50 {
        let events = tick(&mut level);
        let spawned = events
            .iter()
            .filter(|event| matches!(event, Event::MobSpawned { .. }))
            .count();
        let expected = usize::from(tick_number == 50);
        assert_eq!(spawned, expected, "unexpected spawn count on tick {tick_number}");
    }

    let mobs = query::mobs(&level);
    assert_eq!(mobs.len(), 1);
    assert_eq!(mobs[0].position(), center(4, 9));
}

#[test]
fn target_cap_limits_hits_to_first_mob_in_pool_order() {
    let mut level = level_with(SINGLE_SOURCE);
    let mut events = Vec::new();
    let block = BlockId::new(0);

    world::apply(
        &mut level,
        Command::SetBlock {
            position: center(10, 5),
            block,
            variant: 0,
        },
        &mut events,
    );
    assert!(events.contains(&Event::BlockPlaced {
        anchor: GridPos::new(10, 5),
        block,
        variant: 0,
    }));

    for position in [center(10, 6), center(11, 5)] {
        world::apply(&mut level, Command::AddMob { position }, &mut events);
    }
    let _ = tick(&mut level);

    let fears: Vec<f64> = query::mobs(&level).iter().map(|mob| mob.fear()).collect();
    let expected_hit = 1.0 + 4.0 * TICK.as_secs_f64();
    assert!((fears[0] - expected_hit).abs() < 1e-9, "first mob is scared");
    assert!((fears[1] - 1.0).abs() < 1e-9, "second mob is ignored");
}

#[test]
fn scaring_blocks_switch_animation_and_announce_it() {
    let mut level = level_with(SINGLE_SOURCE);
    let mut events = Vec::new();
    world::apply(
        &mut level,
        Command::SetBlock {
            position: center(10, 5),
            block: BlockId::new(0),
            variant: 0,
        },
        &mut events,
    );
    world::apply(
        &mut level,
        Command::AddMob {
            position: center(10, 6),
        },
        &mut events,
    );

    let events = tick(&mut level);
    assert!(events.contains(&Event::BlockScaring {
        anchor: GridPos::new(10, 5),
        block: BlockId::new(0),
    }));
    let frame = query::grid(&level).get(GridPos::new(10, 5)).frame();
    assert_eq!(frame, "skeleton01_04");
}

#[test]
fn place_and_delete_restore_the_grid() {
    let mut level = level_with(SINGLE_SOURCE);
    let before: Vec<(GridPos, bool, i32)> = snapshot(&level);
    let mut events = Vec::new();

    world::apply(
        &mut level,
        Command::SetBlock {
            position: center(12, 9),
            block: BlockId::new(1),
            variant: 1,
        },
        &mut events,
    );
    assert_eq!(query::placements(&level).count(), 1);
    assert_eq!(
        query::grid(&level).distance(GridPos::new(11, 9)),
        UNREACHABLE,
        "spike column blocks the corridor cell"
    );

    world::apply(
        &mut level,
        Command::SetDeleteHighlights {
            position: center(13, 10),
        },
        &mut events,
    );
    assert_eq!(query::highlights(&level).len(), 6);
    world::apply(&mut level, Command::DeleteBlock, &mut events);

    assert_eq!(snapshot(&level), before);
    assert!(events.iter().any(|event| matches!(event, Event::BlockRemoved { .. })));
}

fn snapshot(level: &world::Level) -> Vec<(GridPos, bool, i32)> {
    let grid = query::grid(level);
    grid.cells()
        .map(|(pos, item)| (pos, item.passable(), grid.distance(pos)))
        .collect()
}

#[test]
fn mobs_leave_through_the_sink_and_pay_out() {
    let mut level = level_with(
        r#"
[layout]
sources = [[22, 9]]
sink = [24, 9]

[spawning]
charge_per_rating = 0.0
"#,
    );
    let mut events = Vec::new();
    world::apply(
        &mut level,
        Command::AddMob {
            position: center(22, 9),
        },
        &mut events,
    );

    let mut escaped = None;
    for _ in 0..120 {
        for event in tick(&mut level) {
            if let Event::MobEscaped { fear, geld } = event {
                escaped = Some((fear, geld));
            }
        }
        if escaped.is_some() {
            break;
        }
    }

    assert_eq!(escaped, Some((1.0, 10)));
    assert!(query::mobs(&level).is_empty());
    assert_eq!(query::geld(&level), 110);
    assert_eq!(query::decals(&level).len(), 1, "calm exit shows a bubble");
}

#[test]
fn collapsing_rating_ends_the_level() {
    let mut level = level_with(
        r#"
[player]
starting_rating = 0.2
"#,
    );

    let events = tick(&mut level);
    assert!(events.contains(&Event::PlayerLost));
    assert_eq!(query::outcome(&level), Some(Outcome::Lost));
    assert!(tick(&mut level).is_empty(), "finished levels stop ticking");
}

#[test]
fn sustained_high_rating_wins() {
    let mut level = level_with(
        r#"
[player]
starting_rating = 9.0

[rating]
win_duration_ms = 99

[spawning]
charge_per_rating = 0.0
"#,
    );

    assert!(!tick(&mut level).contains(&Event::PlayerWon));
    assert!(!tick(&mut level).contains(&Event::PlayerWon));
    assert!(tick(&mut level).contains(&Event::PlayerWon));
    assert_eq!(query::outcome(&level), Some(Outcome::Won));
}
