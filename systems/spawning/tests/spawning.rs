use lane_battle_core::{
    CellCoord, Command, Direction, Event, Rules, SpawnerId, Team, UnitClass,
};
use lane_battle_system_spawning::Spawning;
use lane_battle_world::{apply, query, World};

const MAP: &str = r#"{
    "floor_tiles": ["rrrrrrr", "rOOOOOb", "bbbbbbb"],
    "red_base": {"x": 0, "y": 1},
    "blue_base": {"x": 6, "y": 1},
    "demon_spawners": [
        {"x": 2, "y": 1, "target_team": "r"},
        {"x": 4, "y": 1, "target_team": "b"}
    ]
}"#;

fn world(rules: Rules) -> World {
    World::from_json(MAP, rules).expect("map loads")
}

fn run(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

fn tick(world: &mut World) -> Vec<Event> {
    let mut commands = Vec::new();
    Spawning::new().demons(&query::spawners(world), &mut commands);
    run(world, commands)
}

#[test]
fn spawners_count_down_then_spawn_and_reset() {
    let rules = Rules {
        demon_spawner_reload: 2,
        ..Rules::default()
    };
    let mut world = world(rules);

    assert!(tick(&mut world).is_empty());
    assert!(tick(&mut world).is_empty());
    assert!(query::spawners(&world)
        .iter()
        .all(|spawner| spawner.reload_remaining == 0));

    let events = tick(&mut world);
    let spawned: Vec<UnitClass> = events
        .iter()
        .filter_map(|event| match event {
            Event::UnitSpawned { class, .. } => Some(*class),
            _ => None,
        })
        .collect();
    assert_eq!(
        spawned,
        vec![
            UnitClass::Demon { target: Team::Red },
            UnitClass::Demon { target: Team::Blue },
        ]
    );
    assert!(query::spawners(&world)
        .iter()
        .all(|spawner| spawner.reload_remaining == 2));
}

#[test]
fn blocked_spawner_idles_at_zero() {
    let rules = Rules {
        demon_spawner_reload: 0,
        ..Rules::default()
    };
    let mut world = world(rules);
    let _ = tick(&mut world);

    let events = tick(&mut world);

    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::SpawnBlocked { .. }))
            .count(),
        2
    );
    assert_eq!(query::snapshot(&world).demons.len(), 2);
    assert!(query::spawners(&world)
        .iter()
        .all(|spawner| spawner.reload_remaining == 0));
}

#[test]
fn surge_spawns_regardless_of_reload_but_skips_occupied_tiles() {
    let mut world = world(Rules::default());
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SpawnDemon {
            spawner: SpawnerId::new(1),
        },
        &mut events,
    );

    let mut commands = Vec::new();
    Spawning::new().surge(
        &query::spawners(&world),
        query::occupancy_view(&world),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SpawnDemon {
            spawner: SpawnerId::new(0),
        }]
    );
    let _ = run(&mut world, commands);
    assert_eq!(query::snapshot(&world).demons.len(), 2);
}

#[test]
fn queued_mercenaries_spawn_once_their_tile_is_free() {
    let mut world = world(Rules::default());
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::BuyMercenary {
            team: Team::Blue,
            direction: Direction::West,
        },
        &mut events,
    );

    let mut commands = Vec::new();
    Spawning::new().mercenaries(&query::pending_mercenaries(&world), &mut commands);
    let events = run(&mut world, commands);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::UnitSpawned { cell, .. } if *cell == CellCoord::new(5, 1)
    )));
    assert!(query::pending_mercenaries(&world).is_empty());

    let _ = run(
        &mut world,
        vec![Command::BuyMercenary {
            team: Team::Blue,
            direction: Direction::West,
        }],
    );
    let mut commands = Vec::new();
    Spawning::new().mercenaries(&query::pending_mercenaries(&world), &mut commands);
    let events = run(&mut world, commands);

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::SpawnBlocked { .. })));
    assert_eq!(
        query::pending_directions(&world, Team::Blue),
        vec![Direction::West],
        "purchase stays queued while blocked"
    );
}
