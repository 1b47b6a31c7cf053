use lane_battle_core::{
    CellCoord, Command, Direction, Event, PlacementError, PurchaseError, RemovalError, Rules,
    SpawnerId, StructureAction, Team, TeamActions, TowerKind, TurnAction,
};
use lane_battle_system_economy::{Economy, Phase};
use lane_battle_world::{apply, query, World};

const MAP: &str = r#"{
    "floor_tiles": ["rrrrbbb", "rrrrbbb", "rOOOOOb", "rrrrbbb"],
    "red_base": {"x": 0, "y": 2},
    "blue_base": {"x": 6, "y": 2},
    "demon_spawners": [{"x": 3, "y": 2, "target_team": "b"}]
}"#;

fn world() -> World {
    World::from_json(MAP, Rules::default()).expect("map loads")
}

fn run(world: &mut World, phase: Phase, actions: TeamActions) -> Vec<Event> {
    let mut commands = Vec::new();
    Economy::new().handle(phase, &actions, &mut commands);
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

fn red(action: TurnAction) -> TeamActions {
    TeamActions::new(action, TurnAction::nothing())
}

fn build(column: u32, row: u32, kind: TowerKind) -> TurnAction {
    TurnAction {
        structure: StructureAction::Build {
            cell: CellCoord::new(column, row),
            kind,
        },
        ..TurnAction::nothing()
    }
}

fn destroy(column: u32, row: u32) -> TurnAction {
    TurnAction {
        structure: StructureAction::Destroy {
            cell: CellCoord::new(column, row),
        },
        ..TurnAction::nothing()
    }
}

#[test]
fn tower_prices_escalate_and_refund_half_the_current_price() {
    let mut world = world();

    let _ = run(&mut world, Phase::Structures, red(build(1, 1, TowerKind::Crossbow)));
    assert_eq!(query::money(&world, Team::Red), 22);
    assert_eq!(query::tower_price(&world, Team::Red, TowerKind::Crossbow), 10);

    let _ = run(&mut world, Phase::Structures, red(build(2, 1, TowerKind::Crossbow)));
    assert_eq!(query::money(&world, Team::Red), 12);
    let price = query::tower_price(&world, Team::Red, TowerKind::Crossbow);
    assert_eq!(price, 12, "price compounds per purchase, rounded down");

    let events = run(&mut world, Phase::Structures, red(destroy(1, 1)));
    assert!(
        matches!(events.as_slice(), [Event::TowerRemoved { refund: 6, .. }]),
        "refund uses the escalated price: {events:?}"
    );
    assert_eq!(query::money(&world, Team::Red), 18);
    assert!(query::occupancy_view(&world).is_free(CellCoord::new(1, 1)));
    assert_eq!(
        query::tower_price(&world, Team::Red, TowerKind::Crossbow),
        price,
        "destruction never lowers the price"
    );
    assert_eq!(query::tower_price(&world, Team::Blue, TowerKind::Crossbow), 8);
}

#[test]
fn rejected_builds_leave_the_world_untouched() {
    let mut world = world();
    let _ = run(&mut world, Phase::Structures, red(build(1, 0, TowerKind::Cannon)));
    let before = query::snapshot(&world);

    let attempts = [
        (build(5, 0, TowerKind::House), PlacementError::ForeignTerritory),
        (build(2, 2, TowerKind::House), PlacementError::ForeignTerritory),
        (build(1, 0, TowerKind::House), PlacementError::Occupied),
        (build(40, 0, TowerKind::House), PlacementError::OutOfBounds),
        (
            build(2, 0, TowerKind::Minigun),
            PlacementError::InsufficientFunds {
                price: 20,
                available: 15,
            },
        ),
    ];

    for (action, expected) in attempts {
        let events = run(&mut world, Phase::Structures, red(action));
        assert!(
            matches!(
                events.as_slice(),
                [Event::TowerPlacementRejected { reason, .. }] if *reason == expected
            ),
            "expected {expected:?}, got {events:?}"
        );
        assert_eq!(query::snapshot(&world), before, "rejection must not mutate state");
    }
}

#[test]
fn destroying_foreign_or_missing_towers_is_rejected() {
    let mut world = world();
    let actions = TeamActions::new(TurnAction::nothing(), build(5, 0, TowerKind::House));
    let _ = run(&mut world, Phase::Structures, actions);

    let events = run(&mut world, Phase::Structures, red(destroy(5, 0)));
    assert!(matches!(
        events.as_slice(),
        [Event::TowerRemovalRejected {
            reason: RemovalError::ForeignTerritory,
            ..
        }]
    ));

    let events = run(&mut world, Phase::Structures, red(destroy(2, 0)));
    assert!(matches!(
        events.as_slice(),
        [Event::TowerRemovalRejected {
            reason: RemovalError::MissingTower,
            ..
        }]
    ));
    assert_eq!(query::money(&world, Team::Red), 30);
}

#[test]
fn mercenary_purchases_are_capped_at_one_per_direction() {
    let mut world = world();
    let east = TurnAction {
        mercenary: Some(Direction::East),
        ..TurnAction::nothing()
    };

    let events = run(&mut world, Phase::Mercenaries, red(east));
    assert_eq!(
        events,
        vec![Event::MercenaryQueued {
            team: Team::Red,
            direction: Direction::East,
        }]
    );
    assert_eq!(query::money(&world, Team::Red), 20);

    let events = run(&mut world, Phase::Mercenaries, red(east));
    assert!(matches!(
        events.as_slice(),
        [Event::MercenaryPurchaseRejected {
            reason: PurchaseError::AlreadyQueued,
            ..
        }]
    ));
    assert_eq!(query::money(&world, Team::Red), 20, "duplicate purchase is free");

    let north = TurnAction {
        mercenary: Some(Direction::North),
        ..TurnAction::nothing()
    };
    let events = run(&mut world, Phase::Mercenaries, red(north));
    assert!(matches!(
        events.as_slice(),
        [Event::MercenaryPurchaseRejected {
            reason: PurchaseError::NoLane,
            ..
        }]
    ));
    assert_eq!(query::pending_directions(&world, Team::Red), vec![Direction::East]);
}

#[test]
fn mutual_provocation_wipes_every_demon() {
    let mut world = world();
    let mut events = Vec::new();
    for _ in 0..Rules::default().demon_spawner_reload {
        apply(
            &mut world,
            Command::CountDownSpawner {
                spawner: SpawnerId::new(0),
            },
            &mut events,
        );
    }
    apply(
        &mut world,
        Command::SpawnDemon {
            spawner: SpawnerId::new(0),
        },
        &mut events,
    );
    assert_eq!(query::snapshot(&world).demons.len(), 1);

    let provoke = TurnAction {
        provoke: true,
        ..TurnAction::nothing()
    };
    let events = run(&mut world, Phase::Provocation, TeamActions::new(provoke, provoke));

    assert!(events.contains(&Event::DemonsWiped { count: 1 }));
    assert!(query::snapshot(&world).demons.is_empty());
    assert!(query::occupancy_view(&world).is_free(CellCoord::new(3, 2)));
    assert!(!query::demon_surge(&world));
    assert_eq!(query::money(&world, Team::Red), 10);
    assert_eq!(query::money(&world, Team::Blue), 10);
}

#[test]
fn lone_provocation_triggers_a_surge() {
    let mut world = world();
    let provoke = TurnAction {
        provoke: true,
        ..TurnAction::nothing()
    };

    let events = run(&mut world, Phase::Provocation, red(provoke));

    assert!(events.contains(&Event::DemonSurgeTriggered { team: Team::Red }));
    assert!(query::demon_surge(&world));
}

#[test]
fn unaffordable_provocation_is_rejected_and_does_not_count() {
    let mut world = world();
    let _ = run(&mut world, Phase::Structures, red(build(1, 0, TowerKind::Cannon)));
    let provoke = TurnAction {
        provoke: true,
        ..TurnAction::nothing()
    };

    let events = run(&mut world, Phase::Provocation, TeamActions::new(provoke, provoke));

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProvocationRejected { team: Team::Red, .. })));
    assert!(events.contains(&Event::DemonSurgeTriggered { team: Team::Blue }));
    assert_eq!(query::money(&world, Team::Red), 15);
}
