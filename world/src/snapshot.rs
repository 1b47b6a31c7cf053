//! Serializable state capture for agents and observers.

use lane_battle_core::{
    BaseState, Cell, EntityId, GameSnapshot, Position, SpawnerState, Team, TowerPriceTable,
    TowerState, UnitClass, UnitRecord, UnitState,
};

use crate::{units::Unit, World};

pub(crate) fn capture(world: &World) -> GameSnapshot {
    let base = |team: Team| {
        let base = world.base(team);
        BaseState {
            x: base.cell.column(),
            y: base.cell.row(),
            health: base.health,
            team,
            pending_mercenaries: base.pending.iter().copied().collect(),
        }
    };
    let prices = |team: Team| TowerPriceTable::collect(|kind| world.towers.price(team, kind));

    let living = || world.units.iter().filter(|unit| unit.state != UnitState::Dead);

    GameSnapshot {
        current_turn: world.turn,
        turns_remaining: world.rules.max_turns.saturating_sub(world.turn),
        floor_tiles: world.tiles.token_rows().collect(),
        entity_grid: entity_grid(world),
        red_base: base(Team::Red),
        blue_base: base(Team::Blue),
        red_team_money: world.money[0],
        blue_team_money: world.money[1],
        red_tower_prices: prices(Team::Red),
        blue_tower_prices: prices(Team::Blue),
        towers: world
            .towers
            .iter()
            .map(|tower| TowerState {
                name: tower.name.clone(),
                kind: tower.kind,
                team: tower.team,
                x: tower.cell.column(),
                y: tower.cell.row(),
                cooldown: tower.cooldown,
                max_cooldown: tower.max_cooldown,
                targets: tower.lane_cells.iter().copied().map(Position::from).collect(),
            })
            .collect(),
        mercenaries: living()
            .filter(|unit| unit.class.is_mercenary())
            .map(record)
            .collect(),
        demons: living()
            .filter(|unit| unit.class.is_demon())
            .map(record)
            .collect(),
        demon_spawners: world
            .spawners
            .iter()
            .map(|spawner| SpawnerState {
                x: spawner.cell.column(),
                y: spawner.cell.row(),
                target_team: spawner.target,
                reload_remaining: spawner.reload_remaining,
                reload_time: spawner.reload_max,
            })
            .collect(),
        victory: world.victory,
    }
}

fn record(unit: &Unit) -> UnitRecord {
    UnitRecord {
        name: unit.name.clone(),
        team: match unit.class {
            UnitClass::Mercenary { team } => Some(team),
            UnitClass::Demon { .. } => None,
        },
        target_team: unit.class.target_team(),
        x: unit.cell.column(),
        y: unit.cell.row(),
        health: unit.health,
        attack: unit.attack,
        state: unit.state,
    }
}

fn entity_grid(world: &World) -> Vec<Vec<String>> {
    let (columns, _) = world.occupancy.dimensions();
    let width = usize::try_from(columns).unwrap_or(0).max(1);
    world
        .occupancy
        .cells()
        .chunks(width)
        .map(|row| row.iter().map(|cell| occupant_name(world, *cell)).collect())
        .collect()
}

fn occupant_name(world: &World, cell: Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Base(Team::Red) => "Base_R".to_owned(),
        Cell::Base(Team::Blue) => "Base_B".to_owned(),
        Cell::Occupied(EntityId::Tower(id)) => world
            .towers
            .get(id)
            .map(|tower| tower.name.clone())
            .unwrap_or_default(),
        Cell::Occupied(EntityId::Unit(id)) => world
            .units
            .get(id)
            .map(|unit| unit.name.clone())
            .unwrap_or_default(),
    }
}
