#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the lane battle engine.

mod lanes;
mod map;
mod names;
mod snapshot;
mod towers;
mod units;

pub use map::{LoadError, MapDescription, SpawnerDescription};

use std::collections::{BTreeSet, HashMap, HashSet};

use lane_battle_core::{
    Cell, CellCoord, Command, Direction, EntityId, Event, Lane, LaneId, PlacementError,
    ProvokeError, PurchaseError, RemovalError, Rules, SpawnerId, Team, TileGrid, TowerId,
    TowerKind, UnitClass, UnitId, UnitState, Victory,
};

use names::NameAllocator;
use towers::TowerRegistry;
use units::{Unit, UnitRoster};

#[derive(Clone, Debug)]
struct Base {
    team: Team,
    cell: CellCoord,
    health: u32,
    pending: BTreeSet<Direction>,
}

#[derive(Clone, Debug)]
struct Spawner {
    id: SpawnerId,
    cell: CellCoord,
    target: Team,
    reload_remaining: u32,
    reload_max: u32,
}

/// Represents the authoritative lane battle world state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    tiles: TileGrid,
    occupancy: OccupancyGrid,
    lanes: Vec<Lane>,
    lane_positions: HashMap<CellCoord, (LaneId, usize)>,
    bases: [Base; 2],
    money: [u32; 2],
    towers: TowerRegistry,
    units: UnitRoster,
    spawners: Vec<Spawner>,
    provoked: [bool; 2],
    demon_surge: bool,
    names: NameAllocator,
    turn: u32,
    victory: Option<Victory>,
}

impl World {
    /// Builds a world from a map description, computing every lane.
    ///
    /// Fails on any structural problem; there is no partially loaded world.
    pub fn from_map(map: &MapDescription, rules: Rules) -> Result<Self, LoadError> {
        let tiles = map.tile_grid()?;
        let red_cell = CellCoord::from(map.red_base);
        let blue_cell = CellCoord::from(map.blue_base);
        for (team, cell) in [(Team::Red, red_cell), (Team::Blue, blue_cell)] {
            if !tiles.contains(cell) {
                return Err(LoadError::BaseOutOfBounds { team });
            }
        }

        let lanes = lanes::discover(&tiles, red_cell, blue_cell)?;
        let mut lane_positions = HashMap::new();
        for lane in &lanes {
            for (index, cell) in lane.cells().iter().enumerate() {
                let _ = lane_positions.entry(*cell).or_insert((lane.id(), index));
            }
        }

        let mut spawners = Vec::with_capacity(map.demon_spawners.len());
        for (index, description) in map.demon_spawners.iter().enumerate() {
            let cell = CellCoord::new(description.x, description.y);
            if !lane_positions.contains_key(&cell) {
                return Err(LoadError::SpawnerOffLane {
                    column: cell.column(),
                    row: cell.row(),
                });
            }
            spawners.push(Spawner {
                id: SpawnerId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                cell,
                target: description.target_team,
                reload_remaining: rules.demon_spawner_reload,
                reload_max: rules.demon_spawner_reload,
            });
        }

        let mut occupancy = OccupancyGrid::new(tiles.columns(), tiles.rows());
        occupancy.set(red_cell, Cell::Base(Team::Red));
        occupancy.set(blue_cell, Cell::Base(Team::Blue));

        let base = |team: Team, cell: CellCoord| Base {
            team,
            cell,
            health: rules.base_health,
            pending: BTreeSet::new(),
        };

        Ok(Self {
            bases: [base(Team::Red, red_cell), base(Team::Blue, blue_cell)],
            money: [rules.starting_money; 2],
            towers: TowerRegistry::new(&rules),
            units: UnitRoster::default(),
            provoked: [false; 2],
            demon_surge: false,
            names: NameAllocator::default(),
            turn: 0,
            victory: None,
            rules,
            tiles,
            occupancy,
            lanes,
            lane_positions,
            spawners,
        })
    }

    /// Parses a JSON map document and builds the world from it.
    pub fn from_json(document: &str, rules: Rules) -> Result<Self, LoadError> {
        let map = MapDescription::from_json(document)?;
        Self::from_map(&map, rules)
    }

    fn base(&self, team: Team) -> &Base {
        &self.bases[slot(team)]
    }

    fn base_mut(&mut self, team: Team) -> &mut Base {
        &mut self.bases[slot(team)]
    }

    fn lane(&self, id: LaneId) -> Option<&Lane> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.lanes.get(index))
    }

    fn spawner_mut(&mut self, id: SpawnerId) -> Option<&mut Spawner> {
        self.spawners.iter_mut().find(|spawner| spawner.id == id)
    }

    fn build_tower(&mut self, team: Team, cell: CellCoord, kind: TowerKind, out: &mut Vec<Event>) {
        let price = self.towers.price(team, kind);
        let rejection = if !self.tiles.contains(cell) {
            Some(PlacementError::OutOfBounds)
        } else if self.tiles.tile(cell).and_then(|tile| tile.owner()) != Some(team) {
            Some(PlacementError::ForeignTerritory)
        } else if !self.occupancy.get(cell).is_empty() {
            Some(PlacementError::Occupied)
        } else if self.money[slot(team)] < price {
            Some(PlacementError::InsufficientFunds {
                price,
                available: self.money[slot(team)],
            })
        } else {
            None
        };

        if let Some(reason) = rejection {
            out.push(Event::TowerPlacementRejected {
                team,
                kind,
                cell,
                reason,
            });
            return;
        }

        self.money[slot(team)] -= price;
        let name = self.names.tower(team, kind);
        let tower = self
            .towers
            .insert(team, kind, cell, name, &self.rules, &self.tiles);
        self.occupancy
            .set(cell, Cell::Occupied(EntityId::Tower(tower)));
        self.towers.escalate(team, kind, &self.rules);
        out.push(Event::TowerPlaced {
            tower,
            team,
            kind,
            cell,
            price,
        });
    }

    fn destroy_tower(&mut self, team: Team, cell: CellCoord, out: &mut Vec<Event>) {
        let occupant = self.occupancy.get(cell).tower();
        let tower = if !self.tiles.contains(cell) {
            Err(RemovalError::OutOfBounds)
        } else if self.tiles.tile(cell).and_then(|tile| tile.owner()) != Some(team) {
            Err(RemovalError::ForeignTerritory)
        } else {
            occupant
                .filter(|id| self.towers.get(*id).is_some_and(|tower| tower.team == team))
                .ok_or(RemovalError::MissingTower)
        };

        let removed = match tower {
            Ok(id) => self.towers.remove(id),
            Err(reason) => {
                out.push(Event::TowerRemovalRejected { team, cell, reason });
                return;
            }
        };
        let Some(removed) = removed else {
            return;
        };

        let refund = self.towers.price(team, removed.kind) / 2;
        self.money[slot(team)] = self.money[slot(team)].saturating_add(refund);
        self.occupancy.set(cell, Cell::Empty);
        out.push(Event::TowerRemoved {
            tower: removed.id,
            team,
            cell,
            refund,
        });
    }

    fn buy_mercenary(&mut self, team: Team, direction: Direction, out: &mut Vec<Event>) {
        let price = self.rules.mercenary_price;
        let available = self.money[slot(team)];
        let on_lane = self
            .base(team)
            .cell
            .step(direction)
            .is_some_and(|cell| self.lane_positions.contains_key(&cell));

        let rejection = if !on_lane {
            Some(PurchaseError::NoLane)
        } else if self.base(team).pending.contains(&direction) {
            Some(PurchaseError::AlreadyQueued)
        } else if available < price {
            Some(PurchaseError::InsufficientFunds { price, available })
        } else {
            None
        };

        if let Some(reason) = rejection {
            out.push(Event::MercenaryPurchaseRejected {
                team,
                direction,
                reason,
            });
            return;
        }

        self.money[slot(team)] -= price;
        let _ = self.base_mut(team).pending.insert(direction);
        out.push(Event::MercenaryQueued { team, direction });
    }

    fn provoke_demons(&mut self, team: Team, out: &mut Vec<Event>) {
        let price = self.rules.provoke_price;
        let available = self.money[slot(team)];
        if available < price {
            out.push(Event::ProvocationRejected {
                team,
                reason: ProvokeError::InsufficientFunds { price, available },
            });
            return;
        }

        self.money[slot(team)] -= price;
        self.provoked[slot(team)] = true;
        out.push(Event::DemonsProvoked { team });
    }

    fn resolve_provocation(&mut self, out: &mut Vec<Event>) {
        match self.provoked {
            [true, true] => {
                let wiped = self.units.drain_where(|unit| unit.class.is_demon());
                for demon in &wiped {
                    if self.occupancy.get(demon.cell).unit() == Some(demon.id) {
                        self.occupancy.set(demon.cell, Cell::Empty);
                    }
                }
                out.push(Event::DemonsWiped {
                    count: u32::try_from(wiped.len()).unwrap_or(u32::MAX),
                });
            }
            [true, false] => {
                self.demon_surge = true;
                out.push(Event::DemonSurgeTriggered { team: Team::Red });
            }
            [false, true] => {
                self.demon_surge = true;
                out.push(Event::DemonSurgeTriggered { team: Team::Blue });
            }
            [false, false] => {}
        }
        self.provoked = [false; 2];
    }

    fn hold_units(&mut self, units: &[UnitId]) {
        for id in units {
            if let Some(unit) = self.units.get_mut(*id) {
                if unit.state != UnitState::Dead {
                    unit.state = UnitState::Waiting;
                }
            }
        }
    }

    fn advance_units(&mut self, units: &[UnitId], out: &mut Vec<Event>) {
        let mut moves: Vec<(UnitId, CellCoord, CellCoord, usize)> = units
            .iter()
            .filter_map(|id| {
                let unit = self.units.get(*id).filter(|unit| unit.can_act())?;
                let lane = self.lane(unit.lane)?;
                let next = lane.step(unit.lane_index, unit.class.heading(), 1)?;
                Some((unit.id, unit.cell, lane.cell(next)?, next))
            })
            .collect();

        // Drop moves into tiles that stay occupied until only valid ones remain.
        loop {
            let movers: HashSet<UnitId> = moves.iter().map(|(id, ..)| *id).collect();
            let mut claimed = HashSet::new();
            let before = moves.len();
            moves.retain(|(_, _, to, _)| {
                let vacating = self
                    .occupancy
                    .get(*to)
                    .unit()
                    .is_some_and(|occupant| movers.contains(&occupant));
                (self.occupancy.get(*to).is_empty() || vacating) && claimed.insert(*to)
            });
            if moves.len() == before {
                break;
            }
        }

        let accepted: HashSet<UnitId> = moves.iter().map(|(id, ..)| *id).collect();
        for id in units {
            if !accepted.contains(id) {
                self.hold_units(&[*id]);
            }
        }

        for (_, from, _, _) in &moves {
            self.occupancy.set(*from, Cell::Empty);
        }
        for (id, from, to, index) in moves {
            self.occupancy.set(to, Cell::Occupied(EntityId::Unit(id)));
            if let Some(unit) = self.units.get_mut(id) {
                unit.cell = to;
                unit.lane_index = index;
                unit.state = UnitState::Moving;
            }
            out.push(Event::UnitAdvanced {
                unit: id,
                from,
                to,
            });
        }
    }

    fn strike(&mut self, attacker: UnitId, out: &mut Vec<Event>) {
        let Some(unit) = self.units.get(attacker) else {
            return;
        };
        if unit.state == UnitState::Dead {
            return;
        }
        let (class, lane_id, index, attack, alive) =
            (unit.class, unit.lane, unit.lane_index, unit.attack, unit.health > 0);
        if let Some(unit) = self.units.get_mut(attacker) {
            unit.state = UnitState::Fighting;
        }
        if !alive {
            return;
        }

        let Some(lane) = self.lane(lane_id) else {
            return;
        };
        let heading = class.heading();
        let hostile_at = |distance: usize| -> Option<UnitId> {
            let cell = lane.cell_ahead(index, heading, distance)?;
            let occupant = self.occupancy.get(cell).unit()?;
            self.units
                .get(occupant)
                .filter(|target| target.state != UnitState::Dead)
                .filter(|target| class.is_hostile_to(target.class))
                .map(|target| target.id)
        };
        let ahead_is_free = lane
            .cell_ahead(index, heading, 1)
            .is_some_and(|cell| self.occupancy.get(cell).is_empty());

        let target = hostile_at(1).or_else(|| ahead_is_free.then(|| hostile_at(2)).flatten());
        let at_base = lane.is_terminal(index, heading);

        if let Some(target) = target {
            if let Some(victim) = self.units.get_mut(target) {
                let remaining = victim.take_damage(attack);
                out.push(Event::UnitStruck {
                    attacker,
                    target,
                    damage: attack,
                    remaining,
                });
            }
        } else if at_base {
            let team = class.target_team();
            let base = self.base_mut(team);
            base.health = base.health.saturating_sub(attack);
            let remaining = base.health;
            out.push(Event::BaseStruck {
                attacker,
                team,
                damage: attack,
                remaining,
            });
        }
    }

    fn sweep_mortal_wounds(&mut self, out: &mut Vec<Event>) {
        let mut vacated = Vec::new();
        for unit in self.units.iter_mut() {
            if unit.health == 0 && unit.state != UnitState::Dead {
                unit.state = UnitState::Dead;
                vacated.push((unit.id, unit.class, unit.cell));
            }
        }
        for (unit, class, cell) in vacated {
            if self.occupancy.get(cell).unit() == Some(unit) {
                self.occupancy.set(cell, Cell::Empty);
            }
            out.push(Event::UnitKilled { unit, class, cell });
        }
    }

    /// Creates a unit on a free lane tile. Returns `false` when the tile is taken.
    fn spawn_unit(&mut self, class: UnitClass, cell: CellCoord, out: &mut Vec<Event>) -> bool {
        let Some((lane, lane_index)) = self.lane_positions.get(&cell).copied() else {
            return false;
        };
        if !self.occupancy.get(cell).is_empty() {
            out.push(Event::SpawnBlocked { class, cell });
            return false;
        }

        let (name, health, attack) = match class {
            UnitClass::Mercenary { team } => (
                self.names.mercenary(team),
                self.rules.mercenary_health,
                self.rules.mercenary_attack,
            ),
            UnitClass::Demon { .. } => (
                self.names.demon(),
                self.rules.demon_health,
                self.rules.demon_attack,
            ),
        };
        let id = self.units.allocate();
        self.units.push(Unit {
            id,
            class,
            name,
            lane,
            lane_index,
            cell,
            health,
            attack,
            state: UnitState::Waiting,
        });
        self.occupancy.set(cell, Cell::Occupied(EntityId::Unit(id)));
        out.push(Event::UnitSpawned {
            unit: id,
            class,
            cell,
        });
        true
    }

    fn spawn_mercenary(&mut self, team: Team, direction: Direction, out: &mut Vec<Event>) {
        if !self.base(team).pending.contains(&direction) {
            return;
        }
        let Some(cell) = self.base(team).cell.step(direction) else {
            return;
        };
        if self.spawn_unit(UnitClass::Mercenary { team }, cell, out) {
            let _ = self.base_mut(team).pending.remove(&direction);
        }
    }

    fn spawn_demon(&mut self, spawner: SpawnerId, out: &mut Vec<Event>) {
        let Some(source) = self.spawners.iter().find(|entry| entry.id == spawner) else {
            return;
        };
        let (cell, target) = (source.cell, source.target);
        if self.spawn_unit(UnitClass::Demon { target }, cell, out) {
            if let Some(source) = self.spawner_mut(spawner) {
                source.reload_remaining = source.reload_max;
            }
        }
    }

    fn fire_tower(&mut self, tower: TowerId, targets: &[UnitId], out: &mut Vec<Event>) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if state.cooldown > 0 {
            return;
        }
        state.reset_cooldown();
        let (team, damage) = (state.team, state.power);

        for target in targets {
            let Some(unit) = self.units.get_mut(*target) else {
                continue;
            };
            if !unit.can_act() || !unit.class.is_enemy_of(team) {
                continue;
            }
            let remaining = unit.take_damage(damage);
            out.push(Event::TowerFired {
                tower,
                target: *target,
                damage,
                remaining,
            });
        }
    }

    fn collect_income(&mut self, tower: TowerId, out: &mut Vec<Event>) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if state.cooldown > 0 || state.kind != TowerKind::House {
            return;
        }
        state.reset_cooldown();
        let (team, amount) = (state.team, state.power);
        self.money[slot(team)] = self.money[slot(team)].saturating_add(amount);
        out.push(Event::IncomeCollected {
            tower,
            team,
            amount,
        });
    }

    fn bless(&mut self, tower: TowerId, units: &[UnitId], out: &mut Vec<Event>) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if state.cooldown > 0 || state.kind != TowerKind::Church {
            return;
        }
        state.reset_cooldown();
        let (team, heal) = (state.team, state.power);
        let cap = self.rules.mercenary_health;

        for id in units {
            let Some(unit) = self.units.get_mut(*id) else {
                continue;
            };
            if !unit.can_act() || unit.class != (UnitClass::Mercenary { team }) {
                continue;
            }
            let healed = unit.health.saturating_add(heal).min(cap.max(unit.health));
            let amount = healed - unit.health;
            unit.health = healed;
            if amount > 0 {
                out.push(Event::UnitBlessed {
                    tower,
                    unit: *id,
                    amount,
                });
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BuildTower { team, cell, kind } => world.build_tower(team, cell, kind, out_events),
        Command::DestroyTower { team, cell } => world.destroy_tower(team, cell, out_events),
        Command::BuyMercenary { team, direction } => {
            world.buy_mercenary(team, direction, out_events)
        }
        Command::ProvokeDemons { team } => world.provoke_demons(team, out_events),
        Command::ResolveProvocation => world.resolve_provocation(out_events),
        Command::PurgeDead => {
            let _ = world
                .units
                .drain_where(|unit| unit.state == UnitState::Dead);
        }
        Command::HoldUnits { units } => world.hold_units(&units),
        Command::AdvanceUnits { units } => world.advance_units(&units, out_events),
        Command::Strike { attacker } => world.strike(attacker, out_events),
        Command::SweepMortalWounds => world.sweep_mortal_wounds(out_events),
        Command::SpawnMercenary { team, direction } => {
            world.spawn_mercenary(team, direction, out_events)
        }
        Command::CountDownSpawner { spawner } => {
            if let Some(spawner) = world.spawner_mut(spawner) {
                spawner.reload_remaining = spawner.reload_remaining.saturating_sub(1);
            }
        }
        Command::SpawnDemon { spawner } => world.spawn_demon(spawner, out_events),
        Command::CoolDownTower { tower } => {
            if let Some(state) = world.towers.get_mut(tower) {
                state.cooldown = state.cooldown.saturating_sub(1);
            }
        }
        Command::FireTower { tower, targets } => world.fire_tower(tower, &targets, out_events),
        Command::CollectIncome { tower } => world.collect_income(tower, out_events),
        Command::Bless { tower, units } => world.bless(tower, &units, out_events),
        Command::DeclareVictory { victory } => {
            if world.victory.is_none() {
                world.victory = Some(victory);
                out_events.push(Event::VictoryDeclared { victory });
            }
        }
        Command::AdvanceTurn => {
            world.turn = world.turn.saturating_add(1);
            world.demon_surge = false;
            out_events.push(Event::TurnAdvanced {
                turn: world.turn,
                remaining: world.rules.max_turns.saturating_sub(world.turn),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_battle_core::{
        CellCoord, Direction, GameSnapshot, Lane, LaneId, OccupancyView, PendingMercenary, Rules,
        SpawnerSnapshot, Standings, Team, TeamStanding, TileGrid, TowerKind, TowerView,
        UnitState, UnitView, Victory,
    };

    use super::{slot, World};

    /// Rules the world was loaded with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Immutable tile ownership grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tiles
    }

    /// Every lane in discovery order.
    #[must_use]
    pub fn lanes(world: &World) -> &[Lane] {
        &world.lanes
    }

    /// Looks up a lane by identifier.
    #[must_use]
    pub fn lane(world: &World, id: LaneId) -> Option<&Lane> {
        world.lane(id)
    }

    /// Lane and index covering the provided tile, if any.
    #[must_use]
    pub fn lane_position(world: &World, cell: CellCoord) -> Option<(LaneId, usize)> {
        world.lane_positions.get(&cell).copied()
    }

    /// Provides a read-only view of the occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        let (columns, rows) = world.occupancy.dimensions();
        OccupancyView::new(world.occupancy.cells(), columns, rows)
    }

    /// Captures every unit, including those swept as dead but not yet purged.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(world.units.iter().map(|unit| unit.snapshot()).collect())
    }

    /// Captures every standing tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures every demon spawner in map order.
    #[must_use]
    pub fn spawners(world: &World) -> Vec<SpawnerSnapshot> {
        world
            .spawners
            .iter()
            .map(|spawner| SpawnerSnapshot {
                id: spawner.id,
                cell: spawner.cell,
                target: spawner.target,
                reload_remaining: spawner.reload_remaining,
                reload_max: spawner.reload_max,
            })
            .collect()
    }

    /// Tile holding the team's base.
    #[must_use]
    pub fn base_cell(world: &World, team: Team) -> CellCoord {
        world.base(team).cell
    }

    /// Remaining health of the team's base.
    #[must_use]
    pub fn base_health(world: &World, team: Team) -> u32 {
        world.base(team).health
    }

    /// Treasury balance of the team.
    #[must_use]
    pub fn money(world: &World, team: Team) -> u32 {
        world.money[slot(team)]
    }

    /// Current price the team pays for the tower kind.
    #[must_use]
    pub fn tower_price(world: &World, team: Team, kind: TowerKind) -> u32 {
        world.towers.price(team, kind)
    }

    /// Directions the team has a mercenary waiting in.
    #[must_use]
    pub fn pending_directions(world: &World, team: Team) -> Vec<Direction> {
        world.base(team).pending.iter().copied().collect()
    }

    /// Every queued mercenary, red before blue, in direction order.
    #[must_use]
    pub fn pending_mercenaries(world: &World) -> Vec<PendingMercenary> {
        world
            .bases
            .iter()
            .flat_map(|base| {
                base.pending.iter().map(|direction| PendingMercenary {
                    team: base.team,
                    direction: *direction,
                })
            })
            .collect()
    }

    /// Reports whether exactly one team provoked the demons this turn.
    #[must_use]
    pub fn demon_surge(world: &World) -> bool {
        world.demon_surge
    }

    /// Aggregate figures consulted by the win-condition evaluator.
    #[must_use]
    pub fn standings(world: &World) -> Standings {
        let standing = |team: Team| {
            let mut figures = TeamStanding {
                base_health: world.base(team).health,
                money: world.money[slot(team)],
                ..TeamStanding::default()
            };
            for tower in world.towers.iter().filter(|tower| tower.team == team) {
                figures.tower_count += 1;
                figures.tower_base_price_total += u64::from(world.rules.tower(tower.kind).price);
            }
            for unit in world.units.iter() {
                if unit.class.is_mercenary()
                    && unit.class.target_team() != team
                    && unit.state != UnitState::Dead
                {
                    figures.mercenary_count += 1;
                    figures.mercenary_health_total += u64::from(unit.health);
                }
            }
            figures
        };
        Standings {
            red: standing(Team::Red),
            blue: standing(Team::Blue),
        }
    }

    /// Recorded match result, if decided.
    #[must_use]
    pub fn victory(world: &World) -> Option<Victory> {
        world.victory
    }

    /// Number of turns played so far.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Turns left before the limit.
    #[must_use]
    pub fn turns_remaining(world: &World) -> u32 {
        world.rules.max_turns.saturating_sub(world.turn)
    }

    /// Reports whether the match has ended by victory or by running out of turns.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.victory.is_some() || turns_remaining(world) == 0
    }

    /// Captures the complete state handed to agents and observers.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        super::snapshot::capture(world)
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![Cell::Empty; capacity],
        }
    }

    fn get(&self, cell: CellCoord) -> Cell {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or_default()
    }

    fn set(&mut self, cell: CellCoord, content: Cell) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = content;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        lane_battle_core::grid_index(self.columns, self.rows, cell)
    }

    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}

const fn slot(team: Team) -> usize {
    match team {
        Team::Red => 0,
        Team::Blue => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_battle_core::{Outcome, VictoryReason};

    const CORRIDOR: &str = r#"{
        "floor_tiles": ["rrrrrrr", "rOOOOOb", "bbbbbbb"],
        "red_base": {"x": 0, "y": 1},
        "blue_base": {"x": 6, "y": 1},
        "demon_spawners": [{"x": 3, "y": 1, "target_team": "b"}]
    }"#;

    fn world() -> World {
        World::from_json(CORRIDOR, Rules::default()).expect("corridor loads")
    }

    #[test]
    fn loading_places_bases_and_computes_lanes() {
        let world = world();
        let view = query::occupancy_view(&world);
        assert_eq!(view.cell(CellCoord::new(0, 1)), Cell::Base(Team::Red));
        assert_eq!(view.cell(CellCoord::new(6, 1)), Cell::Base(Team::Blue));
        assert_eq!(query::lanes(&world).len(), 1);
        assert_eq!(
            query::lane_position(&world, CellCoord::new(5, 1)),
            Some((LaneId::new(0), 4))
        );
        assert_eq!(query::spawners(&world)[0].reload_remaining, 10);
    }

    #[test]
    fn bases_may_sit_on_path_tiles() {
        let document = r#"{
            "floor_tiles": ["rrrrrrr", "OOOOOOO", "bbbbbbb"],
            "red_base": {"x": 0, "y": 1},
            "blue_base": {"x": 6, "y": 1}
        }"#;
        let world = World::from_json(document, Rules::default()).expect("corridor loads");

        assert_eq!(query::base_cell(&world, Team::Red), CellCoord::new(0, 1));
        assert_eq!(query::base_cell(&world, Team::Blue), CellCoord::new(6, 1));
        let lanes = query::lanes(&world);
        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes[0].len(), 5);
        assert_eq!(query::lane_position(&world, CellCoord::new(0, 1)), None);
        assert_eq!(
            query::lane_position(&world, CellCoord::new(5, 1)),
            Some((LaneId::new(0), 4))
        );
    }

    #[test]
    fn spawner_off_lane_fails_to_load() {
        let document = CORRIDOR.replace(r#""x": 3, "y": 1"#, r#""x": 3, "y": 0"#);
        assert!(matches!(
            World::from_json(&document, Rules::default()),
            Err(LoadError::SpawnerOffLane { column: 3, row: 0 })
        ));
    }

    #[test]
    fn base_outside_grid_fails_to_load() {
        let document = CORRIDOR.replace(r#""x": 6, "y": 1"#, r#""x": 9, "y": 1"#);
        assert!(matches!(
            World::from_json(&document, Rules::default()),
            Err(LoadError::BaseOutOfBounds { team: Team::Blue })
        ));
    }

    #[test]
    fn advancing_units_swap_through_vacated_tiles() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuyMercenary {
                team: Team::Red,
                direction: Direction::East,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnMercenary {
                team: Team::Red,
                direction: Direction::East,
            },
            &mut events,
        );
        let first = UnitId::new(0);
        apply(
            &mut world,
            Command::AdvanceUnits { units: vec![first] },
            &mut events,
        );
        apply(
            &mut world,
            Command::BuyMercenary {
                team: Team::Red,
                direction: Direction::East,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnMercenary {
                team: Team::Red,
                direction: Direction::East,
            },
            &mut events,
        );
        let second = UnitId::new(1);

        events.clear();
        apply(
            &mut world,
            Command::AdvanceUnits {
                units: vec![first, second],
            },
            &mut events,
        );

        let view = query::occupancy_view(&world);
        assert_eq!(view.unit_at(CellCoord::new(3, 1)), Some(first));
        assert_eq!(view.unit_at(CellCoord::new(2, 1)), Some(second));
        assert!(view.is_free(CellCoord::new(1, 1)));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn advancing_into_a_stationary_unit_is_refused() {
        let mut world = world();
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(
                &mut world,
                Command::BuyMercenary {
                    team: Team::Red,
                    direction: Direction::East,
                },
                &mut events,
            );
            apply(
                &mut world,
                Command::SpawnMercenary {
                    team: Team::Red,
                    direction: Direction::East,
                },
                &mut events,
            );
            if query::unit_view(&world).len() == 1 {
                apply(
                    &mut world,
                    Command::AdvanceUnits {
                        units: vec![UnitId::new(0)],
                    },
                    &mut events,
                );
            }
        }

        events.clear();
        apply(
            &mut world,
            Command::AdvanceUnits {
                units: vec![UnitId::new(1)],
            },
            &mut events,
        );

        assert!(events.is_empty());
        let units = query::unit_view(&world);
        let behind = units.get(UnitId::new(1)).expect("second unit");
        assert_eq!(behind.cell, CellCoord::new(1, 1));
        assert_eq!(behind.state, UnitState::Waiting);
    }

    #[test]
    fn sweep_clears_tiles_and_purge_drops_units() {
        let mut world = world();
        let mut events = Vec::new();
        for _ in 0..10 {
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
        let demon = UnitId::new(0);
        if let Some(unit) = world.units.get_mut(demon) {
            unit.health = 0;
        }

        apply(&mut world, Command::SweepMortalWounds, &mut events);
        assert!(query::occupancy_view(&world).is_free(CellCoord::new(3, 1)));
        assert_eq!(
            query::unit_view(&world).get(demon).map(|unit| unit.state),
            Some(UnitState::Dead)
        );

        apply(&mut world, Command::PurgeDead, &mut events);
        assert!(query::unit_view(&world).is_empty());
    }

    #[test]
    fn standings_count_base_prices_and_living_mercenaries() {
        let mut world = world();
        let mut events = Vec::new();
        for column in [1, 2] {
            apply(
                &mut world,
                Command::BuildTower {
                    team: Team::Red,
                    cell: CellCoord::new(column, 0),
                    kind: TowerKind::Crossbow,
                },
                &mut events,
            );
        }
        apply(
            &mut world,
            Command::BuyMercenary {
                team: Team::Blue,
                direction: Direction::West,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnMercenary {
                team: Team::Blue,
                direction: Direction::West,
            },
            &mut events,
        );

        let standings = query::standings(&world);
        assert_eq!(standings.red.tower_count, 2);
        assert_eq!(
            standings.red.tower_base_price_total, 16,
            "escalated prices are not counted"
        );
        assert_eq!(standings.red.money, 12);
        assert_eq!(standings.red.mercenary_count, 0);
        assert_eq!(standings.blue.mercenary_count, 1);
        assert_eq!(standings.blue.mercenary_health_total, 70);
    }

    #[test]
    fn blocked_spawn_keeps_the_purchase_pending() {
        let mut world = world();
        let mut events = Vec::new();
        let buy = Command::BuyMercenary {
            team: Team::Red,
            direction: Direction::East,
        };
        let spawn = Command::SpawnMercenary {
            team: Team::Red,
            direction: Direction::East,
        };
        apply(&mut world, buy.clone(), &mut events);
        apply(&mut world, spawn.clone(), &mut events);
        apply(&mut world, buy, &mut events);

        events.clear();
        apply(&mut world, spawn, &mut events);

        assert!(matches!(events.as_slice(), [Event::SpawnBlocked { .. }]));
        assert_eq!(
            query::pending_directions(&world, Team::Red),
            vec![Direction::East]
        );
        assert_eq!(query::unit_view(&world).len(), 1);
    }

    #[test]
    fn victory_is_recorded_once() {
        let mut world = world();
        let mut events = Vec::new();
        let first = Victory {
            outcome: Outcome::Winner(Team::Blue),
            reason: VictoryReason::BaseDestroyed,
        };
        apply(&mut world, Command::DeclareVictory { victory: first }, &mut events);
        apply(
            &mut world,
            Command::DeclareVictory {
                victory: Victory {
                    outcome: Outcome::Tie,
                    reason: VictoryReason::TiebreaksExhausted,
                },
            },
            &mut events,
        );

        assert_eq!(query::victory(&world), Some(first));
        assert_eq!(events.len(), 1);
        assert!(query::is_game_over(&world));
    }

    #[test]
    fn snapshot_uses_agent_field_names() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BuildTower {
                team: Team::Blue,
                cell: CellCoord::new(4, 2),
                kind: TowerKind::House,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnDemon {
                spawner: SpawnerId::new(0),
            },
            &mut events,
        );

        let snapshot = query::snapshot(&world);
        assert_eq!(snapshot.floor_tiles, vec!["rrrrrrr", "rOOOOOb", "bbbbbbb"]);
        assert_eq!(snapshot.entity_grid[1][0], "Base_R");
        assert_eq!(snapshot.entity_grid[1][6], "Base_B");
        assert_eq!(snapshot.entity_grid[1][3], snapshot.demons[0].name);
        assert_eq!(snapshot.entity_grid[2][4], snapshot.towers[0].name);
        assert_eq!(snapshot.blue_tower_prices.house, 12);

        let json = serde_json::to_value(&snapshot).expect("snapshot serializes");
        for key in [
            "CurrentTurn",
            "TurnsRemaining",
            "FloorTiles",
            "EntityGrid",
            "PlayerBaseR",
            "PlayerBaseB",
            "RedTeamMoney",
            "BlueTeamMoney",
            "TowerPricesR",
            "TowerPricesB",
            "Towers",
            "Mercenaries",
            "Demons",
            "DemonSpawners",
            "Victory",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["BlueTeamMoney"], 20);
    }
}
