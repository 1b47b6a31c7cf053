//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use lane_battle_core::{CellCoord, Rules, Team, TileGrid, TowerId, TowerKind, TowerSnapshot};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Owning team.
    pub(crate) team: Team,
    pub(crate) name: String,
    /// Tile the tower stands on.
    pub(crate) cell: CellCoord,
    pub(crate) cooldown: u32,
    pub(crate) max_cooldown: u32,
    /// Damage, income or healing applied per activation.
    pub(crate) power: u32,
    pub(crate) range: u32,
    /// Lane tiles within Euclidean range, row-major.
    pub(crate) lane_cells: Vec<CellCoord>,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            team: self.team,
            name: self.name.clone(),
            cell: self.cell,
            cooldown: self.cooldown,
            max_cooldown: self.max_cooldown,
            power: self.power,
            range: self.range,
            lane_cells: self.lane_cells.clone(),
        }
    }

    /// Restores the cooldown after an activation.
    pub(crate) fn reset_cooldown(&mut self) {
        self.cooldown = self.max_cooldown;
    }
}

/// Registry that stores towers, prices and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    prices: BTreeMap<(Team, TowerKind), u32>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with catalogue prices.
    pub(crate) fn new(rules: &Rules) -> Self {
        let prices = Team::ALL
            .into_iter()
            .flat_map(|team| {
                TowerKind::ALL
                    .into_iter()
                    .map(move |kind| ((team, kind), rules.tower(kind).price))
            })
            .collect();
        Self {
            entries: BTreeMap::new(),
            prices,
            next_tower_id: TowerId::new(0),
        }
    }

    /// Current price the team pays for the kind.
    pub(crate) fn price(&self, team: Team, kind: TowerKind) -> u32 {
        self.prices.get(&(team, kind)).copied().unwrap_or_default()
    }

    /// Applies one compounding price increase after a purchase.
    pub(crate) fn escalate(&mut self, team: Team, kind: TowerKind, rules: &Rules) {
        let current = self.price(team, kind);
        let _ = self.prices.insert((team, kind), rules.escalate(current));
    }

    /// Builds and stores a tower, returning its identifier.
    pub(crate) fn insert(
        &mut self,
        team: Team,
        kind: TowerKind,
        cell: CellCoord,
        name: String,
        rules: &Rules,
        tiles: &TileGrid,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));

        let stats = rules.tower(kind);
        let power = match kind {
            TowerKind::Church => rules.church_heal,
            _ => stats.power,
        };
        let state = TowerState {
            id,
            kind,
            team,
            name,
            cell,
            cooldown: stats.cooldown,
            max_cooldown: stats.cooldown,
            power,
            range: stats.range,
            lane_cells: lane_cells_in_range(tiles, cell, stats.range),
        };
        let _ = self.entries.insert(id, state);
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Towers in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}

/// Collects every lane tile whose centre lies within `range` of `origin`.
pub(crate) fn lane_cells_in_range(tiles: &TileGrid, origin: CellCoord, range: u32) -> Vec<CellCoord> {
    let reach = u64::from(range) * u64::from(range);
    let min_column = origin.column().saturating_sub(range);
    let max_column = origin
        .column()
        .saturating_add(range)
        .min(tiles.columns().saturating_sub(1));
    let min_row = origin.row().saturating_sub(range);
    let max_row = origin
        .row()
        .saturating_add(range)
        .min(tiles.rows().saturating_sub(1));

    (min_row..=max_row)
        .flat_map(|row| (min_column..=max_column).map(move |column| CellCoord::new(column, row)))
        .filter(|cell| origin.distance_squared(*cell) <= reach && tiles.is_lane_path(*cell))
        .collect()
}
