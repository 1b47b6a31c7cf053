use serde::{Deserialize, Serialize};

use crate::{CellCoord, Direction, Team, TowerKind, UnitState, Victory};

/// Tile position in the `{x, y}` shape agents expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl From<CellCoord> for Position {
    fn from(cell: CellCoord) -> Self {
        Self {
            x: cell.column(),
            y: cell.row(),
        }
    }
}

impl From<Position> for CellCoord {
    fn from(position: Position) -> Self {
        CellCoord::new(position.x, position.y)
    }
}

/// Serialized state of a base.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseState {
    /// Column of the base.
    #[serde(rename = "x")]
    pub x: u32,
    /// Row of the base.
    #[serde(rename = "y")]
    pub y: u32,
    /// Remaining health.
    pub health: u32,
    /// Owning team.
    pub team: Team,
    /// Directions with a mercenary waiting to spawn.
    pub pending_mercenaries: Vec<Direction>,
}

/// Current per-kind tower prices of one team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerPriceTable {
    /// Current house price.
    pub house: u32,
    /// Current crossbow price.
    pub crossbow: u32,
    /// Current cannon price.
    pub cannon: u32,
    /// Current minigun price.
    pub minigun: u32,
    /// Current church price.
    pub church: u32,
}

impl TowerPriceTable {
    /// Builds a table by querying the price of every kind.
    pub fn collect(mut price: impl FnMut(TowerKind) -> u32) -> Self {
        Self {
            house: price(TowerKind::House),
            crossbow: price(TowerKind::Crossbow),
            cannon: price(TowerKind::Cannon),
            minigun: price(TowerKind::Minigun),
            church: price(TowerKind::Church),
        }
    }

    /// Price of the provided kind.
    #[must_use]
    pub const fn get(&self, kind: TowerKind) -> u32 {
        match kind {
            TowerKind::House => self.house,
            TowerKind::Crossbow => self.crossbow,
            TowerKind::Cannon => self.cannon,
            TowerKind::Minigun => self.minigun,
            TowerKind::Church => self.church,
        }
    }
}

/// Serialized state of a tower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TowerState {
    /// Flavor name.
    pub name: String,
    /// Tower kind.
    #[serde(rename = "Type")]
    pub kind: TowerKind,
    /// Owning team.
    pub team: Team,
    /// Column of the tower.
    #[serde(rename = "x")]
    pub x: u32,
    /// Row of the tower.
    #[serde(rename = "y")]
    pub y: u32,
    /// Ticks until the next activation.
    pub cooldown: u32,
    /// Cooldown restored after activation.
    pub max_cooldown: u32,
    /// Lane tiles within range.
    pub targets: Vec<Position>,
}

/// Serialized state of a mercenary or demon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnitRecord {
    /// Flavor name.
    pub name: String,
    /// Owning team for mercenaries, `None` for demons.
    pub team: Option<Team>,
    /// Team whose base the unit attacks.
    pub target_team: Team,
    /// Column of the unit.
    #[serde(rename = "x")]
    pub x: u32,
    /// Row of the unit.
    #[serde(rename = "y")]
    pub y: u32,
    /// Remaining health.
    pub health: u32,
    /// Damage per strike.
    pub attack: u32,
    /// Most recent movement or combat state.
    pub state: UnitState,
}

/// Serialized state of a demon spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpawnerState {
    /// Column of the spawner.
    #[serde(rename = "x")]
    pub x: u32,
    /// Row of the spawner.
    #[serde(rename = "y")]
    pub y: u32,
    /// Team attacked by spawned demons.
    pub target_team: Team,
    /// Ticks left before the next spawn attempt.
    pub reload_remaining: u32,
    /// Reload restored after a spawn.
    pub reload_time: u32,
}

/// Complete per-turn state handed to agents and observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameSnapshot {
    /// Turns played so far.
    pub current_turn: u32,
    /// Turns left before the limit.
    pub turns_remaining: u32,
    /// Tile tokens, one string per row.
    pub floor_tiles: Vec<String>,
    /// Occupant names per tile, empty strings for free tiles.
    pub entity_grid: Vec<Vec<String>>,
    /// Red base.
    #[serde(rename = "PlayerBaseR")]
    pub red_base: BaseState,
    /// Blue base.
    #[serde(rename = "PlayerBaseB")]
    pub blue_base: BaseState,
    /// Red treasury.
    pub red_team_money: u32,
    /// Blue treasury.
    pub blue_team_money: u32,
    /// Red tower prices.
    #[serde(rename = "TowerPricesR")]
    pub red_tower_prices: TowerPriceTable,
    /// Blue tower prices.
    #[serde(rename = "TowerPricesB")]
    pub blue_tower_prices: TowerPriceTable,
    /// Standing towers in id order.
    pub towers: Vec<TowerState>,
    /// Living mercenaries in spawn order.
    pub mercenaries: Vec<UnitRecord>,
    /// Living demons in spawn order.
    pub demons: Vec<UnitRecord>,
    /// Demon spawners in map order.
    pub demon_spawners: Vec<SpawnerState>,
    /// Decided result, `None` while the match runs or after it timed out.
    pub victory: Option<Victory>,
}

impl GameSnapshot {
    /// Treasury of the provided team.
    #[must_use]
    pub const fn money(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red_team_money,
            Team::Blue => self.blue_team_money,
        }
    }

    /// Base state of the provided team.
    #[must_use]
    pub const fn base(&self, team: Team) -> &BaseState {
        match team {
            Team::Red => &self.red_base,
            Team::Blue => &self.blue_base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_state_uses_agent_keys() {
        let base = BaseState {
            x: 1,
            y: 2,
            health: 200,
            team: Team::Red,
            pending_mercenaries: vec![Direction::North],
        };
        let json = serde_json::to_value(&base).expect("json");
        assert_eq!(json["x"], 1);
        assert_eq!(json["Health"], 200);
        assert_eq!(json["Team"], "r");
        assert_eq!(json["PendingMercenaries"][0], "N");
    }
}
