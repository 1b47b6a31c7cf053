use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Direction, Team, TowerKind};

/// Raw per-turn action payload exchanged with agents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentAction {
    /// `"build"`, `"destroy"` or `"nothing"`.
    pub action: String,
    /// Target column of a build or destroy.
    pub x: i64,
    /// Target row of a build or destroy.
    pub y: i64,
    /// Tower kind name for builds, empty otherwise.
    pub tower_type: String,
    /// `"N"`, `"S"`, `"E"`, `"W"` to buy a mercenary, empty otherwise.
    pub merc_direction: String,
    /// Whether to pay for provoking the demons.
    pub provoke_demons: bool,
}

/// Reasons an agent payload cannot be turned into a [`TurnAction`].
#[derive(Debug, Error)]
pub enum ActionError {
    /// The payload is not a valid action object.
    #[error("malformed action payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The `action` field names no known structure action.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// A build names no known tower kind.
    #[error("unknown tower type `{0}`")]
    UnknownTowerKind(String),
    /// The mercenary direction is not one of N, S, E, W.
    #[error("unknown mercenary direction `{0}`")]
    UnknownDirection(String),
    /// A build or destroy targets a negative coordinate.
    #[error("coordinate ({x}, {y}) is negative")]
    NegativeCoordinate {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
    },
}

/// Tower-related part of a turn action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StructureAction {
    /// Leave the territory untouched.
    #[default]
    Nothing,
    /// Buy a tower on the provided tile.
    Build {
        /// Tile receiving the tower.
        cell: CellCoord,
        /// Kind of tower to buy.
        kind: TowerKind,
    },
    /// Remove the team's tower from the provided tile.
    Destroy {
        /// Tile holding the tower.
        cell: CellCoord,
    },
}

/// Validated action of a single team for a single turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TurnAction {
    /// Build, destroy or nothing.
    pub structure: StructureAction,
    /// Direction of a mercenary purchase, if any.
    pub mercenary: Option<Direction>,
    /// Whether the team pays to provoke the demons.
    pub provoke: bool,
}

impl TurnAction {
    /// An action that does nothing at all.
    #[must_use]
    pub const fn nothing() -> Self {
        Self {
            structure: StructureAction::Nothing,
            mercenary: None,
            provoke: false,
        }
    }

    /// Parses and validates a JSON agent payload.
    pub fn decode(payload: &str) -> Result<Self, ActionError> {
        let raw: AgentAction = serde_json::from_str(payload)?;
        Self::try_from(raw)
    }
}

/// Both teams' actions for a single turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TeamActions {
    /// Red team action.
    pub red: TurnAction,
    /// Blue team action.
    pub blue: TurnAction,
}

impl TeamActions {
    /// Pairs the two teams' actions.
    #[must_use]
    pub const fn new(red: TurnAction, blue: TurnAction) -> Self {
        Self { red, blue }
    }

    /// Action submitted by the provided team.
    #[must_use]
    pub const fn for_team(&self, team: Team) -> &TurnAction {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }
}

impl TryFrom<AgentAction> for TurnAction {
    type Error = ActionError;

    fn try_from(raw: AgentAction) -> Result<Self, Self::Error> {
        let cell = || -> Result<CellCoord, ActionError> {
            match (u32::try_from(raw.x), u32::try_from(raw.y)) {
                (Ok(column), Ok(row)) => Ok(CellCoord::new(column, row)),
                _ => Err(ActionError::NegativeCoordinate { x: raw.x, y: raw.y }),
            }
        };

        let structure = match raw.action.trim().to_ascii_lowercase().as_str() {
            "" | "nothing" => StructureAction::Nothing,
            "build" => {
                let kind = TowerKind::from_name(&raw.tower_type)
                    .ok_or_else(|| ActionError::UnknownTowerKind(raw.tower_type.clone()))?;
                StructureAction::Build { cell: cell()?, kind }
            }
            "destroy" => StructureAction::Destroy { cell: cell()? },
            _ => return Err(ActionError::UnknownAction(raw.action.clone())),
        };

        let direction = raw.merc_direction.trim().to_ascii_uppercase();
        let mercenary = if direction.is_empty() {
            None
        } else {
            Some(
                Direction::from_token(&direction)
                    .ok_or_else(|| ActionError::UnknownDirection(raw.merc_direction.clone()))?,
            )
        };

        Ok(Self {
            structure,
            mercenary,
            provoke: raw.provoke_demons,
        })
    }
}

impl From<TurnAction> for AgentAction {
    fn from(action: TurnAction) -> Self {
        let (verb, x, y, tower_type) = match action.structure {
            StructureAction::Nothing => ("nothing", 0, 0, String::new()),
            StructureAction::Build { cell, kind } => (
                "build",
                i64::from(cell.column()),
                i64::from(cell.row()),
                kind.name().to_owned(),
            ),
            StructureAction::Destroy { cell } => (
                "destroy",
                i64::from(cell.column()),
                i64::from(cell.row()),
                String::new(),
            ),
        };
        Self {
            action: verb.to_owned(),
            x,
            y,
            tower_type,
            merc_direction: action
                .mercenary
                .map(|direction| direction.token().to_owned())
                .unwrap_or_default(),
            provoke_demons: action.provoke,
        }
    }
}
