#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure economy system translating team actions into purchase commands.

use lane_battle_core::{Command, StructureAction, Team, TeamActions};

/// Purchase phases run before the world update, in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Tower construction and removal.
    Structures,
    /// Mercenary purchases.
    Mercenaries,
    /// Demon provocation and its resolution.
    Provocation,
}

impl Phase {
    /// Every phase in execution order.
    pub const ORDER: [Phase; 3] = [Phase::Structures, Phase::Mercenaries, Phase::Provocation];
}

/// Economy system that emits the purchase commands of a single phase.
///
/// Validation belongs to the world: commands are emitted for every requested
/// purchase and the world rejects unaffordable or illegal ones.
#[derive(Debug, Default, Clone)]
pub struct Economy;

impl Economy {
    /// Creates a new economy system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits the commands for `phase`, red before blue.
    pub fn handle(&self, phase: Phase, actions: &TeamActions, out: &mut Vec<Command>) {
        match phase {
            Phase::Structures => {
                for team in Team::ALL {
                    match actions.for_team(team).structure {
                        StructureAction::Nothing => {}
                        StructureAction::Build { cell, kind } => {
                            out.push(Command::BuildTower { team, cell, kind });
                        }
                        StructureAction::Destroy { cell } => {
                            out.push(Command::DestroyTower { team, cell });
                        }
                    }
                }
            }
            Phase::Mercenaries => {
                for team in Team::ALL {
                    if let Some(direction) = actions.for_team(team).mercenary {
                        out.push(Command::BuyMercenary { team, direction });
                    }
                }
            }
            Phase::Provocation => {
                for team in Team::ALL {
                    if actions.for_team(team).provoke {
                        out.push(Command::ProvokeDemons { team });
                    }
                }
                out.push(Command::ResolveProvocation);
            }
        }
    }
}
