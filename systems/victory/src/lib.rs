#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic win-condition evaluator with the tie-break cascade.

mod cascade;

use lane_battle_core::{Command, Outcome, Standings, Team, Victory, VictoryReason};

/// Pure system that declares a victory once a base has fallen.
#[derive(Debug, Default, Clone)]
pub struct WinCondition;

impl WinCondition {
    /// Creates a new win-condition system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits `DeclareVictory` when the standings decide the match.
    pub fn handle(&self, standings: &Standings, out: &mut Vec<Command>) {
        if let Some(victory) = evaluate(standings) {
            out.push(Command::DeclareVictory { victory });
        }
    }
}

/// Decides the match from the current standings, if it is over.
///
/// A single destroyed base hands the win to the other team. When both fall
/// in the same step the cascade compares treasury, standing towers, their
/// summed base price, surviving mercenaries and their summed health, in that
/// order, and declares a tie when every criterion is level.
#[must_use]
pub fn evaluate(standings: &Standings) -> Option<Victory> {
    let fallen = |team: Team| standings.team(team).base_health == 0;

    match (fallen(Team::Red), fallen(Team::Blue)) {
        (false, false) => None,
        (true, true) => Some(cascade::resolve(standings)),
        (red_down, _) => {
            let loser = if red_down { Team::Red } else { Team::Blue };
            Some(Victory {
                outcome: Outcome::Winner(loser.opponent()),
                reason: VictoryReason::BaseDestroyed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_battle_core::TeamStanding;

    fn standing(base_health: u32) -> TeamStanding {
        TeamStanding {
            base_health,
            money: 10,
            ..TeamStanding::default()
        }
    }

    #[test]
    fn healthy_bases_decide_nothing() {
        let standings = Standings {
            red: standing(5),
            blue: standing(1),
        };
        assert_eq!(evaluate(&standings), None);

        let mut out = Vec::new();
        WinCondition::new().handle(&standings, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn single_fallen_base_loses() {
        let standings = Standings {
            red: standing(0),
            blue: standing(40),
        };
        let mut out = Vec::new();
        WinCondition::new().handle(&standings, &mut out);
        assert_eq!(
            out,
            vec![Command::DeclareVictory {
                victory: Victory {
                    outcome: Outcome::Winner(Team::Blue),
                    reason: VictoryReason::BaseDestroyed,
                },
            }]
        );
    }

    #[test]
    fn fallen_blue_base_hands_red_the_win() {
        let standings = Standings {
            red: standing(3),
            blue: standing(0),
        };
        assert_eq!(standings.team(Team::Blue).base_health, 0);
        assert_eq!(
            evaluate(&standings),
            Some(Victory {
                outcome: Outcome::Winner(Team::Red),
                reason: VictoryReason::BaseDestroyed,
            })
        );
    }
}
