#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic lane-unit system that classifies units and proposes moves and strikes.

use std::collections::BTreeMap;

use lane_battle_core::{
    CellCoord, Command, Lane, LaneId, OccupancyView, UnitFamily, UnitId, UnitSnapshot,
    UnitState, UnitView,
};

/// Per-sub-step decision for a single unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Advance one lane tile.
    Move,
    /// Attack the nearest hostile ahead, or the base.
    Fight,
    /// Stay put without attacking.
    Wait,
}

/// Pure system that emits the hold, advance and strike commands of one sub-step.
#[derive(Debug, Default, Clone)]
pub struct LaneCombat;

impl LaneCombat {
    /// Creates a new lane combat system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Classifies every living unit of `family` and emits its commands.
    ///
    /// Commands come out as one `HoldUnits`, one `AdvanceUnits`, then one
    /// `Strike` per fighting unit in identifier order, so strikes land after
    /// every move and see damage dealt by earlier strikes.
    pub fn handle(
        &self,
        family: UnitFamily,
        lanes: &[Lane],
        units: &UnitView,
        occupancy: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        let decisions = classify(family, lanes, units, occupancy);

        let collect = |wanted: Decision| -> Vec<UnitId> {
            decisions
                .iter()
                .filter(|(_, decision)| **decision == wanted)
                .map(|(id, _)| *id)
                .collect()
        };

        let waiting = collect(Decision::Wait);
        if !waiting.is_empty() {
            out.push(Command::HoldUnits { units: waiting });
        }
        let moving = collect(Decision::Move);
        if !moving.is_empty() {
            out.push(Command::AdvanceUnits { units: moving });
        }
        for attacker in collect(Decision::Fight) {
            out.push(Command::Strike { attacker });
        }
    }
}

/// Decides what every living unit of `family` does this sub-step.
#[must_use]
pub fn classify(
    family: UnitFamily,
    lanes: &[Lane],
    units: &UnitView,
    occupancy: OccupancyView<'_>,
) -> BTreeMap<UnitId, Decision> {
    let board = Board {
        lanes,
        units,
        occupancy,
    };
    let participants: Vec<&UnitSnapshot> = units
        .iter()
        .filter(|unit| family.includes(unit.class) && unit.state != UnitState::Dead)
        .collect();

    let mut decisions: BTreeMap<UnitId, Decision> = participants
        .iter()
        .map(|unit| {
            let decision = if board.engages(unit) {
                Decision::Fight
            } else {
                Decision::Move
            };
            (unit.id, decision)
        })
        .collect();

    let fighters: Vec<&UnitSnapshot> = participants
        .iter()
        .copied()
        .filter(|unit| decisions.get(&unit.id) == Some(&Decision::Fight))
        .collect();
    for unit in fighters {
        board.hold_followers(unit, &mut decisions);
    }

    // Anything still moving into a tile that stays occupied has to wait.
    loop {
        let mut changed = false;
        for unit in &participants {
            if decisions.get(&unit.id) != Some(&Decision::Move) {
                continue;
            }
            let blocked = match board.cell_ahead(unit, 1) {
                None => true,
                Some(cell) => match board.occupancy.unit_at(cell) {
                    Some(occupant) => decisions.get(&occupant) != Some(&Decision::Move),
                    None => !board.occupancy.is_free(cell),
                },
            };
            if blocked {
                let _ = decisions.insert(unit.id, Decision::Wait);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    decisions
}

struct Board<'a> {
    lanes: &'a [Lane],
    units: &'a UnitView,
    occupancy: OccupancyView<'a>,
}

impl Board<'_> {
    fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.id() == id)
    }

    fn cell_ahead(&self, unit: &UnitSnapshot, distance: usize) -> Option<CellCoord> {
        self.lane(unit.lane)?
            .cell_ahead(unit.lane_index, unit.class.heading(), distance)
    }

    fn occupant(&self, cell: CellCoord) -> Option<&UnitSnapshot> {
        self.occupancy
            .unit_at(cell)
            .and_then(|id| self.units.get(id))
            .filter(|unit| unit.state != UnitState::Dead)
    }

    fn hostile_at(&self, unit: &UnitSnapshot, distance: usize) -> bool {
        self.cell_ahead(unit, distance)
            .and_then(|cell| self.occupant(cell))
            .is_some_and(|other| unit.class.is_hostile_to(other.class))
    }

    /// A unit engages when it stands next to the opposing base, faces a
    /// hostile directly ahead, or sees one two tiles ahead across a free tile.
    fn engages(&self, unit: &UnitSnapshot) -> bool {
        let Some(lane) = self.lane(unit.lane) else {
            return false;
        };
        if lane.is_terminal(unit.lane_index, unit.class.heading()) {
            return true;
        }
        if self.hostile_at(unit, 1) {
            return true;
        }
        let ahead_free = self
            .cell_ahead(unit, 1)
            .is_some_and(|cell| self.occupancy.is_free(cell));
        ahead_free && self.hostile_at(unit, 2)
    }

    /// Walks backward from a fighting unit, holding each contiguous ally.
    fn hold_followers(&self, leader: &UnitSnapshot, decisions: &mut BTreeMap<UnitId, Decision>) {
        let Some(lane) = self.lane(leader.lane) else {
            return;
        };
        let backward = leader.class.heading().reversed();
        let mut index = leader.lane_index;

        while let Some(behind) = lane.step(index, backward, 1) {
            let Some(follower) = lane.cell(behind).and_then(|cell| self.occupant(cell)) else {
                break;
            };
            if leader.class.is_hostile_to(follower.class) {
                break;
            }
            match decisions.get(&follower.id) {
                Some(Decision::Move) => {
                    let _ = decisions.insert(follower.id, Decision::Wait);
                }
                Some(Decision::Wait) => {}
                _ => break,
            }
            index = behind;
        }
    }
}
