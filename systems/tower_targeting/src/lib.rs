#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that ticks tower cooldowns and selects targets for ready towers.

use std::cmp::Ordering;

use lane_battle_core::{
    CellCoord, Command, Lane, OccupancyView, Team, TowerKind, TowerSnapshot, UnitClass, UnitId,
    UnitSnapshot, UnitView,
};
use rand::Rng;

/// Tower targeting system that reuses a scratch buffer between towers.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the command for a single tower this tick.
    ///
    /// Towers are handled one at a time against fresh views so that each
    /// tower sees the damage dealt by the towers before it. A tower still
    /// cooling down only ticks. Offensive towers without an enemy in range
    /// emit nothing and stay ready for the next tick.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        tower: &TowerSnapshot,
        lanes: &[Lane],
        units: &UnitView,
        occupancy: OccupancyView<'_>,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        if tower.cooldown > 0 {
            out.push(Command::CoolDownTower { tower: tower.id });
            return;
        }

        match tower.kind {
            TowerKind::House => out.push(Command::CollectIncome { tower: tower.id }),
            TowerKind::Church => {
                let friend = UnitClass::Mercenary { team: tower.team };
                let units = units_in_range(tower, units, occupancy)
                    .filter(|unit| unit.class == friend)
                    .map(|unit| unit.id)
                    .collect();
                out.push(Command::Bless {
                    tower: tower.id,
                    units,
                });
            }
            TowerKind::Minigun => {
                let targets: Vec<UnitId> = units_in_range(tower, units, occupancy)
                    .filter(|unit| unit.class.is_enemy_of(tower.team))
                    .map(|unit| unit.id)
                    .collect();
                if !targets.is_empty() {
                    out.push(Command::FireTower {
                        tower: tower.id,
                        targets,
                    });
                }
            }
            TowerKind::Crossbow | TowerKind::Cannon => {
                let Some(primary) = self.select(tower, lanes, units, occupancy, rng) else {
                    return;
                };
                let mut targets = vec![primary];
                if tower.kind == TowerKind::Cannon {
                    targets.extend(splash(tower.team, primary, lanes, units, occupancy));
                }
                out.push(Command::FireTower {
                    tower: tower.id,
                    targets,
                });
            }
        }
    }

    /// Picks the single enemy a crossbow or cannon aims at.
    fn select<R: Rng + ?Sized>(
        &mut self,
        tower: &TowerSnapshot,
        lanes: &[Lane],
        units: &UnitView,
        occupancy: OccupancyView<'_>,
        rng: &mut R,
    ) -> Option<UnitId> {
        self.candidates.clear();
        for unit in units_in_range(tower, units, occupancy) {
            if !unit.class.is_enemy_of(tower.team) {
                continue;
            }
            let Some(lane) = lanes.iter().find(|lane| lane.id() == unit.lane) else {
                continue;
            };
            self.candidates.push(Candidate {
                unit: unit.id,
                distance: lane.distance_to_base(unit.lane_index, tower.team),
                health: unit.health,
                attack: unit.attack,
            });
        }

        let best = self
            .candidates
            .iter()
            .copied()
            .reduce(|best, next| if next.precedes(&best) { next } else { best })?;
        let tied: Vec<UnitId> = self
            .candidates
            .iter()
            .filter(|candidate| candidate.rank(&best) == Ordering::Equal)
            .map(|candidate| candidate.unit)
            .collect();

        match tied.as_slice() {
            [only] => Some(*only),
            _ => tied.get(rng.gen_range(0..tied.len())).copied(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    unit: UnitId,
    distance: usize,
    health: u32,
    attack: u32,
}

impl Candidate {
    /// Orders by distance to the owner's base, then higher health, then higher attack.
    fn rank(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.health.cmp(&self.health))
            .then_with(|| other.attack.cmp(&self.attack))
    }

    fn precedes(&self, other: &Self) -> bool {
        self.rank(other) == Ordering::Less
    }
}

/// Living units standing on the tower's in-range lane tiles, in tile order.
fn units_in_range<'a>(
    tower: &'a TowerSnapshot,
    units: &'a UnitView,
    occupancy: OccupancyView<'a>,
) -> impl Iterator<Item = &'a UnitSnapshot> + 'a {
    tower
        .lane_cells
        .iter()
        .filter_map(move |cell| occupant(*cell, units, occupancy))
}

fn occupant<'a>(
    cell: CellCoord,
    units: &'a UnitView,
    occupancy: OccupancyView<'_>,
) -> Option<&'a UnitSnapshot> {
    occupancy
        .unit_at(cell)
        .and_then(|id| units.get(id))
        .filter(|unit| unit.is_alive() && unit.health > 0)
}

/// Second cannon victim: the enemy directly ahead of the target, else directly behind.
fn splash(
    team: Team,
    primary: UnitId,
    lanes: &[Lane],
    units: &UnitView,
    occupancy: OccupancyView<'_>,
) -> Option<UnitId> {
    let target = units.get(primary)?;
    let lane = lanes.iter().find(|lane| lane.id() == target.lane)?;
    let heading = target.class.heading();

    [heading, heading.reversed()]
        .into_iter()
        .filter_map(|toward| lane.cell_ahead(target.lane_index, toward, 1))
        .filter_map(|cell| occupant(cell, units, occupancy))
        .find(|unit| unit.id != primary && unit.class.is_enemy_of(team))
        .map(|unit| unit.id)
}
