//! Lane corridor discovery used when loading a map.

use std::collections::HashSet;

use lane_battle_core::{CellCoord, Direction, Lane, LaneId, TileGrid};

use crate::LoadError;

/// Walks every corridor leaving the red base and returns them in discovery order.
///
/// Directions without an adjacent lane tile produce no lane. A corridor that
/// forks or stops before reaching the blue base aborts the load.
pub(crate) fn discover(
    tiles: &TileGrid,
    red_base: CellCoord,
    blue_base: CellCoord,
) -> Result<Vec<Lane>, LoadError> {
    let mut lanes = Vec::new();
    for direction in Direction::ALL {
        let Some(start) = red_base.step(direction) else {
            continue;
        };
        if start == blue_base || !tiles.is_lane_path(start) {
            continue;
        }

        let id = LaneId::new(u32::try_from(lanes.len()).unwrap_or(u32::MAX));
        let cells = walk(tiles, direction, start, [red_base, blue_base])?;
        lanes.push(Lane::new(id, direction, cells));
    }
    Ok(lanes)
}

fn walk(
    tiles: &TileGrid,
    direction: Direction,
    start: CellCoord,
    bases: [CellCoord; 2],
) -> Result<Vec<CellCoord>, LoadError> {
    let [red_base, blue_base] = bases;
    let mut cells = vec![start];
    // Bases may sit on path tokens; they are never part of a lane.
    let mut visited = HashSet::from([start, red_base, blue_base]);
    let mut current = start;

    loop {
        if current.is_adjacent(blue_base) {
            return Ok(cells);
        }

        let mut candidates = neighbors(current, tiles.columns(), tiles.rows())
            .filter(|neighbor| tiles.is_lane_path(*neighbor) && !visited.contains(neighbor));
        let Some(next) = candidates.next() else {
            return Err(LoadError::DeadEndLane {
                direction,
                column: current.column(),
                row: current.row(),
            });
        };
        if candidates.next().is_some() {
            return Err(LoadError::BranchingLane {
                direction,
                column: current.column(),
                row: current.row(),
            });
        }

        let _ = visited.insert(next);
        cells.push(next);
        current = next;
    }
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_battle_core::TileKind;

    fn grid(rows: &[&str]) -> TileGrid {
        let columns = u32::try_from(rows[0].len()).expect("width");
        let tiles = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|token| TileKind::from_token(token).expect("token"))
            .collect();
        TileGrid::new(columns, u32::try_from(rows.len()).expect("height"), tiles)
            .expect("grid")
    }

    #[test]
    fn straight_corridor_yields_every_tile_in_order() {
        let tiles = grid(&["rOOOOb"]);
        let lanes = discover(&tiles, CellCoord::new(0, 0), CellCoord::new(5, 0)).expect("lanes");

        assert_eq!(lanes.len(), 1);
        let lane = &lanes[0];
        assert_eq!(lane.origin(), Direction::East);
        assert_eq!(lane.len(), 4);
        for pair in lane.cells().windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
        assert_eq!(lane.cell(0), Some(CellCoord::new(1, 0)));
        assert_eq!(lane.cell(3), Some(CellCoord::new(4, 0)));
    }

    #[test]
    fn bending_corridor_follows_the_turn() {
        let tiles = grid(&["rOOr", "rrOr", "bbOb", "bbbb"]);
        let lanes = discover(&tiles, CellCoord::new(0, 0), CellCoord::new(2, 3)).expect("lanes");

        assert_eq!(
            lanes[0].cells(),
            &[
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
            ]
        );
    }

    #[test]
    fn fork_is_a_branching_error() {
        let tiles = grid(&["rOOOb", "rrOrr", "rrOrr"]);
        let error = discover(&tiles, CellCoord::new(0, 0), CellCoord::new(4, 0))
            .expect_err("fork must fail");

        assert!(matches!(
            error,
            LoadError::BranchingLane {
                direction: Direction::East,
                column: 2,
                row: 0,
            }
        ));
    }

    #[test]
    fn corridor_that_stops_short_is_a_dead_end() {
        let tiles = grid(&["rOOrb"]);
        let error = discover(&tiles, CellCoord::new(0, 0), CellCoord::new(4, 0))
            .expect_err("dead end must fail");

        assert!(matches!(error, LoadError::DeadEndLane { column: 2, .. }));
    }

    #[test]
    fn bases_on_path_tiles_are_not_mistaken_for_forks() {
        let tiles = grid(&["rrrrrrr", "OOOOOOO", "bbbbbbb"]);
        let lanes = discover(&tiles, CellCoord::new(0, 1), CellCoord::new(6, 1)).expect("lanes");

        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes[0].origin(), Direction::East);
        assert_eq!(
            lanes[0].cells(),
            &[
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                CellCoord::new(4, 1),
                CellCoord::new(5, 1),
            ]
        );
    }

    #[test]
    fn directions_without_lane_tiles_are_skipped() {
        let tiles = grid(&["rrr", "rOr", "rOr", "bbb"]);
        let lanes = discover(&tiles, CellCoord::new(1, 0), CellCoord::new(1, 3)).expect("lanes");

        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes[0].origin(), Direction::South);
        assert_eq!(lanes[0].id(), LaneId::new(0));
    }
}
