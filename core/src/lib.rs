#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the lane battle engine.
//!
//! This crate defines the message surface that connects the orchestrator, the
//! authoritative world, and pure systems. Systems read immutable views and
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what actually happened. Rejected commands never mutate
//! state; they surface as rejection events carrying a typed reason.

mod action;
mod rules;
mod snapshot;

pub use action::{ActionError, AgentAction, StructureAction, TeamActions, TurnAction};
pub use rules::{Rules, TowerStats};
pub use snapshot::{
    BaseState, GameSnapshot, Position, SpawnerState, TowerPriceTable, TowerState, UnitRecord,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// The red side. Lanes are indexed starting next to its base.
    #[serde(rename = "r")]
    Red,
    /// The blue side. Lanes terminate next to its base.
    #[serde(rename = "b")]
    Blue,
}

impl Team {
    /// Both teams in processing order.
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// Returns the opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Human readable name used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }
}

/// Cardinal directions used for lane origins and mercenary purchases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    #[serde(rename = "N")]
    North,
    /// Movement toward increasing row indices.
    #[serde(rename = "S")]
    South,
    /// Movement toward increasing column indices.
    #[serde(rename = "E")]
    East,
    /// Movement toward decreasing column indices.
    #[serde(rename = "W")]
    West,
}

impl Direction {
    /// All directions in lane discovery order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Parses the single-letter wire token (`"N"`, `"S"`, `"E"`, `"W"`).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "N" => Some(Self::North),
            "S" => Some(Self::South),
            "E" => Some(Self::East),
            "W" => Some(Self::West),
            _ => None,
        }
    }

    /// Single-letter wire token for the direction.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::South => "S",
            Self::East => "E",
            Self::West => "W",
        }
    }

    /// Column and row delta of a single step.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// Location of a single tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Squared Euclidean distance between two coordinates.
    #[must_use]
    pub fn distance_squared(self, other: CellCoord) -> u64 {
        let dx = u64::from(self.column().abs_diff(other.column()));
        let dy = u64::from(self.row().abs_diff(other.row()));
        dx * dx + dy * dy
    }

    /// Neighbouring coordinate one step away, if it does not underflow.
    ///
    /// Upper bounds are not checked; callers validate against their grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = u32::try_from(i64::from(self.column) + dx).ok()?;
        let row = u32::try_from(i64::from(self.row) + dy).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Reports whether the two coordinates share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Ownership token for a single floor tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Buildable territory owned by the red team.
    RedTerritory,
    /// Buildable territory owned by the blue team.
    BlueTerritory,
    /// Walkable corridor shared by lane units.
    LanePath,
}

impl TileKind {
    /// Parses the map token (`r`, `b` or `O`).
    #[must_use]
    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            'r' => Some(Self::RedTerritory),
            'b' => Some(Self::BlueTerritory),
            'O' => Some(Self::LanePath),
            _ => None,
        }
    }

    /// Map token for the tile.
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::RedTerritory => 'r',
            Self::BlueTerritory => 'b',
            Self::LanePath => 'O',
        }
    }

    /// Team owning the tile, or `None` for lane tiles.
    #[must_use]
    pub const fn owner(self) -> Option<Team> {
        match self {
            Self::RedTerritory => Some(Team::Red),
            Self::BlueTerritory => Some(Team::Blue),
            Self::LanePath => None,
        }
    }
}

/// Immutable tile ownership grid loaded from the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Creates a grid from row-major tiles. Returns `None` when the tile count
    /// does not match the dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tiles: Vec<TileKind>) -> Option<Self> {
        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).ok()?;
        (tiles.len() == expected).then_some(Self {
            columns,
            rows,
            tiles,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Tile stored at the coordinate, if inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        grid_index(self.columns, self.rows, cell).and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the coordinate is a lane tile.
    #[must_use]
    pub fn is_lane_path(&self, cell: CellCoord) -> bool {
        self.tile(cell) == Some(TileKind::LanePath)
    }

    /// Iterates over the rows of the grid as token strings.
    pub fn token_rows(&self) -> impl Iterator<Item = String> + '_ {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.tiles
            .chunks(width)
            .map(|row| row.iter().map(|tile| tile.token()).collect())
    }
}

/// Row-major index of a coordinate inside a `columns` x `rows` grid.
#[must_use]
pub fn grid_index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    } else {
        None
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a lane unit. Allocation order is spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a demon spawner in map order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnerId(u32);

impl SpawnerId {
    /// Creates a new spawner identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a lane inside the world's lane table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(u32);

impl LaneId {
    /// Creates a new lane identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Non-owning reference to an entity stored in the occupancy grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    /// A tower built on team territory.
    Tower(TowerId),
    /// A mercenary or demon walking a lane.
    Unit(UnitId),
}

/// Content of a single occupancy grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing occupies the tile.
    #[default]
    Empty,
    /// The tile holds a team's base.
    Base(Team),
    /// The tile holds a tower or lane unit.
    Occupied(EntityId),
}

impl Cell {
    /// Reports whether the cell holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Lane unit stored in the cell, if any.
    #[must_use]
    pub const fn unit(&self) -> Option<UnitId> {
        match self {
            Self::Occupied(EntityId::Unit(unit)) => Some(*unit),
            _ => None,
        }
    }

    /// Tower stored in the cell, if any.
    #[must_use]
    pub const fn tower(&self) -> Option<TowerId> {
        match self {
            Self::Occupied(EntityId::Tower(tower)) => Some(*tower),
            _ => None,
        }
    }
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Cell],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the cell content, treating out-of-bounds coordinates as empty.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Cell {
        grid_index(self.columns, self.rows, cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or_default()
    }

    /// Returns the lane unit occupying the provided cell, if any.
    #[must_use]
    pub fn unit_at(&self, cell: CellCoord) -> Option<UnitId> {
        self.cell(cell).unit()
    }

    /// Reports whether the cell is currently empty.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_empty()
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}

/// Direction of travel along a lane's index array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Toward higher indices, i.e. toward the blue base.
    TowardBlue,
    /// Toward lower indices, i.e. toward the red base.
    TowardRed,
}

impl Heading {
    /// Heading taken by units attacking the provided team.
    #[must_use]
    pub const fn attacking(team: Team) -> Self {
        match team {
            Team::Blue => Self::TowardBlue,
            Team::Red => Self::TowardRed,
        }
    }

    /// The opposite heading.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::TowardBlue => Self::TowardRed,
            Self::TowardRed => Self::TowardBlue,
        }
    }
}

/// A single branch-free corridor connecting the two bases.
///
/// Index 0 is adjacent to the red base and the final index is adjacent to the
/// blue base. Consecutive coordinates are always one orthogonal step apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    id: LaneId,
    origin: Direction,
    cells: Vec<CellCoord>,
}

impl Lane {
    /// Creates a lane from its ordered coordinates.
    #[must_use]
    pub fn new(id: LaneId, origin: Direction, cells: Vec<CellCoord>) -> Self {
        Self { id, origin, cells }
    }

    /// Identifier of the lane.
    #[must_use]
    pub const fn id(&self) -> LaneId {
        self.id
    }

    /// Direction from the red base in which the lane starts.
    #[must_use]
    pub const fn origin(&self) -> Direction {
        self.origin
    }

    /// Ordered coordinates of the lane.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of tiles in the lane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the lane holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Coordinate stored at the provided index.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).copied()
    }

    /// Index `distance` steps from `index` along `heading`, if still on the lane.
    #[must_use]
    pub fn step(&self, index: usize, heading: Heading, distance: usize) -> Option<usize> {
        let next = match heading {
            Heading::TowardBlue => index.checked_add(distance)?,
            Heading::TowardRed => index.checked_sub(distance)?,
        };
        (next < self.cells.len()).then_some(next)
    }

    /// Coordinate `distance` steps from `index` along `heading`.
    #[must_use]
    pub fn cell_ahead(&self, index: usize, heading: Heading, distance: usize) -> Option<CellCoord> {
        self.step(index, heading, distance)
            .and_then(|next| self.cell(next))
    }

    /// Reports whether `index` is the last tile before the base `heading` points at.
    #[must_use]
    pub fn is_terminal(&self, index: usize, heading: Heading) -> bool {
        match heading {
            Heading::TowardBlue => index + 1 == self.cells.len(),
            Heading::TowardRed => index == 0,
        }
    }

    /// Number of lane steps between `index` and the provided team's base end.
    #[must_use]
    pub fn distance_to_base(&self, index: usize, team: Team) -> usize {
        match team {
            Team::Red => index,
            Team::Blue => self.cells.len().saturating_sub(index + 1),
        }
    }
}

/// Types of towers that can be constructed on team territory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// Generates income for its owner.
    House,
    /// Single target, fast firing.
    Crossbow,
    /// Single target with splash onto one neighbouring enemy.
    Cannon,
    /// Damages every enemy in range.
    Minigun,
    /// Heals friendly mercenaries in range.
    Church,
}

impl TowerKind {
    /// All tower kinds in catalogue order.
    pub const ALL: [TowerKind; 5] = [
        TowerKind::House,
        TowerKind::Crossbow,
        TowerKind::Cannon,
        TowerKind::Minigun,
        TowerKind::Church,
    ];

    /// Parses the wire name (`"crossbow"`, `"cannon"`, ...), ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Wire name of the tower kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Crossbow => "crossbow",
            Self::Cannon => "cannon",
            Self::Minigun => "minigun",
            Self::Church => "church",
        }
    }

    /// Short code used when allocating tower names.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::House => "HS",
            Self::Crossbow => "CB",
            Self::Cannon => "CN",
            Self::Minigun => "MG",
            Self::Church => "CH",
        }
    }
}

/// Identity and allegiance of a lane unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// A purchased mercenary fighting for `team`.
    Mercenary {
        /// Team that bought the mercenary.
        team: Team,
    },
    /// A neutral demon attacking `target`.
    Demon {
        /// Team whose base the demon walks toward.
        target: Team,
    },
}

impl UnitClass {
    /// Team whose base the unit walks toward and attacks.
    #[must_use]
    pub const fn target_team(self) -> Team {
        match self {
            Self::Mercenary { team } => team.opponent(),
            Self::Demon { target } => target,
        }
    }

    /// Direction of travel along the lane.
    #[must_use]
    pub const fn heading(self) -> Heading {
        Heading::attacking(self.target_team())
    }

    /// Reports whether the unit is a mercenary.
    #[must_use]
    pub const fn is_mercenary(self) -> bool {
        matches!(self, Self::Mercenary { .. })
    }

    /// Reports whether the unit is a demon.
    #[must_use]
    pub const fn is_demon(self) -> bool {
        matches!(self, Self::Demon { .. })
    }

    /// Reports whether two units fight each other on contact.
    #[must_use]
    pub fn is_hostile_to(self, other: UnitClass) -> bool {
        match (self, other) {
            (Self::Mercenary { team: a }, Self::Mercenary { team: b }) => a != b,
            (Self::Mercenary { team }, Self::Demon { target })
            | (Self::Demon { target }, Self::Mercenary { team }) => team == target,
            (Self::Demon { target: a }, Self::Demon { target: b }) => a != b,
        }
    }

    /// Reports whether the unit is an enemy of the provided team's towers.
    #[must_use]
    pub fn is_enemy_of(self, team: Team) -> bool {
        self.is_hostile_to(Self::Mercenary { team })
    }
}

/// Which family of units a lane-combat sub-step processes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    /// Mercenaries of both teams.
    Mercenaries,
    /// Demons regardless of target.
    Demons,
}

impl UnitFamily {
    /// Reports whether the unit class belongs to the family.
    #[must_use]
    pub const fn includes(self, class: UnitClass) -> bool {
        match self {
            Self::Mercenaries => class.is_mercenary(),
            Self::Demons => class.is_demon(),
        }
    }
}

/// Per-turn movement and combat state of a lane unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitState {
    /// Advanced one lane tile this turn.
    Moving,
    /// Attacked (or tried to attack) this turn.
    Fighting,
    /// Blocked behind an ally or a neutral unit this turn.
    Waiting,
    /// Mortally wounded and awaiting removal.
    Dead,
}

/// Immutable representation of a single lane unit used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Identity and allegiance.
    pub class: UnitClass,
    /// Flavor name used in logs and snapshots.
    pub name: String,
    /// Lane the unit walks.
    pub lane: LaneId,
    /// Index of the unit inside its lane.
    pub lane_index: usize,
    /// Tile currently occupied by the unit.
    pub cell: CellCoord,
    /// Remaining health.
    pub health: u32,
    /// Damage dealt per strike.
    pub attack: u32,
    /// State assigned during the most recent sub-step.
    pub state: UnitState,
}

impl UnitSnapshot {
    /// Reports whether the unit has not been swept as dead.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != UnitState::Dead
    }
}

/// Read-only snapshot describing all lane units in deterministic id order.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in id order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a unit by identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of captured units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Owning team.
    pub team: Team,
    /// Flavor name used in logs and snapshots.
    pub name: String,
    /// Tile the tower stands on.
    pub cell: CellCoord,
    /// Ticks left until the tower may activate.
    pub cooldown: u32,
    /// Cooldown restored after an activation.
    pub max_cooldown: u32,
    /// Damage (or healing for churches) applied per activation.
    pub power: u32,
    /// Euclidean range in tiles.
    pub range: u32,
    /// Lane tiles within range, precomputed at construction.
    pub lane_cells: Vec<CellCoord>,
}

/// Read-only snapshot describing all towers in deterministic id order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in id order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a demon spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnerSnapshot {
    /// Identifier of the spawner.
    pub id: SpawnerId,
    /// Lane tile on which demons appear.
    pub cell: CellCoord,
    /// Team attacked by spawned demons.
    pub target: Team,
    /// Ticks left before the next spawn attempt.
    pub reload_remaining: u32,
    /// Reload restored after a successful spawn.
    pub reload_max: u32,
}

/// A base's queued mercenary purchase waiting to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PendingMercenary {
    /// Team that bought the mercenary.
    pub team: Team,
    /// Direction from the base where the mercenary appears.
    pub direction: Direction,
}

/// Aggregate figures used by the win-condition evaluator for one team.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamStanding {
    /// Remaining base health.
    pub base_health: u32,
    /// Treasury balance.
    pub money: u32,
    /// Towers currently standing.
    pub tower_count: u32,
    /// Sum of unescalated prices of the towers currently standing.
    pub tower_base_price_total: u64,
    /// Living mercenaries.
    pub mercenary_count: u32,
    /// Summed health of living mercenaries.
    pub mercenary_health_total: u64,
}

/// Standings of both teams captured at the same instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Standings {
    /// Red team figures.
    pub red: TeamStanding,
    /// Blue team figures.
    pub blue: TeamStanding,
}

impl Standings {
    /// Figures for the provided team.
    #[must_use]
    pub const fn team(&self, team: Team) -> &TeamStanding {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }
}

/// Final result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The team won.
    Winner(Team),
    /// No criterion separated the teams.
    Tie,
}

/// Why a match ended the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryReason {
    /// Only the loser's base was destroyed.
    BaseDestroyed,
    /// Both bases fell; decided by treasury.
    TreasuryTiebreak,
    /// Both bases fell; decided by towers standing.
    TowerCountTiebreak,
    /// Both bases fell; decided by summed base tower price.
    TowerSpendTiebreak,
    /// Both bases fell; decided by surviving mercenaries.
    MercenaryCountTiebreak,
    /// Both bases fell; decided by summed mercenary health.
    MercenaryHealthTiebreak,
    /// Every tie-break criterion was equal.
    TiebreaksExhausted,
}

/// Decided result together with its reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Victory {
    /// Winning team or tie.
    pub outcome: Outcome,
    /// Criterion that decided the outcome.
    pub reason: VictoryReason,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested tile lies outside the grid.
    #[error("tile is outside the map")]
    OutOfBounds,
    /// The tile is not the building team's territory.
    #[error("tile is not the team's territory")]
    ForeignTerritory,
    /// The tile already holds something.
    #[error("tile is already occupied")]
    Occupied,
    /// The treasury cannot cover the current price.
    #[error("insufficient funds: price {price}, available {available}")]
    InsufficientFunds {
        /// Current price of the requested kind.
        price: u32,
        /// Treasury balance at the time of the request.
        available: u32,
    },
}

/// Reasons a tower removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RemovalError {
    /// The requested tile lies outside the grid.
    #[error("tile is outside the map")]
    OutOfBounds,
    /// The tile is not the removing team's territory.
    #[error("tile is not the team's territory")]
    ForeignTerritory,
    /// No tower stands on the tile.
    #[error("no tower on the tile")]
    MissingTower,
}

/// Reasons a mercenary purchase may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PurchaseError {
    /// The treasury cannot cover the mercenary price.
    #[error("insufficient funds: price {price}, available {available}")]
    InsufficientFunds {
        /// Mercenary price.
        price: u32,
        /// Treasury balance at the time of the request.
        available: u32,
    },
    /// The tile next to the base in that direction is not a lane.
    #[error("no lane leaves the base in that direction")]
    NoLane,
    /// A mercenary is already waiting to spawn in that direction.
    #[error("a mercenary is already queued in that direction")]
    AlreadyQueued,
}

/// Reasons a demon provocation may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ProvokeError {
    /// The treasury cannot cover the provocation price.
    #[error("insufficient funds: price {price}, available {available}")]
    InsufficientFunds {
        /// Provocation price.
        price: u32,
        /// Treasury balance at the time of the request.
        available: u32,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Buys and places a tower on the team's territory.
    BuildTower {
        /// Team paying for the tower.
        team: Team,
        /// Tile receiving the tower.
        cell: CellCoord,
        /// Kind of tower to construct.
        kind: TowerKind,
    },
    /// Removes the team's tower from a tile and refunds half its current price.
    DestroyTower {
        /// Team requesting the removal.
        team: Team,
        /// Tile holding the tower.
        cell: CellCoord,
    },
    /// Queues a mercenary next to the team's base.
    BuyMercenary {
        /// Team paying for the mercenary.
        team: Team,
        /// Side of the base where it spawns.
        direction: Direction,
    },
    /// Pays to provoke the demons this turn.
    ProvokeDemons {
        /// Team paying for the provocation.
        team: Team,
    },
    /// Settles this turn's provocations and clears them.
    ResolveProvocation,
    /// Drops units swept as dead from the active collections.
    PurgeDead,
    /// Marks units as blocked for this sub-step.
    HoldUnits {
        /// Units that neither move nor attack.
        units: Vec<UnitId>,
    },
    /// Advances units one lane step using remove-all then place-all ordering.
    AdvanceUnits {
        /// Units that move this sub-step.
        units: Vec<UnitId>,
    },
    /// Resolves a single unit's attack against the current board.
    Strike {
        /// Unit performing the attack.
        attacker: UnitId,
    },
    /// Flags units at zero health as dead and clears their tiles.
    SweepMortalWounds,
    /// Spawns a queued mercenary if its spawn tile is free.
    SpawnMercenary {
        /// Team that bought the mercenary.
        team: Team,
        /// Side of the base where it spawns.
        direction: Direction,
    },
    /// Decrements a demon spawner's reload timer.
    CountDownSpawner {
        /// Spawner to tick.
        spawner: SpawnerId,
    },
    /// Spawns a demon if the spawner tile is free and resets its timer.
    SpawnDemon {
        /// Spawner emitting the demon.
        spawner: SpawnerId,
    },
    /// Decrements a tower's cooldown.
    CoolDownTower {
        /// Tower to tick.
        tower: TowerId,
    },
    /// Damages the listed units with the tower's power and resets its cooldown.
    FireTower {
        /// Tower firing.
        tower: TowerId,
        /// Units hit, primary target first.
        targets: Vec<UnitId>,
    },
    /// Credits a house's income and resets its cooldown.
    CollectIncome {
        /// House producing income.
        tower: TowerId,
    },
    /// Heals the listed friendly mercenaries and resets the church's cooldown.
    Bless {
        /// Church applying the effect.
        tower: TowerId,
        /// Friendly units healed.
        units: Vec<UnitId>,
    },
    /// Records the match result.
    DeclareVictory {
        /// Decided result.
        victory: Victory,
    },
    /// Advances the turn counter by one.
    AdvanceTurn,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Owning team.
        team: Team,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile holding the tower.
        cell: CellCoord,
        /// Price paid.
        price: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Team that requested the placement.
        team: Team,
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Tile provided in the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was removed from the world.
    TowerRemoved {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Owning team.
        team: Team,
        /// Tile previously holding the tower.
        cell: CellCoord,
        /// Amount credited back to the team.
        refund: u32,
    },
    /// Reports that a tower removal request was rejected.
    TowerRemovalRejected {
        /// Team that requested the removal.
        team: Team,
        /// Tile provided in the request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms a mercenary purchase.
    MercenaryQueued {
        /// Buying team.
        team: Team,
        /// Side of the base where it spawns.
        direction: Direction,
    },
    /// Reports that a mercenary purchase was rejected.
    MercenaryPurchaseRejected {
        /// Buying team.
        team: Team,
        /// Requested direction.
        direction: Direction,
        /// Specific reason the purchase failed.
        reason: PurchaseError,
    },
    /// Confirms that a team paid to provoke the demons.
    DemonsProvoked {
        /// Provoking team.
        team: Team,
    },
    /// Reports that a provocation was rejected.
    ProvocationRejected {
        /// Team that tried to provoke.
        team: Team,
        /// Specific reason the provocation failed.
        reason: ProvokeError,
    },
    /// Both teams provoked; every demon was removed.
    DemonsWiped {
        /// Number of demons removed.
        count: u32,
    },
    /// Exactly one team provoked; spawners fire an extra pass this turn.
    DemonSurgeTriggered {
        /// Provoking team.
        team: Team,
    },
    /// A unit advanced one lane tile.
    UnitAdvanced {
        /// Unit that moved.
        unit: UnitId,
        /// Previous tile.
        from: CellCoord,
        /// New tile.
        to: CellCoord,
    },
    /// A unit damaged another unit.
    UnitStruck {
        /// Unit attacking.
        attacker: UnitId,
        /// Unit hit.
        target: UnitId,
        /// Damage dealt.
        damage: u32,
        /// Target health after the hit.
        remaining: u32,
    },
    /// A unit damaged a base.
    BaseStruck {
        /// Unit attacking.
        attacker: UnitId,
        /// Team owning the base.
        team: Team,
        /// Damage dealt.
        damage: u32,
        /// Base health after the hit.
        remaining: u32,
    },
    /// A unit was swept as dead and removed from the board.
    UnitKilled {
        /// Unit that died.
        unit: UnitId,
        /// Identity of the unit.
        class: UnitClass,
        /// Tile it died on.
        cell: CellCoord,
    },
    /// A unit was created on a lane.
    UnitSpawned {
        /// Identifier assigned to the unit.
        unit: UnitId,
        /// Identity of the unit.
        class: UnitClass,
        /// Tile the unit occupies.
        cell: CellCoord,
    },
    /// A spawn attempt found its tile occupied.
    SpawnBlocked {
        /// Identity of the unit that could not spawn.
        class: UnitClass,
        /// Occupied tile.
        cell: CellCoord,
    },
    /// A tower damaged a unit.
    TowerFired {
        /// Tower firing.
        tower: TowerId,
        /// Unit hit.
        target: UnitId,
        /// Damage dealt.
        damage: u32,
        /// Target health after the hit.
        remaining: u32,
    },
    /// A house produced income.
    IncomeCollected {
        /// House producing the income.
        tower: TowerId,
        /// Credited team.
        team: Team,
        /// Amount credited.
        amount: u32,
    },
    /// A church healed a unit.
    UnitBlessed {
        /// Church applying the effect.
        tower: TowerId,
        /// Unit healed.
        unit: UnitId,
        /// Health restored.
        amount: u32,
    },
    /// The match result was decided.
    VictoryDeclared {
        /// Decided result.
        victory: Victory,
    },
    /// The turn counter advanced.
    TurnAdvanced {
        /// Number of turns played so far.
        turn: u32,
        /// Turns left before the limit.
        remaining: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn lane_round_trips_through_bincode() {
        let lane = Lane::new(
            LaneId::new(2),
            Direction::East,
            vec![CellCoord::new(3, 1), CellCoord::new(4, 1)],
        );
        assert_round_trip(&lane);
        assert_round_trip(&Victory {
            outcome: Outcome::Winner(Team::Blue),
            reason: VictoryReason::TowerSpendTiebreak,
        });
    }

    #[test]
    fn team_and_direction_use_wire_tokens() {
        assert_eq!(serde_json::to_string(&Team::Red).expect("json"), "\"r\"");
        assert_eq!(
            serde_json::to_string(&Direction::West).expect("json"),
            "\"W\""
        );
        assert_eq!(
            serde_json::to_string(&TowerKind::Minigun).expect("json"),
            "\"minigun\""
        );
    }

    #[test]
    fn lane_steps_respect_heading_and_bounds() {
        let lane = Lane::new(
            LaneId::new(0),
            Direction::North,
            (0..4).map(|row| CellCoord::new(0, row)).collect(),
        );
        assert_eq!(lane.step(1, Heading::TowardBlue, 2), Some(3));
        assert_eq!(lane.step(2, Heading::TowardBlue, 2), None);
        assert_eq!(lane.step(1, Heading::TowardRed, 1), Some(0));
        assert_eq!(lane.step(0, Heading::TowardRed, 1), None);
        assert!(lane.is_terminal(3, Heading::TowardBlue));
        assert!(lane.is_terminal(0, Heading::TowardRed));
        assert_eq!(lane.distance_to_base(1, Team::Red), 1);
        assert_eq!(lane.distance_to_base(1, Team::Blue), 2);
    }

    #[test]
    fn hostility_is_symmetric() {
        let red = UnitClass::Mercenary { team: Team::Red };
        let blue = UnitClass::Mercenary { team: Team::Blue };
        let at_red = UnitClass::Demon { target: Team::Red };
        let at_blue = UnitClass::Demon { target: Team::Blue };
        let all = [red, blue, at_red, at_blue];
        for a in all {
            for b in all {
                assert_eq!(a.is_hostile_to(b), b.is_hostile_to(a));
            }
        }
        assert!(red.is_hostile_to(blue));
        assert!(red.is_hostile_to(at_red));
        assert!(!red.is_hostile_to(at_blue));
        assert!(at_red.is_hostile_to(at_blue));
        assert!(at_red.is_enemy_of(Team::Red));
        assert!(!at_blue.is_enemy_of(Team::Red));
    }

    #[test]
    fn euclidean_distance_is_not_manhattan() {
        let origin = CellCoord::new(2, 2);
        let diagonal = CellCoord::new(4, 4);
        assert_eq!(origin.distance_squared(diagonal), 8);
        assert_eq!(origin.manhattan_distance(diagonal), 4);
    }

    #[test]
    fn tile_grid_rejects_mismatched_dimensions() {
        assert!(TileGrid::new(2, 2, vec![TileKind::LanePath; 3]).is_none());
        let grid = TileGrid::new(2, 1, vec![TileKind::RedTerritory, TileKind::LanePath])
            .expect("grid");
        assert_eq!(grid.token_rows().collect::<Vec<_>>(), vec!["rO".to_owned()]);
        assert!(grid.is_lane_path(CellCoord::new(1, 0)));
        assert_eq!(grid.tile(CellCoord::new(2, 0)), None);
    }
}
