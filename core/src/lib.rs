#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;
mod grid_space;
mod layout;

use std::collections::{vec_deque, VecDeque};

use serde::{Deserialize, Serialize};

pub use config::{
    ConfigError, GameConfig, NavigatorConfig, PursuerConfig, PursuitConfig, ScreenConfig,
};
pub use grid_space::{GridBounds, GridSpace};
pub use layout::{Cell, LayoutError, LevelLayout, WorkingLayout};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Opens a new simulation frame.
    BeginFrame,
    /// Buffers a directional request coming from the input source.
    QueueDirection {
        /// Direction pressed by the player.
        direction: Direction,
    },
    /// Moves the navigator by one frame worth of travel.
    AdvanceNavigator,
    /// Hands a freshly planned route to a pursuer.
    AssignRoute {
        /// Identifier of the pursuer receiving the route.
        pursuer: PursuerId,
        /// Cells leading from the pursuer's cell (exclusive) to its target (inclusive).
        route: Route,
    },
    /// Moves every pursuer one frame along its route.
    AdvancePursuers,
    /// Removes the dots currently covered by the navigator.
    ConsumeDots,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that a new frame started.
    FrameStarted {
        /// Monotonic index of the frame, starting at one.
        frame: u64,
    },
    /// Reports that the navigator changed heading.
    NavigatorTurned {
        /// Heading before the change.
        from: Direction,
        /// Heading after the change.
        to: Direction,
    },
    /// Reports that a perpendicular turn was buffered until the navigator aligns.
    TurnQueued {
        /// Direction that will be applied once the commit coordinate is passed.
        direction: Direction,
        /// Pixel coordinate along the travel axis that must be passed first.
        commit_coordinate: f32,
    },
    /// Reports that a wall ahead prevented the navigator from moving.
    NavigatorBlocked {
        /// Wall cell that stopped the navigator.
        wall: GridPosition,
    },
    /// Confirms that the navigator entered a different grid cell.
    ///
    /// This is the only event that causes pursuers to replan.
    NavigatorCellChanged {
        /// Cell recorded before the move, absent on the very first frame.
        from: Option<GridPosition>,
        /// Cell the navigator occupies now.
        to: GridPosition,
    },
    /// Confirms that a pursuer adopted a new route.
    RouteAssigned {
        /// Identifier of the pursuer that adopted the route.
        pursuer: PursuerId,
        /// Number of cells in the adopted route.
        length: usize,
        /// Whether the pursuer's own cell was prepended to stay grid aligned.
        stitched: bool,
    },
    /// Reports that a pursuer received an empty route and will idle.
    PursuerStranded {
        /// Identifier of the idle pursuer.
        pursuer: PursuerId,
    },
    /// Confirms that a pursuer snapped onto the next node of its route.
    PursuerReachedCell {
        /// Identifier of the pursuer that arrived.
        pursuer: PursuerId,
        /// Cell the pursuer snapped onto.
        cell: GridPosition,
    },
    /// Confirms that the navigator ate a dot.
    DotConsumed {
        /// Cell whose dot was removed.
        cell: GridPosition,
    },
    /// Announces that the final dot of the level was consumed.
    LevelCleared,
}

/// Cardinal movement directions available to the navigator and the path search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

struct DirectionTraits {
    opposite: Direction,
    grid_delta: (i64, i64),
    heading_degrees: f32,
}

static DIRECTION_TABLE: [DirectionTraits; 4] = [
    DirectionTraits {
        opposite: Direction::Down,
        grid_delta: (0, -1),
        heading_degrees: -90.0,
    },
    DirectionTraits {
        opposite: Direction::Up,
        grid_delta: (0, 1),
        heading_degrees: 90.0,
    },
    DirectionTraits {
        opposite: Direction::Right,
        grid_delta: (-1, 0),
        heading_degrees: 180.0,
    },
    DirectionTraits {
        opposite: Direction::Left,
        grid_delta: (1, 0),
        heading_degrees: 0.0,
    },
];

impl Direction {
    /// Every direction in the enumeration order used by the path search.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    fn traits(self) -> &'static DirectionTraits {
        &DIRECTION_TABLE[self.index()]
    }

    /// Direction pointing the other way along the same axis.
    #[must_use]
    pub fn opposite(self) -> Direction {
        self.traits().opposite
    }

    /// Reports whether `other` reverses this direction.
    ///
    /// Reversals never wait for grid alignment, so the navigator treats them
    /// as instantaneous.
    #[must_use]
    pub fn is_same_axis(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Signed column and row offsets of a single grid step.
    #[must_use]
    pub fn grid_delta(self) -> (i64, i64) {
        self.traits().grid_delta
    }

    /// Unit pixel delta of a single step in this direction.
    #[must_use]
    pub fn unit_delta(self) -> (f32, f32) {
        let (column, row) = self.grid_delta();
        (column as f32, row as f32)
    }

    /// Sprite rotation in degrees, with zero facing right and positive angles clockwise.
    #[must_use]
    pub fn heading_degrees(self) -> f32 {
        self.traits().heading_degrees
    }
}

/// Unique identifier assigned to a pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PursuerId(u32);

impl PursuerId {
    /// Creates a new pursuer identifier with the provided numeric value.
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

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    column: u32,
    row: u32,
}

impl GridPosition {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridPosition) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Continuous screen-space position measured in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPosition {
    /// Horizontal coordinate, growing to the right.
    pub x: f32,
    /// Vertical coordinate, growing downward.
    pub y: f32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: PixelPosition) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position shifted by `distance` pixels along `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.unit_delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }
}

/// Ordered cells a pursuer intends to visit.
///
/// The route excludes the cell the search started from and ends at the target
/// cell. An empty route means the pursuer has nowhere to go.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    cells: VecDeque<GridPosition>,
}

impl Route {
    /// Creates an empty route.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next cell the pursuer should head toward.
    #[must_use]
    pub fn first(&self) -> Option<GridPosition> {
        self.cells.front().copied()
    }

    /// Final cell of the route.
    #[must_use]
    pub fn last(&self) -> Option<GridPosition> {
        self.cells.back().copied()
    }

    /// Number of cells remaining in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the route has no cells left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterator over the remaining cells in travel order.
    pub fn iter(&self) -> vec_deque::Iter<'_, GridPosition> {
        self.cells.iter()
    }

    /// Inserts a cell ahead of every other cell in the route.
    pub fn prepend(&mut self, cell: GridPosition) {
        self.cells.push_front(cell);
    }

    /// Removes and returns the next cell of the route.
    pub fn pop_front(&mut self) -> Option<GridPosition> {
        self.cells.pop_front()
    }
}

impl From<Vec<GridPosition>> for Route {
    fn from(cells: Vec<GridPosition>) -> Self {
        Self {
            cells: cells.into(),
        }
    }
}

impl FromIterator<GridPosition> for Route {
    fn from_iter<I: IntoIterator<Item = GridPosition>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a GridPosition;
    type IntoIter = vec_deque::Iter<'a, GridPosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Immutable representation of the navigator's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigatorSnapshot {
    /// Current pixel position.
    pub position: PixelPosition,
    /// Current heading, used for sprite orientation.
    pub direction: Direction,
    /// Perpendicular turn waiting for the commit coordinate, if any.
    pub queued_direction: Option<Direction>,
    /// Grid cell the navigator occupies.
    pub cell: GridPosition,
    /// Movement radius used for screen wrapping and dot consumption.
    pub radius: f32,
}

/// Immutable representation of a single pursuer's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PursuerSnapshot {
    /// Unique identifier assigned to the pursuer.
    pub id: PursuerId,
    /// Name used by renderers to select a sprite.
    pub name: String,
    /// Current pixel position.
    pub position: PixelPosition,
    /// Grid cell nearest to the pursuer's position.
    pub cell: GridPosition,
    /// Cells the pursuer still has to visit.
    pub route: Route,
    /// Travel speed in pixels per frame.
    pub speed: f32,
}

/// Read-only snapshot describing all pursuers within the maze.
#[derive(Clone, Debug, Default)]
pub struct PursuerView {
    snapshots: Vec<PursuerSnapshot>,
}

impl PursuerView {
    /// Creates a new pursuer view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PursuerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured pursuer snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PursuerSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the pursuer with the provided identifier.
    #[must_use]
    pub fn get(&self, id: PursuerId) -> Option<&PursuerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of pursuers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view holds no pursuers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PursuerSnapshot> {
        self.snapshots
    }
}
