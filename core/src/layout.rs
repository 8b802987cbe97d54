//! Static level occupancy and the disposable copies used by path searches.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GridBounds, GridPosition};

/// Occupancy state of a single level cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Traversable space.
    Open,
    /// Solid wall that neither the navigator nor pursuers may enter.
    Wall,
}

impl Cell {
    /// Numeric representation used by level tables (`0` open, `1` wall).
    #[must_use]
    pub const fn to_bit(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Wall => 1,
        }
    }

    fn from_bit(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Open),
            1 => Some(Self::Wall),
            _ => None,
        }
    }
}

/// Reasons a level table may be rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The table contained no rows or its first row contained no cells.
    #[error("level layout must contain at least one cell")]
    Empty,
    /// A row did not match the width of the first row.
    #[error("row {row} has {found} cells but the level is {expected} cells wide")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A numeric cell was neither `0` nor `1`.
    #[error("cell ({column}, {row}) has value {value}; expected 0 (open) or 1 (wall)")]
    InvalidCell {
        /// Zero-based column of the offending cell.
        column: usize,
        /// Zero-based row of the offending cell.
        row: usize,
        /// Value found in the table.
        value: u8,
    },
    /// A textual cell was neither `.` nor `#`.
    #[error("cell ({column}, {row}) has glyph {glyph:?}; expected '.' (open) or '#' (wall)")]
    InvalidGlyph {
        /// Zero-based column of the offending cell.
        column: usize,
        /// Zero-based row of the offending cell.
        row: usize,
        /// Character found in the text.
        glyph: char,
    },
    /// The level does not fit the coordinate range.
    #[error("level dimensions {columns}x{rows} exceed the supported range")]
    TooLarge {
        /// Number of columns requested.
        columns: usize,
        /// Number of rows requested.
        rows: usize,
    },
}

/// Immutable wall/open grid describing a level.
///
/// Clones share the same cell storage, so a single template can be handed to
/// every search without copying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct LevelLayout {
    bounds: GridBounds,
    cells: Arc<[Cell]>,
}

impl LevelLayout {
    /// Builds a layout from rows of `0` (open) and `1` (wall) values.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, LayoutError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            for (column_index, &value) in row.iter().enumerate() {
                let cell = Cell::from_bit(value).ok_or(LayoutError::InvalidCell {
                    column: column_index,
                    row: row_index,
                    value,
                })?;
                cells.push(cell);
            }
        }

        Self::from_cells(width, rows.len(), cells)
    }

    /// Builds a layout from text where `#` marks walls and `.` marks open cells.
    ///
    /// Leading and trailing whitespace on every line is ignored, as are blank
    /// lines.
    pub fn from_ascii(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.first().map_or(0, |line| line.chars().count());
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(width * lines.len());
        for (row_index, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found,
                });
            }
            for (column_index, glyph) in line.chars().enumerate() {
                let cell = match glyph {
                    '.' => Cell::Open,
                    '#' => Cell::Wall,
                    _ => {
                        return Err(LayoutError::InvalidGlyph {
                            column: column_index,
                            row: row_index,
                            glyph,
                        })
                    }
                };
                cells.push(cell);
            }
        }

        Self::from_cells(width, lines.len(), cells)
    }

    fn from_cells(columns: usize, rows: usize, cells: Vec<Cell>) -> Result<Self, LayoutError> {
        let too_large = || LayoutError::TooLarge { columns, rows };
        let column_count = u32::try_from(columns).map_err(|_| too_large())?;
        let row_count = u32::try_from(rows).map_err(|_| too_large())?;

        Ok(Self {
            bounds: GridBounds::new(column_count, row_count),
            cells: cells.into(),
        })
    }

    /// Builds a layout from a row-major table that is already known to fit `bounds`.
    ///
    /// Any non-zero value is treated as a wall.
    pub(crate) fn from_bits(bounds: GridBounds, bits: impl IntoIterator<Item = u8>) -> Self {
        let cells = bits
            .into_iter()
            .map(|bit| if bit == 0 { Cell::Open } else { Cell::Wall })
            .collect();
        Self { bounds, cells }
    }

    /// Number of columns in the level.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.bounds.columns()
    }

    /// Number of rows in the level.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.bounds.rows()
    }

    /// Bounds of the level used for clamping.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// State of the provided cell, if it lies inside the level.
    #[must_use]
    pub fn cell(&self, position: GridPosition) -> Option<Cell> {
        index(self.bounds, position).and_then(|offset| self.cells.get(offset).copied())
    }

    /// Whether the cell is a wall. Cells outside the level count as walls.
    #[must_use]
    pub fn is_wall(&self, position: GridPosition) -> bool {
        self.cell(position).map_or(true, |cell| cell == Cell::Wall)
    }

    /// Whether the cell is open for traversal.
    #[must_use]
    pub fn is_open(&self, position: GridPosition) -> bool {
        !self.is_wall(position)
    }

    /// Iterator over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, Cell)> + '_ {
        let columns = self.columns().max(1);
        self.cells.iter().enumerate().map(move |(offset, cell)| {
            let offset = u32::try_from(offset).unwrap_or(u32::MAX);
            (GridPosition::new(offset % columns, offset / columns), *cell)
        })
    }

    /// Iterator over every open cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.iter()
            .filter(|(_, cell)| *cell == Cell::Open)
            .map(|(position, _)| position)
    }

    /// Rows of `0` (open) and `1` (wall) values describing the level.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        let width = usize::try_from(self.columns()).unwrap_or(0).max(1);
        self.cells
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.to_bit()).collect())
            .collect()
    }

    /// Creates a private mutable copy used to mark cells during one search.
    #[must_use]
    pub fn working_copy(&self) -> WorkingLayout {
        WorkingLayout {
            bounds: self.bounds,
            cells: self.cells.to_vec(),
        }
    }
}

impl TryFrom<Vec<Vec<u8>>> for LevelLayout {
    type Error = LayoutError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<LevelLayout> for Vec<Vec<u8>> {
    fn from(layout: LevelLayout) -> Self {
        layout.to_rows()
    }
}

/// Scratch copy of a [`LevelLayout`] owned by a single path search.
///
/// Cells are marked as walls once visited, so the search never enters the
/// same cell twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingLayout {
    bounds: GridBounds,
    cells: Vec<Cell>,
}

impl WorkingLayout {
    /// Bounds of the copied level.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Whether the cell is a wall or was already marked. Cells outside the level count as walls.
    #[must_use]
    pub fn is_wall(&self, position: GridPosition) -> bool {
        index(self.bounds, position)
            .and_then(|offset| self.cells.get(offset))
            .map_or(true, |cell| *cell == Cell::Wall)
    }

    /// Marks the cell as a wall in this copy only.
    pub fn mark_wall(&mut self, position: GridPosition) {
        if let Some(slot) = index(self.bounds, position).and_then(|offset| self.cells.get_mut(offset))
        {
            *slot = Cell::Wall;
        }
    }
}

fn index(bounds: GridBounds, position: GridPosition) -> Option<usize> {
    if !bounds.contains(position) {
        return None;
    }
    let row = usize::try_from(position.row()).ok()?;
    let column = usize::try_from(position.column()).ok()?;
    let width = usize::try_from(bounds.columns()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_reads_walls_and_open_cells() {
        let layout = LevelLayout::from_rows(vec![vec![0, 1, 0], vec![1, 0, 0]])
            .expect("valid layout");

        assert_eq!(layout.columns(), 3);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.cell(GridPosition::new(1, 0)), Some(Cell::Wall));
        assert_eq!(layout.cell(GridPosition::new(2, 1)), Some(Cell::Open));
        assert!(layout.is_wall(GridPosition::new(0, 1)));
        assert!(layout.is_wall(GridPosition::new(3, 0)));
        assert_eq!(layout.cell(GridPosition::new(3, 0)), None);
    }

    #[test]
    fn from_rows_rejects_malformed_tables() {
        assert_eq!(LevelLayout::from_rows(Vec::new()), Err(LayoutError::Empty));
        assert_eq!(
            LevelLayout::from_rows(vec![vec![0, 0], vec![0]]),
            Err(LayoutError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            LevelLayout::from_rows(vec![vec![0, 2]]),
            Err(LayoutError::InvalidCell {
                column: 1,
                row: 0,
                value: 2
            })
        );
    }

    #[test]
    fn from_ascii_matches_numeric_rows() {
        let ascii = LevelLayout::from_ascii(
            "
            ..#.
            #...
            ",
        )
        .expect("valid ascii layout");
        let rows = LevelLayout::from_rows(vec![vec![0, 0, 1, 0], vec![1, 0, 0, 0]])
            .expect("valid numeric layout");

        assert_eq!(ascii, rows);
        assert!(matches!(
            LevelLayout::from_ascii("..x"),
            Err(LayoutError::InvalidGlyph { glyph: 'x', .. })
        ));
    }

    #[test]
    fn open_cells_are_listed_in_row_major_order() {
        let layout = LevelLayout::from_ascii("#.\n.#").expect("valid layout");
        let open: Vec<GridPosition> = layout.open_cells().collect();

        assert_eq!(open, vec![GridPosition::new(1, 0), GridPosition::new(0, 1)]);
        assert_eq!(layout.to_rows(), vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn working_copy_marks_do_not_touch_template() {
        let layout = LevelLayout::from_ascii("...").expect("valid layout");
        let mut working = layout.working_copy();
        let cell = GridPosition::new(1, 0);

        working.mark_wall(cell);

        assert!(working.is_wall(cell));
        assert!(layout.is_open(cell));
        assert!(!layout.working_copy().is_wall(cell));
    }

    #[test]
    fn layout_deserializes_from_toml_rows() {
        #[derive(Deserialize)]
        struct Level {
            cells: LevelLayout,
        }

        let level: Level = toml::from_str("cells = [[0, 1], [0, 0]]").expect("valid toml");
        assert!(level.cells.is_wall(GridPosition::new(1, 0)));

        let broken = toml::from_str::<Level>("cells = [[0, 1], [0]]");
        assert!(broken.is_err(), "ragged rows must be rejected");
    }
}
