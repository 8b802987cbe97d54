//! Mapping between continuous pixel space and the discrete level grid.

use crate::{GridPosition, PixelPosition};

/// Dimensions of a grid used to clamp coordinates into range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridBounds {
    columns: u32,
    rows: u32,
}

impl GridBounds {
    /// Creates bounds spanning `columns` by `rows` cells.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns inside the bounds.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows inside the bounds.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Whether the cell lies inside the bounds.
    #[must_use]
    pub const fn contains(&self, cell: GridPosition) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Clamps each axis independently into `[0, dimension - 1]`.
    ///
    /// Degenerate bounds collapse every coordinate onto the origin.
    #[must_use]
    pub fn clamp(&self, column: i64, row: i64) -> GridPosition {
        GridPosition::new(clamp_axis(column, self.columns), clamp_axis(row, self.rows))
    }
}

fn clamp_axis(value: i64, dimension: u32) -> u32 {
    let max = i64::from(dimension.saturating_sub(1));
    // The clamped value always fits in u32 because `max` came from one.
    u32::try_from(value.clamp(0, max)).unwrap_or(0)
}

/// Converts between pixel positions and grid cells of a level.
///
/// Cell `(0, 0)` has its reference point one cell length away from the screen
/// origin on both axes, leaving a one-cell margin around the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpace {
    cell_size: f32,
    bounds: GridBounds,
}

impl GridSpace {
    /// Creates a grid space with square cells of `cell_size` pixels.
    #[must_use]
    pub const fn new(cell_size: f32, bounds: GridBounds) -> Self {
        Self { cell_size, bounds }
    }

    /// Side length of a cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Bounds used to clamp every conversion.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Maps a pixel position onto the cell whose reference point is nearest.
    ///
    /// Halves round toward positive infinity, and the result is clamped so
    /// every pixel maps to some valid cell.
    #[must_use]
    pub fn to_grid(&self, pixel: PixelPosition) -> GridPosition {
        self.bounds
            .clamp(self.nearest_index(pixel.x), self.nearest_index(pixel.y))
    }

    /// Pixel reference point of a cell, the exact inverse of [`Self::to_grid`].
    #[must_use]
    pub fn to_pixel(&self, grid: GridPosition) -> PixelPosition {
        PixelPosition::new(
            grid.column() as f32 * self.cell_size + self.cell_size,
            grid.row() as f32 * self.cell_size + self.cell_size,
        )
    }

    /// Clamps a signed cell coordinate into the level bounds.
    #[must_use]
    pub fn clamp(&self, column: i64, row: i64) -> GridPosition {
        self.bounds.clamp(column, row)
    }

    fn nearest_index(&self, coordinate: f32) -> i64 {
        let scaled = (coordinate - self.cell_size) / self.cell_size;
        // Saturating float-to-int cast; NaN maps to zero.
        (scaled + 0.5).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> GridSpace {
        GridSpace::new(50.0, GridBounds::new(15, 13))
    }

    #[test]
    fn to_grid_rounds_to_nearest_reference_point() {
        let space = space();

        assert_eq!(
            space.to_grid(PixelPosition::new(250.0, 300.0)),
            GridPosition::new(4, 5)
        );
        assert_eq!(
            space.to_grid(PixelPosition::new(274.0, 326.0)),
            GridPosition::new(4, 6)
        );
        assert_eq!(
            space.to_grid(PixelPosition::new(275.0, 225.0)),
            GridPosition::new(5, 4)
        );
    }

    #[test]
    fn to_grid_clamps_out_of_range_pixels() {
        let space = space();

        assert_eq!(
            space.to_grid(PixelPosition::new(-400.0, -1.0)),
            GridPosition::new(0, 0)
        );
        assert_eq!(
            space.to_grid(PixelPosition::new(5_000.0, 5_000.0)),
            GridPosition::new(14, 12)
        );
        assert_eq!(
            space.to_grid(PixelPosition::new(f32::NAN, 60.0)),
            GridPosition::new(0, 0)
        );
    }

    #[test]
    fn to_pixel_inverts_to_grid() {
        let space = space();

        for row in 0..13 {
            for column in 0..15 {
                let cell = GridPosition::new(column, row);
                assert_eq!(space.to_grid(space.to_pixel(cell)), cell);
            }
        }
        assert_eq!(
            space.to_pixel(GridPosition::new(0, 0)),
            PixelPosition::new(50.0, 50.0)
        );
    }

    #[test]
    fn clamp_handles_each_axis_independently() {
        let bounds = GridBounds::new(4, 1);

        assert_eq!(bounds.clamp(-1, 0), GridPosition::new(0, 0));
        assert_eq!(bounds.clamp(4, -3), GridPosition::new(3, 0));
        assert_eq!(bounds.clamp(2, 9), GridPosition::new(2, 0));
        assert_eq!(GridBounds::new(0, 0).clamp(7, 7), GridPosition::new(0, 0));
    }
}
