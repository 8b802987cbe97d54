//! Dots scattered over every open cell of the level.

use maze_chase_core::{GridPosition, GridSpace, LevelLayout, PixelPosition};

#[derive(Clone, Debug)]
pub(crate) struct DotField {
    remaining: Vec<GridPosition>,
    cleared_reported: bool,
}

impl DotField {
    pub(crate) fn seeded(layout: &LevelLayout) -> Self {
        Self {
            remaining: layout.open_cells().collect(),
            cleared_reported: false,
        }
    }

    /// Removes every dot strictly closer than `radius` to `position`.
    pub(crate) fn consume_near(
        &mut self,
        position: PixelPosition,
        radius: f32,
        space: &GridSpace,
    ) -> Vec<GridPosition> {
        let mut eaten = Vec::new();
        self.remaining.retain(|cell| {
            if space.to_pixel(*cell).distance(position) < radius {
                eaten.push(*cell);
                false
            } else {
                true
            }
        });
        eaten
    }

    /// Reports an empty field exactly once.
    pub(crate) fn take_cleared(&mut self) -> bool {
        if self.remaining.is_empty() && !self.cleared_reported {
            self.cleared_reported = true;
            return true;
        }
        false
    }

    pub(crate) fn remaining(&self) -> &[GridPosition] {
        &self.remaining
    }
}
