//! Pursuers that follow grid routes toward the navigator.

use log::trace;
use maze_chase_core::{
    GridPosition, GridSpace, PixelPosition, PursuerConfig, PursuerId, PursuerSnapshot, Route,
};

#[derive(Clone, Debug)]
pub(crate) struct Pursuer {
    id: PursuerId,
    name: String,
    position: PixelPosition,
    route: Route,
    speed: f32,
}

impl Pursuer {
    pub(crate) fn from_config(id: PursuerId, config: &PursuerConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            position: config.start,
            route: Route::new(),
            speed: config.speed,
        }
    }

    pub(crate) fn id(&self) -> PursuerId {
        self.id
    }

    pub(crate) fn current_cell(&self, space: &GridSpace) -> GridPosition {
        space.to_grid(self.position)
    }

    /// Replaces the route, keeping the pursuer grid aligned.
    ///
    /// When both the held and the new route are non-empty and head for
    /// different cells, the pursuer's own cell is prepended so it returns to
    /// the node it is leaving before following the new plan. Returns whether
    /// that prepend happened.
    pub(crate) fn adopt_route(&mut self, route: Route, space: &GridSpace) -> bool {
        let stitched = match (self.route.first(), route.first()) {
            (Some(held), Some(fresh)) => held != fresh,
            _ => false,
        };

        self.route = route;
        if stitched {
            self.route.prepend(self.current_cell(space));
        }
        stitched
    }

    pub(crate) fn route_len(&self) -> usize {
        self.route.len()
    }

    /// Moves toward the next node and snaps onto it once within `snap_threshold`.
    ///
    /// Returns the node that was reached this frame, if any.
    pub(crate) fn advance(&mut self, space: &GridSpace, snap_threshold: f32) -> Option<GridPosition> {
        let next_cell = self.route.first()?;
        let next_pixel = space.to_pixel(next_cell);

        self.position.x += sign(next_pixel.x - self.position.x) * self.speed;
        self.position.y += sign(next_pixel.y - self.position.y) * self.speed;
        trace!(
            "pursuer {} moved to ({}, {})",
            self.id.get(),
            self.position.x,
            self.position.y
        );

        if self.position.distance(next_pixel) <= snap_threshold {
            self.position = next_pixel;
            let _ = self.route.pop_front();
            return Some(next_cell);
        }

        None
    }

    pub(crate) fn snapshot(&self, space: &GridSpace) -> PursuerSnapshot {
        PursuerSnapshot {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
            cell: self.current_cell(space),
            route: self.route.clone(),
            speed: self.speed,
        }
    }
}

/// Sign of `value`, with zero mapped to zero.
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
