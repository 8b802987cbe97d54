//! Player-controlled entity that travels in continuous space along the grid.

use log::trace;
use maze_chase_core::{
    Direction, GridPosition, GridSpace, LevelLayout, NavigatorConfig, NavigatorSnapshot,
    PixelPosition, ScreenConfig,
};

/// Result of buffering a directional request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DirectionRequest {
    /// The request matched the current heading.
    Unchanged,
    /// The heading flipped immediately.
    Turned {
        /// Heading before the request.
        from: Direction,
        /// Heading after the request.
        to: Direction,
    },
    /// A perpendicular turn was buffered until the commit coordinate is passed.
    Queued {
        /// Buffered direction.
        direction: Direction,
        /// Coordinate along the travel axis that must be passed first.
        commit_coordinate: f32,
    },
}

/// Observable outcome of a single navigator advance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct NavigatorStep {
    /// Wall cell that prevented forward motion, if any.
    pub(crate) blocked_by: Option<GridPosition>,
    /// Heading change applied during the advance, if any.
    pub(crate) turned: Option<(Direction, Direction)>,
    /// Previous and new cell when the navigator entered a different cell.
    pub(crate) cell_change: Option<(Option<GridPosition>, GridPosition)>,
}

#[derive(Clone, Debug)]
pub(crate) struct Navigator {
    position: PixelPosition,
    direction: Direction,
    queued_direction: Option<Direction>,
    turn_commit_coordinate: f32,
    last_grid_cell: Option<GridPosition>,
    speed: f32,
    radius: f32,
}

impl Navigator {
    pub(crate) fn from_config(config: &NavigatorConfig) -> Self {
        Self {
            position: config.start,
            direction: config.direction,
            queued_direction: None,
            turn_commit_coordinate: 0.0,
            last_grid_cell: None,
            speed: config.speed,
            radius: config.radius,
        }
    }

    pub(crate) fn position(&self) -> PixelPosition {
        self.position
    }

    pub(crate) fn radius(&self) -> f32 {
        self.radius
    }

    /// Applies reversals at once and buffers perpendicular turns.
    ///
    /// A reversal or a repeat of the current heading discards any buffered
    /// turn, so the heading only ever changes to the latest request.
    pub(crate) fn set_queued_direction(
        &mut self,
        direction: Direction,
        space: &GridSpace,
    ) -> DirectionRequest {
        if direction == self.direction || self.direction.is_same_axis(direction) {
            let from = self.direction;
            self.direction = direction;
            self.queued_direction = None;
            return if from == direction {
                DirectionRequest::Unchanged
            } else {
                DirectionRequest::Turned {
                    from,
                    to: direction,
                }
            };
        }

        let cell = space.cell_size();
        self.turn_commit_coordinate = match self.direction {
            Direction::Up => (self.position.y / cell).floor() * cell,
            Direction::Down => (self.position.y / cell).ceil() * cell,
            Direction::Left => (self.position.x / cell).floor() * cell,
            Direction::Right => (self.position.x / cell).ceil() * cell,
        };
        self.queued_direction = Some(direction);

        DirectionRequest::Queued {
            direction,
            commit_coordinate: self.turn_commit_coordinate,
        }
    }

    /// Moves the navigator by one frame of travel.
    pub(crate) fn advance(
        &mut self,
        layout: &LevelLayout,
        space: &GridSpace,
        screen: ScreenConfig,
    ) -> NavigatorStep {
        let mut step = NavigatorStep::default();
        let probe = space.to_grid(
            self.position
                .stepped(self.direction, space.cell_size() / 2.0),
        );

        if layout.is_wall(probe) {
            step.blocked_by = Some(probe);
            if let Some(queued) = self.queued_direction.take() {
                step.turned = Some((self.direction, queued));
                self.direction = queued;
            }
        } else {
            self.position = self.position.stepped(self.direction, self.speed);
            self.position.x = wrap_axis(self.position.x, screen.width, self.radius);
            self.position.y = wrap_axis(self.position.y, screen.height, self.radius);
            trace!(
                "navigator moved {:?} to ({}, {})",
                self.direction,
                self.position.x,
                self.position.y
            );
        }

        if let Some(queued) = self.queued_direction {
            if self.has_passed_commit_coordinate() {
                step.turned = Some((self.direction, queued));
                self.direction = queued;
                self.queued_direction = None;
            }
        }

        let cell = space.to_grid(self.position);
        if self.last_grid_cell != Some(cell) {
            step.cell_change = Some((self.last_grid_cell, cell));
            self.last_grid_cell = Some(cell);
        }

        step
    }

    fn has_passed_commit_coordinate(&self) -> bool {
        let target = self.turn_commit_coordinate;
        match self.direction {
            Direction::Up => self.position.y < target,
            Direction::Down => self.position.y > target,
            Direction::Left => self.position.x < target,
            Direction::Right => self.position.x > target,
        }
    }

    pub(crate) fn snapshot(&self, space: &GridSpace) -> NavigatorSnapshot {
        NavigatorSnapshot {
            position: self.position,
            direction: self.direction,
            queued_direction: self.queued_direction,
            cell: self
                .last_grid_cell
                .unwrap_or_else(|| space.to_grid(self.position)),
            radius: self.radius,
        }
    }
}

/// Re-enters from the opposite edge once the sprite fully leaves the screen.
fn wrap_axis(value: f32, max: f32, radius: f32) -> f32 {
    if value < -radius {
        max + radius
    } else if value > max + radius {
        -radius
    } else {
        value
    }
}
