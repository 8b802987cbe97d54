#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame pipeline that drives a Maze Chase session.
//!
//! Every tick runs input, the navigator, conditional replanning, pursuer
//! movement and dot consumption in that order. All replanning for a tick is
//! applied before any pursuer advances.

use log::trace;
use maze_chase_core::{Command, ConfigError, Direction, Event, GameConfig};
use maze_chase_system_pursuit::Pursuit;
use maze_chase_world::{self as world, query, World};

/// Owns the world and the systems that react to it.
#[derive(Debug)]
pub struct Session {
    world: World,
    pursuit: Pursuit,
}

impl Session {
    /// Creates a session from the provided configuration.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            world: World::new(config)?,
            pursuit: Pursuit::new(),
        })
    }

    /// Read-only access to the world for queries and rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of replanning rounds triggered so far.
    #[must_use]
    pub fn replans(&self) -> u64 {
        self.pursuit.replans()
    }

    /// Runs one frame with the directions pressed since the previous frame.
    ///
    /// Returns every event the world broadcast during the frame, in order.
    pub fn tick(&mut self, directions: &[Direction]) -> Vec<Event> {
        let mut events = Vec::new();

        self.apply(Command::BeginFrame, &mut events);
        for &direction in directions {
            self.apply(Command::QueueDirection { direction }, &mut events);
        }
        self.apply(Command::AdvanceNavigator, &mut events);

        let mut commands = Vec::new();
        self.pursuit.handle(
            &events,
            &query::pursuer_view(&self.world),
            query::layout(&self.world),
            &mut commands,
        );
        for command in commands {
            self.apply(command, &mut events);
        }

        self.apply(Command::AdvancePursuers, &mut events);
        self.apply(Command::ConsumeDots, &mut events);

        trace!(
            "frame {} produced {} events",
            query::frame_index(&self.world),
            events.len()
        );
        events
    }

    fn apply(&mut self, command: Command, events: &mut Vec<Event>) {
        world::apply(&mut self.world, command, events);
    }
}
