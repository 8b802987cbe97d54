#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that replans pursuer routes whenever the navigator changes cell.

mod path_finder;

use log::debug;
use maze_chase_core::{Command, Event, GridPosition, LevelLayout, PursuerView, Route};

pub use path_finder::find_route;

/// Plans a route for a pursuer standing on `from`.
///
/// The search runs on a private copy of `layout` in which `from` is already
/// a wall, so the route never leads back through the pursuer's own cell.
#[must_use]
pub fn plan_route(from: GridPosition, target: GridPosition, layout: &LevelLayout) -> Route {
    let mut working = layout.working_copy();
    working.mark_wall(from);
    find_route(from, target, &mut working)
}

/// Reacts to navigator cell changes by emitting fresh routes for every pursuer.
#[derive(Debug, Default)]
pub struct Pursuit {
    replans: u64,
}

impl Pursuit {
    /// Creates a pursuit system that has not replanned yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits one [`Command::AssignRoute`] per pursuer.
    ///
    /// Nothing is emitted unless the batch contains a
    /// [`Event::NavigatorCellChanged`]; the latest such event supplies the
    /// target cell.
    pub fn handle(
        &mut self,
        events: &[Event],
        pursuers: &PursuerView,
        layout: &LevelLayout,
        out: &mut Vec<Command>,
    ) {
        let Some(target) = events.iter().rev().find_map(|event| match event {
            Event::NavigatorCellChanged { to, .. } => Some(*to),
            _ => None,
        }) else {
            return;
        };

        self.replans = self.replans.saturating_add(1);
        debug!(
            "replanning {} pursuers toward ({}, {})",
            pursuers.len(),
            target.column(),
            target.row()
        );

        for pursuer in pursuers.iter() {
            out.push(Command::AssignRoute {
                pursuer: pursuer.id,
                route: plan_route(pursuer.cell, target, layout),
            });
        }
    }

    /// Number of replanning rounds triggered so far.
    #[must_use]
    pub fn replans(&self) -> u64 {
        self.replans
    }
}
