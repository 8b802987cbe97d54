#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

mod dots;
mod navigator;
mod pursuer;

use log::{debug, warn};
use maze_chase_core::{
    Command, ConfigError, Event, GameConfig, GridPosition, GridSpace, LevelLayout, PursuerId,
    Route, ScreenConfig,
};

use dots::DotField;
use navigator::{DirectionRequest, Navigator};
use pursuer::Pursuer;

/// Represents the authoritative Maze Chase session state.
#[derive(Debug)]
pub struct World {
    layout: LevelLayout,
    grid_space: GridSpace,
    screen: ScreenConfig,
    snap_threshold: f32,
    navigator: Navigator,
    pursuers: Vec<Pursuer>,
    dots: DotField,
    frame_index: u64,
}

impl World {
    /// Creates a world populated from the provided configuration.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let pursuers: Vec<Pursuer> = config
            .pursuers
            .iter()
            .zip(0_u32..)
            .map(|(pursuer, index)| Pursuer::from_config(PursuerId::new(index), pursuer))
            .collect();
        debug!(
            "world created with a {}x{} level and {} pursuers",
            config.level.columns(),
            config.level.rows(),
            pursuers.len()
        );

        Ok(Self {
            layout: config.level.clone(),
            grid_space: config.grid_space(),
            screen: config.screen,
            snap_threshold: config.pursuit.snap_threshold,
            navigator: Navigator::from_config(&config.navigator),
            pursuers,
            dots: DotField::seeded(&config.level),
            frame_index: 0,
        })
    }

    fn pursuer_mut(&mut self, id: PursuerId) -> Option<&mut Pursuer> {
        self.pursuers.iter_mut().find(|pursuer| pursuer.id() == id)
    }

    fn assign_route(&mut self, id: PursuerId, route: Route, out_events: &mut Vec<Event>) {
        let space = self.grid_space;
        let walkable = {
            let Some(pursuer) = self.pursuers.iter().find(|pursuer| pursuer.id() == id) else {
                warn!("route assigned to unknown pursuer {}", id.get());
                return;
            };
            is_walkable(&self.layout, pursuer.current_cell(&space), &route)
        };
        if !walkable {
            warn!("rejected route for pursuer {} that leaves the open grid", id.get());
            return;
        }

        let Some(pursuer) = self.pursuer_mut(id) else {
            return;
        };
        let length = route.len();
        let stitched = pursuer.adopt_route(route, &space);
        debug!(
            "pursuer {} adopted a {}-cell route (stitched: {})",
            id.get(),
            pursuer.route_len(),
            stitched
        );
        out_events.push(Event::RouteAssigned {
            pursuer: id,
            length: pursuer.route_len(),
            stitched,
        });

        if length == 0 {
            warn!("pursuer {} has no route to the navigator", id.get());
            out_events.push(Event::PursuerStranded { pursuer: id });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginFrame => {
            world.frame_index = world.frame_index.saturating_add(1);
            out_events.push(Event::FrameStarted {
                frame: world.frame_index,
            });
        }
        Command::QueueDirection { direction } => {
            match world
                .navigator
                .set_queued_direction(direction, &world.grid_space)
            {
                DirectionRequest::Unchanged => {}
                DirectionRequest::Turned { from, to } => {
                    out_events.push(Event::NavigatorTurned { from, to });
                }
                DirectionRequest::Queued {
                    direction,
                    commit_coordinate,
                } => {
                    out_events.push(Event::TurnQueued {
                        direction,
                        commit_coordinate,
                    });
                }
            }
        }
        Command::AdvanceNavigator => {
            let step = world
                .navigator
                .advance(&world.layout, &world.grid_space, world.screen);
            if let Some(wall) = step.blocked_by {
                out_events.push(Event::NavigatorBlocked { wall });
            }
            if let Some((from, to)) = step.turned {
                out_events.push(Event::NavigatorTurned { from, to });
            }
            if let Some((from, to)) = step.cell_change {
                debug!(
                    "navigator entered cell ({}, {})",
                    to.column(),
                    to.row()
                );
                out_events.push(Event::NavigatorCellChanged { from, to });
            }
        }
        Command::AssignRoute { pursuer, route } => {
            world.assign_route(pursuer, route, out_events);
        }
        Command::AdvancePursuers => {
            let space = world.grid_space;
            let snap_threshold = world.snap_threshold;
            for pursuer in &mut world.pursuers {
                if let Some(cell) = pursuer.advance(&space, snap_threshold) {
                    out_events.push(Event::PursuerReachedCell {
                        pursuer: pursuer.id(),
                        cell,
                    });
                }
            }
        }
        Command::ConsumeDots => {
            let eaten = world.dots.consume_near(
                world.navigator.position(),
                world.navigator.radius(),
                &world.grid_space,
            );
            out_events.extend(eaten.into_iter().map(|cell| Event::DotConsumed { cell }));
            if world.dots.take_cleared() {
                debug!("level cleared on frame {}", world.frame_index);
                out_events.push(Event::LevelCleared);
            }
        }
    }
}

/// A route is walkable when every cell is open and each step, starting from
/// `origin`, moves to a 4-adjacent cell.
fn is_walkable(layout: &LevelLayout, origin: GridPosition, route: &Route) -> bool {
    let mut previous = origin;
    for &cell in route {
        if layout.is_wall(cell) || previous.manhattan_distance(cell) != 1 {
            return false;
        }
        previous = cell;
    }
    true
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use maze_chase_core::{
        GridPosition, GridSpace, LevelLayout, NavigatorSnapshot, PursuerView, ScreenConfig,
    };

    /// Provides read-only access to the static level layout.
    #[must_use]
    pub fn layout(world: &World) -> &LevelLayout {
        &world.layout
    }

    /// Conversion rules between pixels and grid cells.
    #[must_use]
    pub fn grid_space(world: &World) -> GridSpace {
        world.grid_space
    }

    /// Screen extent used for wrapping.
    #[must_use]
    pub fn screen(world: &World) -> ScreenConfig {
        world.screen
    }

    /// Captures the navigator's current state.
    #[must_use]
    pub fn navigator(world: &World) -> NavigatorSnapshot {
        world.navigator.snapshot(&world.grid_space)
    }

    /// Captures a read-only view of the pursuers inhabiting the maze.
    #[must_use]
    pub fn pursuer_view(world: &World) -> PursuerView {
        PursuerView::from_snapshots(
            world
                .pursuers
                .iter()
                .map(|pursuer| pursuer.snapshot(&world.grid_space))
                .collect(),
        )
    }

    /// Cells that still hold a dot, in row-major order.
    #[must_use]
    pub fn dots(world: &World) -> &[GridPosition] {
        world.dots.remaining()
    }

    /// Number of frames started so far.
    #[must_use]
    pub fn frame_index(world: &World) -> u64 {
        world.frame_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Direction, PixelPosition, PursuerConfig};

    fn small_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.level = LevelLayout::from_ascii(
            "
            .....
            .#.#.
            .....
            ",
        )
        .expect("valid layout");
        config.navigator.start = PixelPosition::new(50.0, 50.0);
        config.pursuers = vec![PursuerConfig::new(
            "blinky",
            PixelPosition::new(250.0, 150.0),
            3.0,
        )];
        config
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = small_config();
        config.navigator.start = PixelPosition::new(100.0, 100.0);

        assert!(matches!(
            World::new(&config),
            Err(ConfigError::StartInsideWall { .. })
        ));
    }

    #[test]
    fn navigator_at_top_speed_stops_in_front_of_walls() {
        let mut config = small_config();
        config.level = LevelLayout::from_ascii("..#").expect("valid layout");
        config.navigator.start = PixelPosition::new(50.0, 50.0);
        config.navigator.direction = Direction::Right;
        config.pursuers.clear();

        config.navigator.speed = 40.0;
        assert!(matches!(
            World::new(&config),
            Err(ConfigError::NavigatorTooFast { .. })
        ));

        config.navigator.speed = 25.0;
        let mut world = World::new(&config).expect("valid config");
        let mut events = Vec::new();
        for _ in 0..10 {
            apply(&mut world, Command::AdvanceNavigator, &mut events);
            let navigator = query::navigator(&world);
            assert!(query::layout(&world).is_open(navigator.cell));
        }

        assert_eq!(query::navigator(&world).cell, GridPosition::new(1, 0));
        assert!(events.contains(&Event::NavigatorBlocked {
            wall: GridPosition::new(2, 0),
        }));
    }

    #[test]
    fn begin_frame_counts_frames() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();

        apply(&mut world, Command::BeginFrame, &mut events);
        apply(&mut world, Command::BeginFrame, &mut events);

        assert_eq!(
            events,
            vec![
                Event::FrameStarted { frame: 1 },
                Event::FrameStarted { frame: 2 }
            ]
        );
        assert_eq!(query::frame_index(&world), 2);
    }

    #[test]
    fn queue_direction_reports_reversals_and_buffered_turns() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::QueueDirection {
                direction: Direction::Right,
            },
            &mut events,
        );
        assert!(events.is_empty());

        apply(
            &mut world,
            Command::QueueDirection {
                direction: Direction::Down,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::QueueDirection {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TurnQueued {
                    direction: Direction::Down,
                    commit_coordinate: 50.0,
                },
                Event::NavigatorTurned {
                    from: Direction::Right,
                    to: Direction::Left,
                },
            ]
        );
        assert_eq!(query::navigator(&world).queued_direction, None);
    }

    #[test]
    fn first_navigator_advance_changes_cell() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();

        apply(&mut world, Command::AdvanceNavigator, &mut events);

        assert_eq!(
            events,
            vec![Event::NavigatorCellChanged {
                from: None,
                to: GridPosition::new(0, 0),
            }]
        );
        assert_eq!(
            query::navigator(&world).position,
            PixelPosition::new(53.0, 50.0)
        );
    }

    #[test]
    fn empty_route_strands_pursuer() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();
        let id = PursuerId::new(0);

        apply(
            &mut world,
            Command::AssignRoute {
                pursuer: id,
                route: Route::new(),
            },
            &mut events,
        );
        apply(&mut world, Command::AdvancePursuers, &mut events);

        assert_eq!(
            events,
            vec![
                Event::RouteAssigned {
                    pursuer: id,
                    length: 0,
                    stitched: false,
                },
                Event::PursuerStranded { pursuer: id },
            ]
        );
        let view = query::pursuer_view(&world);
        assert_eq!(
            view.get(id).map(|pursuer| pursuer.position),
            Some(PixelPosition::new(250.0, 150.0))
        );
    }

    #[test]
    fn routes_leaving_the_open_grid_are_rejected() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();
        let id = PursuerId::new(0);

        let through_wall: Route = vec![GridPosition::new(4, 1), GridPosition::new(3, 1)].into();
        let jumping: Route = vec![GridPosition::new(4, 0), GridPosition::new(2, 0)].into();
        for route in [through_wall, jumping] {
            apply(
                &mut world,
                Command::AssignRoute { pursuer: id, route },
                &mut events,
            );
        }

        assert!(events.is_empty());
        assert!(query::pursuer_view(&world)
            .get(id)
            .map_or(false, |pursuer| pursuer.route.is_empty()));
    }

    #[test]
    fn pursuer_reports_reached_cells() {
        let mut world = World::new(&small_config()).expect("valid config");
        let mut events = Vec::new();
        let id = PursuerId::new(0);
        let route: Route = vec![GridPosition::new(4, 1), GridPosition::new(4, 0)].into();

        apply(
            &mut world,
            Command::AssignRoute { pursuer: id, route },
            &mut events,
        );
        for _ in 0..40 {
            apply(&mut world, Command::AdvancePursuers, &mut events);
        }

        let reached: Vec<GridPosition> = events
            .iter()
            .filter_map(|event| match event {
                Event::PursuerReachedCell { cell, .. } => Some(*cell),
                _ => None,
            })
            .collect();
        assert_eq!(reached, vec![GridPosition::new(4, 1), GridPosition::new(4, 0)]);
        let view = query::pursuer_view(&world);
        assert_eq!(
            view.get(id).map(|pursuer| pursuer.position),
            Some(PixelPosition::new(250.0, 50.0))
        );
    }

    #[test]
    fn consuming_the_last_dot_clears_the_level_once() {
        let mut config = GameConfig::default();
        config.level = LevelLayout::from_ascii("..").expect("valid layout");
        config.navigator.start = PixelPosition::new(75.0, 50.0);
        config.pursuers.clear();
        let mut world = World::new(&config).expect("valid config");
        let mut events = Vec::new();

        apply(&mut world, Command::ConsumeDots, &mut events);
        apply(&mut world, Command::ConsumeDots, &mut events);

        assert_eq!(
            events,
            vec![
                Event::DotConsumed {
                    cell: GridPosition::new(0, 0),
                },
                Event::DotConsumed {
                    cell: GridPosition::new(1, 0),
                },
                Event::LevelCleared,
            ]
        );
        assert!(query::dots(&world).is_empty());
    }
}
