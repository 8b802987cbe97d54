//! Conversion of world snapshots into renderer scenes.

use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use maze_chase_rendering::{
    MazePresentation, NavigatorPresentation, PursuerPresentation, Scene,
};
use maze_chase_world::{query, World};

/// Builds the first scene of a session.
pub(crate) fn initial_scene(world: &World) -> Result<Scene> {
    let maze = MazePresentation::from_layout(
        query::layout(world),
        &query::grid_space(world),
        MazePresentation::DEFAULT_WALL_COLOR,
    )
    .context("failed to prepare maze presentation")?;
    let navigator = NavigatorPresentation::from_snapshot(&query::navigator(world), Duration::ZERO);
    let mut scene = Scene::new(maze, Vec::new(), navigator, Vec::new(), 0);
    refresh(&mut scene, world, Duration::ZERO);
    Ok(scene)
}

/// Replaces the dynamic parts of `scene` with the current world state.
pub(crate) fn refresh(scene: &mut Scene, world: &World, elapsed: Duration) {
    let space = query::grid_space(world);
    scene.dots = query::dots(world)
        .iter()
        .map(|&cell| {
            let pixel = space.to_pixel(cell);
            Vec2::new(pixel.x, pixel.y)
        })
        .collect();

    scene.navigator = NavigatorPresentation::from_snapshot(&query::navigator(world), elapsed);
    let navigator = scene.navigator.position;
    scene.pursuers = query::pursuer_view(world)
        .iter()
        .map(|snapshot| PursuerPresentation::from_snapshot(snapshot, navigator))
        .collect();
    scene.frame = query::frame_index(world);
}
