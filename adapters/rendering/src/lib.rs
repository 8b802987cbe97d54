#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_chase_core::{
    Cell, Direction, GridPosition, GridSpace, LevelLayout, NavigatorSnapshot, PursuerId,
    PursuerSnapshot,
};
use std::{error::Error, fmt, time::Duration};

/// Simulated time that elapses per frame at 60 frames per second.
pub const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);

const MOUTH_ANIMATION_SPEED: f32 = 20.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Byte RGB channels, rounding and clamping each intensity.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
            .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directions pressed since the previous frame, oldest first.
    pub directions: Vec<Direction>,
}

/// Solid wall square in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSquare {
    /// Upper-left corner of the square.
    pub top_left: Vec2,
    /// Side length of the square.
    pub size: f32,
}

/// Static maze geometry that adapters draw behind the inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of columns in the level.
    pub columns: u32,
    /// Number of rows in the level.
    pub rows: u32,
    /// Side length of a cell in pixels.
    pub cell_size: f32,
    /// Every wall cell converted to a screen-space square.
    pub walls: Vec<WallSquare>,
    /// Fill color of the walls.
    pub wall_color: Color,
}

impl MazePresentation {
    /// Wall color of the classic level.
    pub const DEFAULT_WALL_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0xff);

    /// Converts the level's wall cells into screen-space squares.
    ///
    /// A wall square starts half a cell before the cell's reference point.
    pub fn from_layout(
        layout: &LevelLayout,
        space: &GridSpace,
        wall_color: Color,
    ) -> Result<Self, RenderingError> {
        let cell_size = space.cell_size();
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        let walls = layout
            .iter()
            .filter(|(_, cell)| *cell == Cell::Wall)
            .map(|(position, _)| {
                let reference = space.to_pixel(position);
                WallSquare {
                    top_left: Vec2::new(reference.x, reference.y) - Vec2::splat(cell_size / 2.0),
                    size: cell_size,
                }
            })
            .collect();

        Ok(Self {
            columns: layout.columns(),
            rows: layout.rows(),
            cell_size,
            walls,
            wall_color,
        })
    }
}

/// Navigator sprite description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigatorPresentation {
    /// Center of the sprite.
    pub position: Vec2,
    /// Grid cell occupied by the navigator.
    pub cell: GridPosition,
    /// Sprite rotation in degrees, zero facing right.
    pub heading_degrees: f32,
    /// Sprite radius.
    pub radius: f32,
    /// Mouth aperture in the range 0.0..=1.0.
    pub mouth_open: f32,
}

impl NavigatorPresentation {
    /// Builds the presentation from a snapshot and the elapsed session time.
    #[must_use]
    pub fn from_snapshot(snapshot: &NavigatorSnapshot, elapsed: Duration) -> Self {
        Self {
            position: Vec2::new(snapshot.position.x, snapshot.position.y),
            cell: snapshot.cell,
            heading_degrees: snapshot.direction.heading_degrees(),
            radius: snapshot.radius,
            mouth_open: mouth_open_at(elapsed),
        }
    }
}

/// Mouth aperture after `elapsed` time, oscillating between closed and open.
#[must_use]
pub fn mouth_open_at(elapsed: Duration) -> f32 {
    ((MOUTH_ANIMATION_SPEED * elapsed.as_secs_f32()).sin() + 1.0) / 2.0
}

/// Sprite selected for a pursuer by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PursuerSprite {
    /// Red chaser.
    Blinky,
    /// Pink chaser.
    Pinky,
    /// Cyan chaser.
    Inky,
    /// Orange chaser.
    Clyde,
    /// Any pursuer without a dedicated sprite.
    Generic,
}

impl PursuerSprite {
    /// Resolves the sprite for a configured pursuer name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "blinky" => Self::Blinky,
            "pinky" => Self::Pinky,
            "inky" => Self::Inky,
            "clyde" => Self::Clyde,
            _ => Self::Generic,
        }
    }

    /// Body color used when no sprite sheet is available.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Blinky => Color::from_rgb_u8(0xff, 0x00, 0x00),
            Self::Pinky => Color::from_rgb_u8(0xff, 0xb8, 0xff),
            Self::Inky => Color::from_rgb_u8(0x00, 0xff, 0xff),
            Self::Clyde => Color::from_rgb_u8(0xff, 0xb8, 0x52),
            Self::Generic => Color::from_rgb_u8(0xc0, 0xc0, 0xc0),
        }
    }
}

/// Pursuer sprite description.
#[derive(Clone, Debug, PartialEq)]
pub struct PursuerPresentation {
    /// Identifier of the pursuer.
    pub id: PursuerId,
    /// Configured name of the pursuer.
    pub name: String,
    /// Sprite resolved from the name.
    pub sprite: PursuerSprite,
    /// Center of the sprite.
    pub position: Vec2,
    /// Grid cell nearest to the pursuer.
    pub cell: GridPosition,
    /// Unit vector from the pursuer toward the navigator, zero when they coincide.
    pub gaze: Vec2,
}

impl PursuerPresentation {
    /// Builds the presentation, aiming the eyes at `navigator`.
    #[must_use]
    pub fn from_snapshot(snapshot: &PursuerSnapshot, navigator: Vec2) -> Self {
        let position = Vec2::new(snapshot.position.x, snapshot.position.y);
        Self {
            id: snapshot.id,
            name: snapshot.name.clone(),
            sprite: PursuerSprite::from_name(&snapshot.name),
            position,
            cell: snapshot.cell,
            gaze: (navigator - position).normalize_or_zero(),
        }
    }
}

/// Scene description combining the maze, the dots and the inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Static maze geometry.
    pub maze: MazePresentation,
    /// Centers of the dots that remain.
    pub dots: Vec<Vec2>,
    /// Player-controlled entity.
    pub navigator: NavigatorPresentation,
    /// Pursuers in identifier order.
    pub pursuers: Vec<PursuerPresentation>,
    /// Index of the frame the scene reflects.
    pub frame: u64,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        maze: MazePresentation,
        dots: Vec<Vec2>,
        navigator: NavigatorPresentation,
        pursuers: Vec<PursuerPresentation>,
        frame: u64,
    ) -> Self {
        Self {
            maze,
            dots,
            navigator,
            pursuers,
            frame,
        }
    }

    /// Whether every dot has been eaten.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.dots.is_empty()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Chase scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive size to produce visible walls.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}
