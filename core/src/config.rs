//! Session configuration shared by the world and adapters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Direction, GridBounds, GridSpace, LevelLayout, PixelPosition};

const DEFAULT_SCREEN_WIDTH: f32 = 800.0;
const DEFAULT_SCREEN_HEIGHT: f32 = 700.0;
const DEFAULT_CELL_SIZE: f32 = 50.0;
const DEFAULT_NAVIGATOR_SPEED: f32 = 3.0;
const DEFAULT_NAVIGATOR_RADIUS: f32 = 30.0;
const DEFAULT_SNAP_THRESHOLD: f32 = 3.0;

const DEFAULT_LEVEL: [[u8; 15]; 13] = [
    [1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [0, 0, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 1],
    [0, 0, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1],
];

/// Reasons a [`GameConfig`] may be rejected.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Cells must have a positive, finite size.
    #[error("cell size must be positive and finite (received {cell_size})")]
    InvalidCellSize {
        /// Provided cell size.
        cell_size: f32,
    },
    /// The screen must have a positive, finite extent.
    #[error("screen must be positive and finite (received {width}x{height})")]
    InvalidScreen {
        /// Provided screen width.
        width: f32,
        /// Provided screen height.
        height: f32,
    },
    /// An entity was configured with a non-positive or non-finite speed.
    #[error("{entity} speed must be positive and finite (received {speed})")]
    InvalidSpeed {
        /// Name of the offending entity.
        entity: String,
        /// Provided speed.
        speed: f32,
    },
    /// The navigator would step past the wall probe half a cell ahead.
    #[error("navigator speed {speed} exceeds half the cell size ({max_speed})")]
    NavigatorTooFast {
        /// Provided speed.
        speed: f32,
        /// Largest speed that still stops in front of walls.
        max_speed: f32,
    },
    /// A pursuer would step over the snap window around route nodes.
    #[error("{entity} speed {speed} exceeds twice the snap threshold ({max_speed})")]
    PursuerTooFast {
        /// Name of the offending pursuer.
        entity: String,
        /// Provided speed.
        speed: f32,
        /// Largest speed that still lands inside the snap window.
        max_speed: f32,
    },
    /// The navigator radius must be non-negative and finite.
    #[error("navigator radius must be non-negative and finite (received {radius})")]
    InvalidRadius {
        /// Provided radius.
        radius: f32,
    },
    /// The snap threshold must be non-negative and finite.
    #[error("snap threshold must be non-negative and finite (received {threshold})")]
    InvalidSnapThreshold {
        /// Provided threshold.
        threshold: f32,
    },
    /// An entity starts inside a wall cell.
    #[error("{entity} starts inside wall cell ({column}, {row})")]
    StartInsideWall {
        /// Name of the offending entity.
        entity: String,
        /// Column of the wall cell.
        column: u32,
        /// Row of the wall cell.
        row: u32,
    },
}

/// Complete description of a maze-chase session.
///
/// Every field falls back to the classic level when omitted from a
/// configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Extent of the visible screen used for wrapping.
    pub screen: ScreenConfig,
    /// Side length of a grid cell in pixels.
    pub cell_size: f32,
    /// Player-controlled entity settings.
    pub navigator: NavigatorConfig,
    /// Settings shared by every pursuer.
    pub pursuit: PursuitConfig,
    /// Pursuers spawned at session start, in identifier order.
    pub pursuers: Vec<PursuerConfig>,
    /// Wall/open table of the level.
    pub level: LevelLayout,
}

impl GameConfig {
    /// Grid space derived from the level dimensions and cell size.
    #[must_use]
    pub fn grid_space(&self) -> GridSpace {
        GridSpace::new(self.cell_size, self.level.bounds())
    }

    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.cell_size) {
            return Err(ConfigError::InvalidCellSize {
                cell_size: self.cell_size,
            });
        }
        if !is_positive(self.screen.width) || !is_positive(self.screen.height) {
            return Err(ConfigError::InvalidScreen {
                width: self.screen.width,
                height: self.screen.height,
            });
        }
        if !is_positive(self.navigator.speed) {
            return Err(ConfigError::InvalidSpeed {
                entity: "navigator".to_owned(),
                speed: self.navigator.speed,
            });
        }
        let max_navigator_speed = self.cell_size / 2.0;
        if self.navigator.speed > max_navigator_speed {
            return Err(ConfigError::NavigatorTooFast {
                speed: self.navigator.speed,
                max_speed: max_navigator_speed,
            });
        }
        if !is_non_negative(self.navigator.radius) {
            return Err(ConfigError::InvalidRadius {
                radius: self.navigator.radius,
            });
        }
        if !is_non_negative(self.pursuit.snap_threshold) {
            return Err(ConfigError::InvalidSnapThreshold {
                threshold: self.pursuit.snap_threshold,
            });
        }

        let space = self.grid_space();
        self.ensure_open_start("navigator", self.navigator.start, &space)?;
        let max_pursuer_speed = self.pursuit.snap_threshold * 2.0;
        for pursuer in &self.pursuers {
            if !is_positive(pursuer.speed) {
                return Err(ConfigError::InvalidSpeed {
                    entity: pursuer.name.clone(),
                    speed: pursuer.speed,
                });
            }
            if pursuer.speed > max_pursuer_speed {
                return Err(ConfigError::PursuerTooFast {
                    entity: pursuer.name.clone(),
                    speed: pursuer.speed,
                    max_speed: max_pursuer_speed,
                });
            }
            self.ensure_open_start(&pursuer.name, pursuer.start, &space)?;
        }

        Ok(())
    }

    fn ensure_open_start(
        &self,
        entity: &str,
        start: PixelPosition,
        space: &GridSpace,
    ) -> Result<(), ConfigError> {
        let cell = space.to_grid(start);
        if self.level.is_wall(cell) {
            return Err(ConfigError::StartInsideWall {
                entity: entity.to_owned(),
                column: cell.column(),
                row: cell.row(),
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            cell_size: DEFAULT_CELL_SIZE,
            navigator: NavigatorConfig::default(),
            pursuit: PursuitConfig::default(),
            pursuers: vec![
                PursuerConfig::new("blinky", PixelPosition::new(100.0, 100.0), 3.0),
                PursuerConfig::new("pinky", PixelPosition::new(100.0, 150.0), 2.5),
                PursuerConfig::new("inky", PixelPosition::new(100.0, 200.0), 2.0),
                PursuerConfig::new("clyde", PixelPosition::new(100.0, 250.0), 1.5),
            ],
            level: default_level(),
        }
    }
}

fn default_level() -> LevelLayout {
    LevelLayout::from_bits(
        GridBounds::new(15, 13),
        DEFAULT_LEVEL.iter().flatten().copied(),
    )
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Visible screen extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Screen width in pixels.
    pub width: f32,
    /// Screen height in pixels.
    pub height: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

/// Player-controlled entity settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Initial pixel position.
    pub start: PixelPosition,
    /// Initial heading.
    pub direction: Direction,
    /// Travel speed in pixels per frame.
    pub speed: f32,
    /// Movement radius used for wrapping and dot consumption.
    pub radius: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            start: PixelPosition::new(250.0, 300.0),
            direction: Direction::Right,
            speed: DEFAULT_NAVIGATOR_SPEED,
            radius: DEFAULT_NAVIGATOR_RADIUS,
        }
    }
}

/// Settings shared by every pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Distance at or below which a pursuer snaps onto its next node.
    pub snap_threshold: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

/// Spawn description of a single pursuer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PursuerConfig {
    /// Name used by renderers to select a sprite.
    pub name: String,
    /// Initial pixel position.
    pub start: PixelPosition,
    /// Travel speed in pixels per frame.
    pub speed: f32,
}

impl PursuerConfig {
    /// Creates a pursuer spawn description.
    #[must_use]
    pub fn new(name: impl Into<String>, start: PixelPosition, speed: f32) -> Self {
        Self {
            name: name.into(),
            start,
            speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridPosition;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.level.columns(), 15);
        assert_eq!(config.level.rows(), 13);
        assert_eq!(config.pursuers.len(), 4);
    }

    #[test]
    fn default_spawns_sit_on_open_cells() {
        let config = GameConfig::default();
        let space = config.grid_space();

        assert_eq!(
            space.to_grid(config.navigator.start),
            GridPosition::new(4, 5)
        );
        for pursuer in &config.pursuers {
            assert!(config.level.is_open(space.to_grid(pursuer.start)));
        }
    }

    #[test]
    fn validate_rejects_start_inside_wall() {
        let mut config = GameConfig::default();
        config.navigator.start = PixelPosition::new(50.0, 50.0);

        assert_eq!(
            config.validate(),
            Err(ConfigError::StartInsideWall {
                entity: "navigator".to_owned(),
                column: 0,
                row: 0,
            })
        );
    }

    #[test]
    fn validate_rejects_degenerate_numbers() {
        let mut config = GameConfig::default();
        config.cell_size = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCellSize { .. })
        ));

        let mut config = GameConfig::default();
        config.pursuers[2].speed = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeed { ref entity, .. }) if entity == "inky"
        ));

        let mut config = GameConfig::default();
        config.pursuit.snap_threshold = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSnapThreshold { .. })
        ));
    }

    #[test]
    fn validate_rejects_navigator_faster_than_wall_probe() {
        let mut config = GameConfig::default();
        config.navigator.speed = 25.0;
        assert_eq!(config.validate(), Ok(()));

        config.navigator.speed = 40.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NavigatorTooFast {
                speed: 40.0,
                max_speed: 25.0,
            })
        );
    }

    #[test]
    fn validate_rejects_pursuer_that_skips_snap_window() {
        let mut config = GameConfig::default();
        config.pursuers[0].speed = 6.0;
        assert_eq!(config.validate(), Ok(()));

        config.pursuers[0].speed = 20.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PursuerTooFast {
                entity: "blinky".to_owned(),
                speed: 20.0,
                max_speed: 6.0,
            })
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            cell_size = 40.0

            [navigator]
            speed = 4.0
            direction = "Left"
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.cell_size, 40.0);
        assert_eq!(config.navigator.speed, 4.0);
        assert_eq!(config.navigator.direction, Direction::Left);
        assert_eq!(config.navigator.radius, DEFAULT_NAVIGATOR_RADIUS);
        assert_eq!(config.pursuers.len(), 4);
        assert_eq!(config.screen, ScreenConfig::default());
    }
}
