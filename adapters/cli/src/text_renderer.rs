//! Character-cell rendering backend for terminals and logs.

use std::{io::Write, time::Duration};

use anyhow::Result as AnyResult;
use glam::Vec2;
use log::info;
use maze_chase_rendering::{
    Color, FrameInput, Presentation, PursuerSprite, RenderingBackend, Scene, FRAME_DURATION,
};

use crate::input::InputSource;

const WALL_GLYPH: char = '#';
const DOT_GLYPH: char = '.';
const CLOSED_MOUTH_GLYPH: char = 'O';
const FALLBACK_PURSUER_GLYPH: char = 'g';
const STILL_GAZE_GLYPH: char = '*';
/// Mouth apertures below this draw the navigator with its mouth shut.
const MOUTH_CLOSED_BELOW: f32 = 0.25;
const NAVIGATOR_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0x00);
const DOT_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
const ANSI_RESET: &str = "\x1b[0m";

/// Runs a fixed number of frames and prints the maze every few of them.
///
/// The navigator is an arrow along its heading, or `O` while its mouth is
/// shut. Pursuers use the lowercase initial of their sprite, and a legend
/// under the maze shows where each of them is looking.
pub(crate) struct TextBackend<W> {
    frames: u64,
    render_every: u64,
    colored: bool,
    input: Box<dyn InputSource>,
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend; a `render_every` of zero disables drawing.
    pub(crate) fn new(
        frames: u64,
        render_every: u64,
        colored: bool,
        input: Box<dyn InputSource>,
        out: W,
    ) -> Self {
        Self {
            frames,
            render_every,
            colored,
            input,
            out,
        }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        let background = self.colored.then_some(presentation.clear_color);
        let mut scene = presentation.scene;
        writeln!(self.out, "{}", presentation.window_title)?;

        for frame in 1..=self.frames {
            let input = self.input.poll(frame);
            update_scene(FRAME_DURATION, input, &mut scene);

            if self.render_every > 0 && frame % self.render_every == 0 {
                self.out.write_all(draw(&scene, background).as_bytes())?;
            }
            if scene.is_cleared() {
                info!("level cleared on frame {frame}");
                break;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct Glyph {
    symbol: char,
    color: Option<Color>,
}

/// Renders the scene as one line per maze row, preceded by a status line.
///
/// With a `background`, every glyph is wrapped in 24-bit ANSI color escapes.
pub(crate) fn draw(scene: &Scene, background: Option<Color>) -> String {
    let maze = &scene.maze;
    let columns = maze.columns as usize;
    let blank = Glyph {
        symbol: ' ',
        color: None,
    };
    let mut canvas = vec![vec![blank; columns]; maze.rows as usize];

    let mut plot = |point: Vec2, symbol: char, color: Color| {
        if let Some((column, row)) = cell_of(point, maze.cell_size, columns, canvas.len()) {
            canvas[row][column] = Glyph {
                symbol,
                color: Some(color),
            };
        }
    };

    for wall in &maze.walls {
        plot(
            wall.top_left + Vec2::splat(wall.size / 2.0),
            WALL_GLYPH,
            maze.wall_color,
        );
    }
    for &dot in &scene.dots {
        plot(dot, DOT_GLYPH, DOT_COLOR);
    }
    for pursuer in &scene.pursuers {
        plot(
            pursuer.position,
            pursuer_glyph(pursuer.sprite, &pursuer.name),
            pursuer.sprite.color(),
        );
    }
    let navigator = &scene.navigator;
    let navigator_glyph = if navigator.mouth_open < MOUTH_CLOSED_BELOW {
        CLOSED_MOUTH_GLYPH
    } else {
        arrow(Vec2::from_angle(navigator.heading_degrees.to_radians()))
    };
    plot(navigator.position, navigator_glyph, NAVIGATOR_COLOR);

    let mut text = format!("frame {:>5}  dots {}\n", scene.frame, scene.dots.len());
    for row in canvas {
        if let Some(background) = background {
            text.push_str(&background_escape(background));
        }
        for glyph in row {
            match (background, glyph.color) {
                (Some(_), Some(color)) => {
                    text.push_str(&foreground_escape(color));
                    text.push(glyph.symbol);
                }
                _ => text.push(glyph.symbol),
            }
        }
        if background.is_some() {
            text.push_str(ANSI_RESET);
        }
        text.push('\n');
    }

    let legend: Vec<String> = scene
        .pursuers
        .iter()
        .map(|pursuer| {
            format!(
                "{}{}",
                pursuer_glyph(pursuer.sprite, &pursuer.name),
                arrow(pursuer.gaze)
            )
        })
        .collect();
    if !legend.is_empty() {
        text.push_str(&legend.join("  "));
        text.push('\n');
    }
    text
}

fn pursuer_glyph(sprite: PursuerSprite, name: &str) -> char {
    match sprite {
        PursuerSprite::Blinky => 'b',
        PursuerSprite::Pinky => 'p',
        PursuerSprite::Inky => 'i',
        PursuerSprite::Clyde => 'c',
        PursuerSprite::Generic => name
            .chars()
            .next()
            .map_or(FALLBACK_PURSUER_GLYPH, |initial| initial.to_ascii_lowercase()),
    }
}

/// Arrow along the dominant axis of `direction`, in screen orientation.
fn arrow(direction: Vec2) -> char {
    if direction == Vec2::ZERO {
        STILL_GAZE_GLYPH
    } else if direction.x.abs() >= direction.y.abs() {
        if direction.x > 0.0 {
            '>'
        } else {
            '<'
        }
    } else if direction.y > 0.0 {
        'v'
    } else {
        '^'
    }
}

fn foreground_escape(color: Color) -> String {
    let [red, green, blue] = color.to_rgb_u8();
    format!("\x1b[38;2;{red};{green};{blue}m")
}

fn background_escape(color: Color) -> String {
    let [red, green, blue] = color.to_rgb_u8();
    format!("\x1b[48;2;{red};{green};{blue}m")
}

fn cell_of(point: Vec2, cell_size: f32, columns: usize, rows: usize) -> Option<(usize, usize)> {
    let index = ((point - Vec2::splat(cell_size)) / cell_size + Vec2::splat(0.5)).floor();
    if index.x < 0.0 || index.y < 0.0 {
        return None;
    }
    let (column, row) = (index.x as usize, index.y as usize);
    (column < columns && row < rows).then_some((column, row))
}
