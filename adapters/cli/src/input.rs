//! Headless input sources that stand in for a keyboard.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use maze_chase_core::Direction;
use maze_chase_rendering::FrameInput;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Frames between two autopilot key presses.
const AUTOPILOT_INTERVAL: u64 = 20;

/// Produces the directions pressed during a frame.
pub(crate) trait InputSource {
    /// Directions pressed during `frame`, oldest first.
    fn poll(&mut self, frame: u64) -> FrameInput;
}

/// Source that never presses anything.
#[derive(Debug, Default)]
pub(crate) struct Idle;

impl InputSource for Idle {
    fn poll(&mut self, _frame: u64) -> FrameInput {
        FrameInput::default()
    }
}

/// Replays key presses listed in a script.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ScriptedInput {
    presses: BTreeMap<u64, Vec<Direction>>,
}

impl ScriptedInput {
    /// Parses lines of `<frame> <up|down|left|right>`.
    ///
    /// Blank lines and lines starting with `#` are skipped. Several presses on
    /// the same frame keep their script order.
    pub(crate) fn parse(script: &str) -> Result<Self> {
        let mut presses: BTreeMap<u64, Vec<Direction>> = BTreeMap::new();
        for (index, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_number = index + 1;

            let mut fields = line.split_whitespace();
            let (Some(frame), Some(direction), None) =
                (fields.next(), fields.next(), fields.next())
            else {
                bail!("line {line_number}: expected `<frame> <direction>`, found `{line}`");
            };
            let frame = frame
                .parse::<u64>()
                .with_context(|| format!("line {line_number}: invalid frame `{frame}`"))?;
            let direction = parse_direction(direction)
                .with_context(|| format!("line {line_number}: unknown direction `{direction}`"))?;

            presses.entry(frame).or_default().push(direction);
        }
        Ok(Self { presses })
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, frame: u64) -> FrameInput {
        FrameInput {
            directions: self.presses.remove(&frame).unwrap_or_default(),
        }
    }
}

/// Presses a random direction at a fixed interval, reproducible from its seed.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, frame: u64) -> FrameInput {
        if frame % AUTOPILOT_INTERVAL != 0 {
            return FrameInput::default();
        }
        FrameInput {
            directions: Direction::ALL.choose(&mut self.rng).copied().into_iter().collect(),
        }
    }
}

fn parse_direction(name: &str) -> Option<Direction> {
    match name.to_ascii_lowercase().as_str() {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    }
}
