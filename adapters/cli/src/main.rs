#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Chase sessions headlessly.

mod config_file;
mod input;
mod layout_transfer;
mod scene;
mod text_renderer;

use std::{fs, io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maze_chase_core::GameConfig;
use maze_chase_rendering::{Color, Presentation, RenderingBackend};
use maze_chase_system_session::Session;
use maze_chase_world::query;

use input::{Autopilot, Idle, InputSource, ScriptedInput};
use layout_transfer::LevelSnapshot;
use text_renderer::TextBackend;

/// Runs a Maze Chase session without a window.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file; omitted fields keep the classic level
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Layout transfer string replacing the configured level
    #[arg(long)]
    layout: Option<String>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Script of `<frame> <direction>` lines to replay
    #[arg(long, conflicts_with = "autopilot")]
    script: Option<PathBuf>,

    /// Seed for random key presses every 20 frames
    #[arg(long)]
    autopilot: Option<u64>,

    /// Draw the maze every N frames; zero disables drawing
    #[arg(long, default_value_t = 0)]
    render_every: u64,

    /// Draw with 24-bit ANSI colors
    #[arg(long)]
    color: bool,

    /// Print the active layout as a transfer string and exit
    #[arg(long)]
    export_layout: bool,

    /// Log filter, overriding RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let mut config = match &args.config {
        Some(path) => config_file::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(layout) = &args.layout {
        config.level = LevelSnapshot::decode(layout)
            .and_then(LevelSnapshot::into_layout)
            .context("failed to load --layout")?;
    }

    if args.export_layout {
        println!("{}", LevelSnapshot::from_layout(&config.level).encode()?);
        return Ok(());
    }

    let mut session = Session::new(&config).context("invalid game configuration")?;
    let input = input_source(&args)?;
    let presentation = Presentation::new(
        "Maze Chase",
        Color::from_rgb_u8(0, 0, 0),
        scene::initial_scene(session.world())?,
    );
    info!(
        "running {} frames with {} pursuers",
        args.frames,
        config.pursuers.len()
    );

    let backend = TextBackend::new(
        args.frames,
        args.render_every,
        args.color,
        input,
        io::stdout().lock(),
    );
    let mut elapsed = Duration::ZERO;
    backend.run(presentation, |delta, frame_input, scene| {
        let _ = session.tick(&frame_input.directions);
        elapsed += delta;
        scene::refresh(scene, session.world(), elapsed);
    })?;

    println!(
        "frames: {}  dots left: {}  replans: {}",
        query::frame_index(session.world()),
        query::dots(session.world()).len(),
        session.replans()
    );
    Ok(())
}

fn init_logging(filter: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(filter) = filter {
        let _ = builder.parse_filters(filter);
    }
    builder.init();
}

fn input_source(args: &Args) -> Result<Box<dyn InputSource>> {
    if let Some(path) = &args.script {
        let script = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        let input = ScriptedInput::parse(&script)
            .with_context(|| format!("invalid input script {}", path.display()))?;
        return Ok(Box::new(input));
    }
    Ok(match args.autopilot {
        Some(seed) => Box::new(Autopilot::new(seed)),
        None => Box::new(Idle),
    })
}
