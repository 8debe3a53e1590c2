use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;

use clap::Parser;
use env_logger::{Env, Target};
use grid_snake::config::{SimulationConfig, THEME_CLASSIC, load_config};
use grid_snake::game_loop::GameLoop;
use grid_snake::input::{Direction, TerminalInput};
use grid_snake::renderer::TerminalRenderer;
use grid_snake::simulation::Simulation;
use grid_snake::terminal_runtime::restore_terminal;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (JSON); defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Initial snake length.
    #[arg(long)]
    length: Option<usize>,

    /// Initial movement direction.
    #[arg(long, value_enum)]
    direction: Option<Direction>,

    /// Milliseconds per movement step.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Target frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Seed the collectible spawner for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    /// Allow turning straight back into the neck.
    #[arg(long = "allow-reversal")]
    allow_reversal: bool,

    /// Stop when the snake runs into itself.
    #[arg(long = "end-on-collision")]
    end_on_collision: bool,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = resolve_config(&cli)?;
    let mut simulation = match cli.seed {
        Some(seed) => Simulation::new_with_seed(config, seed)?,
        None => Simulation::new(config)?,
    };

    install_panic_hook();
    run(&mut simulation)?;
    simulation.teardown();
    Ok(())
}

fn run(simulation: &mut Simulation) -> io::Result<()> {
    let renderer = TerminalRenderer::enter(simulation.size(), &THEME_CLASSIC)?;
    let frame_budget = simulation.config().frame_budget();
    let mut game_loop = GameLoop::new(TerminalInput::new(), renderer, frame_budget);

    game_loop.run(simulation)
}

fn resolve_config(cli: &Cli) -> io::Result<SimulationConfig> {
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(width) = cli.width {
        config.grid.width = width;
    }
    if let Some(height) = cli.height {
        config.grid.height = height;
    }
    if let Some(length) = cli.length {
        config.initial_length = length;
    }
    if let Some(direction) = cli.direction {
        config.initial_direction = direction;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(fps) = cli.fps {
        config.frames_per_second = fps;
    }
    config.allow_reversal |= cli.allow_reversal;
    config.end_on_self_collision |= cli.end_on_collision;

    Ok(config)
}

fn init_logging(log_file: Option<&PathBuf>) -> io::Result<()> {
    // Logging to the terminal would draw over the alternate screen.
    let Some(path) = log_file else {
        env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        return Ok(());
    };

    let file = File::create(path)?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
