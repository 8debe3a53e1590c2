use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::Direction;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Default number of segments the snake starts with.
pub const DEFAULT_INITIAL_LENGTH: usize = 5;

/// Default time per movement step in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 300;

/// Default target frame rate of the game loop.
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 30;

/// Random samples the spawner draws before enumerating free cells.
pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 64;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

/// Tunables for one simulation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridSize,
    pub initial_length: usize,
    pub initial_direction: Direction,
    pub tick_interval_ms: u64,
    pub frames_per_second: u32,
    /// Upper bound on rejected random spawn candidates.
    pub spawn_attempts: u32,
    /// Accept a turn straight back into the neck.
    pub allow_reversal: bool,
    /// Stop the simulation when the head runs into the body.
    pub end_on_self_collision: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            initial_length: DEFAULT_INITIAL_LENGTH,
            initial_direction: Direction::Right,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            spawn_attempts: DEFAULT_SPAWN_ATTEMPTS,
            allow_reversal: false,
            end_on_self_collision: false,
        }
    }
}

impl SimulationConfig {
    /// Creates a config for `create(length, direction, width, height)`.
    #[must_use]
    pub fn new(initial_length: usize, initial_direction: Direction, grid: GridSize) -> Self {
        Self {
            grid,
            initial_length,
            initial_direction,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second.max(1)
    }

    /// Rejects configurations the simulation cannot start from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }

        let axis_extent = match self.initial_direction {
            Direction::Left | Direction::Right => usize::from(self.grid.width),
            Direction::Up | Direction::Down => usize::from(self.grid.height),
        };
        if self.initial_length == 0 || self.initial_length > axis_extent {
            return Err(ConfigError::Invalid(format!(
                "initial length {} does not fit a {}x{} grid",
                self.initial_length, self.grid.width, self.grid.height
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick interval must be greater than zero".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads the config from `path`, or from the platform location when `None`.
///
/// A missing file yields the defaults. A file that exists but cannot be read
/// or parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig, ConfigError> {
    match path {
        Some(path) => load_config_from_path(path),
        None => load_config_from_path(&config_path()),
    }
}

fn load_config_from_path(path: &Path) -> Result<SimulationConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(SimulationConfig::default());
        }
        Err(e) => return Err(e.into()),
    };

    let config = serde_json::from_str::<SimulationConfig>(&raw)?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

/// Terminal colours for each cell state.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub snake_head: Color,
    pub snake_body: Color,
    pub snake_tail: Color,
    pub collectible: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_fg: Color,
}

/// Classic blue snake on dark theme.
pub const THEME_CLASSIC: Theme = Theme {
    name: "Classic",
    snake_head: Color::White,
    snake_body: Color::Blue,
    snake_tail: Color::DarkGray,
    collectible: Color::Red,
    play_bg: Color::Black,
    border_fg: Color::White,
    hud_fg: Color::Gray,
};
