use std::io;

use thiserror::Error;

/// Contract violations when addressing grid cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum GridError {
    /// InvalidGridAccess: the position lies outside the declared bounds.
    #[error("invalid grid access at ({x}, {y}) on a {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },
}

/// Failures while loading or validating simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for io::Error {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Io(error) => error,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

/// Failures setting up the terminal for a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum TerminalError {
    #[error(
        "terminal too small for {grid_width}x{grid_height} cells: \
         need {required_columns}x{required_rows}, have {columns}x{rows}"
    )]
    TooSmall {
        grid_width: u16,
        grid_height: u16,
        required_columns: u16,
        required_rows: u16,
        columns: u16,
        rows: u16,
    },
}

impl From<TerminalError> for io::Error {
    fn from(error: TerminalError) -> Self {
        io::Error::new(io::ErrorKind::Unsupported, error)
    }
}
