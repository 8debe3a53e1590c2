pub mod clock;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod simulation;
pub mod snake;
pub mod spawner;
pub mod terminal_runtime;
pub mod ui;
