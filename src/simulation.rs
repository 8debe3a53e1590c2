use std::time::Duration;

use crate::clock::TickClock;
use crate::config::{GridSize, SimulationConfig};
use crate::error::ConfigError;
use crate::grid::{CellState, Grid};
use crate::input::GameInput;
use crate::snake::{Position, Snake};
use crate::spawner::Spawner;

/// Whether the simulation still advances on ticks.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SimulationStatus {
    Running,
    /// The head ran into the body with `end_on_self_collision` enabled.
    Collided,
}

/// Grid, snake and spawner advanced together on a fixed timestep.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    snake: Snake,
    spawner: Spawner,
    collectibles: Vec<Position>,
    clock: TickClock,
    config: SimulationConfig,
    tick_count: u64,
    collected: u32,
    status: SimulationStatus,
}

impl Simulation {
    /// Creates a simulation whose spawner is seeded from OS entropy.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_spawner(config, Spawner::from_entropy())
    }

    /// Creates a deterministic simulation for tests and reproducible runs.
    pub fn new_with_seed(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_spawner(config, Spawner::with_seed(seed))
    }

    fn with_spawner(config: SimulationConfig, spawner: Spawner) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = config.grid;
        let start = Position {
            x: i32::from(bounds.width / 2),
            y: i32::from(bounds.height / 2),
        };
        let snake = Snake::new(
            start,
            config.initial_direction,
            config.initial_length,
            bounds,
        )
        .with_reversal_allowed(config.allow_reversal);

        let mut simulation = Self {
            grid: Grid::new(bounds),
            snake,
            spawner: spawner.with_max_attempts(config.spawn_attempts),
            collectibles: Vec::with_capacity(1),
            clock: TickClock::new(config.tick_interval()),
            config,
            tick_count: 0,
            collected: 0,
            status: SimulationStatus::Running,
        };
        simulation.snake.stamp(&mut simulation.grid);
        simulation.spawn_collectible();

        log::info!(
            "simulation started on a {}x{} grid with a {}-segment snake",
            bounds.width,
            bounds.height,
            simulation.snake.len()
        );

        Ok(simulation)
    }

    /// Feeds elapsed time into the clock and runs one tick when it is due.
    ///
    /// Returns true when a tick ran. A stopped simulation neither ticks nor
    /// consumes clock time.
    pub fn update(&mut self, delta: Duration) -> bool {
        if self.status != SimulationStatus::Running || !self.clock.advance(delta) {
            return false;
        }

        self.tick()
    }

    /// Advances the snake by exactly one cell.
    ///
    /// Returns false without moving once the simulation has stopped.
    pub fn tick(&mut self) -> bool {
        if self.status != SimulationStatus::Running {
            return false;
        }

        self.tick_count += 1;
        let vacated = self.snake.advance(&mut self.grid);

        let head = self.snake.head();
        if let Some(index) = self.collectibles.iter().position(|c| *c == head) {
            self.collectibles.swap_remove(index);
            self.snake.grow(vacated);
            self.collected += 1;
            log::debug!(
                "collected at ({}, {}), length now {}",
                head.x,
                head.y,
                self.snake.len()
            );
            self.spawn_collectible();
        }

        self.snake.stamp(&mut self.grid);

        if self.config.end_on_self_collision && self.snake.head_overlaps_body() {
            self.status = SimulationStatus::Collided;
            log::info!(
                "snake collided with itself after {} ticks",
                self.tick_count
            );
        }

        true
    }

    /// Applies one external input event.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => {
                if self.status == SimulationStatus::Running
                    && !self.snake.set_direction(direction)
                {
                    log::trace!("ignored reversal to {direction:?}");
                }
            }
            GameInput::Quit => {}
        }
    }

    /// Replaces the active collectible with one at `position`.
    pub fn place_collectible(&mut self, position: Position) {
        for previous in self.collectibles.drain(..) {
            if self.grid.get(previous) == CellState::Collectible {
                self.grid.clear(previous);
            }
        }

        self.grid.set(position, CellState::Collectible);
        self.collectibles.push(position);
    }

    /// Swaps in a different snake and re-stamps the grid.
    pub fn replace_snake(&mut self, snake: Snake) {
        for segment in self.snake.segments() {
            if self.grid.get(*segment).is_snake() {
                self.grid.clear(*segment);
            }
        }

        self.snake = snake.with_reversal_allowed(self.config.allow_reversal);
        self.snake.stamp(&mut self.grid);
    }

    /// Ends the session. The simulation owns no external resources.
    pub fn teardown(self) {
        log::info!(
            "simulation finished after {} ticks, {} collected",
            self.tick_count,
            self.collected
        );
    }

    /// Returns the grid as of the last completed tick.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the snake.
    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Returns the active collectible positions.
    #[must_use]
    pub fn collectibles(&self) -> &[Position] {
        &self.collectibles
    }

    /// Returns the grid dimensions in cells.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.grid.size()
    }

    /// Returns the number of ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns how many collectibles have been eaten.
    #[must_use]
    pub fn collected(&self) -> u32 {
        self.collected
    }

    /// Returns whether the simulation still advances.
    #[must_use]
    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    /// Returns the config the simulation was created from.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn spawn_collectible(&mut self) {
        let snake = &self.snake;
        let collectibles = &self.collectibles;
        let spawned = self.spawner.spawn(&mut self.grid, |position| {
            snake.occupies(position) || collectibles.contains(&position)
        });

        if let Some(position) = spawned {
            self.collectibles.push(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use crate::config::{GridSize, SimulationConfig};
    use crate::grid::CellState;
    use crate::input::{Direction, GameInput};
    use crate::snake::{Position, Snake};

    use super::{Simulation, SimulationStatus};

    fn config_10x10() -> SimulationConfig {
        SimulationConfig::new(
            5,
            Direction::Right,
            GridSize {
                width: 10,
                height: 10,
            },
        )
    }

    fn row(xs: &[i32], y: i32) -> Vec<Position> {
        xs.iter().map(|&x| Position { x, y }).collect()
    }

    fn assert_grid_matches_snake(simulation: &Simulation) {
        let segments = simulation.snake().segments();
        let last = segments.len() - 1;

        let marked: HashSet<Position> = simulation
            .grid()
            .cells()
            .filter(|(_, state)| state.is_snake())
            .map(|(position, _)| position)
            .collect();
        let expected: HashSet<Position> = segments.iter().copied().collect();
        assert_eq!(marked, expected);

        for (index, segment) in segments.iter().enumerate() {
            // Overlapping segments share one cell; only one label survives.
            if segments.iter().filter(|other| *other == segment).count() > 1 {
                continue;
            }
            let expected_state = if index == 0 {
                CellState::SnakeHead
            } else if index == last {
                CellState::SnakeTail
            } else {
                CellState::SnakeBody
            };
            assert_eq!(simulation.grid().get(*segment), expected_state);
        }
    }

    #[test]
    fn new_simulation_centres_snake_and_spawns_one_collectible() {
        let simulation = Simulation::new_with_seed(config_10x10(), 1).expect("valid config");

        assert_eq!(
            simulation.snake().segments(),
            row(&[5, 4, 3, 2, 1], 5).as_slice()
        );
        assert_eq!(simulation.collectibles().len(), 1);
        assert_eq!(simulation.grid().count(CellState::Collectible), 1);
        assert!(!simulation.snake().occupies(simulation.collectibles()[0]));
        assert_grid_matches_snake(&simulation);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimulationConfig::new(
            0,
            Direction::Right,
            GridSize {
                width: 10,
                height: 10,
            },
        );

        assert!(Simulation::new_with_seed(config, 1).is_err());
    }

    #[test]
    fn plain_tick_shifts_snake_and_clears_old_tail() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 2).expect("valid config");
        simulation.place_collectible(Position { x: 0, y: 0 });

        simulation.tick();

        assert_eq!(
            simulation.snake().segments(),
            row(&[6, 5, 4, 3, 2], 5).as_slice()
        );
        assert_eq!(simulation.grid().get(Position { x: 1, y: 5 }), CellState::Empty);
        assert_grid_matches_snake(&simulation);
    }

    #[test]
    fn eating_collectible_grows_at_pre_tick_tail() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 3).expect("valid config");
        simulation.place_collectible(Position { x: 6, y: 5 });

        simulation.tick();

        assert_eq!(simulation.snake().head(), Position { x: 6, y: 5 });
        assert_eq!(simulation.snake().len(), 6);
        assert_eq!(simulation.snake().tail(), Position { x: 1, y: 5 });
        assert_eq!(simulation.collected(), 1);

        let collectibles = simulation.collectibles();
        assert_eq!(collectibles.len(), 1);
        assert_ne!(collectibles[0], Position { x: 6, y: 5 });
        assert!(!simulation.snake().occupies(collectibles[0]));
        assert_eq!(simulation.grid().count(CellState::Collectible), 1);
        assert_grid_matches_snake(&simulation);
    }

    #[test]
    fn head_wraps_left_edge() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 4).expect("valid config");
        simulation.place_collectible(Position { x: 5, y: 0 });
        simulation.replace_snake(Snake::from_segments(row(&[0, 1, 2], 5), Direction::Left));

        simulation.tick();

        assert_eq!(simulation.snake().head(), Position { x: 9, y: 5 });
        assert_grid_matches_snake(&simulation);
    }

    #[test]
    fn length_is_unchanged_without_collisions() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 5).expect("valid config");
        // Row 5 wraps forever; keep the collectible off it.
        simulation.place_collectible(Position { x: 3, y: 8 });

        for _ in 0..25 {
            simulation.tick();
            assert_eq!(simulation.snake().len(), 5);
            assert_grid_matches_snake(&simulation);
        }
    }

    #[test]
    fn at_most_one_collectible_over_a_long_run() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 6).expect("valid config");
        let turns = [
            Direction::Down,
            Direction::Right,
            Direction::Up,
            Direction::Right,
        ];

        for step in 0..400 {
            if step % 7 == 0 {
                simulation.apply_input(GameInput::Direction(turns[(step / 7) % turns.len()]));
            }
            simulation.tick();

            assert!(simulation.grid().count(CellState::Collectible) <= 1);
            assert!(simulation.collectibles().len() <= 1);
            assert_grid_matches_snake(&simulation);
        }
    }

    #[test]
    fn update_ticks_once_per_interval() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 7).expect("valid config");
        simulation.place_collectible(Position { x: 0, y: 0 });

        assert!(!simulation.update(Duration::from_millis(200)));
        assert_eq!(simulation.tick_count(), 0);

        assert!(simulation.update(Duration::from_millis(150)));
        assert_eq!(simulation.tick_count(), 1);
        assert_eq!(simulation.snake().head(), Position { x: 6, y: 5 });

        // 50ms carried from the previous update.
        assert!(simulation.update(Duration::from_millis(250)));
        assert_eq!(simulation.tick_count(), 2);
    }

    #[test]
    fn reversal_input_is_ignored_by_default() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 8).expect("valid config");
        simulation.place_collectible(Position { x: 0, y: 0 });

        simulation.apply_input(GameInput::Direction(Direction::Left));
        simulation.tick();

        assert_eq!(simulation.snake().head(), Position { x: 6, y: 5 });
    }

    #[test]
    fn self_collision_stops_simulation_when_enabled() {
        let config = SimulationConfig {
            end_on_self_collision: true,
            ..config_10x10()
        };
        let mut simulation = Simulation::new_with_seed(config, 9).expect("valid config");
        simulation.place_collectible(Position { x: 9, y: 9 });
        simulation.replace_snake(Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Down,
        ));

        assert!(simulation.tick());
        assert_eq!(simulation.status(), SimulationStatus::Collided);

        let head = simulation.snake().head();
        assert!(!simulation.tick());
        assert_eq!(simulation.snake().head(), head);
        assert_eq!(simulation.tick_count(), 1);
    }

    #[test]
    fn update_reports_no_tick_after_collision() {
        let config = SimulationConfig {
            end_on_self_collision: true,
            ..config_10x10()
        };
        let mut simulation = Simulation::new_with_seed(config, 12).expect("valid config");
        simulation.place_collectible(Position { x: 9, y: 9 });
        simulation.replace_snake(Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Down,
        ));
        assert!(simulation.update(Duration::from_millis(300)));
        assert_eq!(simulation.status(), SimulationStatus::Collided);

        assert!(!simulation.update(Duration::from_millis(300)));
        assert!(!simulation.update(Duration::from_millis(600)));
        assert_eq!(simulation.tick_count(), 1);
    }

    #[test]
    fn self_overlap_keeps_running_by_default() {
        let mut simulation = Simulation::new_with_seed(config_10x10(), 10).expect("valid config");
        simulation.place_collectible(Position { x: 9, y: 9 });
        simulation.replace_snake(Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Down,
        ));

        simulation.tick();

        assert_eq!(simulation.status(), SimulationStatus::Running);
        assert!(simulation.snake().head_overlaps_body());
    }
}
