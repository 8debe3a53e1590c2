use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::input::GameInput;
use crate::simulation::Simulation;

/// Source of input events, drained once per frame.
pub trait InputSource {
    /// Returns every event received since the previous call.
    fn drain(&mut self) -> io::Result<Vec<GameInput>>;
}

/// Presents the simulation after each frame.
pub trait Renderer {
    fn render(&mut self, simulation: &Simulation) -> io::Result<()>;
}

/// Measures real elapsed time between frames and paces the loop.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame_budget: Duration,
    last_frame: Instant,
}

impl FramePacer {
    #[must_use]
    pub fn new(frame_budget: Duration) -> Self {
        Self {
            frame_budget,
            last_frame: Instant::now(),
        }
    }

    /// Returns the time since the previous call and restarts the frame.
    pub fn frame_delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        delta
    }

    /// Returns how long to sleep after a frame that took `elapsed`.
    #[must_use]
    pub fn sleep_for(&self, elapsed: Duration) -> Duration {
        self.frame_budget.saturating_sub(elapsed)
    }

    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }
}

/// Fixed frame-rate driver: input, update, render, sleep.
pub struct GameLoop<I, R> {
    input: I,
    renderer: R,
    pacer: FramePacer,
    quit: bool,
}

impl<I: InputSource, R: Renderer> GameLoop<I, R> {
    #[must_use]
    pub fn new(input: I, renderer: R, frame_budget: Duration) -> Self {
        Self {
            input,
            renderer,
            pacer: FramePacer::new(frame_budget),
            quit: false,
        }
    }

    /// Runs frames until a quit input arrives.
    pub fn run(&mut self, simulation: &mut Simulation) -> io::Result<()> {
        self.pacer.frame_delta();
        while !self.quit {
            self.frame(simulation)?;
        }

        log::info!("quit requested, leaving game loop");
        Ok(())
    }

    /// Runs at most `frames` frames, stopping early on quit.
    ///
    /// Returns the number of frames executed.
    pub fn run_frames(&mut self, simulation: &mut Simulation, frames: usize) -> io::Result<usize> {
        self.pacer.frame_delta();
        let mut executed = 0;
        while executed < frames && !self.quit {
            self.frame(simulation)?;
            executed += 1;
        }

        Ok(executed)
    }

    fn frame(&mut self, simulation: &mut Simulation) -> io::Result<()> {
        let started = Instant::now();

        for input in self.input.drain()? {
            match input {
                GameInput::Quit => self.quit = true,
                other => simulation.apply_input(other),
            }
        }
        if self.quit {
            return Ok(());
        }

        let delta = self.pacer.frame_delta();
        simulation.update(delta);
        self.renderer.render(simulation)?;

        let pause = self.pacer.sleep_for(started.elapsed());
        if !pause.is_zero() {
            thread::sleep(pause);
        }

        Ok(())
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Returns the input source and renderer.
    pub fn into_parts(self) -> (I, R) {
        (self.input, self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::time::Duration;

    use crate::config::{GridSize, SimulationConfig};
    use crate::input::{Direction, GameInput};
    use crate::simulation::Simulation;

    use super::{FramePacer, GameLoop, InputSource, Renderer};

    #[derive(Default)]
    struct ScriptedInput {
        frames: VecDeque<Vec<GameInput>>,
    }

    impl InputSource for ScriptedInput {
        fn drain(&mut self) -> io::Result<Vec<GameInput>> {
            Ok(self.frames.pop_front().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, _simulation: &Simulation) -> io::Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    fn simulation() -> Simulation {
        let config = SimulationConfig {
            tick_interval_ms: 1,
            ..SimulationConfig::new(
                3,
                Direction::Right,
                GridSize {
                    width: 12,
                    height: 12,
                },
            )
        };
        Simulation::new_with_seed(config, 11).expect("valid config")
    }

    #[test]
    fn sleep_fills_remaining_frame_budget() {
        let pacer = FramePacer::new(Duration::from_millis(33));

        assert_eq!(
            pacer.sleep_for(Duration::from_millis(10)),
            Duration::from_millis(23)
        );
        assert_eq!(pacer.sleep_for(Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn quit_input_stops_the_loop_before_rendering() {
        let input = ScriptedInput {
            frames: VecDeque::from(vec![vec![], vec![GameInput::Quit]]),
        };
        let mut game_loop = GameLoop::new(input, CountingRenderer::default(), Duration::ZERO);
        let mut simulation = simulation();

        game_loop.run(&mut simulation).expect("loop should exit cleanly");

        assert!(game_loop.quit_requested());
        let (_, renderer) = game_loop.into_parts();
        assert_eq!(renderer.frames, 1);
    }

    #[test]
    fn run_frames_renders_every_frame_and_forwards_directions() {
        let input = ScriptedInput {
            frames: VecDeque::from(vec![vec![GameInput::Direction(Direction::Down)]]),
        };
        let mut game_loop =
            GameLoop::new(input, CountingRenderer::default(), Duration::from_millis(2));
        let mut simulation = simulation();

        let executed = game_loop
            .run_frames(&mut simulation, 3)
            .expect("frames should run");

        assert_eq!(executed, 3);
        assert_eq!(simulation.snake().current_direction(), Direction::Down);
        assert!(simulation.tick_count() >= 1);
        let (_, renderer) = game_loop.into_parts();
        assert_eq!(renderer.frames, 3);
    }
}
