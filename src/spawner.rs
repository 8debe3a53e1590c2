use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};

use crate::config::DEFAULT_SPAWN_ATTEMPTS;
use crate::grid::{CellState, Grid};
use crate::snake::Position;

/// Seed used when the operating system cannot provide entropy.
pub const FALLBACK_SEED: u64 = 0x5eed_5a4e;

/// Places collectibles on free grid cells.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    max_attempts: u32,
}

impl Spawner {
    /// Creates a spawner seeded from the operating system entropy source.
    ///
    /// Falls back to [`FALLBACK_SEED`] when the entropy source fails.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_seed_source(OsRng)
    }

    /// Seeds the spawner from `source`, falling back to [`FALLBACK_SEED`]
    /// when `source` cannot produce bytes.
    #[must_use]
    pub fn from_seed_source<R: RngCore>(source: R) -> Self {
        let rng = match StdRng::from_rng(source) {
            Ok(rng) => rng,
            Err(error) => {
                log::warn!("entropy source failed ({error}), using deterministic spawner seed");
                StdRng::seed_from_u64(FALLBACK_SEED)
            }
        };

        Self::with_rng(rng)
    }

    /// Creates a deterministic spawner for tests and reproducible sessions.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_SPAWN_ATTEMPTS,
        }
    }

    /// Sets how many random candidates are tried before enumerating free cells.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Places a collectible on a free cell and returns its position.
    ///
    /// A candidate is free when its grid cell is empty and `is_occupied`
    /// rejects it. Returns `None` when no free cell exists.
    pub fn spawn<F>(&mut self, grid: &mut Grid, is_occupied: F) -> Option<Position>
    where
        F: Fn(Position) -> bool,
    {
        let is_free = |position: Position| {
            grid.get(position) == CellState::Empty && !is_occupied(position)
        };

        let chosen = self
            .sample_free(grid, &is_free)
            .or_else(|| self.pick_remaining(grid, &is_free));

        match chosen {
            Some(position) => {
                grid.set(position, CellState::Collectible);
                log::debug!("spawned collectible at ({}, {})", position.x, position.y);
                Some(position)
            }
            None => {
                log::warn!("no free cell left for a collectible");
                None
            }
        }
    }

    fn sample_free(&mut self, grid: &Grid, is_free: impl Fn(Position) -> bool) -> Option<Position> {
        let size = grid.size();

        for _ in 0..self.max_attempts {
            let candidate = Position {
                x: self.rng.gen_range(0..i32::from(size.width)),
                y: self.rng.gen_range(0..i32::from(size.height)),
            };
            if is_free(candidate) {
                return Some(candidate);
            }
        }

        None
    }

    fn pick_remaining(&mut self, grid: &Grid, is_free: impl Fn(Position) -> bool) -> Option<Position> {
        let candidates: Vec<Position> = grid
            .cells()
            .map(|(position, _)| position)
            .filter(|position| is_free(*position))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }
}
