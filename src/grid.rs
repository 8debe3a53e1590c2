use crate::config::GridSize;
use crate::error::GridError;
use crate::snake::Position;

/// Semantic state of one grid cell, shared by the simulation and renderers.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    SnakeHead,
    SnakeBody,
    SnakeTail,
    Collectible,
}

impl CellState {
    /// Returns true for the three snake labels.
    #[must_use]
    pub fn is_snake(self) -> bool {
        matches!(self, Self::SnakeHead | Self::SnakeBody | Self::SnakeTail)
    }
}

/// Fixed-size, row-major cell buffer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid of `size` with every cell empty.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![CellState::Empty; size.total_cells()],
        }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns true when `position` addresses a cell of this grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.is_within_bounds(self.size)
    }

    /// Returns the state at `position`.
    ///
    /// # Panics
    ///
    /// Panics when `position` is outside the grid.
    #[must_use]
    pub fn get(&self, position: Position) -> CellState {
        match self.try_get(position) {
            Ok(state) => state,
            Err(error) => panic!("{error}"),
        }
    }

    /// Writes `state` at `position`.
    ///
    /// # Panics
    ///
    /// Panics when `position` is outside the grid.
    pub fn set(&mut self, position: Position, state: CellState) {
        if let Err(error) = self.try_set(position, state) {
            panic!("{error}");
        }
    }

    /// Resets `position` to [`CellState::Empty`].
    pub fn clear(&mut self, position: Position) {
        self.set(position, CellState::Empty);
    }

    pub fn try_get(&self, position: Position) -> Result<CellState, GridError> {
        self.index_of(position).map(|index| self.cells[index])
    }

    pub fn try_set(&mut self, position: Position, state: CellState) -> Result<(), GridError> {
        let index = self.index_of(position)?;
        self.cells[index] = state;
        Ok(())
    }

    /// Iterates all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        let width = usize::from(self.size.width);
        self.cells.iter().enumerate().map(move |(index, state)| {
            let position = Position {
                x: (index % width) as i32,
                y: (index / width) as i32,
            };
            (position, *state)
        })
    }

    /// Returns the positions currently holding `state`.
    #[must_use]
    pub fn positions_of(&self, state: CellState) -> Vec<Position> {
        self.cells()
            .filter(|(_, cell)| *cell == state)
            .map(|(position, _)| position)
            .collect()
    }

    /// Counts the cells currently holding `state`.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    fn index_of(&self, position: Position) -> Result<usize, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: self.size.width,
                height: self.size.height,
            });
        }

        Ok(position.y as usize * usize::from(self.size.width) + position.x as usize)
    }
}
