use crate::config::GridSize;
use crate::grid::{CellState, Grid};
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns this position wrapped into bounds on both axes.
    #[must_use]
    pub fn wrapped(self, bounds: GridSize) -> Self {
        Self {
            x: wrap_axis(self.x, i32::from(bounds.width)),
            y: wrap_axis(self.y, i32::from(bounds.height)),
        }
    }

    /// Returns the neighbouring cell in `direction`, wrapping at the edges.
    #[must_use]
    pub fn stepped(self, direction: Direction, bounds: GridSize) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
        .wrapped(bounds)
    }
}

// Euclidean modulo: -1 maps to upper_bound - 1, never to -1.
fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    let wrapped = value % upper_bound;
    if wrapped < 0 {
        wrapped + upper_bound
    } else {
        wrapped
    }
}

/// Segment chain and movement state of the snake.
///
/// `segments[0]` is the head and the last entry is the tail. The chain is
/// never empty.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    segments: Vec<Position>,
    current_direction: Direction,
    previous_direction: Direction,
    moved_direction: Direction,
    allow_reversal: bool,
}

impl Snake {
    /// Creates a straight snake of `length` cells trailing behind `head`.
    #[must_use]
    pub fn new(head: Position, direction: Direction, length: usize, bounds: GridSize) -> Self {
        let backwards = direction.opposite();
        let mut segments = Vec::with_capacity(length.max(1));
        let mut cursor = head.wrapped(bounds);

        segments.push(cursor);
        for _ in 1..length {
            cursor = cursor.stepped(backwards, bounds);
            segments.push(cursor);
        }

        Self::from_segments(segments, direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(
            !segments.is_empty(),
            "snake must contain at least one segment"
        );

        Self {
            segments,
            current_direction: direction,
            previous_direction: direction,
            moved_direction: direction,
            allow_reversal: false,
        }
    }

    /// Enables or disables turning straight back into the neck.
    #[must_use]
    pub fn with_reversal_allowed(mut self, allowed: bool) -> Self {
        self.allow_reversal = allowed;
        self
    }

    /// Moves the chain one cell and returns the vacated tail position.
    ///
    /// The tail cell is cleared on `grid` before the shift. The caller
    /// re-stamps the snake with [`Snake::stamp`] once growth is resolved.
    pub fn advance(&mut self, grid: &mut Grid) -> Position {
        let bounds = grid.size();
        let vacated = self.tail();
        grid.clear(vacated);

        // Tail-to-head so every slot is read before it is overwritten.
        for index in (1..self.segments.len()).rev() {
            self.segments[index] = self.segments[index - 1];
        }

        self.moved_direction = self.current_direction;
        self.segments[0] = self.segments[0].stepped(self.current_direction, bounds);

        vacated
    }

    /// Appends a tail segment at `position`.
    pub fn grow(&mut self, position: Position) {
        self.segments.push(position);
    }

    /// Writes the head, body and tail labels for every segment onto `grid`.
    pub fn stamp(&self, grid: &mut Grid) {
        let last = self.segments.len() - 1;

        // Head last so it wins wherever segments overlap.
        for (index, segment) in self.segments.iter().enumerate().rev() {
            let state = if index == 0 {
                CellState::SnakeHead
            } else if index == last {
                CellState::SnakeTail
            } else {
                CellState::SnakeBody
            };
            grid.set(*segment, state);
        }
    }

    /// Sets the direction applied on the next tick.
    ///
    /// The latest accepted input before a tick wins. Unless reversal is
    /// allowed, a direction opposite to the last applied movement is rejected
    /// and `false` is returned.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !self.allow_reversal
            && self.segments.len() > 1
            && !direction_change_is_valid(self.moved_direction, direction)
        {
            return false;
        }

        self.previous_direction = self.current_direction;
        self.current_direction = direction;
        true
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.segments.contains(&position)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the direction the next tick will apply.
    #[must_use]
    pub fn current_direction(&self) -> Direction {
        self.current_direction
    }

    /// Returns the direction applied on the most recent tick.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.moved_direction
    }

    /// Returns the direction that was pending before the latest input.
    #[must_use]
    pub fn previous_direction(&self) -> Direction {
        self.previous_direction
    }

    /// Returns the body segments from head to tail.
    #[must_use]
    pub fn segments(&self) -> &[Position] {
        &self.segments
    }
}
