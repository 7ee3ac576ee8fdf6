//! Bounded lattice random walk.
//!
//! A [`RandomWalk`] is a lazy, finite iterator of positions. It knows nothing
//! about the grid: the caller inspects each yielded position and simply stops
//! pulling from the iterator to discard a particle mid-walk.

use crate::grid::{Direction, Position};
use rand::Rng;

/// Random walk over the 8-connected lattice with a fixed step budget
pub struct RandomWalk<'a, R: Rng + ?Sized> {
    position: Position,
    remaining: usize,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomWalk<'a, R> {
    pub fn new(origin: Position, max_steps: usize, rng: &'a mut R) -> Self {
        Self {
            position: origin,
            remaining: max_steps,
            rng,
        }
    }

    /// Current position (the origin until the first step is taken)
    pub fn position(&self) -> Position {
        self.position
    }

    /// Steps left in the budget
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<R: Rng + ?Sized> Iterator for RandomWalk<'_, R> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let (dx, dy) = Direction::random(&mut *self.rng).offset();
        self.position = self.position.offset(dx, dy);
        Some(self.position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Start a walk of at most `max_steps` unit moves from `origin`
pub fn walk<R: Rng + ?Sized>(origin: Position, max_steps: usize, rng: &mut R) -> RandomWalk<'_, R> {
    RandomWalk::new(origin, max_steps, rng)
}
