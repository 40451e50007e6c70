use std::collections::VecDeque;

use super::{cell::Cell, direction::Direction, grid::Grid};

/// What the candidate head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

/// The snake: body segments head-first plus its committed and pending heading
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: VecDeque<Cell>,
    direction: Direction,
    next_direction: Direction,
}

impl Snake {
    pub fn new(head: Cell, body: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        let mut segments = VecDeque::from([head]);
        segments.extend(body);
        Self {
            segments,
            direction,
            next_direction: direction,
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty body.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Cell>,
        direction: Direction,
    ) -> Option<Self> {
        let mut segments = segments.into_iter();
        let head = segments.next()?;
        Some(Self::new(head, segments, direction))
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.segments.iter()
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.segments.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    /// Queue a heading for the next tick. Reversals of the committed heading are dropped.
    pub fn set_direction(&mut self, requested: Direction) {
        if self.direction.is_opposite(requested) {
            return;
        }
        self.next_direction = requested;
    }

    /// Commit the pending heading and return the cell the head would move into
    pub fn commit_and_peek(&mut self) -> Cell {
        self.direction = self.next_direction;
        self.head().step(self.direction)
    }

    /// Check a candidate head against the border and the full pre-move body
    pub fn collision(&self, head: Cell, grid: &Grid) -> Option<Collision> {
        if grid.is_border(head) || !grid.contains(head) {
            return Some(Collision::Wall);
        }
        if self.occupies(head) {
            return Some(Collision::SelfCollision);
        }
        None
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    pub fn push_head(&mut self, head: Cell) {
        self.segments.push_front(head);
    }

    /// Remove the tail segment. The head is never removed.
    pub fn drop_tail(&mut self) -> Option<Cell> {
        if self.segments.len() > 1 {
            self.segments.pop_back()
        } else {
            None
        }
    }
}
