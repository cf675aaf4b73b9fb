//! The player token: grid position, hop animation and input queue

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A move command from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid delta as (column, row); up decreases the row
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// Parse a single-letter move code (U/D/L/R, case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Which way the token is drawn facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    /// Facing for a grid delta. Vertical movement wins over horizontal.
    pub fn from_delta(delta: IVec2) -> Option<Self> {
        if delta.y < 0 {
            Some(Facing::Up)
        } else if delta.x > 0 {
            Some(Facing::Right)
        } else if delta.y > 0 {
            Some(Facing::Down)
        } else if delta.x < 0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// The player token
///
/// `col`/`row` are authoritative and change the instant a hop starts;
/// `pos` is the continuous render position that chases `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub col: i32,
    pub row: i32,
    pub pos: Vec2,
    pub target: Vec2,
    /// Signed drift of the platform being ridden, if any
    pub support: Option<f32>,
    pub alive: bool,
    pub facing: Facing,
    /// At most one queued hop; newer commands overwrite it
    pub pending: Option<IVec2>,
}

impl Player {
    /// Spawn in the middle column of the spawn row
    pub fn new(tuning: &Tuning) -> Self {
        let col = tuning.cols / 2;
        let row = tuning.spawn_row;
        let pos = Vec2::new(tuning.cell_x(col), tuning.cell_y(row));
        Self {
            col,
            row,
            pos,
            target: pos,
            support: None,
            alive: true,
            facing: Facing::Up,
            pending: None,
        }
    }

    /// Mid-hop: the render position has not reached the target yet
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.pos != self.target
    }

    #[inline]
    pub fn is_riding(&self) -> bool {
        self.support.is_some()
    }

    /// Handle a move command: hop now if idle, otherwise queue it
    pub fn request_move(&mut self, delta: IVec2, tuning: &Tuning) {
        if !self.alive {
            return;
        }
        if self.is_moving() {
            self.pending = Some(delta);
        } else {
            self.start_move(delta, tuning);
        }
    }

    /// Validate and commit a hop. Out-of-bounds hops are dropped.
    fn start_move(&mut self, delta: IVec2, tuning: &Tuning) {
        let col = self.col + delta.x;
        let row = self.row + delta.y;
        if !(0..tuning.cols).contains(&col) || row < 0 {
            return;
        }

        if let Some(facing) = Facing::from_delta(delta) {
            self.facing = facing;
        }
        self.col = col;
        self.row = row;
        self.target = Vec2::new(tuning.cell_x(col), tuning.cell_y(row));
    }

    /// Advance the hop animation one tick and apply platform drift
    pub fn advance(&mut self, tuning: &Tuning) {
        if self.is_moving() {
            let delta = self.target - self.pos;
            let dist = delta.length();

            if dist <= tuning.move_speed {
                self.pos = self.target;
                if let Some(next) = self.pending.take() {
                    self.start_move(next, tuning);
                }
            } else {
                self.pos += delta / dist * tuning.move_speed;
            }
        }

        if let Some(drift) = self.support
            && !self.is_moving()
        {
            self.pos.x += drift;
            self.target.x = self.pos.x;

            if self.pos.x < 0.0 || self.pos.x > tuning.field_width() {
                log::debug!("Player carried off the edge at x={:.1}", self.pos.x);
                self.alive = false;
            }
        }
    }
}
