//! Lane Hopper - a lane-crossing arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, player, collisions, world state)
//! - `tuning`: Data-driven game balance and geometry
//!
//! Rendering and raw input handling live outside this crate. A driver calls
//! [`sim::World::tick`] at a fixed cadence, forwards discrete
//! [`sim::Command`]s, and draws from [`sim::World::snapshot`].

pub mod sim;
pub mod tuning;

pub use sim::{Command, Direction, InputLog, LossCause, Outcome, Snapshot, World};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Size of one grid cell in pixels
    pub const GRID_SIZE: f32 = 40.0;
    /// Visible rows in the play window
    pub const ROWS: i32 = 15;
    /// Columns across the play field
    pub const COLS: i32 = 11;
    /// Row the player spawns on (also the scoring baseline)
    pub const PLAYER_START_ROW: i32 = 13;
    /// Obstacle rows the player must cross
    pub const LEVEL_ROWS: i32 = 13;
    /// Reaching this row at rest wins (row 0)
    pub const FINISH_ROW: i32 = PLAYER_START_ROW - LEVEL_ROWS;
    /// Rows generated up front, counted from row 0
    pub const INITIAL_LANES: i32 = ROWS + 5;

    /// Pixels the player travels per tick while hopping
    pub const MOVE_SPEED: f32 = 12.0;
    /// Off-screen margin before an obstacle wraps to the other side
    pub const WRAP_MARGIN: f32 = 50.0;
    /// Vehicles only hit within this fraction of a cell vertically
    pub const ROAD_HIT_BAND: f32 = 0.6;

    /// Fraction of the remaining distance the camera covers per tick
    pub const CAMERA_SMOOTHING: f32 = 0.25;
    /// Rows between the bottom of the window and the player anchor
    pub const CAMERA_ANCHOR_ROWS: i32 = 2;
    /// Rows above the visible window that must already exist
    pub const LOOKAHEAD_ROWS: i32 = 2;
    /// Rows past the finish row that are still generated
    pub const FINISH_MARGIN_ROWS: i32 = 2;
}

/// Centre of a grid cell along one axis, in pixels
#[inline]
pub fn cell_center(index: i32, grid_size: f32) -> f32 {
    index as f32 * grid_size + (grid_size / 2.0).floor()
}
