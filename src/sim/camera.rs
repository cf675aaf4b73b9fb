//! Vertical scrolling camera

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Smoothed vertical offset of the visible window (pixels from row 0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset_y: f32,
}

impl Camera {
    /// Ease toward keeping the player at the anchor line. The offset is
    /// clamped to be non-negative.
    pub fn update(&mut self, player_y: f32, tuning: &Tuning) {
        let target = player_y - tuning.camera_anchor();
        let eased = self.offset_y + (target - self.offset_y) * tuning.camera_smoothing;
        self.offset_y = eased.max(0.0);
    }

    /// Topmost row that must already have a lane, including look-ahead
    pub fn top_row(&self, tuning: &Tuning) -> i32 {
        (self.offset_y / tuning.grid_size).floor() as i32 - tuning.lookahead_rows
    }
}
