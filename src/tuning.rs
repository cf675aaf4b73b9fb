//! Game balance and geometry
//!
//! Every number the simulation uses lives here so a driver can load an
//! alternate level layout from JSON. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell_center;
use crate::consts::*;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("spawn row {spawn_row} must lie inside the {visible_rows}-row window")]
    SpawnOutsideWindow { spawn_row: i32, visible_rows: i32 },
    #[error("level of {level_rows} rows does not fit between row 0 and spawn row {spawn_row}")]
    LevelTooLong { level_rows: i32, spawn_row: i32 },
    #[error("initial lanes ({initial_lanes}) must cover the spawn row {spawn_row}")]
    InitialLanesTooFew { initial_lanes: i32, spawn_row: i32 },
    #[error("terrain thresholds must satisfy 0 <= grass ({grass}) <= road ({road}) <= 1")]
    Thresholds { grass: f32, road: f32 },
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} ({value}) must lie between 0 and {max}")]
    RowsOutOfRange {
        field: &'static str,
        value: i32,
        max: i32,
    },
    #[error("camera_smoothing ({0}) must lie in (0, 1]")]
    Smoothing(f32),
    #[error("{terrain} lanes need at least one obstacle width")]
    NoWidths { terrain: &'static str },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// How obstacle widths are drawn for a lane type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WidthRule {
    /// Pick one of a fixed set of widths
    Choice { widths: Vec<u32> },
    /// Uniform integer width, both ends inclusive
    Range { min: u32, max: u32 },
}

/// Generation parameters for one hazardous terrain type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneProfile {
    pub speed_min: f32,
    pub speed_max: f32,
    pub count_min: u32,
    pub count_max: u32,
    /// Horizontal jitter applied to each evenly spaced slot (± pixels)
    pub jitter: i32,
    pub widths: WidthRule,
}

impl LaneProfile {
    /// Road lane defaults: 2-4 cars, 60/80/100 px, ±20 px jitter
    pub fn road() -> Self {
        Self {
            speed_min: 1.5,
            speed_max: 3.5,
            count_min: 2,
            count_max: 4,
            jitter: 20,
            widths: WidthRule::Choice {
                widths: vec![60, 80, 100],
            },
        }
    }

    /// River lane defaults: 2-3 logs, 80-140 px, ±30 px jitter
    pub fn river() -> Self {
        Self {
            speed_min: 1.0,
            speed_max: 2.5,
            count_min: 2,
            count_max: 3,
            jitter: 30,
            widths: WidthRule::Range { min: 80, max: 140 },
        }
    }

    fn validate(&self, terrain: &'static str) -> Result<(), TuningError> {
        if self.speed_min < 0.0 || self.speed_min > self.speed_max {
            return Err(TuningError::InvertedRange {
                field: "speed",
                min: self.speed_min,
                max: self.speed_max,
            });
        }
        if self.count_min == 0 {
            return Err(TuningError::NonPositive {
                field: "count_min",
            });
        }
        if self.count_min > self.count_max {
            return Err(TuningError::InvertedRange {
                field: "count",
                min: self.count_min as f32,
                max: self.count_max as f32,
            });
        }
        if self.jitter < 0 {
            return Err(TuningError::NonPositive { field: "jitter" });
        }
        match &self.widths {
            WidthRule::Choice { widths } => {
                if widths.is_empty() {
                    return Err(TuningError::NoWidths { terrain });
                }
                if widths.contains(&0) {
                    return Err(TuningError::NonPositive { field: "width" });
                }
            }
            WidthRule::Range { min, max } => {
                if *min == 0 {
                    return Err(TuningError::NonPositive { field: "width" });
                }
                if min > max {
                    return Err(TuningError::InvertedRange {
                        field: "width",
                        min: *min as f32,
                        max: *max as f32,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Complete gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    pub grid_size: f32,
    pub cols: i32,
    pub visible_rows: i32,
    pub spawn_row: i32,
    pub level_rows: i32,
    /// Rows generated at world creation, starting from row 0
    pub initial_lanes: i32,

    // === Movement ===
    pub move_speed: f32,
    pub wrap_margin: f32,
    /// Vertical hit band for vehicles, as a fraction of a cell
    pub road_hit_band: f32,

    // === Camera ===
    pub camera_smoothing: f32,
    pub camera_anchor_rows: i32,
    pub lookahead_rows: i32,

    // === Generation ===
    /// Rows past the finish row that are still generated
    pub finish_margin_rows: i32,
    /// Uniform draws below this are grass
    pub grass_threshold: f32,
    /// Uniform draws below this (and not grass) are road, the rest river
    pub road_threshold: f32,
    pub road: LaneProfile,
    pub river: LaneProfile,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            cols: COLS,
            visible_rows: ROWS,
            spawn_row: PLAYER_START_ROW,
            level_rows: LEVEL_ROWS,
            initial_lanes: INITIAL_LANES,

            move_speed: MOVE_SPEED,
            wrap_margin: WRAP_MARGIN,
            road_hit_band: ROAD_HIT_BAND,

            camera_smoothing: CAMERA_SMOOTHING,
            camera_anchor_rows: CAMERA_ANCHOR_ROWS,
            lookahead_rows: LOOKAHEAD_ROWS,

            finish_margin_rows: FINISH_MARGIN_ROWS,
            grass_threshold: 0.30,
            road_threshold: 0.65,
            road: LaneProfile::road(),
            river: LaneProfile::river(),
        }
    }
}

impl Tuning {
    /// Default geometry with every generated row forced to grass
    pub fn all_grass() -> Self {
        Self {
            grass_threshold: 1.0,
            road_threshold: 1.0,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration describes a playable level
    pub fn validate(&self) -> Result<(), TuningError> {
        let positives = [
            ("grid_size", self.grid_size),
            ("move_speed", self.move_speed),
            ("cols", self.cols as f32),
            ("visible_rows", self.visible_rows as f32),
            ("level_rows", self.level_rows as f32),
            ("road_hit_band", self.road_hit_band),
        ];
        for (field, value) in positives {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::NonPositive { field });
            }
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return Err(TuningError::Smoothing(self.camera_smoothing));
        }
        let window_rows = [
            ("camera_anchor_rows", self.camera_anchor_rows),
            ("lookahead_rows", self.lookahead_rows),
            ("finish_margin_rows", self.finish_margin_rows),
        ];
        for (field, value) in window_rows {
            if !(0..=self.visible_rows).contains(&value) {
                return Err(TuningError::RowsOutOfRange {
                    field,
                    value,
                    max: self.visible_rows,
                });
            }
        }
        if self.wrap_margin < 0.0 {
            return Err(TuningError::NonPositive {
                field: "wrap_margin",
            });
        }
        if self.spawn_row < 0 || self.spawn_row >= self.visible_rows {
            return Err(TuningError::SpawnOutsideWindow {
                spawn_row: self.spawn_row,
                visible_rows: self.visible_rows,
            });
        }
        if self.level_rows > self.spawn_row {
            return Err(TuningError::LevelTooLong {
                level_rows: self.level_rows,
                spawn_row: self.spawn_row,
            });
        }
        if self.initial_lanes <= self.spawn_row {
            return Err(TuningError::InitialLanesTooFew {
                initial_lanes: self.initial_lanes,
                spawn_row: self.spawn_row,
            });
        }
        let (grass, road) = (self.grass_threshold, self.road_threshold);
        if !(0.0..=1.0).contains(&grass) || !(0.0..=1.0).contains(&road) || grass > road {
            return Err(TuningError::Thresholds { grass, road });
        }
        self.road.validate("road")?;
        self.river.validate("river")?;
        Ok(())
    }

    /// Row that wins the level when reached at rest
    #[inline]
    pub fn finish_row(&self) -> i32 {
        self.spawn_row - self.level_rows
    }

    /// Width of the play field in pixels
    #[inline]
    pub fn field_width(&self) -> f32 {
        self.cols as f32 * self.grid_size
    }

    /// Distance from the camera offset to where the player is held on screen
    #[inline]
    pub fn camera_anchor(&self) -> f32 {
        (self.visible_rows - self.camera_anchor_rows) as f32 * self.grid_size
    }

    #[inline]
    pub fn cell_x(&self, col: i32) -> f32 {
        cell_center(col, self.grid_size)
    }

    #[inline]
    pub fn cell_y(&self, row: i32) -> f32 {
        cell_center(row, self.grid_size)
    }
}
