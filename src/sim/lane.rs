//! Terrain lanes and the obstacles that scroll across them

use serde::{Deserialize, Serialize};

/// Terrain of a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Terrain {
    /// Safe ground, never holds obstacles
    #[default]
    Grass,
    /// Vehicles kill on contact
    Road,
    /// The player must ride a platform or drown
    River,
}

/// Scroll direction of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaneDirection {
    Left,
    #[default]
    Right,
}

impl LaneDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            LaneDirection::Left => -1.0,
            LaneDirection::Right => 1.0,
        }
    }
}

/// Cosmetic vehicle paint, carried through to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleColor {
    Red,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl VehicleColor {
    pub const PALETTE: [VehicleColor; 5] = [
        VehicleColor::Red,
        VehicleColor::Blue,
        VehicleColor::Yellow,
        VehicleColor::Purple,
        VehicleColor::Orange,
    ];
}

/// What an obstacle does to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Lethal on contact (road lanes)
    Vehicle { color: VehicleColor },
    /// Carries the player across water (river lanes)
    Platform,
}

/// A moving rectangle inside a lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge in pixels
    pub x: f32,
    /// Horizontal extent in pixels (always > 0)
    pub width: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn vehicle(x: f32, width: f32, color: VehicleColor) -> Self {
        debug_assert!(width > 0.0);
        Self {
            x,
            width,
            kind: ObstacleKind::Vehicle { color },
        }
    }

    pub fn platform(x: f32, width: f32) -> Self {
        debug_assert!(width > 0.0);
        Self {
            x,
            width,
            kind: ObstacleKind::Platform,
        }
    }

    /// Right edge in pixels
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether `px` lies strictly inside the horizontal span (edges excluded)
    #[inline]
    pub fn spans(&self, px: f32) -> bool {
        self.x < px && px < self.right()
    }
}

/// One row of the play field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub row: i32,
    pub terrain: Terrain,
    /// Pixels per tick, never negative
    pub speed: f32,
    pub direction: LaneDirection,
    pub obstacles: Vec<Obstacle>,
}

impl Lane {
    /// A safe lane with no traffic
    pub fn grass(row: i32) -> Self {
        Self {
            row,
            terrain: Terrain::Grass,
            speed: 0.0,
            direction: LaneDirection::Right,
            obstacles: Vec::new(),
        }
    }

    pub fn new(
        row: i32,
        terrain: Terrain,
        speed: f32,
        direction: LaneDirection,
        obstacles: Vec<Obstacle>,
    ) -> Self {
        debug_assert!(speed >= 0.0);
        debug_assert!(terrain != Terrain::Grass || obstacles.is_empty());
        Self {
            row,
            terrain,
            speed,
            direction,
            obstacles,
        }
    }

    /// Signed horizontal velocity of everything in this lane
    #[inline]
    pub fn drift(&self) -> f32 {
        self.speed * self.direction.sign()
    }

    /// Move every obstacle one tick, wrapping past the field edges.
    ///
    /// An obstacle leaving on the right re-enters fully hidden on the left and
    /// vice versa, so a lane is an endless conveyor of the same obstacles.
    pub fn advance(&mut self, field_width: f32, margin: f32) {
        let drift = self.drift();
        if drift == 0.0 {
            return;
        }
        for obstacle in &mut self.obstacles {
            obstacle.x += drift;

            match self.direction {
                LaneDirection::Right if obstacle.x > field_width + margin => {
                    obstacle.x = -obstacle.width - margin;
                }
                LaneDirection::Left if obstacle.x < -obstacle.width - margin => {
                    obstacle.x = field_width + margin;
                }
                _ => {}
            }
        }
    }

    /// First obstacle whose span strictly contains `px`
    pub fn obstacle_at(&self, px: f32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.spans(px))
    }
}
