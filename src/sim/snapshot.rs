//! Read-only projection of the world for renderers
//!
//! Everything a renderer needs to draw a frame, detached from the live
//! simulation. Colors beyond the vehicle palette, textures and win-screen
//! effects are the renderer's business.

use serde::{Deserialize, Serialize};

use super::lane::{Lane, LaneDirection, Obstacle, Terrain};
use super::player::Facing;
use super::world::{Outcome, World};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneView {
    pub row: i32,
    pub terrain: Terrain,
    pub speed: f32,
    pub direction: LaneDirection,
    pub obstacles: Vec<Obstacle>,
}

impl From<&Lane> for LaneView {
    fn from(lane: &Lane) -> Self {
        Self {
            row: lane.row,
            terrain: lane.terrain,
            speed: lane.speed,
            direction: lane.direction,
            obstacles: lane.obstacles.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub col: i32,
    pub row: i32,
    pub facing: Facing,
    pub alive: bool,
    pub moving: bool,
    pub riding: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: u64,
    pub tick_count: u64,
    pub score: u32,
    pub high_score: u32,
    pub outcome: Outcome,
    pub win_timer: u32,
    pub camera_offset_y: f32,
    pub player: PlayerView,
    /// Lanes in ascending row order
    pub lanes: Vec<LaneView>,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        let player = &world.player;
        Self {
            seed: world.seed,
            tick_count: world.tick_count,
            score: world.score,
            high_score: world.high_score,
            outcome: world.outcome,
            win_timer: world.win_timer,
            camera_offset_y: world.camera.offset_y,
            player: PlayerView {
                x: player.pos.x,
                y: player.pos.y,
                col: player.col,
                row: player.row,
                facing: player.facing,
                alive: player.alive,
                moving: player.is_moving(),
                riding: player.is_riding(),
            },
            lanes: world.lanes().map(LaneView::from).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn lane(&self, row: i32) -> Option<&LaneView> {
        self.lanes.iter().find(|lane| lane.row == row)
    }
}
