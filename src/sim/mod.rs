//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only (lane generation)
//! - Stable iteration order (lanes keyed by row)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod generator;
pub mod lane;
pub mod player;
pub mod replay;
pub mod snapshot;
pub mod world;

pub use camera::Camera;
pub use collision::{Verdict, resolve};
pub use generator::LaneGenerator;
pub use lane::{Lane, LaneDirection, Obstacle, ObstacleKind, Terrain, VehicleColor};
pub use player::{Direction, Facing, Player};
pub use replay::{InputEvent, InputLog, Recorder};
pub use snapshot::{LaneView, PlayerView, Snapshot};
pub use world::{Command, LossCause, Outcome, World};
