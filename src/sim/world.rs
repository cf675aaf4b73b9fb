//! World state and the per-tick orchestration
//!
//! A [`World`] owns everything that changes during a run. The driver calls
//! [`World::tick`] at a fixed cadence and [`World::apply`] on input events;
//! both run to completion and never re-enter each other.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::collision::{Verdict, resolve};
use super::generator::LaneGenerator;
use super::lane::Lane;
use super::player::{Direction, Player};
use super::snapshot::Snapshot;
use crate::tuning::{Tuning, TuningError};

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// Hit by a vehicle
    Vehicle,
    /// Fell into a river
    Drowned,
    /// Carried off the edge of the field by a platform
    SweptAway,
}

/// State of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    Lost(LossCause),
    Won,
}

impl Outcome {
    #[inline]
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// Discrete commands from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Restart,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub player: Player,
    /// Rows advanced from spawn; never decreases within a run
    pub score: u32,
    /// Best score seen by this world, kept across restarts
    pub high_score: u32,
    pub outcome: Outcome,
    /// Ticks since the win, for the renderer's celebration
    pub win_timer: u32,
    pub camera: Camera,
    /// Simulation ticks while the run was ongoing
    pub tick_count: u64,
    tuning: Tuning,
    generator: LaneGenerator,
    /// Every generated lane, keyed by row
    lanes: BTreeMap<i32, Lane>,
}

impl World {
    /// Create a world with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default(), 0)
    }

    /// Create a world with a custom tuning, rejecting unplayable configurations
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning, 0))
    }

    fn build(seed: u64, tuning: Tuning, high_score: u32) -> Self {
        let player = Player::new(&tuning);
        let mut world = Self {
            seed,
            player,
            score: 0,
            high_score,
            outcome: Outcome::Ongoing,
            win_timer: 0,
            camera: Camera::default(),
            tick_count: 0,
            generator: LaneGenerator::new(seed),
            lanes: BTreeMap::new(),
            tuning,
        };

        for row in 0..world.tuning.initial_lanes {
            world.generate_lane(row);
        }

        log::info!(
            "World created: seed={} lanes={} spawn_row={} finish_row={}",
            seed,
            world.lanes.len(),
            world.tuning.spawn_row,
            world.tuning.finish_row()
        );
        world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// All lanes in ascending row order (furthest ahead first)
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.values()
    }

    pub fn lane(&self, row: i32) -> Option<&Lane> {
        self.lanes.get(&row)
    }

    /// Swap in a hand-built lane, returning the one it replaced
    pub fn replace_lane(&mut self, lane: Lane) -> Option<Lane> {
        self.lanes.insert(lane.row, lane)
    }

    /// Lanes overlapping the camera window, for renderers that cull
    pub fn visible_lanes(&self) -> impl Iterator<Item = &Lane> {
        let grid = self.tuning.grid_size;
        let window = self.tuning.visible_rows as f32 * grid;
        let offset = self.camera.offset_y;
        self.lanes.values().filter(move |lane| {
            let y = lane.row as f32 * grid - offset;
            -grid < y && y < window + grid
        })
    }

    /// Smallest row that has a lane
    pub fn frontier(&self) -> i32 {
        self.lanes
            .first_key_value()
            .map(|(row, _)| *row)
            .unwrap_or(self.tuning.spawn_row)
    }

    /// Generate the lane for `row` if it does not exist yet
    pub fn generate_lane(&mut self, row: i32) -> &Lane {
        if !self.lanes.contains_key(&row) {
            let lane = self.generator.generate(row, &self.tuning);
            self.lanes.insert(row, lane);
        }
        &self.lanes[&row]
    }

    /// Apply one driver command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move(direction) => self.move_player(direction),
            Command::Restart => self.restart(),
        }
    }

    /// Forward a move to the player. Ignored once the run is over.
    pub fn move_player(&mut self, direction: Direction) {
        if self.outcome.is_over() {
            return;
        }
        self.player.request_move(direction.delta(), &self.tuning);
    }

    /// Start the same level again, keeping the high score
    pub fn restart(&mut self) {
        self.restart_with_seed(self.seed);
    }

    /// Start a new level from `seed`, keeping the high score
    pub fn restart_with_seed(&mut self, seed: u64) {
        log::info!(
            "Restarting: seed={} (previous score={} high={})",
            seed,
            self.score,
            self.high_score
        );
        let tuning = self.tuning.clone();
        *self = Self::build(seed, tuning, self.high_score);
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) {
        match self.outcome {
            Outcome::Won => {
                self.win_timer += 1;
                return;
            }
            Outcome::Lost(_) => return,
            Outcome::Ongoing => {}
        }

        self.tick_count += 1;

        let field_width = self.tuning.field_width();
        for lane in self.lanes.values_mut() {
            lane.advance(field_width, self.tuning.wrap_margin);
        }

        self.player.advance(&self.tuning);
        self.camera.update(self.player.pos.y, &self.tuning);
        self.top_up_lanes();

        let resting = !self.player.is_moving();
        if resting && self.player.row <= self.tuning.finish_row() {
            self.win();
            // No collision checks on the winning tick
            return;
        }
        if resting {
            self.update_score();
        }

        let row = self.player.row;
        let verdict = resolve(&mut self.player, self.lanes.get(&row), &self.tuning);
        let cause = match verdict {
            Verdict::Hit => LossCause::Vehicle,
            Verdict::Drowned => LossCause::Drowned,
            Verdict::SweptAway => LossCause::SweptAway,
            Verdict::Safe | Verdict::Supported(_) => return,
        };
        self.outcome = Outcome::Lost(cause);
        log::info!(
            "Run lost ({:?}) at row {} after {} ticks, score {}",
            cause,
            row,
            self.tick_count,
            self.score
        );
    }

    /// Generate rows ahead until the frontier clears the camera look-ahead,
    /// stopping a little past the finish row.
    fn top_up_lanes(&mut self) {
        let top = self.camera.top_row(&self.tuning);
        let floor = self.tuning.finish_row() - self.tuning.finish_margin_rows;
        let mut frontier = self.frontier();
        while frontier > top && frontier > floor {
            frontier -= 1;
            self.generate_lane(frontier);
        }
    }

    fn update_score(&mut self) {
        let reached = (self.tuning.spawn_row - self.player.row).max(0) as u32;
        if reached > self.score {
            self.score = reached;
            self.high_score = self.high_score.max(self.score);
        }
    }

    fn win(&mut self) {
        self.outcome = Outcome::Won;
        self.win_timer = 0;
        self.score = self.score.max(self.tuning.level_rows as u32);
        self.high_score = self.high_score.max(self.score);
        log::info!(
            "Level complete after {} ticks, score {} (high {})",
            self.tick_count,
            self.score,
            self.high_score
        );
    }

    /// Read-only projection for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::{LaneDirection, Obstacle, Terrain, VehicleColor};

    fn grass_world() -> World {
        World::with_tuning(1, Tuning::all_grass()).unwrap()
    }

    /// Issue a move and tick until the player is at rest again
    fn hop(world: &mut World, direction: Direction) {
        world.move_player(direction);
        for _ in 0..20 {
            world.tick();
            if !world.player.is_moving() {
                return;
            }
        }
        panic!("hop did not finish");
    }

    #[test]
    fn test_initial_lanes() {
        let world = World::new(7);
        assert_eq!(world.lanes().count(), 20);
        assert_eq!(world.frontier(), 0);
        assert_eq!(world.lane(0).unwrap().terrain, Terrain::Grass);
        assert_eq!(world.lane(13).unwrap().terrain, Terrain::Grass);
        assert_eq!(world.outcome, Outcome::Ongoing);
    }

    #[test]
    fn test_first_tick_generates_look_ahead() {
        let mut world = World::new(7);
        world.tick();
        assert_eq!(world.camera.offset_y, 5.0);
        assert_eq!(world.frontier(), -2);
        assert_eq!(world.lane(-1).unwrap().terrain, Terrain::Grass);
        assert_eq!(world.lane(-2).unwrap().terrain, Terrain::Grass);

        // Generation never runs further than two rows past the finish
        for _ in 0..50 {
            world.tick();
        }
        assert_eq!(world.frontier(), -2);
    }

    #[test]
    fn test_thirteen_hops_up_wins() {
        let mut world = grass_world();
        for _ in 0..13 {
            hop(&mut world, Direction::Up);
        }
        assert_eq!(world.outcome, Outcome::Won);
        assert_eq!(world.score, 13);
        assert_eq!(world.high_score, 13);

        let timer = world.win_timer;
        let ticks = world.tick_count;
        world.tick();
        world.tick();
        assert_eq!(world.win_timer, timer + 2);
        assert_eq!(world.tick_count, ticks);
    }

    #[test]
    fn test_no_win_until_landing() {
        let mut world = grass_world();
        for _ in 0..12 {
            hop(&mut world, Direction::Up);
        }
        world.move_player(Direction::Up);
        assert_eq!(world.player.row, 0);
        world.tick();
        assert_eq!(world.outcome, Outcome::Ongoing);
    }

    #[test]
    fn test_score_only_counts_new_progress() {
        let mut world = grass_world();
        hop(&mut world, Direction::Up);
        hop(&mut world, Direction::Up);
        assert_eq!(world.score, 2);
        hop(&mut world, Direction::Down);
        assert_eq!(world.score, 2);
        hop(&mut world, Direction::Up);
        assert_eq!(world.score, 2);
        hop(&mut world, Direction::Up);
        assert_eq!(world.score, 3);
    }

    #[test]
    fn test_score_not_updated_mid_hop() {
        let mut world = grass_world();
        world.move_player(Direction::Up);
        world.tick();
        assert_eq!(world.player.row, 12);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_drowning_on_empty_river() {
        let mut world = grass_world();
        world.replace_lane(Lane::new(
            13,
            Terrain::River,
            1.0,
            LaneDirection::Right,
            vec![Obstacle::platform(0.0, 80.0)],
        ));
        world.tick();
        assert_eq!(world.outcome, Outcome::Lost(LossCause::Drowned));
        assert!(!world.player.alive);
    }

    #[test]
    fn test_vehicle_on_player_row() {
        let mut world = grass_world();
        world.replace_lane(Lane::new(
            13,
            Terrain::Road,
            2.0,
            LaneDirection::Right,
            vec![Obstacle::vehicle(150.0, 100.0, VehicleColor::Orange)],
        ));
        world.tick();
        assert_eq!(world.outcome, Outcome::Lost(LossCause::Vehicle));
    }

    #[test]
    fn test_riding_platform_drifts_player() {
        let mut world = grass_world();
        world.replace_lane(Lane::new(
            13,
            Terrain::River,
            2.0,
            LaneDirection::Right,
            vec![Obstacle::platform(100.0, 140.0)],
        ));
        // First tick finds the platform; drift applies from the next one
        world.tick();
        assert_eq!(world.player.support, Some(2.0));
        let start = world.player.pos.x;
        for _ in 0..5 {
            world.tick();
        }
        assert_eq!(world.player.pos.x, start + 10.0);
        assert_eq!(world.outcome, Outcome::Ongoing);
    }

    #[test]
    fn test_swept_off_edge() {
        let mut world = grass_world();
        world.replace_lane(Lane::new(
            13,
            Terrain::River,
            3.0,
            LaneDirection::Left,
            vec![Obstacle::platform(-20.0, 100.0)],
        ));
        world.player.pos.x = 2.0;
        world.player.target.x = 2.0;
        world.tick();
        assert_eq!(world.outcome, Outcome::Ongoing);
        world.tick();
        assert_eq!(world.outcome, Outcome::Lost(LossCause::SweptAway));
    }

    #[test]
    fn test_moves_ignored_after_loss() {
        let mut world = grass_world();
        world.outcome = Outcome::Lost(LossCause::Vehicle);
        world.move_player(Direction::Up);
        assert_eq!(world.player.row, 13);
        world.tick();
        assert_eq!(world.tick_count, 0);
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut world = grass_world();
        for _ in 0..3 {
            hop(&mut world, Direction::Up);
        }
        world.outcome = Outcome::Lost(LossCause::Drowned);
        world.apply(Command::Restart);

        assert_eq!(world.outcome, Outcome::Ongoing);
        assert_eq!(world.score, 0);
        assert_eq!(world.high_score, 3);
        assert_eq!(world.player.row, 13);
        assert_eq!(world.tick_count, 0);
        assert_eq!(world.tuning(), &Tuning::all_grass());
    }

    #[test]
    fn test_restart_reproduces_level() {
        let mut world = World::new(31337);
        let before: Vec<Lane> = world.lanes().cloned().collect();
        for _ in 0..30 {
            world.tick();
        }
        world.restart();
        let after: Vec<Lane> = world.lanes().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_restart_with_new_seed() {
        let mut world = World::new(31337);
        world.high_score = 6;
        world.score = 4;
        let before: Vec<Lane> = world.lanes().cloned().collect();

        world.restart_with_seed(31338);
        let after: Vec<Lane> = world.lanes().cloned().collect();
        assert_ne!(before, after);
        assert_eq!(after.len(), before.len());
        assert_eq!(world.seed, 31338);
        assert_eq!(world.score, 0);
        assert_eq!(world.high_score, 6);

        let snapshot = world.snapshot();
        assert_eq!(snapshot.seed, 31338);
        assert_eq!(snapshot.high_score, 6);
        assert_eq!(after, World::new(31338).lanes().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_finish_margin_bounds_generation() {
        let tuning = Tuning {
            lookahead_rows: 15,
            finish_margin_rows: 0,
            ..Tuning::default()
        };
        let mut world = World::with_tuning(5, tuning).unwrap();
        for _ in 0..10 {
            world.tick();
        }
        assert_eq!(world.frontier(), 0);
        assert_eq!(world.lanes().count(), 20);
    }

    #[test]
    fn test_player_row_without_lane_is_safe() {
        let mut world = grass_world();
        for _ in 0..8 {
            hop(&mut world, Direction::Down);
        }
        assert_eq!(world.player.row, 21);
        assert!(world.lane(21).is_none());
        assert_eq!(world.outcome, Outcome::Ongoing);
    }

    #[test]
    fn test_visible_lanes_cull_far_rows() {
        let world = World::new(3);
        let rows: Vec<i32> = world.visible_lanes().map(|lane| lane.row).collect();
        assert_eq!(rows.first(), Some(&0));
        assert_eq!(rows.last(), Some(&15));
    }

    #[test]
    fn test_with_tuning_rejects_invalid() {
        let tuning = Tuning {
            cols: 0,
            ..Tuning::default()
        };
        assert!(World::with_tuning(1, tuning).is_err());
    }
}
