//! Input logs for deterministic replay
//!
//! A run is fully determined by its seed, its tuning and the tick at which
//! each command arrived. Recording those is enough to rebuild the exact same
//! world later.

use serde::{Deserialize, Serialize};

use super::world::{Command, World};
use crate::tuning::{Tuning, TuningError};

/// A command stamped with the number of driver ticks that preceded it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub tick: u64,
    pub command: Command,
}

/// Seed plus every command of a session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputLog {
    pub seed: u64,
    pub events: Vec<InputEvent>,
}

impl InputLog {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, tick: u64, command: Command) {
        self.events.push(InputEvent { tick, command });
    }

    /// Rebuild a world by running `total_ticks` ticks and feeding each command
    /// just before the tick it was stamped with. Commands stamped exactly
    /// `total_ticks` arrived after the last tick and are applied without one;
    /// anything later is ignored.
    pub fn replay(&self, tuning: &Tuning, total_ticks: u64) -> Result<World, TuningError> {
        let mut world = World::with_tuning(self.seed, tuning.clone())?;

        let mut events = self.events.clone();
        events.sort_by_key(|event| event.tick);
        let mut pending = events.iter().peekable();

        for tick in 0..total_ticks {
            while let Some(event) = pending.next_if(|event| event.tick == tick) {
                world.apply(event.command);
            }
            world.tick();
        }
        while let Some(event) = pending.next_if(|event| event.tick == total_ticks) {
            world.apply(event.command);
        }

        log::debug!(
            "Replayed {} events over {} ticks: {:?}, score {}",
            self.events.len(),
            total_ticks,
            world.outcome,
            world.score
        );
        Ok(world)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Drives a world while recording every command it receives
#[derive(Debug, Clone)]
pub struct Recorder {
    world: World,
    log: InputLog,
    elapsed: u64,
}

impl Recorder {
    pub fn new(world: World) -> Self {
        let log = InputLog::new(world.seed);
        Self {
            world,
            log,
            elapsed: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Driver ticks so far
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn apply(&mut self, command: Command) {
        self.log.record(self.elapsed, command);
        self.world.apply(command);
    }

    pub fn tick(&mut self) {
        self.world.tick();
        self.elapsed += 1;
    }

    pub fn into_parts(self) -> (World, InputLog) {
        (self.world, self.log)
    }
}
