//! Lane-relative hazard and support detection
//!
//! Only the lane on the player's authoritative row is consulted. Horizontal
//! tests use the continuous render position, so a hop can still be caught by
//! traffic on the destination row until it lands.

use super::lane::{Lane, Terrain};
use super::player::Player;
use crate::tuning::Tuning;

/// What the current lane does to the player this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Nothing happened
    Safe,
    /// Riding a platform with the given signed drift
    Supported(f32),
    /// Struck by a vehicle
    Hit,
    /// Standing in water with nothing underneath
    Drowned,
    /// Already carried off the field by a platform
    SweptAway,
}

impl Verdict {
    #[inline]
    pub fn is_fatal(self) -> bool {
        matches!(self, Verdict::Hit | Verdict::Drowned | Verdict::SweptAway)
    }
}

/// Decide support and death for one tick.
///
/// Clears the previous support before testing, sets the new support when a
/// platform is found, and marks the player dead on any fatal verdict.
pub fn resolve(player: &mut Player, lane: Option<&Lane>, tuning: &Tuning) -> Verdict {
    if !player.alive {
        return Verdict::SweptAway;
    }

    let Some(lane) = lane else {
        log::debug!("No lane generated for row {}; treating as safe", player.row);
        return Verdict::Safe;
    };
    debug_assert_eq!(lane.row, player.row);

    player.support = None;

    let verdict = match lane.terrain {
        Terrain::Grass => Verdict::Safe,
        Terrain::Road => {
            let lane_y = tuning.cell_y(lane.row);
            let band = tuning.grid_size * tuning.road_hit_band;
            let hit = lane
                .obstacles
                .iter()
                .any(|car| car.spans(player.pos.x) && (player.pos.y - lane_y).abs() < band);
            if hit { Verdict::Hit } else { Verdict::Safe }
        }
        Terrain::River => match lane.obstacle_at(player.pos.x) {
            Some(_) => {
                let drift = lane.drift();
                player.support = Some(drift);
                Verdict::Supported(drift)
            }
            // Mid-leap over water is fine until the hop lands
            None if player.is_moving() => Verdict::Safe,
            None => Verdict::Drowned,
        },
    };

    if verdict.is_fatal() {
        player.alive = false;
    }
    verdict
}
