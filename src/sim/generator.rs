//! Procedural lane generation
//!
//! Lanes are drawn from a single seeded PCG stream, so the same seed and the
//! same order of `generate` calls always produce the same level.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::lane::{Lane, LaneDirection, Obstacle, Terrain, VehicleColor};
use crate::tuning::{LaneProfile, Tuning, WidthRule};

/// Seeded source of new lanes
#[derive(Debug, Clone)]
pub struct LaneGenerator {
    rng: Pcg32,
}

impl LaneGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Build the lane for `row`.
    ///
    /// Rows at or behind the spawn row and rows at or past the finish row are
    /// always grass, so the start and the landing pad are safe.
    pub fn generate(&mut self, row: i32, tuning: &Tuning) -> Lane {
        let terrain = self.pick_terrain(row, tuning);
        let profile = match terrain {
            Terrain::Grass => return Lane::grass(row),
            Terrain::Road => &tuning.road,
            Terrain::River => &tuning.river,
        };

        let speed = self.rng.random_range(profile.speed_min..=profile.speed_max);
        let direction = if self.rng.random_bool(0.5) {
            LaneDirection::Right
        } else {
            LaneDirection::Left
        };
        let obstacles = self.place_obstacles(terrain, profile, tuning.field_width());

        log::debug!(
            "Row {row}: {terrain:?} speed={speed:.2} {direction:?} obstacles={}",
            obstacles.len()
        );

        Lane::new(row, terrain, speed, direction, obstacles)
    }

    fn pick_terrain(&mut self, row: i32, tuning: &Tuning) -> Terrain {
        if row >= tuning.spawn_row || row <= tuning.finish_row() {
            return Terrain::Grass;
        }
        let roll: f32 = self.rng.random();
        if roll < tuning.grass_threshold {
            Terrain::Grass
        } else if roll < tuning.road_threshold {
            Terrain::Road
        } else {
            Terrain::River
        }
    }

    /// Evenly spaced slots around the lane, each nudged by a random jitter
    fn place_obstacles(
        &mut self,
        terrain: Terrain,
        profile: &LaneProfile,
        field_width: f32,
    ) -> Vec<Obstacle> {
        let count = self.rng.random_range(profile.count_min..=profile.count_max);
        let spacing = field_width as i32 / count as i32;

        (0..count as i32)
            .map(|slot| {
                let jitter = self.rng.random_range(-profile.jitter..=profile.jitter);
                let x = (slot * spacing + jitter) as f32;
                let width = self.draw_width(&profile.widths) as f32;
                match terrain {
                    Terrain::Road => {
                        let palette = &VehicleColor::PALETTE;
                        let color = palette[self.rng.random_range(0..palette.len())];
                        Obstacle::vehicle(x, width, color)
                    }
                    _ => Obstacle::platform(x, width),
                }
            })
            .collect()
    }

    fn draw_width(&mut self, rule: &WidthRule) -> u32 {
        match rule {
            WidthRule::Choice { widths } => widths[self.rng.random_range(0..widths.len())],
            WidthRule::Range { min, max } => self.rng.random_range(*min..=*max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::ObstacleKind;

    #[test]
    fn test_boundary_rows_are_grass() {
        let tuning = Tuning {
            grass_threshold: 0.0,
            road_threshold: 0.5,
            ..Tuning::default()
        };
        let mut generator = LaneGenerator::new(7);
        for row in [-2, -1, 0, 13, 14, 19] {
            let lane = generator.generate(row, &tuning);
            assert_eq!(lane.terrain, Terrain::Grass, "row {row}");
            assert!(lane.obstacles.is_empty());
        }
        for row in 1..13 {
            assert_ne!(generator.generate(row, &tuning).terrain, Terrain::Grass);
        }
    }

    #[test]
    fn test_road_lanes_respect_ranges() {
        let tuning = Tuning {
            grass_threshold: 0.0,
            road_threshold: 1.0,
            ..Tuning::default()
        };
        let mut generator = LaneGenerator::new(42);
        for _ in 0..200 {
            let lane = generator.generate(5, &tuning);
            assert_eq!(lane.terrain, Terrain::Road);
            assert!((1.5..=3.5).contains(&lane.speed));
            assert!((2..=4).contains(&lane.obstacles.len()));

            let spacing = 440 / lane.obstacles.len() as i32;
            for (slot, car) in lane.obstacles.iter().enumerate() {
                assert!([60.0, 80.0, 100.0].contains(&car.width));
                assert!(matches!(car.kind, ObstacleKind::Vehicle { .. }));
                let base = (slot as i32 * spacing) as f32;
                assert!((car.x - base).abs() <= 20.0);
            }
        }
    }

    #[test]
    fn test_river_lanes_respect_ranges() {
        let tuning = Tuning {
            grass_threshold: 0.0,
            road_threshold: 0.0,
            ..Tuning::default()
        };
        let mut generator = LaneGenerator::new(42);
        for _ in 0..200 {
            let lane = generator.generate(8, &tuning);
            assert_eq!(lane.terrain, Terrain::River);
            assert!((1.0..=2.5).contains(&lane.speed));
            assert!((2..=3).contains(&lane.obstacles.len()));
            for log in &lane.obstacles {
                assert!((80.0..=140.0).contains(&log.width));
                assert_eq!(log.width.fract(), 0.0);
                assert_eq!(log.kind, ObstacleKind::Platform);
            }
        }
    }

    #[test]
    fn test_same_seed_same_lanes() {
        let tuning = Tuning::default();
        let mut a = LaneGenerator::new(2024);
        let mut b = LaneGenerator::new(2024);
        for row in (-2..20).rev() {
            assert_eq!(a.generate(row, &tuning), b.generate(row, &tuning));
        }
    }

    #[test]
    fn test_terrain_mix_roughly_matches_thresholds() {
        let tuning = Tuning::default();
        let mut generator = LaneGenerator::new(9);
        let mut counts = [0u32; 3];
        for _ in 0..3000 {
            let index = match generator.generate(6, &tuning).terrain {
                Terrain::Grass => 0,
                Terrain::Road => 1,
                Terrain::River => 2,
            };
            counts[index] += 1;
        }
        // 30% / 35% / 35% with generous slack
        assert!((750..1050).contains(&counts[0]), "{counts:?}");
        assert!((900..1200).contains(&counts[1]), "{counts:?}");
        assert!((900..1200).contains(&counts[2]), "{counts:?}");
    }
}
