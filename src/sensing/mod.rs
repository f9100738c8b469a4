//! Noisy radial range sensing against the true environment.
//!
//! The sensor casts beams outward from the agent's cell at evenly spaced
//! angles. Each beam marches in small steps until it leaves the grid,
//! reaches maximum range, or enters a truly occupied cell; cells traversed
//! along the way become free readings, the hit cell an occupied reading.
//! Two independent noise processes then corrupt the readings: a false
//! positive flips a free reading to occupied, a false negative flips an
//! occupied reading to free. Cells no beam touches are simply not reported
//! and remain unknown to the caller.

mod noise;

pub use noise::NoiseGenerator;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::Cell;
use crate::world::TrueEnvironment;

/// Distance between consecutive sample points along a beam, in cells.
const RAY_STEP: f32 = 0.2;

/// Configuration for the range sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Maximum beam length in cells.
    pub range: f32,

    /// Number of angular samples over the full circle.
    ///
    /// More beams cover more cells per scan at higher cost.
    pub beam_count: usize,

    /// Probability that a truly free cell is reported occupied.
    pub p_false_positive: f32,

    /// Probability that a truly occupied cell is reported free.
    pub p_false_negative: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            range: 5.0,
            beam_count: 16,
            p_false_positive: 0.05,
            p_false_negative: 0.05,
        }
    }
}

/// One cell reading from a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub cell: Cell,
    /// Measured occupancy, after noise.
    pub occupied: bool,
}

/// Radial range sensor.
///
/// Owns the noise source; scans mutate the RNG state, so two scans from the
/// same position generally differ. The contract is statistical: over many
/// scans the measured flip rates approach the configured probabilities.
pub struct RangeSensor {
    config: SensorConfig,
    noise: NoiseGenerator,
}

impl RangeSensor {
    pub fn new(config: SensorConfig, noise: NoiseGenerator) -> Self {
        Self { config, noise }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Scan the environment from `origin`.
    ///
    /// Each touched cell is reported exactly once per scan; when beams
    /// disagree (a cell grazed free by one beam and hit by another), the
    /// occupied reading wins. Readings are listed in first-visit order so
    /// noise draws are reproducible for a given seed.
    pub fn scan(&mut self, env: &TrueEnvironment, origin: Cell) -> Vec<Observation> {
        let grid = env.grid();
        let mut readings: Vec<(Cell, bool)> = Vec::new();
        let mut seen: HashMap<Cell, usize> = HashMap::new();

        // The agent's own cell is always a free reading.
        seen.insert(origin, 0);
        readings.push((origin, false));

        let steps = (self.config.range / RAY_STEP).round() as usize;
        let fx = origin.x as f32 + 0.5;
        let fy = origin.y as f32 + 0.5;

        for beam in 0..self.config.beam_count {
            let angle =
                std::f32::consts::TAU * (beam as f32) / (self.config.beam_count as f32);
            let (sin_a, cos_a) = angle.sin_cos();

            for step in 1..=steps {
                let r = step as f32 * RAY_STEP;
                let rx = fx + cos_a * r;
                let ry = fy + sin_a * r;
                if rx < 0.0 || ry < 0.0 {
                    break;
                }
                let cell = Cell::new(rx as usize, ry as usize);
                if !grid.in_bounds(cell) {
                    break;
                }

                let hit = env.is_blocked(cell);
                match seen.get(&cell).copied() {
                    Some(idx) => readings[idx].1 |= hit,
                    None => {
                        seen.insert(cell, readings.len());
                        readings.push((cell, hit));
                    }
                }
                if hit {
                    break;
                }
            }
        }

        readings
            .into_iter()
            .map(|(cell, truly_occupied)| {
                let occupied = if truly_occupied {
                    !self.noise.chance(self.config.p_false_negative)
                } else {
                    self.noise.chance(self.config.p_false_positive)
                };
                Observation { cell, occupied }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noiseless_config() -> SensorConfig {
        SensorConfig {
            range: 5.0,
            beam_count: 32,
            p_false_positive: 0.0,
            p_false_negative: 0.0,
        }
    }

    fn make_sensor(config: SensorConfig, seed: u64) -> RangeSensor {
        RangeSensor::new(config, NoiseGenerator::new(seed))
    }

    fn reading(observations: &[Observation], cell: Cell) -> Option<bool> {
        observations
            .iter()
            .find(|o| o.cell == cell)
            .map(|o| o.occupied)
    }

    #[test]
    fn test_scan_reports_origin_free() {
        let env = TrueEnvironment::from_cells(10, &[], Cell::new(5, 5), Cell::new(9, 9));
        let mut sensor = make_sensor(noiseless_config(), 1);

        let observations = sensor.scan(&env, Cell::new(5, 5));

        assert_eq!(reading(&observations, Cell::new(5, 5)), Some(false));
    }

    #[test]
    fn test_noiseless_scan_matches_ground_truth() {
        let blocked = [Cell::new(7, 5), Cell::new(5, 7)];
        let env = TrueEnvironment::from_cells(10, &blocked, Cell::new(5, 5), Cell::new(9, 9));
        let mut sensor = make_sensor(noiseless_config(), 1);

        let observations = sensor.scan(&env, Cell::new(5, 5));

        for obs in &observations {
            assert_eq!(obs.occupied, env.is_blocked(obs.cell), "at {}", obs.cell);
        }
        assert_eq!(reading(&observations, Cell::new(7, 5)), Some(true));
        assert_eq!(reading(&observations, Cell::new(5, 7)), Some(true));
    }

    #[test]
    fn test_beams_stop_at_first_obstacle() {
        // Wall at x = 7 between the origin and the far column.
        let wall: Vec<Cell> = (0..10).map(|y| Cell::new(7, y)).collect();
        let env = TrueEnvironment::from_cells(10, &wall, Cell::new(5, 5), Cell::new(9, 9));
        let mut sensor = make_sensor(noiseless_config(), 1);

        let observations = sensor.scan(&env, Cell::new(5, 5));

        // Cells behind the wall are never reported.
        for obs in &observations {
            assert!(obs.cell.x <= 7, "cell {} leaked through the wall", obs.cell);
        }
    }

    #[test]
    fn test_each_cell_reported_once() {
        let env = TrueEnvironment::from_cells(10, &[], Cell::new(5, 5), Cell::new(9, 9));
        let mut sensor = make_sensor(noiseless_config(), 1);

        let observations = sensor.scan(&env, Cell::new(5, 5));

        let mut cells: Vec<Cell> = observations.iter().map(|o| o.cell).collect();
        let total = cells.len();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), total);
    }

    #[test]
    fn test_out_of_range_cells_not_reported() {
        let env = TrueEnvironment::from_cells(20, &[], Cell::new(10, 10), Cell::new(0, 0));
        let mut sensor = make_sensor(noiseless_config(), 1);

        let observations = sensor.scan(&env, Cell::new(10, 10));

        for obs in &observations {
            let dx = obs.cell.x as f32 - 10.0;
            let dy = obs.cell.y as f32 - 10.0;
            assert!(
                (dx * dx + dy * dy).sqrt() <= 5.0 + 1.5,
                "cell {} is beyond sensor range",
                obs.cell
            );
        }
    }

    #[test]
    fn test_flip_rates_match_configured_probabilities() {
        // Ring of obstacles two cells out so every scan carries both free
        // and occupied ground truth.
        let mut blocked = Vec::new();
        for x in 8..=12usize {
            for y in 8..=12usize {
                if x == 8 || x == 12 || y == 8 || y == 12 {
                    blocked.push(Cell::new(x, y));
                }
            }
        }
        let env = TrueEnvironment::from_cells(20, &blocked, Cell::new(10, 10), Cell::new(0, 0));

        let config = SensorConfig {
            range: 5.0,
            beam_count: 32,
            p_false_positive: 0.1,
            p_false_negative: 0.1,
        };
        let mut sensor = make_sensor(config, 99);

        let mut free_total = 0u32;
        let mut false_positives = 0u32;
        let mut occupied_total = 0u32;
        let mut false_negatives = 0u32;

        for _ in 0..1000 {
            for obs in sensor.scan(&env, Cell::new(10, 10)) {
                if env.is_blocked(obs.cell) {
                    occupied_total += 1;
                    if !obs.occupied {
                        false_negatives += 1;
                    }
                } else {
                    free_total += 1;
                    if obs.occupied {
                        false_positives += 1;
                    }
                }
            }
        }

        assert!(free_total > 1000);
        assert!(occupied_total > 1000);

        let fp_rate = false_positives as f32 / free_total as f32;
        let fn_rate = false_negatives as f32 / occupied_total as f32;
        assert!((fp_rate - 0.1).abs() < 0.03, "fp rate {}", fp_rate);
        assert!((fn_rate - 0.1).abs() < 0.03, "fn rate {}", fn_rate);
    }
}
