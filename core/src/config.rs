//! Tunable simulation constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a configuration cannot drive a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Creeps would spawn already dead.
    #[error("creep_health must be at least 1")]
    ZeroCreepHealth,
    /// The field has no room for the entry and exit corridors.
    #[error("field must be at least 5 by 3 cells, got {columns} by {rows}")]
    FieldTooSmall {
        /// Configured width.
        columns: u32,
        /// Configured height.
        rows: u32,
    },
}

/// Every constant the simulation reads, expressed per logical tick.
///
/// Speeds are measured in cells per tick and durations in ticks. The default
/// values describe a field of 12 by 9 cells stepped 180 times per second.
/// Derived quantities such as projectile lifetime are computed on demand so a
/// configuration loaded from disk cannot disagree with itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Logical ticks per simulated second.
    pub steps_per_second: u32,
    /// Field width in cells, border included.
    pub field_columns: u32,
    /// Field height in cells, border included.
    pub field_rows: u32,
    /// Side length of one cell in pixels, used to map pointer input.
    pub cell_size_px: f64,
    /// Radius of a creep in cells.
    pub creep_radius: f64,
    /// Steering acceleration applied per tick.
    pub creep_acceleration: f64,
    /// Speed lost to friction per tick.
    pub creep_deceleration: f64,
    /// Speed above which steering stops accelerating.
    pub creep_max_speed: f64,
    /// Hit points every creep spawns with.
    pub creep_health: u32,
    /// Forward speed given to a freshly spawned creep.
    pub spawn_speed: f64,
    /// Maximum lateral speed added on spawn, in either direction.
    pub spawn_lateral_jitter: f64,
    /// Creeps released per summon.
    pub batch_size: u32,
    /// Projectile speed in cells per tick.
    pub projectile_speed: f64,
    /// Tower engagement range in cells.
    pub tower_range: f64,
    /// Distance at which a projectile connects with a creep.
    pub hit_radius: f64,
    /// Damage a single projectile applies.
    pub projectile_damage: u32,
    /// Money available at session start.
    pub starting_money: u32,
    /// Lives available at session start.
    pub starting_lives: i32,
    /// Price of one tower.
    pub tower_cost: u32,
    /// Money credited for every destroyed creep.
    pub kill_reward: u32,
    /// Seed for the spawn jitter generator.
    pub rng_seed: u64,
}

impl SimulationConfig {
    /// Checks the values that would make a session meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.creep_health == 0 {
            return Err(ConfigError::ZeroCreepHealth);
        }
        if self.field_columns < 5 || self.field_rows < 3 {
            return Err(ConfigError::FieldTooSmall {
                columns: self.field_columns,
                rows: self.field_rows,
            });
        }
        Ok(())
    }

    /// Ticks between two consecutive creeps of one batch.
    #[must_use]
    pub fn spawn_interval_ticks(&self) -> u32 {
        self.steps_per_second / 2
    }

    /// Ticks a tower waits after firing.
    #[must_use]
    pub fn fire_delay_ticks(&self) -> u32 {
        (f64::from(self.steps_per_second) * 0.2) as u32
    }

    /// Ticks a projectile survives when it hits nothing.
    ///
    /// Range divided by speed, floored. A non-positive speed yields zero.
    #[must_use]
    pub fn projectile_lifetime(&self) -> u32 {
        if self.projectile_speed <= 0.0 {
            return 0;
        }
        (self.tower_range / self.projectile_speed) as u32
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let steps = 180.0;
        let acceleration = 0.01 / steps;
        let creep_radius = 0.09;
        Self {
            steps_per_second: 180,
            field_columns: 12,
            field_rows: 9,
            cell_size_px: 60.0,
            creep_radius,
            creep_acceleration: acceleration,
            creep_deceleration: acceleration * 0.2,
            creep_max_speed: 0.8 / steps,
            creep_health: 5,
            spawn_speed: 1.0 / steps,
            spawn_lateral_jitter: 0.5 / steps,
            batch_size: 30,
            projectile_speed: 7.0 / steps,
            tower_range: 3.0,
            hit_radius: creep_radius,
            projectile_damage: 1,
            starting_money: 200,
            starting_lives: 100,
            tower_cost: 45,
            kill_reward: 5,
            rng_seed: 0x5eed_f1e1_d0de_fe4c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SimulationConfig};

    #[test]
    fn derived_timings_match_default_rate() {
        let config = SimulationConfig::default();
        assert_eq!(config.spawn_interval_ticks(), 90);
        assert_eq!(config.fire_delay_ticks(), 36);
        assert_eq!(config.projectile_lifetime(), 77);
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn deathless_creeps_are_rejected() {
        let config = SimulationConfig {
            creep_health: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCreepHealth));
    }

    #[test]
    fn tiny_fields_are_rejected() {
        let config = SimulationConfig {
            field_columns: 4,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FieldTooSmall {
                columns: 4,
                rows: 9
            })
        );
    }

    #[test]
    fn zero_projectile_speed_never_lives() {
        let config = SimulationConfig {
            projectile_speed: 0.0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.projectile_lifetime(), 0);
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let config = SimulationConfig {
            rng_seed: 7,
            ..SimulationConfig::default()
        };
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: SimulationConfig = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }
}
