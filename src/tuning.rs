//! Data-driven game balance
//!
//! Everything here defaults to the shipped constants; a JSON blob can
//! override any subset of fields for playtesting without a rebuild.
//! Physics constants that the generator and the player must agree on
//! (gravity, collision epsilon) stay in [`crate::consts`] and are not
//! tunable per run.

use serde::{Deserialize, Serialize};

use crate::consts::{
    CHUNK_PLATFORM_COUNT, JUMP_LEEWAY_FACTOR, JUMP_VELOCITY, TREADMILL_ACCEL,
    TREADMILL_START_SPEED, VIEW_SIZE,
};

/// Per-run balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical impulse of a full-power jump
    pub jump_velocity: f64,
    /// Half of the vertical viewport extent; platform band and death line
    pub view_size: f64,
    /// Treadmill speed at the start of a run
    pub treadmill_start_speed: f64,
    /// Treadmill acceleration, units per second squared
    pub treadmill_accel: f64,
    /// Platforms per generated chunk
    pub chunk_platform_count: usize,
    /// Fraction of the jump impulse the generator budgets for, so gaps
    /// stay clearable with an imperfect jump
    pub jump_leeway_factor: f64,
    /// Chance that a newly generated platform carries perched birds
    pub bird_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            jump_velocity: JUMP_VELOCITY,
            view_size: VIEW_SIZE,
            treadmill_start_speed: TREADMILL_START_SPEED,
            treadmill_accel: TREADMILL_ACCEL,
            chunk_platform_count: CHUNK_PLATFORM_COUNT,
            jump_leeway_factor: JUMP_LEEWAY_FACTOR,
            bird_chance: 0.4,
        }
    }
}

impl Tuning {
    /// Parse a tuning override blob. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.jump_velocity, 10.0);
        assert_eq!(tuning.view_size, 10.0);
        assert_eq!(tuning.treadmill_start_speed, 8.0);
        assert_eq!(tuning.chunk_platform_count, 5);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"jump_velocity": 12.0}"#).unwrap();
        assert_eq!(tuning.jump_velocity, 12.0);
        assert_eq!(tuning.view_size, VIEW_SIZE);
        assert_eq!(tuning.bird_chance, 0.4);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
