use serde::{Deserialize, Serialize};

use crate::{DanceError, Result};

/// Fixed gameplay configuration. The audio and visual layers read the same
/// beat constants so that the scheduler, the beat track and the timeline
/// animation stay phase-locked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub bpm: u32,
    pub sequence_length: usize,
    /// Number of beats a catalog entry occupies before the sequence moves on.
    pub beats_between_poses: u32,
    /// Normalized-coordinate slack used by every pose comparison.
    pub pose_tolerance: f32,
    pub history_window_ms: u64,
    pub points_per_hit: u64,
    pub song_duration_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bpm: 120,
            sequence_length: 32,
            beats_between_poses: 2,
            pose_tolerance: 0.15,
            history_window_ms: 500,
            points_per_hit: 100,
            song_duration_ms: 120_000,
        }
    }
}

impl GameConfig {
    /// Duration of one musical beat in milliseconds.
    pub fn beat_interval_ms(&self) -> u64 {
        60_000 / self.bpm as u64
    }

    /// Active window of a scheduled move: four beat intervals.
    pub fn move_window_ms(&self) -> u64 {
        self.beat_interval_ms() * 4
    }

    /// Spacing between consecutive sequence slots.
    pub fn slot_spacing_ms(&self) -> u64 {
        self.beat_interval_ms() * self.beats_between_poses as u64
    }

    /// Parses a configuration override from a JSON document. Fields that are
    /// omitted keep their defaults; values the timing arithmetic divides by
    /// are validated here instead of failing deep inside the scheduler.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.bpm == 0 {
            return Err(DanceError::InvalidInput("bpm must be positive"));
        }
        if self.sequence_length == 0 {
            return Err(DanceError::InvalidInput("sequence length must be positive"));
        }
        if self.beats_between_poses == 0 {
            return Err(DanceError::InvalidInput(
                "beats between poses must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_beat_timing_from_bpm() {
        let config = GameConfig::default();
        assert_eq!(config.beat_interval_ms(), 500);
        assert_eq!(config.move_window_ms(), 2_000);
        assert_eq!(config.slot_spacing_ms(), 1_000);
    }

    #[test]
    fn parses_partial_overrides() {
        let config = GameConfig::from_json_str(r#"{"bpm": 90, "points_per_hit": 150}"#).unwrap();
        assert_eq!(config.bpm, 90);
        assert_eq!(config.points_per_hit, 150);
        assert_eq!(config.sequence_length, 32);
    }

    #[test]
    fn rejects_zero_bpm() {
        let err = GameConfig::from_json_str(r#"{"bpm": 0}"#).unwrap_err();
        assert!(format!("{err}").contains("bpm"));
    }
}
