use serde::{Deserialize, Serialize};

use crate::sequence::{Judgment, MoveOutcome};

/// Category of a transient feedback flash. The renderer maps these to its
/// own colors and display duration; the core only emits the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
}

/// Transient feedback signal shown to the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub text: String,
    pub kind: FeedbackKind,
}

impl FeedbackEvent {
    fn new(text: &str, kind: FeedbackKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
        }
    }
}

/// Monotonically non-decreasing score accumulator. Only a game restart may
/// reset it.
#[derive(Debug)]
pub struct Scoreboard {
    score: u64,
    points_per_hit: u64,
}

impl Scoreboard {
    pub fn new(points_per_hit: u64) -> Self {
        Self {
            score: 0,
            points_per_hit,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Converts a scheduler outcome into a score delta and feedback flash.
    /// Hits award the configured points; misses award nothing.
    pub fn judge(&mut self, outcome: &MoveOutcome) -> FeedbackEvent {
        match outcome.judgment {
            Judgment::Hit => {
                self.score += self.points_per_hit;
                FeedbackEvent::new("PERFECT!", FeedbackKind::Success)
            }
            Judgment::Missed => FeedbackEvent::new("MISS", FeedbackKind::Error),
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}
