use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::{DanceError, Result};

/// Number of tracked body keypoints per detection result.
pub const LANDMARK_COUNT: usize = 33;

// Body-part indices following the fixed convention of the upstream pose
// model. Only the ones the classifiers read are named here.
pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// A single tracked keypoint in normalized [0, 1] frame coordinates.
/// Smaller `y` is higher on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// One timestamped detection result from the landmark source. Immutable
/// once constructed; ownership moves into the pose history until eviction.
#[derive(Debug, Clone)]
pub struct PoseSample {
    timestamp_ms: u64,
    landmarks: Vec<Landmark>,
}

impl PoseSample {
    /// Validates a raw detection result at the ingestion boundary. Frames
    /// with the wrong keypoint count are rejected here so the classifiers
    /// can index named landmarks without range checks.
    pub fn new(timestamp_ms: u64, landmarks: Vec<Landmark>) -> Result<Self> {
        if landmarks.len() != LANDMARK_COUNT {
            return Err(DanceError::InvalidInput(
                "a pose sample must contain exactly 33 landmarks",
            ));
        }
        Ok(Self {
            timestamp_ms,
            landmarks,
        })
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}

/// Latest-value cell between the capture callback and the tick driver.
///
/// The landmark source runs at its own cadence, independent of the render
/// tick. The game loop only ever wants the most recent detection and must
/// never block waiting for one, so each publish simply replaces whatever
/// was there before.
#[derive(Debug, Default, Clone)]
pub struct LandmarkFeed {
    shared: Arc<Mutex<Option<PoseSample>>>,
}

impl LandmarkFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a detection result, replacing any unread one.
    pub fn publish(&self, sample: PoseSample) -> Result<()> {
        let mut slot = self.lock()?;
        *slot = Some(sample);
        Ok(())
    }

    /// Takes the most recent unread sample, if any. "No pose this tick" is
    /// a normal outcome, not an error.
    pub fn take_latest(&self) -> Result<Option<PoseSample>> {
        let mut slot = self.lock()?;
        Ok(slot.take())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<PoseSample>>> {
        self.shared
            .lock()
            .map_err(|_| DanceError::msg("landmark feed has been poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_frames() {
        let err = PoseSample::new(0, vec![Landmark::default(); 20]).unwrap_err();
        assert!(format!("{err}").contains("33"));
    }

    #[test]
    fn accepts_full_frames() {
        let sample = PoseSample::new(42, vec![Landmark::default(); LANDMARK_COUNT]).unwrap();
        assert_eq!(sample.timestamp_ms(), 42);
        assert_eq!(sample.landmarks().len(), LANDMARK_COUNT);
    }

    #[test]
    fn feed_keeps_only_the_latest_sample() {
        let feed = LandmarkFeed::new();
        let frame = |t| PoseSample::new(t, vec![Landmark::default(); LANDMARK_COUNT]).unwrap();

        feed.publish(frame(1)).unwrap();
        feed.publish(frame(2)).unwrap();

        let latest = feed.take_latest().unwrap().expect("sample should be present");
        assert_eq!(latest.timestamp_ms(), 2);
        assert!(feed.take_latest().unwrap().is_none());
    }
}
