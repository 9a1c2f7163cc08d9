use crate::landmark::{Landmark, PoseSample, LANDMARK_COUNT};
use crate::{DanceError, Result};

/// Trailing time-windowed log of pose samples.
///
/// Samples stay in insertion order, which equals time order because
/// [`record`](PoseHistory::record) rejects anything that would move the
/// clock backwards. Eviction is recomputed on every insert relative to the
/// newest timestamp; there is no timer involved.
#[derive(Debug)]
pub struct PoseHistory {
    window_ms: u64,
    samples: Vec<PoseSample>,
}

impl PoseHistory {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            samples: Vec::new(),
        }
    }

    /// Appends a sample and evicts everything whose age relative to the
    /// newest timestamp reaches the window. A sample exactly `window_ms`
    /// old is evicted; retention is strictly `age < window`.
    pub fn record(&mut self, sample: PoseSample) -> Result<()> {
        if let Some(newest) = self.samples.last() {
            if sample.timestamp_ms() < newest.timestamp_ms() {
                return Err(DanceError::InvalidInput(
                    "pose samples must arrive in time order",
                ));
            }
        }

        let newest_ms = sample.timestamp_ms();
        let window_ms = self.window_ms;
        self.samples.push(sample);
        self.samples
            .retain(|s| newest_ms - s.timestamp_ms() < window_ms);
        Ok(())
    }

    /// Returns the last `n` samples in time order, fewer if the buffer is
    /// shorter.
    pub fn recent(&self, n: usize) -> &[PoseSample] {
        let start = self.samples.len().saturating_sub(n);
        &self.samples[start..]
    }

    /// All retained samples, oldest first.
    pub fn samples(&self) -> &[PoseSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Arithmetic mean of each landmark's x and y across `samples`. Returns
/// `None` on empty input so callers can treat "nothing to smooth" as "no
/// match". Uniform landmark cardinality is guaranteed by the ingestion
/// validation in [`PoseSample::new`].
pub fn average_pose(samples: &[PoseSample]) -> Option<Vec<Landmark>> {
    if samples.is_empty() {
        return None;
    }

    let mut result = vec![Landmark::default(); LANDMARK_COUNT];
    for sample in samples {
        for (slot, point) in result.iter_mut().zip(sample.landmarks()) {
            slot.x += point.x;
            slot.y += point.y;
        }
    }

    let count = samples.len() as f32;
    for slot in &mut result {
        slot.x /= count;
        slot.y /= count;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(timestamp_ms: u64) -> PoseSample {
        PoseSample::new(timestamp_ms, vec![Landmark::default(); LANDMARK_COUNT]).unwrap()
    }

    fn sample_with_xy(timestamp_ms: u64, x: f32, y: f32) -> PoseSample {
        PoseSample::new(timestamp_ms, vec![Landmark { x, y }; LANDMARK_COUNT]).unwrap()
    }

    #[test]
    fn evicts_samples_at_the_window_boundary() {
        let mut history = PoseHistory::new(500);
        for t in [0, 100, 200, 600] {
            history.record(sample_at(t)).unwrap();
        }

        // Age 600 and age 500 are out; age 400 survives.
        let retained: Vec<u64> = history.samples().iter().map(|s| s.timestamp_ms()).collect();
        assert_eq!(retained, vec![200, 600]);
    }

    #[test]
    fn rejects_out_of_order_samples() {
        let mut history = PoseHistory::new(500);
        history.record(sample_at(100)).unwrap();
        assert!(history.record(sample_at(50)).is_err());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn recent_returns_the_tail_in_time_order() {
        let mut history = PoseHistory::new(10_000);
        for t in [0, 10, 20, 30] {
            history.record(sample_at(t)).unwrap();
        }

        let tail: Vec<u64> = history.recent(2).iter().map(|s| s.timestamp_ms()).collect();
        assert_eq!(tail, vec![20, 30]);
        assert_eq!(history.recent(10).len(), 4);
    }

    #[test]
    fn average_of_one_sample_is_the_sample() {
        let sample = sample_with_xy(0, 0.25, 0.75);
        let averaged = average_pose(std::slice::from_ref(&sample)).unwrap();
        assert_eq!(averaged[0], Landmark { x: 0.25, y: 0.75 });
        assert_eq!(averaged.len(), LANDMARK_COUNT);
    }

    #[test]
    fn average_is_the_arithmetic_mean() {
        let samples = [sample_with_xy(0, 0.2, 0.4), sample_with_xy(10, 0.4, 0.8)];
        let averaged = average_pose(&samples).unwrap();
        assert!((averaged[5].x - 0.3).abs() < 1e-6);
        assert!((averaged[5].y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert!(average_pose(&[]).is_none());
    }
}
