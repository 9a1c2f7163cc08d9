use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::history::{average_pose, PoseHistory};
use crate::moves::{catalog, MoveSpec};

/// Number of recent samples averaged before a pose is judged, and the
/// minimum history length required to judge at all.
const SMOOTHING_SAMPLES: usize = 3;

/// Sub-range of the active window rendered as the hit zone.
const HIT_ZONE: (f32, f32) = (0.4, 0.6);

/// Lifecycle of one scheduled move. `Hit` and `Missed` are terminal and
/// sticky; a move that has left `Pending` is never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveState {
    Pending,
    Hit,
    Missed,
}

/// One slot in the generated sequence.
#[derive(Debug, Clone)]
pub struct ScheduledMove {
    pub spec: MoveSpec,
    pub scheduled_at_ms: u64,
    pub window_ms: u64,
    state: MoveState,
}

impl ScheduledMove {
    pub fn state(&self) -> MoveState {
        self.state
    }
}

/// Judgment emitted when a move leaves the pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    Hit,
    Missed,
}

/// Record of a single state transition, handed to the scoreboard.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub index: usize,
    pub move_id: String,
    pub judgment: Judgment,
}

/// Per-slot view handed to the renderer each tick: plain data, no UI
/// types. `progress` runs 0..1 across the active window and goes negative
/// or above 1 outside it.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub index: usize,
    pub name: String,
    pub progress: f32,
    pub active: bool,
    pub in_hit_zone: bool,
    pub state: MoveState,
}

/// Owns the ordered move sequence and advances it against the gameplay
/// clock, one pass per tick.
#[derive(Debug)]
pub struct Scheduler {
    moves: Vec<ScheduledMove>,
    tolerance: f32,
}

impl Scheduler {
    /// Generates the sequence deterministically from the move catalog: the
    /// catalog entry advances every `beats_between_poses` slots and wraps
    /// cyclically, and slot `i` is scheduled at
    /// `i * beat_interval * beats_between_poses`.
    pub fn generate(config: &GameConfig) -> Self {
        let catalog = catalog();
        let spacing_ms = config.slot_spacing_ms();
        let window_ms = config.move_window_ms();
        let per_entry = config.beats_between_poses as usize;

        let moves = (0..config.sequence_length)
            .map(|slot| ScheduledMove {
                spec: catalog[(slot / per_entry) % catalog.len()].clone(),
                scheduled_at_ms: slot as u64 * spacing_ms,
                window_ms,
                state: MoveState::Pending,
            })
            .collect();

        Self {
            moves,
            tolerance: config.pose_tolerance,
        }
    }

    /// Advances every pending move for this tick, in sequence index order.
    /// A move whose window contains `elapsed_ms` is judged against the
    /// smoothed pose; the first match wins and the state sticks. A pending
    /// move whose window has passed is missed exactly once.
    pub fn tick(&mut self, elapsed_ms: u64, history: &PoseHistory) -> Vec<MoveOutcome> {
        let smoothed = if history.len() >= SMOOTHING_SAMPLES {
            average_pose(history.recent(SMOOTHING_SAMPLES))
        } else {
            None
        };

        let mut outcomes = Vec::new();
        for (index, slot) in self.moves.iter_mut().enumerate() {
            if slot.state != MoveState::Pending {
                continue;
            }

            let progress = progress_of(slot, elapsed_ms);
            if (0.0..=1.0).contains(&progress) {
                let matched = smoothed
                    .as_deref()
                    .map(|pose| {
                        slot.spec
                            .kind
                            .matches(pose, history.samples(), self.tolerance)
                    })
                    .unwrap_or(false);
                if matched {
                    slot.state = MoveState::Hit;
                    outcomes.push(MoveOutcome {
                        index,
                        move_id: slot.spec.id.clone(),
                        judgment: Judgment::Hit,
                    });
                }
            } else if progress > 1.0 {
                slot.state = MoveState::Missed;
                outcomes.push(MoveOutcome {
                    index,
                    move_id: slot.spec.id.clone(),
                    judgment: Judgment::Missed,
                });
            }
        }
        outcomes
    }

    /// Snapshot of every slot for the renderer.
    pub fn slot_views(&self, elapsed_ms: u64) -> Vec<SlotView> {
        self.moves
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let progress = progress_of(slot, elapsed_ms);
                let active =
                    slot.state == MoveState::Pending && (0.0..=1.0).contains(&progress);
                SlotView {
                    index,
                    name: slot.spec.display_name.clone(),
                    progress,
                    active,
                    in_hit_zone: active && (HIT_ZONE.0..=HIT_ZONE.1).contains(&progress),
                    state: slot.state,
                }
            })
            .collect()
    }

    pub fn moves(&self) -> &[ScheduledMove] {
        &self.moves
    }

    /// Returns every move to `Pending` for a game restart.
    pub fn reset(&mut self) {
        for slot in &mut self.moves {
            slot.state = MoveState::Pending;
        }
    }
}

fn progress_of(slot: &ScheduledMove, elapsed_ms: u64) -> f32 {
    (elapsed_ms as i64 - slot.scheduled_at_ms as i64) as f32 / slot.window_ms as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{
        Landmark, PoseSample, LANDMARK_COUNT, LEFT_SHOULDER, LEFT_WRIST, RIGHT_SHOULDER,
        RIGHT_WRIST,
    };
    use crate::moves::MoveKind;

    fn scheduler() -> Scheduler {
        Scheduler::generate(&GameConfig::default())
    }

    fn arms_up_sample(timestamp_ms: u64) -> PoseSample {
        let mut pose = vec![Landmark { x: 0.5, y: 0.5 }; LANDMARK_COUNT];
        pose[LEFT_SHOULDER].y = 0.4;
        pose[RIGHT_SHOULDER].y = 0.4;
        pose[LEFT_WRIST].y = 0.1;
        pose[RIGHT_WRIST].y = 0.1;
        PoseSample::new(timestamp_ms, pose).unwrap()
    }

    fn arms_up_history(count: usize) -> PoseHistory {
        let mut history = PoseHistory::new(10_000);
        for i in 0..count {
            history.record(arms_up_sample(i as u64 * 50)).unwrap();
        }
        history
    }

    #[test]
    fn generation_cycles_the_catalog_every_two_slots() {
        let moves = scheduler().moves().to_vec();
        assert_eq!(moves.len(), 32);
        assert_eq!(moves[0].spec.id, "arms_up");
        assert_eq!(moves[1].spec.id, "arms_up");
        assert_eq!(moves[2].spec.id, "left_arm");
        assert_eq!(moves[3].spec.id, "left_arm");
        // 7 catalog entries x 2 slots each: slot 14 wraps back around.
        assert_eq!(moves[14].spec.id, "arms_up");
        assert_eq!(moves[13].spec.kind, MoveKind::FreeDance);
    }

    #[test]
    fn generation_spaces_slots_by_two_beats() {
        let moves = scheduler().moves().to_vec();
        assert_eq!(moves[0].scheduled_at_ms, 0);
        assert_eq!(moves[5].scheduled_at_ms, 5_000);
        assert_eq!(moves[0].window_ms, 2_000);
    }

    #[test]
    fn matching_move_is_hit_once_and_stays_hit() {
        let mut scheduler = scheduler();
        let history = arms_up_history(3);

        // Slot 0 at mid-window.
        let outcomes = scheduler.tick(1_000, &history);
        assert!(outcomes
            .iter()
            .any(|o| o.index == 0 && o.judgment == Judgment::Hit));
        assert_eq!(scheduler.moves()[0].state(), MoveState::Hit);

        // Re-evaluating the same instant changes nothing.
        assert!(scheduler.tick(1_000, &history).is_empty());
        // The terminal state survives the window expiring.
        scheduler.tick(10_000, &history);
        assert_eq!(scheduler.moves()[0].state(), MoveState::Hit);
    }

    #[test]
    fn unmatched_move_is_missed_when_the_window_closes() {
        let mut scheduler = scheduler();
        let empty = PoseHistory::new(500);

        // Window end is inclusive: progress 1.0 is still active.
        assert!(scheduler.tick(2_000, &empty).is_empty());
        assert_eq!(scheduler.moves()[0].state(), MoveState::Pending);

        let outcomes = scheduler.tick(2_001, &empty);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].index, 0);
        assert_eq!(outcomes[0].judgment, Judgment::Missed);
        assert_eq!(scheduler.moves()[0].state(), MoveState::Missed);
    }

    #[test]
    fn fewer_than_three_samples_never_judges() {
        let mut scheduler = scheduler();
        let history = arms_up_history(2);
        assert!(scheduler.tick(1_000, &history).is_empty());
        assert_eq!(scheduler.moves()[0].state(), MoveState::Pending);
    }

    #[test]
    fn moves_before_their_window_are_untouched() {
        let mut scheduler = scheduler();
        let history = arms_up_history(3);
        scheduler.tick(0, &history);
        // Slot 2 opens at 2000ms and must still be pending.
        assert_eq!(scheduler.moves()[2].state(), MoveState::Pending);
    }

    #[test]
    fn slot_views_flag_the_hit_zone() {
        let scheduler = scheduler();
        let views = scheduler.slot_views(1_000);

        // Slot 0: progress 0.5, mid hit zone.
        assert!((views[0].progress - 0.5).abs() < 1e-6);
        assert!(views[0].active);
        assert!(views[0].in_hit_zone);

        // Slot 1: progress 0.0, active but outside the zone.
        assert!(views[1].active);
        assert!(!views[1].in_hit_zone);

        // Slot 3: not yet open.
        assert!(views[3].progress < 0.0);
        assert!(!views[3].active);
    }

    #[test]
    fn reset_returns_every_move_to_pending() {
        let mut scheduler = scheduler();
        scheduler.tick(2_001, &PoseHistory::new(500));
        assert_eq!(scheduler.moves()[0].state(), MoveState::Missed);

        scheduler.reset();
        assert!(scheduler
            .moves()
            .iter()
            .all(|m| m.state() == MoveState::Pending));
    }
}
