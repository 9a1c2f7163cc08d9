use crate::config::GameConfig;
use crate::feedback::{FeedbackEvent, Scoreboard};
use crate::history::PoseHistory;
use crate::landmark::LandmarkFeed;
use crate::sequence::{Scheduler, SlotView};
use crate::{DanceError, Result};

/// Countdown cue schedule: offset from `begin` paired with the cue text.
/// Driven by the same tick clock as gameplay; there are no timers.
const COUNTDOWN_CUES: [(u64, &str); 4] = [(0, "3"), (1_000, "2"), (2_000, "1"), (3_000, "GO!")];

/// Gameplay starts this long after `begin`.
const COUNTDOWN_LEAD_MS: u64 = 4_000;

/// Lifecycle of a play session. Transitions are guarded; there is no other
/// phase flag anywhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Start,
    Countdown,
    Playing,
    GameOver,
}

/// Everything the renderer needs after one tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub phase: GamePhase,
    /// Countdown cues that became due this tick, each emitted exactly once.
    pub countdown_cues: Vec<&'static str>,
    pub feedback: Vec<FeedbackEvent>,
    pub score: u64,
    /// Fraction of the song elapsed, clamped to [0, 1].
    pub song_progress: f32,
    pub slots: Vec<SlotView>,
}

/// Owns all mutable game state and drives it from the host's per-frame
/// ticks. The host samples its monotonic clock once per frame and passes
/// it in; the session never blocks and never reads a clock of its own.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    phase: GamePhase,
    feed: LandmarkFeed,
    history: PoseHistory,
    scheduler: Scheduler,
    scoreboard: Scoreboard,
    begin_ms: u64,
    next_cue: usize,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let scheduler = Scheduler::generate(&config);
        let history = PoseHistory::new(config.history_window_ms);
        let scoreboard = Scoreboard::new(config.points_per_hit);
        Self {
            config,
            phase: GamePhase::Start,
            feed: LandmarkFeed::new(),
            history,
            scheduler,
            scoreboard,
            begin_ms: 0,
            next_cue: 0,
        }
    }

    /// Handle the capture side writes detection results through. Clones
    /// share the same cell, so the callback keeps its copy while the
    /// session reads per tick.
    pub fn feed(&self) -> LandmarkFeed {
        self.feed.clone()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    /// Starts the countdown. Only legal from the start screen.
    pub fn begin(&mut self, now_ms: u64) -> Result<()> {
        if self.phase != GamePhase::Start {
            return Err(DanceError::msg(format!(
                "cannot begin a session from {:?}",
                self.phase
            )));
        }
        self.phase = GamePhase::Countdown;
        self.begin_ms = now_ms;
        self.next_cue = 0;
        Ok(())
    }

    /// Returns to the start screen, clearing score, pose history and every
    /// move state. Legal from any phase.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Start;
        self.scoreboard.reset();
        self.history.clear();
        self.scheduler.reset();
        self.next_cue = 0;
    }

    /// Per-frame driver. Consumes at most the latest detection result,
    /// advances the phase machine, and reports what changed.
    pub fn tick(&mut self, now_ms: u64) -> Result<TickReport> {
        let mut report = TickReport {
            phase: self.phase,
            countdown_cues: Vec::new(),
            feedback: Vec::new(),
            score: self.scoreboard.score(),
            song_progress: 0.0,
            slots: Vec::new(),
        };

        match self.phase {
            GamePhase::Start | GamePhase::GameOver => {}
            GamePhase::Countdown => {
                let since_begin = now_ms.saturating_sub(self.begin_ms);
                while let Some(&(offset, text)) = COUNTDOWN_CUES.get(self.next_cue) {
                    if since_begin >= offset {
                        report.countdown_cues.push(text);
                        self.next_cue += 1;
                    } else {
                        break;
                    }
                }
                if since_begin >= COUNTDOWN_LEAD_MS {
                    self.phase = GamePhase::Playing;
                    self.play_tick(since_begin - COUNTDOWN_LEAD_MS, &mut report)?;
                }
            }
            GamePhase::Playing => {
                let elapsed_ms = now_ms
                    .saturating_sub(self.begin_ms)
                    .saturating_sub(COUNTDOWN_LEAD_MS);
                self.play_tick(elapsed_ms, &mut report)?;
            }
        }

        report.phase = self.phase;
        report.score = self.scoreboard.score();
        Ok(report)
    }

    fn play_tick(&mut self, elapsed_ms: u64, report: &mut TickReport) -> Result<()> {
        if let Some(sample) = self.feed.take_latest()? {
            self.history.record(sample)?;
        }

        for outcome in self.scheduler.tick(elapsed_ms, &self.history) {
            report.feedback.push(self.scoreboard.judge(&outcome));
        }

        report.song_progress =
            (elapsed_ms as f32 / self.config.song_duration_ms as f32).min(1.0);
        report.slots = self.scheduler.slot_views(elapsed_ms);

        if elapsed_ms >= self.config.song_duration_ms {
            self.phase = GamePhase::GameOver;
        }
        Ok(())
    }
}
