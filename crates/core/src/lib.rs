//! Timing-and-matching core for the Beatmatch pose rhythm game.
//!
//! A browser host feeds timestamped body-landmark frames and a monotonic
//! clock into this crate. The crate schedules a beat-aligned sequence of
//! target moves, smooths the incoming pose stream over a trailing window,
//! judges each move with a geometric classifier while its timing window is
//! open, and emits score deltas and feedback events for the renderer.
//! Camera capture, the pose model, audio synthesis and drawing all live
//! outside the crate; each module owns one stage of the pipeline.

pub mod config;
pub mod error;
pub mod feedback;
pub mod game;
pub mod history;
pub mod landmark;
pub mod moves;
pub mod sequence;

pub use config::GameConfig;
pub use error::{DanceError, Result};
pub use feedback::{FeedbackEvent, FeedbackKind, Scoreboard};
pub use game::{GamePhase, GameSession, TickReport};
pub use history::{average_pose, PoseHistory};
pub use landmark::{Landmark, LandmarkFeed, PoseSample, LANDMARK_COUNT};
pub use moves::{catalog, catalog_json, MoveKind, MoveSpec};
pub use sequence::{Judgment, MoveOutcome, MoveState, ScheduledMove, Scheduler, SlotView};
