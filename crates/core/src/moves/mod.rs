use serde::{Deserialize, Serialize};

use crate::landmark::{
    Landmark, PoseSample, LANDMARK_COUNT, LEFT_ANKLE, LEFT_HIP, LEFT_SHOULDER, LEFT_WRIST, NOSE,
    RIGHT_ANKLE, RIGHT_HIP, RIGHT_SHOULDER, RIGHT_WRIST,
};
use crate::Result;

/// Minimum history length before the free-dance energy check can fire.
const FREE_DANCE_MIN_SAMPLES: usize = 5;

/// Geometric predicate used to judge a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    ArmsUp,
    LeftArm,
    RightArm,
    Jump,
    Turn,
    Clap,
    FreeDance,
}

/// Static description of one dance move in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSpec {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub kind: MoveKind,
}

/// The fixed seven-move catalog the sequence generator cycles through.
pub fn catalog() -> Vec<MoveSpec> {
    [
        ("arms_up", "ARMS UP", "Raise both arms", MoveKind::ArmsUp),
        ("left_arm", "LEFT", "Left arm to side", MoveKind::LeftArm),
        ("right_arm", "RIGHT", "Right arm to side", MoveKind::RightArm),
        ("jump", "JUMP", "Jump with arms up", MoveKind::Jump),
        ("turn", "TURN", "Turn around", MoveKind::Turn),
        ("clap", "CLAP", "Clap hands", MoveKind::Clap),
        ("dance", "DANCE", "Free dance", MoveKind::FreeDance),
    ]
    .into_iter()
    .map(|(id, display_name, description, kind)| MoveSpec {
        id: id.to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        kind,
    })
    .collect()
}

/// Serializes the catalog for hosts that render the move list themselves.
pub fn catalog_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&catalog())?)
}

impl MoveKind {
    /// Judges a smoothed pose against this move. All comparisons are strict
    /// and use the game-wide normalized tolerance. `history` feeds the
    /// free-dance movement-energy heuristic; every other predicate reads
    /// only the averaged pose. Missing or insufficient data is "no match",
    /// never an error.
    pub fn matches(self, pose: &[Landmark], history: &[PoseSample], tolerance: f32) -> bool {
        if pose.len() < LANDMARK_COUNT {
            return false;
        }
        match self {
            Self::ArmsUp => arms_up(pose, tolerance),
            Self::LeftArm => left_arm(pose, tolerance),
            Self::RightArm => right_arm(pose, tolerance),
            Self::Jump => jump(pose, tolerance),
            Self::Turn => turn(pose, tolerance),
            Self::Clap => clap(pose, tolerance),
            Self::FreeDance => free_dance(history, tolerance),
        }
    }
}

fn arms_up(pose: &[Landmark], tol: f32) -> bool {
    pose[LEFT_WRIST].y < pose[LEFT_SHOULDER].y - tol
        && pose[RIGHT_WRIST].y < pose[RIGHT_SHOULDER].y - tol
}

fn left_arm(pose: &[Landmark], tol: f32) -> bool {
    pose[LEFT_WRIST].x < pose[LEFT_SHOULDER].x - tol
}

fn right_arm(pose: &[Landmark], tol: f32) -> bool {
    pose[RIGHT_WRIST].x > pose[RIGHT_SHOULDER].x + tol
}

fn jump(pose: &[Landmark], tol: f32) -> bool {
    pose[LEFT_ANKLE].y < pose[LEFT_HIP].y - tol * 2.0
        && pose[RIGHT_ANKLE].y < pose[RIGHT_HIP].y - tol * 2.0
}

fn turn(pose: &[Landmark], tol: f32) -> bool {
    let shoulder_center_x = (pose[LEFT_SHOULDER].x + pose[RIGHT_SHOULDER].x) / 2.0;
    let angle = (pose[NOSE].x - shoulder_center_x).atan2(pose[NOSE].y - pose[LEFT_SHOULDER].y);
    angle.abs() > tol * 3.0
}

fn clap(pose: &[Landmark], tol: f32) -> bool {
    let dx = pose[LEFT_WRIST].x - pose[RIGHT_WRIST].x;
    let dy = pose[LEFT_WRIST].y - pose[RIGHT_WRIST].y;
    (dx * dx + dy * dy).sqrt() < tol * 2.0
}

/// Movement-energy heuristic for free dance: accumulated frame-to-frame
/// displacement over even landmark indices, normalized by history length.
/// The x of index `j` is intentionally paired with the y of index `j + 1`;
/// the threshold was tuned against that pairing, so it stays as-is. The
/// walk stops one short of the last index so `j + 1` is always in range.
fn free_dance(history: &[PoseSample], tol: f32) -> bool {
    if history.len() < FREE_DANCE_MIN_SAMPLES {
        return false;
    }

    let mut total_movement = 0.0_f32;
    for pair in history.windows(2) {
        let prev = pair[0].landmarks();
        let curr = pair[1].landmarks();
        let limit = prev.len().min(curr.len()).saturating_sub(1);
        for j in (0..limit).step_by(2) {
            let dx = prev[j].x - curr[j].x;
            let dy = prev[j + 1].y - curr[j + 1].y;
            total_movement += (dx * dx + dy * dy).sqrt();
        }
    }

    total_movement / history.len() as f32 > tol
}
