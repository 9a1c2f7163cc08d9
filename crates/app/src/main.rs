use std::path::{Path, PathBuf};

use beatmatch_core::landmark::{LEFT_SHOULDER, LEFT_WRIST, RIGHT_SHOULDER, RIGHT_WRIST};
use beatmatch_core::{
    catalog_json, GameConfig, GamePhase, GameSession, Landmark, PoseSample, LANDMARK_COUNT,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> beatmatch_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { config, tick_ms } => run_simulation(config.as_deref(), tick_ms),
        Commands::Catalog => print_catalog(),
    }
}

/// Drives a full session against a scripted landmark source, standing in
/// for the browser host: one feed publish and one tick per simulated frame.
fn run_simulation(config_path: Option<&Path>, tick_ms: u64) -> beatmatch_core::Result<()> {
    let config = match config_path {
        Some(path) => GameConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };
    tracing::info!(
        bpm = config.bpm,
        slots = config.sequence_length,
        "starting simulated session"
    );

    let mut session = GameSession::new(config.clone());
    let feed = session.feed();
    session.begin(0)?;

    let mut now_ms = 0_u64;
    let mut phase = session.phase();
    loop {
        feed.publish(scripted_sample(now_ms, &config)?)?;
        let report = session.tick(now_ms)?;

        for cue in &report.countdown_cues {
            tracing::info!(cue, "countdown");
        }
        for event in &report.feedback {
            tracing::info!(text = %event.text, kind = ?event.kind, "feedback");
        }
        if report.phase != phase {
            tracing::info!(from = ?phase, to = ?report.phase, "phase change");
            phase = report.phase;
        }
        if report.phase == GamePhase::GameOver {
            tracing::info!(score = report.score, "session finished");
            return Ok(());
        }

        now_ms += tick_ms;
    }
}

/// Scripted stand-in for the webcam pose model: raises both wrists above
/// the shoulders on alternating sequence slots, so half the moves land
/// hits and the other half expire.
fn scripted_sample(now_ms: u64, config: &GameConfig) -> beatmatch_core::Result<PoseSample> {
    let mut landmarks = vec![Landmark { x: 0.5, y: 0.5 }; LANDMARK_COUNT];
    landmarks[LEFT_SHOULDER] = Landmark { x: 0.6, y: 0.4 };
    landmarks[RIGHT_SHOULDER] = Landmark { x: 0.4, y: 0.4 };

    let slot = now_ms / config.slot_spacing_ms();
    let wrist_y = if slot % 2 == 0 { 0.1 } else { 0.6 };
    landmarks[LEFT_WRIST] = Landmark { x: 0.7, y: wrist_y };
    landmarks[RIGHT_WRIST] = Landmark { x: 0.3, y: wrist_y };

    PoseSample::new(now_ms, landmarks)
}

fn print_catalog() -> beatmatch_core::Result<()> {
    println!("{}", catalog_json()?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Pose rhythm game timing core harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted end-to-end session and log the resulting score.
    Simulate {
        /// Optional JSON file overriding the default game configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Simulated frame interval in milliseconds.
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
    },
    /// Print the move catalog as JSON for the host renderer.
    Catalog,
}
