//! Abyss Equilibrium entry point
//!
//! Headless demo: the autopilot swims one run and the story, HUD messages and
//! final outcome are written to the log.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Headless autopilot run of the ocean survival simulation
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tuning JSON; shipped balance when omitted
    tuning: Option<PathBuf>,
    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), abyss_equilibrium::TuningError> {
    use abyss_equilibrium::consts::*;
    use abyss_equilibrium::sim::{GameEvent, GameState, TickInput, tick};
    use abyss_equilibrium::{Settings, Tuning};

    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Abyss Equilibrium (native) starting...");

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut settings = Settings::default().with_threat_detection(true);
    if let Some(seed) = args.seed {
        settings = settings.with_seed(seed);
    }
    let mut state = GameState::new(tuning, &settings)?;

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    // Render-rate frames, each fed to the fixed-step sim
    let frame_dt = 1.0 / 30.0;
    let max_frames = 30 * 60 * 5;
    let mut accumulator = 0.0;

    for _ in 0..max_frames {
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in state.drain_events() {
            match event {
                GameEvent::Snapshot(snapshot) => {
                    if let Some(message) = snapshot.message {
                        log::info!("{} (health {:.0})", message, snapshot.health);
                    }
                }
                GameEvent::Threat(threat) if !threat.is_clear() => {
                    log::debug!("Sensor: {}", threat.message);
                }
                GameEvent::Outcome(summary) => {
                    println!(
                        "{} at distance {}. Corporate profit ${} ({:?} impact)",
                        if summary.won { "Reached the Sanctuary" } else { "Silenced" },
                        summary.distance,
                        summary.antagonist_score,
                        summary.impact
                    );
                }
                _ => {}
            }
        }

        if state.is_over() {
            return Ok(());
        }
    }

    log::warn!(
        "Autopilot still swimming after {} frames at distance {}",
        max_frames,
        state.player.distance_traveled()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive the library directly on wasm
}
