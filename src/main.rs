//! Brickfall entry point
//!
//! Runs a headless game played by the autopilot and reports the result.
//! Pass a settings JSON path as the first argument to override defaults.

use brickfall::autopilot;
use brickfall::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use brickfall::platform::Session;
use brickfall::renderer::MemorySurface;
use brickfall::{Settings, SimError};

/// Give up on a demo that never ends
const MAX_STEPS: u32 = 200_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brickfall (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(std::path::Path::new(&path)),
        None => Settings::default(),
    };

    if let Err(e) = run(settings) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `platform::Session` directly
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn run(settings: Settings) -> Result<(), SimError> {
    let surface = MemorySurface::new(FIELD_WIDTH, FIELD_HEIGHT);
    let mut session = Session::new(settings, surface)?;

    let mut steps = 0;
    while !session.is_over() && steps < MAX_STEPS {
        if let Some(command) = autopilot::next_command(&session.state) {
            session.command(command);
        }
        if session.step()?.is_none() && autopilot::next_command(&session.state).is_none() {
            log::warn!("Nothing scheduled in {:?}, stopping", session.state.phase);
            break;
        }
        steps += 1;
    }

    let board = &session.state.scoreboard;
    println!(
        "Finished in {:?} after {} ticks ({} ms): level {}, score {}, lives {}",
        session.state.phase,
        session.state.time_ticks,
        session.scheduler.now_ms(),
        board.level,
        board.score,
        board.lives
    );
    println!("On screen: {}", session.surface().texts().join(" | "));
    Ok(())
}
