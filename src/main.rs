//! Stack Tower entry point
//!
//! Runs the game headless: the seeded demo pilot plays until it blunders (or
//! the frame cap is hit), with the reference scene graph and physics world as
//! backends. Pass a seed as the first argument to override the settings file.

use stack_tower::Settings;
use stack_tower::services::{PhysicsWorld, SceneGraph, VisualService};
use stack_tower::sim::{GamePhase, GameState, TickInput, tick};

fn main() {
    env_logger::init();
    log::info!("Stack Tower (headless demo) starting...");

    let settings = Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(settings.demo_seed);

    let mut visual = SceneGraph::new();
    let mut physics = PhysicsWorld::new();

    let aspect = 16.0 / 9.0;
    let mut state = GameState::new(seed, aspect, &mut visual, &mut physics);
    state.speed = settings.slide_speed;
    state.pilot = settings.pilot;

    // First frame, before any input.
    visual.render();

    let input = TickInput {
        primary_action: false,
        idle_mode: true,
    };
    let mut ending_frames = settings.ending_frames;
    for _ in 0..settings.max_demo_frames {
        tick(&mut state, &input, &mut visual, &mut physics);
        if state.phase == GamePhase::Ended {
            // Let the collapse play out before stopping.
            if ending_frames == 0 {
                break;
            }
            ending_frames -= 1;
        }
    }

    println!(
        "seed {seed}: tower height {} ({} layers cut, {} overhangs shed) in {} frames",
        state.tower.height(),
        state.tower.height().saturating_sub(2),
        state.tower.overhangs().len(),
        state.frames,
    );
    if state.phase != GamePhase::Ended {
        println!("frame cap reached before the pilot blundered");
    }
}
