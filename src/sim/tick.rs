//! Per-frame driver
//!
//! One `tick` is one display frame: resolve input (cut or start), advance the
//! sliding layer in both representations, let the camera catch up, step the
//! physics world by a fixed timestep, copy physics poses onto the visuals of
//! everything free-falling, and render. All mutation happens here or in the
//! cut, synchronously, in one ordered sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::tower::{CutOutcome, Tower};
use crate::consts::{BASE_SIZE, SIM_DT, SLIDE_SPEED};
use crate::services::{PhysicsService, VisualService};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input; nothing moves.
    Idle,
    /// Tower is growing, top layer is sliding.
    Running,
    /// A cut missed. Terminal: the loop keeps rendering the collapse, but
    /// no further cuts or slides happen.
    Ended,
}

/// Input commands for a single tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// The one abstract action: click/tap/key. Starts the game from idle,
    /// cuts while running.
    pub primary_action: bool,
    /// Demo mode: a seeded autopilot fires the primary action near alignment.
    pub idle_mode: bool,
}

/// Autopilot tuning for idle/demo mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PilotConfig {
    /// The pilot cuts once the slide offset reaches a jittered target in
    /// `[-tolerance, tolerance]`.
    pub tolerance: f32,
    /// One-in-N chance per layer of a deliberate overshoot past the slab
    /// edge, ending the run. Zero disables blunders.
    pub blunder_odds: u32,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.25,
            blunder_odds: 12,
        }
    }
}

/// Everything the game loop mutates, owned in one place.
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducible demo runs.
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// Slide speed in world units per frame at 60 Hz.
    pub speed: f32,
    /// Frames ticked since leaving idle.
    pub frames: u64,
    pub tower: Tower,
    pub camera: Camera,
    pub pilot: PilotConfig,
    /// Slide offset at which the demo pilot fires, redrawn per layer.
    pilot_target: f32,
}

impl GameState {
    /// Build the initial state: foundation plus the first sliding layer,
    /// registered with both backends.
    pub fn new(
        seed: u64,
        aspect: f32,
        visual: &mut dyn VisualService,
        physics: &mut dyn PhysicsService,
    ) -> Self {
        let mut tower = Tower::new();
        tower.spawn_base(visual, physics, BASE_SIZE);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            speed: SLIDE_SPEED,
            frames: 0,
            tower,
            camera: Camera::new(aspect),
            pilot: PilotConfig::default(),
            pilot_target: 0.0,
        };
        state.draw_pilot_target();
        state
    }

    /// Signed slide offset of the top layer relative to the layer below,
    /// along the top's slide axis.
    pub fn slide_delta(&self, physics: &dyn PhysicsService) -> Option<f32> {
        let len = self.tower.height();
        if len < 2 {
            return None;
        }
        let top = self.tower.top()?;
        let axis = top.axis?;
        let prev = &self.tower.stack()[len - 2];
        Some(
            axis.component(physics.get_pose(top.physics).position)
                - axis.component(physics.get_pose(prev.physics).position),
        )
    }

    /// Pick the pilot's stopping offset for the current layer.
    fn draw_pilot_target(&mut self) {
        let size = self.tower.top().map(|t| t.slide_extent()).unwrap_or(0.0);
        self.pilot_target =
            if self.pilot.blunder_odds > 1 && self.rng.random_ratio(1, self.pilot.blunder_odds) {
                // Deliberate overshoot well past the slab edge.
                size + self.rng.random_range(0.5..1.5)
            } else {
                let tolerance = self.pilot.tolerance.max(f32::EPSILON);
                self.rng.random_range(-tolerance..tolerance)
            };
    }
}

/// Advance the game by one frame.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    visual: &mut dyn VisualService,
    physics: &mut dyn PhysicsService,
) {
    let mut primary = input.primary_action;
    if input.idle_mode && !primary {
        primary = match state.phase {
            GamePhase::Idle => true,
            GamePhase::Running => state
                .slide_delta(physics)
                .is_some_and(|delta| delta >= state.pilot_target),
            GamePhase::Ended => false,
        };
    }

    match state.phase {
        GamePhase::Idle => {
            if primary {
                state.phase = GamePhase::Running;
                log::info!("game started (seed {})", state.seed);
            }
        }
        GamePhase::Running if primary => match state.tower.cut(visual, physics) {
            CutOutcome::Cut { .. } => state.draw_pilot_target(),
            CutOutcome::Miss => {
                state.phase = GamePhase::Ended;
                log::info!("game over at height {}", state.tower.height());
            }
        },
        _ => {}
    }

    if state.phase == GamePhase::Idle {
        return;
    }

    if state.phase == GamePhase::Running {
        // The core writes the sliding layer's position directly, mirrored
        // into both representations.
        if let Some(top) = state.tower.top() {
            if let Some(axis) = top.axis {
                let (visual_handle, physics_handle) = (top.visual, top.physics);
                let mut pos = physics.get_pose(physics_handle).position;
                let shifted = axis.component(pos) + state.speed;
                axis.set_component(&mut pos, shifted);
                physics.set_position(physics_handle, pos.x, pos.y, pos.z);
                visual.set_position(visual_handle, pos.x, pos.y, pos.z);
            }
        }
        state.camera.advance(state.tower.height(), state.speed);
    }

    // Fixed timestep, regardless of wall time. Runs after Ended too, so the
    // final collapse stays visible.
    physics.step(SIM_DT);

    // The single pose-sync point: free-falling pieces take their visual pose
    // from physics, nothing else does.
    for (visual_handle, physics_handle) in state.tower.free_bodies() {
        visual.set_pose(visual_handle, physics.get_pose(physics_handle));
    }

    visual.render();
    state.frames += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPAWN_OFFSET;
    use crate::services::{PhysicsWorld, SceneGraph};

    fn setup(seed: u64) -> (SceneGraph, PhysicsWorld, GameState) {
        let mut visual = SceneGraph::new();
        let mut physics = PhysicsWorld::new();
        let state = GameState::new(seed, 16.0 / 9.0, &mut visual, &mut physics);
        (visual, physics, state)
    }

    fn press() -> TickInput {
        TickInput {
            primary_action: true,
            idle_mode: false,
        }
    }

    #[test]
    fn test_idle_until_first_input() {
        let (mut visual, mut physics, mut state) = setup(1);

        tick(&mut state, &TickInput::default(), &mut visual, &mut physics);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.frames, 0);
        assert_eq!(visual.frames_rendered(), 0);

        tick(&mut state, &press(), &mut visual, &mut physics);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.frames, 1);
        assert_eq!(visual.frames_rendered(), 1);
    }

    #[test]
    fn test_slide_advances_both_representations() {
        let (mut visual, mut physics, mut state) = setup(1);
        tick(&mut state, &press(), &mut visual, &mut physics);

        for _ in 0..9 {
            tick(&mut state, &TickInput::default(), &mut visual, &mut physics);
        }

        let top = state.tower.top().unwrap();
        let body = physics.get_pose(top.physics).position;
        let node = visual.node(top.visual).position;
        assert_eq!(body, node);
        // 10 frames of 0.15 from the -10 spawn.
        assert!((body.x - (SPAWN_OFFSET + 10.0 * state.speed)).abs() < 1e-4);
    }

    #[test]
    fn test_primary_action_cuts_while_running() {
        let (mut visual, mut physics, mut state) = setup(1);
        tick(&mut state, &press(), &mut visual, &mut physics);

        // 60 frames in total: delta = -10 + 60 * 0.15 = -1.0.
        for _ in 0..59 {
            tick(&mut state, &TickInput::default(), &mut visual, &mut physics);
        }
        let delta = state.slide_delta(&physics).unwrap();
        assert!((delta - (-1.0)).abs() < 1e-4);

        tick(&mut state, &press(), &mut visual, &mut physics);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.tower.height(), 3);
        assert_eq!(state.tower.overhangs().len(), 1);

        // Kept slab recentered to the midpoint: -0.5.
        let cut_layer = &state.tower.stack()[1];
        assert!((physics.get_pose(cut_layer.physics).position.x - (-0.5)).abs() < 1e-4);
        assert!((cut_layer.width - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_miss_ends_game_but_loop_keeps_running() {
        let (mut visual, mut physics, mut state) = setup(1);
        tick(&mut state, &press(), &mut visual, &mut physics);

        // The top is still ~10 units out; cutting now is a guaranteed miss.
        tick(&mut state, &press(), &mut visual, &mut physics);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.tower.height(), 2);

        let top = state.tower.top().unwrap();
        let (top_visual, top_physics) = (top.visual, top.physics);
        let y_before = physics.get_pose(top_physics).position.y;
        let frames_before = state.frames;

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &mut visual, &mut physics);
        }

        // Still ended, still ticking; the dropped layer falls and its visual
        // pose tracks the physics body.
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.frames, frames_before + 30);
        let pose = physics.get_pose(top_physics);
        assert!(pose.position.y < y_before);
        assert_eq!(visual.node(top_visual).position, pose.position);
    }

    #[test]
    fn test_ended_ignores_further_input() {
        let (mut visual, mut physics, mut state) = setup(1);
        tick(&mut state, &press(), &mut visual, &mut physics);
        tick(&mut state, &press(), &mut visual, &mut physics);
        assert_eq!(state.phase, GamePhase::Ended);

        tick(&mut state, &press(), &mut visual, &mut physics);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.tower.height(), 2);
    }

    #[test]
    fn test_overhang_pose_syncs_from_physics() {
        let (mut visual, mut physics, mut state) = setup(1);
        tick(&mut state, &press(), &mut visual, &mut physics);
        for _ in 0..59 {
            tick(&mut state, &TickInput::default(), &mut visual, &mut physics);
        }
        tick(&mut state, &press(), &mut visual, &mut physics);
        assert_eq!(state.tower.overhangs().len(), 1);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), &mut visual, &mut physics);
        }

        let overhang = &state.tower.overhangs()[0];
        let pose = physics.get_pose(overhang.physics);
        assert!(pose.position.y < 1.0, "overhang should be falling");
        let node = visual.node(overhang.visual);
        assert_eq!(node.position, pose.position);
        assert_eq!(node.orientation, pose.orientation);
    }

    #[test]
    fn test_camera_rises_with_the_tower() {
        let (mut visual, mut physics, mut state) = setup(3);
        state.pilot.blunder_odds = 0;
        let start_height = state.camera.height;

        let input = TickInput {
            primary_action: false,
            idle_mode: true,
        };
        for _ in 0..2000 {
            tick(&mut state, &input, &mut visual, &mut physics);
        }

        assert!(state.tower.height() >= 6, "pilot should stack layers");
        assert!(state.camera.height > start_height);
        // Catch-up steps by `speed`, so it may land up to one step past.
        assert!(
            state.camera.height
                <= Camera::follow_target(state.tower.height()) + state.speed + 1e-4
        );
    }

    #[test]
    fn test_demo_pilot_is_deterministic() {
        let run = |seed: u64| {
            let (mut visual, mut physics, mut state) = setup(seed);
            let input = TickInput {
                primary_action: false,
                idle_mode: true,
            };
            for _ in 0..1500 {
                tick(&mut state, &input, &mut visual, &mut physics);
            }
            let top = state.tower.top().unwrap();
            (
                state.tower.height(),
                state.phase,
                physics.get_pose(top.physics).position,
            )
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_pilot_keeps_every_cut_inside_tolerance() {
        let (mut visual, mut physics, mut state) = setup(9);
        state.pilot.blunder_odds = 0;

        let input = TickInput {
            primary_action: false,
            idle_mode: true,
        };
        for _ in 0..3000 {
            tick(&mut state, &input, &mut visual, &mut physics);
            if state.phase == GamePhase::Ended {
                break;
            }
        }

        // With blunders off, every shed sliver is at most tolerance plus one
        // frame of travel.
        let max_shed = state.pilot.tolerance + state.speed + 1e-4;
        for (i, window) in state.tower.stack().windows(2).enumerate() {
            // Skip the still-sliding top layer.
            if i + 2 == state.tower.height() {
                break;
            }
            let (below, above) = (&window[0], &window[1]);
            let shrink_w = below.width - above.width;
            let shrink_d = below.depth - above.depth;
            assert!(
                shrink_w <= max_shed && shrink_d <= max_shed,
                "layer {} shed too much: {shrink_w} / {shrink_d}",
                i + 1
            );
        }
    }
}
