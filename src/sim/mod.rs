//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Backends reached only through the service traits
//! - No rendering or platform dependencies

pub mod camera;
pub mod layer;
pub mod tick;
pub mod tower;

pub use camera::Camera;
pub use layer::{Axis, Layer, Overhang};
pub use tick::{GamePhase, GameState, PilotConfig, TickInput, tick};
pub use tower::{CutOutcome, Tower};
