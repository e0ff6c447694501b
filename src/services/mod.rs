//! Backend boundary for the game core
//!
//! The simulation never touches a renderer or physics engine directly; it
//! talks to the two traits here. The crate ships reference implementations
//! (`SceneGraph`, `PhysicsWorld`) that are enough to run the game headless,
//! and a GPU or engine-backed implementation can be swapped in without
//! touching `sim`.

pub mod physics;
pub mod visual;

pub use physics::PhysicsWorld;
pub use visual::{BoxNode, SceneGraph};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::sim::Axis;

/// Opaque reference to a visual object. Exclusively owned by the entity that
/// created it; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub(crate) u32);

/// Opaque reference to a physics body. Exclusively owned, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhysicsHandle(pub(crate) u32);

/// Position + orientation of a body, as reported by the physics backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    /// Upright pose at the given position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Retained-scene renderer contract.
///
/// Write-only from the core's point of view: positions are authoritative in
/// the physics representation, the visual side only receives them.
pub trait VisualService {
    /// Create a box of the given extents and RGB color, centered at origin.
    fn create_box(&mut self, width: f32, height: f32, depth: f32, color: [f32; 3]) -> VisualHandle;

    fn set_position(&mut self, handle: VisualHandle, x: f32, y: f32, z: f32);

    /// Scale the box along one horizontal axis, relative to its created
    /// extents. Used by the cut to shrink a layer in place.
    fn set_scale(&mut self, handle: VisualHandle, axis: Axis, factor: f32);

    /// Copy a full physics pose onto the visual object (free-falling pieces).
    fn set_pose(&mut self, handle: VisualHandle, pose: Pose);

    /// Draw the current scene state. Must not mutate anything the core can
    /// observe; calling it repeatedly without state changes is a no-op.
    fn render(&mut self);
}

/// Rigid-body backend contract.
///
/// Bodies with zero mass are static; everything else falls under gravity.
pub trait PhysicsService {
    /// Create a box body from half extents. `mass == 0.0` means static.
    fn create_body(&mut self, half_extents: Vec3, mass: f32) -> PhysicsHandle;

    fn set_position(&mut self, handle: PhysicsHandle, x: f32, y: f32, z: f32);

    fn get_pose(&self, handle: PhysicsHandle) -> Pose;

    /// Swap the body's collision shape for a new one. Backends are not
    /// required to support rescaling a shape in place, so the cut replaces
    /// the whole shape.
    fn replace_shape(&mut self, handle: PhysicsHandle, half_extents: Vec3);

    /// Change the body's mass. Setting a non-zero mass on a static body
    /// turns it into a falling one (the miss outcome needs this).
    fn set_mass(&mut self, handle: PhysicsHandle, mass: f32);

    /// Advance the simulation by a fixed timestep, in seconds.
    fn step(&mut self, dt: f32);
}
