//! Tower slab entities
//!
//! A `Layer` is one slab of the tower, represented twice: once in the visual
//! scene and once as a physics body. The layer's `width`/`depth` fields are
//! the authoritative extents; the backends are told about changes, never
//! asked.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::LAYER_HEIGHT;
use crate::services::{PhysicsHandle, VisualHandle};

/// Horizontal axis a layer slides along (and gets cut along).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// The other horizontal axis. Successive layers alternate, which is what
    /// produces the zig-zag tower silhouette.
    pub fn flipped(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// This axis's component of a vector.
    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }

    /// Overwrite this axis's component of a vector.
    #[inline]
    pub fn set_component(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Z => v.z = value,
        }
    }
}

/// One slab of the tower.
///
/// The foundation has no `axis`; every layer stacked on top slides along one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub axis: Option<Axis>,
    /// Authoritative extent along X. Shrinks on a successful cut.
    pub width: f32,
    /// Authoritative extent along Z. Shrinks on a successful cut.
    pub depth: f32,
    pub visual: VisualHandle,
    pub physics: PhysicsHandle,
    /// Set when a miss drops this layer; it then free-falls and joins the
    /// per-frame pose sync.
    pub falling: bool,
}

impl Layer {
    /// Extent along the slide axis (the dimension a cut shortens).
    pub fn slide_extent(&self) -> f32 {
        match self.axis {
            Some(Axis::X) | None => self.width,
            Some(Axis::Z) => self.depth,
        }
    }

    /// Half extents for the physics shape.
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width / 2.0, LAYER_HEIGHT / 2.0, self.depth / 2.0)
    }
}

/// A detached sliver of a cut layer. Free-falls from the moment it is
/// created and is never cut again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overhang {
    pub visual: VisualHandle,
    pub physics: PhysicsHandle,
}
