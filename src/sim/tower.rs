//! Tower stack and the layer-cutting algorithm
//!
//! The tower owns every layer and detached overhang, and with them the only
//! non-trivial piece of the game: cutting the sliding top layer down to its
//! overlap with the layer below, in both the visual and the physics
//! representation at once.

use glam::Vec3;

use super::layer::{Axis, Layer, Overhang};
use crate::consts::{LAYER_HEIGHT, OVERHANG_MASS, SPAWN_OFFSET};
use crate::layer_color;
use crate::services::{PhysicsHandle, PhysicsService, VisualHandle, VisualService};

/// Result of a cut decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutOutcome {
    /// The top layer overlapped the one below; it was trimmed, an overhang
    /// was shed, and the next layer spawned.
    Cut {
        axis: Axis,
        overlap: f32,
        overhang_size: f32,
    },
    /// No overlap. The top layer is released to fall; the game is over.
    Miss,
}

/// The growing stack plus everything that has fallen off it.
#[derive(Debug, Default)]
pub struct Tower {
    /// Append-only; index 0 is the immutable foundation.
    stack: Vec<Layer>,
    overhangs: Vec<Overhang>,
}

impl Tower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Foundation plus the first sliding layer, approaching from off-stage.
    /// After this the top two stack entries always exist, which is what the
    /// cut decision relies on.
    pub fn spawn_base(
        &mut self,
        visual: &mut dyn VisualService,
        physics: &mut dyn PhysicsService,
        base_size: f32,
    ) {
        self.add_layer(visual, physics, 0.0, 0.0, base_size, base_size, None);
        self.add_layer(
            visual,
            physics,
            SPAWN_OFFSET,
            0.0,
            base_size,
            base_size,
            Some(Axis::X),
        );
    }

    pub fn height(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[Layer] {
        &self.stack
    }

    pub fn overhangs(&self) -> &[Overhang] {
        &self.overhangs
    }

    pub fn top(&self) -> Option<&Layer> {
        self.stack.last()
    }

    /// Every body the physics backend owns the pose of: shed overhangs, plus
    /// the dropped top layer after a miss. These get their visual pose copied
    /// from physics once per frame.
    pub fn free_bodies(&self) -> impl Iterator<Item = (VisualHandle, PhysicsHandle)> + '_ {
        self.overhangs
            .iter()
            .map(|o| (o.visual, o.physics))
            .chain(
                self.stack
                    .iter()
                    .filter(|l| l.falling)
                    .map(|l| (l.visual, l.physics)),
            )
    }

    /// Register a new layer with both backends and append it to the stack.
    /// Geometry is always valid by the time this is called; it cannot fail.
    pub fn add_layer(
        &mut self,
        visual: &mut dyn VisualService,
        physics: &mut dyn PhysicsService,
        x: f32,
        z: f32,
        width: f32,
        depth: f32,
        axis: Option<Axis>,
    ) {
        let y = LAYER_HEIGHT * self.stack.len() as f32;
        let color = layer_color(self.stack.len());

        let visual_handle = visual.create_box(width, LAYER_HEIGHT, depth, color);
        visual.set_position(visual_handle, x, y, z);

        // Stacked layers are static; only shed pieces get mass.
        let physics_handle =
            physics.create_body(Vec3::new(width / 2.0, LAYER_HEIGHT / 2.0, depth / 2.0), 0.0);
        physics.set_position(physics_handle, x, y, z);

        self.stack.push(Layer {
            axis,
            width,
            depth,
            visual: visual_handle,
            physics: physics_handle,
            falling: false,
        });
    }

    /// Spawn a free-falling sliver at the height of the current top layer.
    fn add_overhang(
        &mut self,
        visual: &mut dyn VisualService,
        physics: &mut dyn PhysicsService,
        x: f32,
        z: f32,
        width: f32,
        depth: f32,
    ) {
        let y = LAYER_HEIGHT * (self.stack.len() - 1) as f32;
        let color = layer_color(self.stack.len());

        let visual_handle = visual.create_box(width, LAYER_HEIGHT, depth, color);
        visual.set_position(visual_handle, x, y, z);

        let physics_handle = physics.create_body(
            Vec3::new(width / 2.0, LAYER_HEIGHT / 2.0, depth / 2.0),
            OVERHANG_MASS,
        );
        physics.set_position(physics_handle, x, y, z);

        self.overhangs.push(Overhang {
            visual: visual_handle,
            physics: physics_handle,
        });
    }

    /// Cut the sliding top layer against the layer below.
    ///
    /// On success the top is trimmed to the overlap and recentered to the
    /// midpoint of the two original edges, the sliver becomes an overhang,
    /// and the next layer spawns with the slide axis flipped. On a miss the
    /// top is released to fall and nothing is spawned.
    pub fn cut(
        &mut self,
        visual: &mut dyn VisualService,
        physics: &mut dyn PhysicsService,
    ) -> CutOutcome {
        let len = self.stack.len();
        if len < 2 {
            log::warn!("cut invoked without a sliding layer");
            return CutOutcome::Miss;
        }

        let prev_pos = physics.get_pose(self.stack[len - 2].physics).position;
        let (axis, top_visual, top_physics, top_width, top_depth) = {
            let top = &self.stack[len - 1];
            let Some(axis) = top.axis else {
                log::warn!("top layer has no slide axis");
                return CutOutcome::Miss;
            };
            (axis, top.visual, top.physics, top.width, top.depth)
        };

        let top_pos = physics.get_pose(top_physics).position;
        let delta = axis.component(top_pos) - axis.component(prev_pos);
        let overhang_size = delta.abs();
        let size = match axis {
            Axis::X => top_width,
            Axis::Z => top_depth,
        };
        let overlap = size - overhang_size;

        if size <= 0.0 || overlap <= 0.0 {
            // No valid placement. Release the top so the physics backend
            // lets it fall with the overhangs.
            physics.set_mass(top_physics, OVERHANG_MASS);
            self.stack[len - 1].falling = true;
            log::info!(
                "miss at height {len}: extent {size:.2}, overshoot {overhang_size:.2}"
            );
            return CutOutcome::Miss;
        }

        let new_width = if axis == Axis::X { overlap } else { top_width };
        let new_depth = if axis == Axis::Z { overlap } else { top_depth };

        // Shrink the kept slab and recenter it to the midpoint between the
        // two original edges, identically in both representations.
        visual.set_scale(top_visual, axis, overlap / size);
        let mut center = top_pos;
        axis.set_component(&mut center, axis.component(top_pos) - delta / 2.0);
        visual.set_position(top_visual, center.x, center.y, center.z);
        physics.set_position(top_physics, center.x, center.y, center.z);

        // The physics backend cannot rescale a shape in place.
        physics.replace_shape(
            top_physics,
            Vec3::new(new_width / 2.0, LAYER_HEIGHT / 2.0, new_depth / 2.0),
        );
        {
            let top = &mut self.stack[len - 1];
            top.width = new_width;
            top.depth = new_depth;
        }

        // The sliver sits just past the kept edge, in the overshoot direction.
        let shift = (overlap / 2.0 + overhang_size / 2.0) * sign(delta);
        let mut overhang_pos = center;
        axis.set_component(&mut overhang_pos, axis.component(center) + shift);
        let (overhang_width, overhang_depth) = match axis {
            Axis::X => (overhang_size, new_depth),
            Axis::Z => (new_width, overhang_size),
        };
        self.add_overhang(
            visual,
            physics,
            overhang_pos.x,
            overhang_pos.z,
            overhang_width,
            overhang_depth,
        );

        // Next layer: aligned under the cut on this axis, off-stage on the
        // flipped one so it slides back into alignment.
        let (next_x, next_z) = match axis {
            Axis::X => (center.x, SPAWN_OFFSET),
            Axis::Z => (SPAWN_OFFSET, center.z),
        };
        self.add_layer(
            visual,
            physics,
            next_x,
            next_z,
            new_width,
            new_depth,
            Some(axis.flipped()),
        );

        log::info!(
            "cut at height {len}: axis {axis:?}, overlap {overlap:.2}, shed {overhang_size:.2}"
        );
        CutOutcome::Cut {
            axis,
            overlap,
            overhang_size,
        }
    }
}

/// `f32::signum` maps 0.0 to 1.0; the overhang shift needs a true zero for a
/// perfect cut.
#[inline]
fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
