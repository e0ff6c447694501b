//! Retained scene graph
//!
//! Reference `VisualService` backend: a flat list of colored boxes with
//! position, orientation and per-axis scale. A renderer would walk
//! `nodes()` each frame; the headless binary and the tests read it directly.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::{Pose, VisualHandle, VisualService};
use crate::sim::Axis;

/// One box in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxNode {
    /// Extents at creation time (width, height, depth).
    pub size: Vec3,
    /// Per-axis scale applied on top of `size`.
    pub scale: Vec3,
    pub position: Vec3,
    pub orientation: Quat,
    /// RGB, 0..1.
    pub color: [f32; 3],
}

impl BoxNode {
    /// Extents after scaling.
    pub fn effective_size(&self) -> Vec3 {
        self.size * self.scale
    }
}

/// Retained scene of boxes.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<BoxNode>,
    frames_rendered: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[BoxNode] {
        &self.nodes
    }

    pub fn node(&self, handle: VisualHandle) -> &BoxNode {
        &self.nodes[handle.0 as usize]
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl VisualService for SceneGraph {
    fn create_box(&mut self, width: f32, height: f32, depth: f32, color: [f32; 3]) -> VisualHandle {
        let handle = VisualHandle(self.nodes.len() as u32);
        self.nodes.push(BoxNode {
            size: Vec3::new(width, height, depth),
            scale: Vec3::ONE,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            color,
        });
        handle
    }

    fn set_position(&mut self, handle: VisualHandle, x: f32, y: f32, z: f32) {
        self.nodes[handle.0 as usize].position = Vec3::new(x, y, z);
    }

    fn set_scale(&mut self, handle: VisualHandle, axis: Axis, factor: f32) {
        let node = &mut self.nodes[handle.0 as usize];
        match axis {
            Axis::X => node.scale.x = factor,
            Axis::Z => node.scale.z = factor,
        }
    }

    fn set_pose(&mut self, handle: VisualHandle, pose: Pose) {
        let node = &mut self.nodes[handle.0 as usize];
        node.position = pose.position;
        node.orientation = pose.orientation;
    }

    fn render(&mut self) {
        // Headless backend: a frame is just a snapshot point. Scene state is
        // untouched so repeated renders draw the same thing.
        self.frames_rendered += 1;
        log::trace!(
            "render frame {} ({} nodes)",
            self.frames_rendered,
            self.nodes.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_position_box() {
        let mut scene = SceneGraph::new();
        let handle = scene.create_box(3.0, 1.0, 3.0, [1.0, 0.5, 0.0]);
        scene.set_position(handle, 0.0, 2.0, -1.0);

        let node = scene.node(handle);
        assert_eq!(node.size, Vec3::new(3.0, 1.0, 3.0));
        assert_eq!(node.position, Vec3::new(0.0, 2.0, -1.0));
        assert_eq!(node.scale, Vec3::ONE);
    }

    #[test]
    fn test_scale_applies_to_one_axis() {
        let mut scene = SceneGraph::new();
        let handle = scene.create_box(3.0, 1.0, 3.0, [1.0, 0.0, 0.0]);
        scene.set_scale(handle, Axis::X, 2.0 / 3.0);

        let node = scene.node(handle);
        let size = node.effective_size();
        assert!((size.x - 2.0).abs() < 1e-6);
        assert_eq!(size.y, 1.0);
        assert_eq!(size.z, 3.0);
    }

    #[test]
    fn test_set_pose_copies_position_and_orientation() {
        let mut scene = SceneGraph::new();
        let handle = scene.create_box(1.0, 1.0, 1.0, [0.0, 0.0, 1.0]);

        let pose = Pose {
            position: Vec3::new(1.5, -3.0, 0.25),
            orientation: Quat::from_rotation_y(0.5),
        };
        scene.set_pose(handle, pose);

        let node = scene.node(handle);
        assert_eq!(node.position, pose.position);
        assert_eq!(node.orientation, pose.orientation);
    }

    #[test]
    fn test_render_leaves_scene_untouched() {
        let mut scene = SceneGraph::new();
        let handle = scene.create_box(3.0, 1.0, 3.0, [0.2, 0.4, 0.6]);
        scene.set_position(handle, 0.5, 1.0, 0.0);

        let before = scene.node(handle).clone();
        scene.render();
        scene.render();
        scene.render();

        let after = scene.node(handle);
        assert_eq!(before.position, after.position);
        assert_eq!(before.scale, after.scale);
        assert_eq!(before.size, after.size);
        assert_eq!(scene.frames_rendered(), 3);
    }
}
