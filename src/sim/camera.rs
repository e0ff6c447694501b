//! Follow camera and orthographic viewport
//!
//! The camera rises with the tower, catching up by at most the slide speed
//! per frame so it never snaps. The viewport keeps a fixed world width; a
//! resize only changes the vertical extent via the new aspect ratio.

use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_OFFSET, LAYER_HEIGHT, VIEW_WIDTH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current follow height (world Y).
    pub height: f32,
    /// Orthographic half extents.
    pub half_width: f32,
    pub half_height: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            height: CAMERA_OFFSET,
            half_width: 0.0,
            half_height: 0.0,
        };
        camera.set_aspect(aspect);
        camera
    }

    /// Recompute the projection half extents for a new aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.half_width = VIEW_WIDTH / 2.0;
        self.half_height = (VIEW_WIDTH / aspect.max(f32::EPSILON)) / 2.0;
    }

    /// Height the camera wants to sit at for a tower of the given height.
    pub fn follow_target(stack_height: usize) -> f32 {
        LAYER_HEIGHT * stack_height.saturating_sub(2) as f32 + CAMERA_OFFSET
    }

    /// Rise toward the follow target by at most `speed`. Smooth catch-up,
    /// never an instantaneous snap.
    pub fn advance(&mut self, stack_height: usize, speed: f32) {
        if self.height < Self::follow_target(stack_height) {
            self.height += speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_sets_half_extents() {
        let camera = Camera::new(2.0);
        assert_eq!(camera.half_width, 5.0);
        assert_eq!(camera.half_height, 2.5);

        let mut camera = camera;
        camera.set_aspect(1.0);
        assert_eq!(camera.half_height, 5.0);
    }

    #[test]
    fn test_follow_target_tracks_stack() {
        assert_eq!(Camera::follow_target(2), CAMERA_OFFSET);
        assert_eq!(Camera::follow_target(5), 3.0 * LAYER_HEIGHT + CAMERA_OFFSET);
        // Saturates instead of underflowing for a bare foundation.
        assert_eq!(Camera::follow_target(0), CAMERA_OFFSET);
    }

    #[test]
    fn test_advance_catches_up_gradually() {
        let mut camera = Camera::new(16.0 / 9.0);
        let start = camera.height;

        camera.advance(10, 0.15);
        assert!((camera.height - (start + 0.15)).abs() < 1e-6);

        // At or above the target: stays put.
        camera.height = Camera::follow_target(2);
        camera.advance(2, 0.15);
        assert_eq!(camera.height, Camera::follow_target(2));
    }
}
