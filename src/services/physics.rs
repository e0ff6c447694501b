//! Minimal rigid-body world
//!
//! Just enough physics for the tower: static boxes hold still, dynamic boxes
//! free-fall under gravity with semi-implicit Euler integration. There is no
//! contact solver; nothing in the game needs two bodies to collide, the
//! detached pieces only have to fall convincingly.

use glam::{Quat, Vec3};

use super::{PhysicsHandle, PhysicsService, Pose};
use crate::consts::GRAVITY_Y;

/// One rigid box. `mass == 0.0` marks the body as static.
#[derive(Debug, Clone)]
struct Body {
    half_extents: Vec3,
    mass: f32,
    position: Vec3,
    orientation: Quat,
    velocity: Vec3,
}

/// A fixed-step physics world holding box bodies.
#[derive(Debug)]
pub struct PhysicsWorld {
    gravity: Vec3,
    bodies: Vec<Body>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, GRAVITY_Y, 0.0))
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Current half extents of a body's shape.
    pub fn half_extents(&self, handle: PhysicsHandle) -> Vec3 {
        self.bodies[handle.0 as usize].half_extents
    }

    /// Current mass of a body.
    pub fn mass(&self, handle: PhysicsHandle) -> f32 {
        self.bodies[handle.0 as usize].mass
    }

    fn body_mut(&mut self, handle: PhysicsHandle) -> &mut Body {
        &mut self.bodies[handle.0 as usize]
    }
}

impl PhysicsService for PhysicsWorld {
    fn create_body(&mut self, half_extents: Vec3, mass: f32) -> PhysicsHandle {
        let handle = PhysicsHandle(self.bodies.len() as u32);
        self.bodies.push(Body {
            half_extents,
            mass,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
        });
        handle
    }

    fn set_position(&mut self, handle: PhysicsHandle, x: f32, y: f32, z: f32) {
        self.body_mut(handle).position = Vec3::new(x, y, z);
    }

    fn get_pose(&self, handle: PhysicsHandle) -> Pose {
        let body = &self.bodies[handle.0 as usize];
        Pose {
            position: body.position,
            orientation: body.orientation,
        }
    }

    fn replace_shape(&mut self, handle: PhysicsHandle, half_extents: Vec3) {
        self.body_mut(handle).half_extents = half_extents;
    }

    fn set_mass(&mut self, handle: PhysicsHandle, mass: f32) {
        self.body_mut(handle).mass = mass;
    }

    fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            if body.mass == 0.0 {
                continue;
            }
            // Semi-implicit Euler: update velocity first, then position.
            body.velocity += self.gravity * dt;
            body.position += body.velocity * dt;
        }
    }
}
