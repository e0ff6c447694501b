//! Stack Tower - a stack-and-cut arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tower stack, cutting algorithm, game loop)
//! - `services`: Visual/physics backend traits plus headless reference backends
//! - `settings`: Data-driven tunables

pub mod services;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Slide speed of the top layer, world units per frame at 60 Hz
    pub const SLIDE_SPEED: f32 = 0.15;

    /// Vertical extent of every layer
    pub const LAYER_HEIGHT: f32 = 1.0;
    /// Width and depth of the foundation and first layer
    pub const BASE_SIZE: f32 = 3.0;
    /// Off-stage coordinate new layers slide in from (one full lateral
    /// travel width before the tower)
    pub const SPAWN_OFFSET: f32 = -10.0;

    /// Gravity along Y for free-falling pieces
    pub const GRAVITY_Y: f32 = -10.0;
    /// Mass of shed overhangs and the dropped top layer after a miss
    pub const OVERHANG_MASS: f32 = 5.0;

    /// Fixed horizontal extent of the orthographic view
    pub const VIEW_WIDTH: f32 = 10.0;
    /// Camera rest height above the second-to-top layer
    pub const CAMERA_OFFSET: f32 = 4.0;
}

/// Convert HSL (hue in degrees, saturation/lightness in 0..1) to RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m]
}

/// Color for the layer at the given stack height: a hue ramp starting in
/// orange, stepping 4 degrees per layer.
pub fn layer_color(level: usize) -> [f32; 3] {
    hsl_to_rgb(30.0 + level as f32 * 4.0, 1.0, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1] < 1e-5 && red[2] < 1e-5);

        let green = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(green[0] < 1e-5 && (green[1] - 1.0).abs() < 1e-5 && green[2] < 1e-5);

        let white = hsl_to_rgb(200.0, 0.0, 1.0);
        assert!(white.iter().all(|&v| (v - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_layer_colors_stay_in_range() {
        for level in 0..200 {
            let color = layer_color(level);
            assert!(color.iter().all(|&v| (0.0..=1.0).contains(&v)), "level {level}");
        }
    }
}
