//! Value-over-lifetime interpolation and height-to-depth mapping

use glam::Vec4;

/// Linear interpolation between two RGBA colors
pub fn lerp_color(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a + (b - a) * t
}

/// Maps a height into [0, 1] depth space between `min_height` and `max_height`.
/// A degenerate range (`max_height <= min_height`) maps everything to 0.
pub fn compute_depth(height: f32, max_height: f32, min_height: f32) -> f32 {
    let range = max_height - min_height;
    if range <= 0.0 {
        return 0.0;
    }
    ((height - min_height) / range).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_color_endpoints_and_midpoint() {
        let white = Vec4::ONE;
        let black = Vec4::ZERO;
        assert_eq!(lerp_color(white, black, 0.0), white);
        assert_eq!(lerp_color(white, black, 1.0), black);
        let mid = lerp_color(white, black, 0.5);
        for c in mid.to_array() {
            assert!((c - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn depth_maps_and_clamps() {
        assert!((compute_depth(50.0, 100.0, 0.0) - 0.5).abs() < 1e-6);
        assert_eq!(compute_depth(-10.0, 100.0, 0.0), 0.0);
        assert_eq!(compute_depth(500.0, 100.0, 0.0), 1.0);
    }

    #[test]
    fn depth_with_empty_range_is_zero() {
        assert_eq!(compute_depth(5.0, 1.0, 1.0), 0.0);
        assert_eq!(compute_depth(5.0, 0.0, 1.0), 0.0);
    }
}
