//! Screen-space facing from a world-space movement direction.

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use isoworld_procedural::Facing;

/// Facing for a movement delta in world tiles.
///
/// The delta is projected into the isometric view (y doubled, rotated by
/// 45 degrees) and the screen angle is bucketed into quarter turns.
/// Returns `None` for a zero delta, so callers keep the previous facing
/// while standing still.
#[must_use]
pub fn facing_from_delta(dx: f32, dy: f32) -> Option<Facing> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let iso_dx = dx;
    let iso_dy = 2.0 * dy;
    let rotated_x = (iso_dx + iso_dy) * FRAC_1_SQRT_2;
    let rotated_y = (iso_dy - iso_dx) * FRAC_1_SQRT_2;
    let angle = rotated_y.atan2(rotated_x);

    let facing = if (-FRAC_PI_4..FRAC_PI_4).contains(&angle) {
        Facing::Right
    } else if (FRAC_PI_4..3.0 * FRAC_PI_4).contains(&angle) {
        Facing::Down
    } else if (-3.0 * FRAC_PI_4..-FRAC_PI_4).contains(&angle) {
        Facing::Up
    } else {
        Facing::Left
    };
    Some(facing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_turns() {
        assert_eq!(facing_from_delta(1.0, 0.2), Some(Facing::Right));
        assert_eq!(facing_from_delta(-0.2, 1.0), Some(Facing::Down));
        assert_eq!(facing_from_delta(-1.0, -0.2), Some(Facing::Left));
        assert_eq!(facing_from_delta(0.2, -1.0), Some(Facing::Up));
    }

    #[test]
    fn test_standing_still_keeps_facing() {
        assert_eq!(facing_from_delta(0.0, 0.0), None);
    }

    #[test]
    fn test_scale_invariant() {
        for (dx, dy) in [(1.0, 0.2), (-0.2, 1.0), (-1.0, -0.2), (0.2, -1.0), (3.0, -2.0)] {
            assert_eq!(facing_from_delta(dx, dy), facing_from_delta(dx * 40.0, dy * 40.0));
        }
    }
}
