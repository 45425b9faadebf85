// Math utilities and helper functions

use glam::Vec2;

/// Minimum alignment for [`direction_test`] to count a hit as coming from a direction
pub const DIRECTION_TEST_THRESHOLD: f32 = 0.25;

/// Clamp a value between min and max.
///
/// Unlike `f32::clamp` this never panics: when the range is inverted
/// (min > max) the midpoint of the two bounds is returned.
pub fn clamp_or_center(value: f32, min: f32, max: f32) -> f32 {
    if min > max {
        (min + max) * 0.5
    } else if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Check whether `other` lies in `direction` as seen from `origin`.
///
/// Coincident points never pass the test.
pub fn direction_test(origin: Vec2, other: Vec2, direction: Vec2) -> bool {
    let offset = other - origin;
    match offset.try_normalize() {
        Some(towards) => towards.dot(direction) > DIRECTION_TEST_THRESHOLD,
        None => false,
    }
}
