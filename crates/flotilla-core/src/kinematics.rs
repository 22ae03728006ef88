use glam::{Quat, Vec3};
use rand::Rng;

/// Move `start` toward `end` by at most `max_delta`.
pub fn clamped_move(start: f32, end: f32, max_delta: f32) -> f32 {
    let delta = end - start;
    if delta > 0.0 {
        start + delta.min(max_delta)
    } else {
        start - (-delta).min(max_delta)
    }
}

/// Angle in radians between two vectors; zero if either has no length.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let (a, b) = (a.normalize_or_zero(), b.normalize_or_zero());
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Rotate `current` toward `desired` by at most `max_angle` radians.
///
/// The result's length moves from `|current|` toward `|desired|` by at most
/// `max_magnitude_delta`. A zero-length `current` has no heading to preserve,
/// so `desired` is returned unchanged.
pub fn rotate_towards(current: Vec3, desired: Vec3, max_angle: f32, max_magnitude_delta: f32) -> Vec3 {
    let current_len = current.length();
    let desired_len = desired.length();
    if current_len <= f32::EPSILON || desired_len <= f32::EPSILON {
        return desired;
    }

    let from = current / current_len;
    let to = desired / desired_len;
    let magnitude = clamped_move(current_len, desired_len, max_magnitude_delta);

    let cos = from.dot(to).clamp(-1.0, 1.0);
    if cos > 1.0 - f32::EPSILON {
        return to * magnitude;
    }

    let axis = from.cross(to);
    let axis = if axis.length_squared() > f32::EPSILON {
        axis.normalize()
    } else {
        // antiparallel: any perpendicular axis works
        from.any_orthonormal_vector()
    };
    let angle = cos.acos().min(max_angle.max(0.0));
    let rotated = Quat::from_axis_angle(axis, angle) * from;
    rotated.normalize_or_zero() * magnitude
}

/// Uniform sample from inside the unit sphere.
pub fn random_in_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}
