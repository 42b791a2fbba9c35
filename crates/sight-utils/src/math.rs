//! Rotation and vector helpers. Angles are radians unless the name says degrees.

use glam::{Quat, Vec2, Vec3};
use sight_core::SpaceVector;

/// Signed angle from `from` to `to` in the plane, counter-clockwise positive.
pub fn signed_angle_2d(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// Signed angle from `from` to `to`, positive when the turn is counter-clockwise looking down
/// `axis`. The magnitude is the full 3D angle between the vectors; the axis only picks the
/// sign, and a turn perpendicular to it counts as positive.
pub fn signed_angle_about_axis(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let cross = from.cross(to);
    let unsigned = cross.length().atan2(from.dot(to));
    if axis.dot(cross) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Rotation about +Z interpolated between the headings of `a` and `b`, both measured from
/// `reference` (usually `Vec2::Y` for "up" sprites or `Vec2::X` for "right" sprites).
pub fn slerp_2d(a: Vec2, b: Vec2, t: f32, reference: Vec2) -> Quat {
    let qa = Quat::from_rotation_z(signed_angle_2d(reference, a));
    let qb = Quat::from_rotation_z(signed_angle_2d(reference, b));
    qa.slerp(qb, t)
}

/// Rotation about `axis` interpolated between the headings of `a` and `b` relative to
/// `reference`. A zero axis yields the identity.
pub fn slerp_about_axis(a: Vec3, b: Vec3, t: f32, reference: Vec3, axis: Vec3) -> Quat {
    let Some(axis) = axis.try_normalize() else {
        return Quat::IDENTITY;
    };
    let qa = Quat::from_axis_angle(axis, signed_angle_about_axis(reference, a, axis));
    let qb = Quat::from_axis_angle(axis, signed_angle_about_axis(reference, b, axis));
    qa.slerp(qb, t)
}

pub fn vec3_xy(v: Vec2, z: f32) -> Vec3 {
    Vec3::new(v.x, v.y, z)
}

/// Lift a ground-plane vector into 3D: `v.y` becomes the Z axis.
pub fn vec3_xz(v: Vec2, y: f32) -> Vec3 {
    Vec3::new(v.x, y, v.y)
}

/// True when the angle between `a` and `b` is strictly below `degrees`.
pub fn angle_between_is_smaller<V: SpaceVector>(a: V, b: V, degrees: f32) -> bool {
    a.unsigned_angle_degrees(b) < degrees
}

/// Dot product two unit vectors have when `degrees` apart.
pub fn cos_degrees(degrees: f32) -> f32 {
    degrees.to_radians().cos()
}
