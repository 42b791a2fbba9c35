use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use glam::{Quat, Vec2, Vec3};

/// Vector type of a 2D or 3D detection space.
///
/// Methods are named so they don't shadow glam's inherent ones.
pub trait SpaceVector:
    Copy
    + Debug
    + PartialEq
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Orientation of a pose in this space.
    type Rotation: Copy + Debug + PartialEq;

    /// Number of axes.
    const DIM: usize;
    const ZERO: Self;
    const IDENTITY: Self::Rotation;
    /// Detector-local facing used when a config doesn't set one.
    const DEFAULT_FRONT: Self;

    fn rotate_by(self, rotation: Self::Rotation) -> Self;

    fn dot_product(self, rhs: Self) -> f32;

    /// Length of the cross product (`|a||b| sin θ`).
    fn cross_magnitude(self, rhs: Self) -> f32;

    fn axis(self, index: usize) -> f32;

    fn magnitude(self) -> f32;

    fn all_finite(self) -> bool;

    /// Unit vector, or zero when the length is zero or not finite.
    fn normalized_or_zero(self) -> Self;

    /// Per-axis clamp. Unlike glam's `clamp`, an inverted box doesn't panic.
    fn clamp_axes(self, min: Self, max: Self) -> Self;

    /// Unsigned angle in degrees, `atan2(|a × b|, a · b)`.
    ///
    /// A zero-length operand yields `0.0`.
    fn unsigned_angle_degrees(self, rhs: Self) -> f32 {
        self.cross_magnitude(rhs)
            .atan2(self.dot_product(rhs))
            .to_degrees()
    }
}

impl SpaceVector for Vec2 {
    /// Counter-clockwise rotation in radians.
    type Rotation = f32;

    const DIM: usize = 2;
    const ZERO: Self = Vec2::ZERO;
    const IDENTITY: f32 = 0.0;
    const DEFAULT_FRONT: Self = Vec2::X;

    fn rotate_by(self, rotation: f32) -> Self {
        Vec2::from_angle(rotation).rotate(self)
    }

    fn dot_product(self, rhs: Self) -> f32 {
        self.dot(rhs)
    }

    fn cross_magnitude(self, rhs: Self) -> f32 {
        self.perp_dot(rhs).abs()
    }

    fn magnitude(self) -> f32 {
        self.length()
    }

    fn all_finite(self) -> bool {
        self.is_finite()
    }

    fn normalized_or_zero(self) -> Self {
        self.normalize_or_zero()
    }

    fn clamp_axes(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    fn axis(self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => 0.0,
        }
    }
}

impl SpaceVector for Vec3 {
    type Rotation = Quat;

    const DIM: usize = 3;
    const ZERO: Self = Vec3::ZERO;
    const IDENTITY: Quat = Quat::IDENTITY;
    /// Bevy's `Transform::forward`.
    const DEFAULT_FRONT: Self = Vec3::NEG_Z;

    fn rotate_by(self, rotation: Quat) -> Self {
        rotation * self
    }

    fn dot_product(self, rhs: Self) -> f32 {
        self.dot(rhs)
    }

    fn cross_magnitude(self, rhs: Self) -> f32 {
        self.cross(rhs).length()
    }

    fn magnitude(self) -> f32 {
        self.length()
    }

    fn all_finite(self) -> bool {
        self.is_finite()
    }

    fn normalized_or_zero(self) -> Self {
        self.normalize_or_zero()
    }

    fn clamp_axes(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    fn axis(self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_angle_is_exactly_ninety_degrees() {
        assert_eq!(Vec3::X.unsigned_angle_degrees(Vec3::new(0.0, 5.0, 0.0)), 90.0);
        assert_eq!(Vec2::X.unsigned_angle_degrees(Vec2::new(0.0, -5.0)), 90.0);
    }

    #[test]
    fn diagonal_is_forty_five_degrees() {
        let angle = Vec3::X.unsigned_angle_degrees(Vec3::new(5.0, 5.0, 0.0));
        assert!((angle - 45.0).abs() < 1e-4);
    }

    #[test]
    fn zero_vector_has_zero_angle() {
        assert_eq!(Vec3::X.unsigned_angle_degrees(Vec3::ZERO), 0.0);
    }

    #[test]
    fn rotation_2d_is_counter_clockwise() {
        let v = Vec2::X.rotate_by(core::f32::consts::FRAC_PI_2);
        assert!((v - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn normalized_or_zero_handles_degenerate_input() {
        assert_eq!(Vec3::ZERO.normalized_or_zero(), Vec3::ZERO);
        assert_eq!(Vec2::new(f32::INFINITY, 0.0).normalized_or_zero(), Vec2::ZERO);
        assert!((Vec3::new(0.0, 3.0, 4.0).normalized_or_zero() - Vec3::new(0.0, 0.6, 0.8))
            .length()
            < 1e-6);
    }

    #[test]
    fn cross_magnitude_matches_sine() {
        assert!((Vec3::X.cross_magnitude(Vec3::new(2.0, 2.0, 0.0)) - 2.0).abs() < 1e-6);
        assert_eq!(Vec2::X.cross_magnitude(Vec2::new(0.0, -3.0)), 3.0);
    }

    #[test]
    fn clamp_axes_projects_onto_box() {
        let p = Vec3::new(3.0, -4.0, 0.5).clamp_axes(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(p, Vec3::new(1.0, -1.0, 0.5));
    }
}
