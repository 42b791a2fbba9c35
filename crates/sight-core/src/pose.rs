use crate::SpaceVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and orientation of a detecting agent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "V: Serialize, V::Rotation: Serialize",
        deserialize = "V: Deserialize<'de>, V::Rotation: Deserialize<'de>"
    ))
)]
pub struct Pose<V: SpaceVector> {
    pub position: V,
    pub rotation: V::Rotation,
}

impl<V: SpaceVector> Pose<V> {
    pub fn new(position: V, rotation: V::Rotation) -> Self {
        Self { position, rotation }
    }

    /// Unrotated pose at `position`.
    pub fn at(position: V) -> Self {
        Self::new(position, V::IDENTITY)
    }

    pub fn with_rotation(mut self, rotation: V::Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// World-space point `offset` (detector-local) away from the pose origin.
    pub fn transform_point(&self, offset: V) -> V {
        self.position + offset.rotate_by(self.rotation)
    }

    /// World-space direction of the detector-local `direction`.
    pub fn transform_direction(&self, direction: V) -> V {
        direction.rotate_by(self.rotation)
    }
}

impl<V: SpaceVector> Default for Pose<V> {
    fn default() -> Self {
        Self::at(V::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn eye_offset_follows_rotation() {
        let pose = Pose::new(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_y(core::f32::consts::FRAC_PI_2),
        );
        // +Z rotated a quarter turn about Y points along +X.
        let eye = pose.transform_point(Vec3::new(0.0, 0.0, 2.0));
        assert!((eye - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }
}
