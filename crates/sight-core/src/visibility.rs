//! Per-candidate visibility primitives shared by both detectors.

use crate::{DetectionConfig, SpaceVector, SpatialQuery};

/// True when `relative` lies strictly inside the cone of total angle `field_of_view_degrees`
/// around `front`.
///
/// A candidate exactly on the cone edge is outside. A zero `relative` (candidate positioned
/// at the eye) counts as inside.
pub fn within_field_of_view<V: SpaceVector>(front: V, relative: V, field_of_view_degrees: f32) -> bool {
    front.unsigned_angle_degrees(relative) < field_of_view_degrees * 0.5
}

/// Decide whether `candidate` can be seen from `eye` looking along `front`.
///
/// The candidate must be detectable, inside the cone, and be the first thing an occlusion ray
/// from `eye` towards it hits (against `config.occluders()`, up to `config.range()`).
/// `front` is the world-space facing; `eye` the world-space ray origin.
pub fn is_visible<V, W>(
    world: &W,
    eye: V,
    front: V,
    candidate: W::Handle,
    config: &DetectionConfig<V>,
) -> bool
where
    V: SpaceVector,
    W: SpatialQuery<V> + ?Sized,
{
    match world.layer(candidate) {
        Some(layer) if config.detectable().contains(layer) => {}
        _ => return false,
    }
    let Some(position) = world.position(candidate) else {
        return false;
    };

    let relative = position - eye;
    if !within_field_of_view(front, relative, config.field_of_view_degrees()) {
        tracing::trace!(?candidate, "outside field of view");
        return false;
    }

    ray_reaches(world, eye, relative, candidate, config)
}

/// Occlusion ray test: the first hit along `direction` must be `candidate` itself.
pub(crate) fn ray_reaches<V, W>(
    world: &W,
    eye: V,
    direction: V,
    candidate: W::Handle,
    config: &DetectionConfig<V>,
) -> bool
where
    V: SpaceVector,
    W: SpatialQuery<V> + ?Sized,
{
    let Some(hit) = world.raycast_first_hit(eye, direction, config.range(), config.occluders())
    else {
        tracing::trace!(?candidate, "occlusion ray hit nothing");
        return false;
    };

    if hit.handle != candidate {
        tracing::trace!(?candidate, blocker = ?hit.handle, "occluded");
        return false;
    }

    world
        .layer(hit.handle)
        .is_some_and(|layer| config.detectable().contains(layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::presets::{AGENT, OBSTACLE};
    use crate::{Collider, Shape, SimpleWorld};
    use glam::Vec3;

    fn config() -> DetectionConfig<Vec3> {
        DetectionConfig::builder(10.0, 90.0)
            .detectable(AGENT)
            .occluders(AGENT.mask() | OBSTACLE)
            .front(Vec3::X)
            .build()
            .unwrap()
    }

    #[test]
    fn cone_edge_is_excluded() {
        assert!(!within_field_of_view(Vec3::X, Vec3::new(0.0, 5.0, 0.0), 180.0));
        assert!(within_field_of_view(Vec3::X, Vec3::new(0.1, 5.0, 0.0), 180.0));
    }

    #[test]
    fn full_circle_sees_behind() {
        assert!(within_field_of_view(Vec3::X, Vec3::new(-5.0, 0.1, 0.0), 360.0));
    }

    #[test]
    fn unobstructed_target_is_visible() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        let target = world.spawn(Collider::new(Vec3::new(5.0, 0.0, 0.0), Shape::ball(0.5), AGENT));
        assert!(is_visible(&world, Vec3::ZERO, Vec3::X, target, &config()));
    }

    #[test]
    fn target_behind_wall_is_hidden() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        let target = world.spawn(Collider::new(Vec3::new(5.0, 0.0, 0.0), Shape::ball(0.5), AGENT));
        world.spawn(Collider::new(
            Vec3::new(2.5, 0.0, 0.0),
            Shape::cuboid(Vec3::new(0.1, 2.0, 2.0)),
            OBSTACLE,
        ));
        assert!(!is_visible(&world, Vec3::ZERO, Vec3::X, target, &config()));
    }

    #[test]
    fn non_detectable_candidate_is_rejected() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        let wall = world.spawn(Collider::new(
            Vec3::new(5.0, 0.0, 0.0),
            Shape::ball(0.5),
            OBSTACLE,
        ));
        assert!(!is_visible(&world, Vec3::ZERO, Vec3::X, wall, &config()));
    }
}
