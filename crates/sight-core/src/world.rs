//! In-memory reference world.
//!
//! [`SimpleWorld`] answers [`SpatialQuery`] over a flat list of balls and axis-aligned boxes.
//! It has no acceleration structure; it exists for tests, tools and small scenes, the way a
//! physics backend would be used in a game.

use core::fmt::Debug;

use crate::{Layer, LayerMask, RayHit, SpaceVector, SpatialQuery};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Collider volume, centered on the collider position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Shape<V> {
    /// Circle in 2D, sphere in 3D.
    Ball { radius: f32 },
    /// Axis-aligned rectangle/box.
    Cuboid { half_extents: V },
}

impl<V: SpaceVector> Shape<V> {
    pub fn ball(radius: f32) -> Self {
        Self::Ball { radius }
    }

    pub fn cuboid(half_extents: V) -> Self {
        Self::Cuboid { half_extents }
    }

    /// Closest point of the shape (placed at `center`) to `point`.
    fn closest_point(&self, center: V, point: V) -> V {
        match *self {
            Shape::Ball { radius } => {
                let delta = point - center;
                let dist = delta.magnitude();
                if dist <= radius {
                    point
                } else {
                    center + delta * (radius / dist)
                }
            }
            Shape::Cuboid { half_extents } => {
                point.clamp_axes(center - half_extents, center + half_extents)
            }
        }
    }

    /// Whether `point` lies strictly inside the shape.
    fn contains_strict(&self, center: V, point: V) -> bool {
        match *self {
            Shape::Ball { radius } => (point - center).magnitude() < radius,
            Shape::Cuboid { half_extents } => (0..V::DIM)
                .all(|i| (point.axis(i) - center.axis(i)).abs() < half_extents.axis(i)),
        }
    }

    /// Entry distance of a ray with unit `direction`, or `None` on a miss.
    ///
    /// Rays starting strictly inside the shape never report it.
    fn ray_entry(&self, center: V, origin: V, direction: V) -> Option<f32> {
        if self.contains_strict(center, origin) {
            return None;
        }
        match *self {
            Shape::Ball { radius } => {
                let m = origin - center;
                let b = m.dot_product(direction);
                let c = m.dot_product(m) - radius * radius;
                if c > 0.0 && b > 0.0 {
                    return None;
                }
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                Some((-b - discriminant.sqrt()).max(0.0))
            }
            Shape::Cuboid { half_extents } => {
                let min = center - half_extents;
                let max = center + half_extents;
                let mut t_enter = 0.0_f32;
                let mut t_exit = f32::INFINITY;
                for i in 0..V::DIM {
                    let o = origin.axis(i);
                    let d = direction.axis(i);
                    let (lo, hi) = (min.axis(i), max.axis(i));
                    if d.abs() <= f32::EPSILON {
                        if o < lo || o > hi {
                            return None;
                        }
                        continue;
                    }
                    let inv = 1.0 / d;
                    let (t0, t1) = {
                        let a = (lo - o) * inv;
                        let b = (hi - o) * inv;
                        if a <= b {
                            (a, b)
                        } else {
                            (b, a)
                        }
                    };
                    t_enter = t_enter.max(t0);
                    t_exit = t_exit.min(t1);
                    if t_enter > t_exit {
                        return None;
                    }
                }
                Some(t_enter)
            }
        }
    }
}

/// A volume placed in the world with a classification layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Collider<V> {
    pub position: V,
    pub shape: Shape<V>,
    pub layer: Layer,
}

impl<V: SpaceVector> Collider<V> {
    pub fn new(position: V, shape: Shape<V>, layer: Layer) -> Self {
        Self {
            position,
            shape,
            layer,
        }
    }

    /// Whether the collider volume intersects the ball of `radius` around `center`.
    pub fn intersects_ball(&self, center: V, radius: f32) -> bool {
        let closest = self.shape.closest_point(self.position, center);
        (closest - center).magnitude() <= radius
    }

    /// Distance along the unit `direction` at which a ray from `origin` enters the collider.
    pub fn ray_entry(&self, origin: V, direction: V) -> Option<f32> {
        self.shape.ray_entry(self.position, origin, direction)
    }
}

/// Auto-assigned key handed out by [`SimpleWorld::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColliderId(pub u32);

/// Flat collection of colliders keyed by `K`.
///
/// Queries visit colliders in insertion order. Re-inserting an existing key replaces the
/// collider in place and keeps its order.
#[derive(Debug, Clone)]
pub struct SimpleWorld<V, K = ColliderId> {
    bodies: Vec<(K, Collider<V>)>,
    next_id: u32,
}

impl<V, K> Default for SimpleWorld<V, K> {
    fn default() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 0,
        }
    }
}

impl<V: SpaceVector, K: Copy + Eq + Debug> SimpleWorld<V, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, collider: Collider<V>) {
        if let Some(slot) = self.bodies.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = collider;
        } else {
            self.bodies.push((key, collider));
        }
    }

    /// Replace every collider with `bodies`, keeping the allocation. Keys are assumed
    /// unique; duplicates are not merged.
    pub fn rebuild(&mut self, bodies: impl IntoIterator<Item = (K, Collider<V>)>) {
        self.bodies.clear();
        self.bodies.extend(bodies);
    }

    pub fn remove(&mut self, key: K) -> Option<Collider<V>> {
        let idx = self.bodies.iter().position(|(k, _)| *k == key)?;
        Some(self.bodies.remove(idx).1)
    }

    pub fn get(&self, key: K) -> Option<&Collider<V>> {
        self.bodies.iter().find(|(k, _)| *k == key).map(|(_, c)| c)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut Collider<V>> {
        self.bodies
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &Collider<V>)> + '_ {
        self.bodies.iter().map(|(k, c)| (*k, c))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}

impl<V: SpaceVector> SimpleWorld<V, ColliderId> {
    pub fn spawn(&mut self, collider: Collider<V>) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.bodies.push((id, collider));
        id
    }
}

impl<V: SpaceVector, K: Copy + Eq + Debug> SpatialQuery<V> for SimpleWorld<V, K> {
    type Handle = K;

    fn visit_overlaps(
        &self,
        center: V,
        radius: f32,
        mask: LayerMask,
        visitor: &mut dyn FnMut(K) -> bool,
    ) {
        for (key, collider) in &self.bodies {
            if !mask.contains(collider.layer) || !collider.intersects_ball(center, radius) {
                continue;
            }
            if !visitor(*key) {
                return;
            }
        }
    }

    fn raycast_first_hit(
        &self,
        origin: V,
        direction: V,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit<V, K>> {
        let direction = direction.normalized_or_zero();
        if direction == V::ZERO {
            return None;
        }

        let mut best: Option<(K, f32)> = None;
        for (key, collider) in &self.bodies {
            if !mask.contains(collider.layer) {
                continue;
            }
            let Some(t) = collider.ray_entry(origin, direction) else {
                continue;
            };
            if t > max_distance {
                continue;
            }
            // Strict comparison keeps the earliest-inserted collider on ties.
            if best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((*key, t));
            }
        }

        best.map(|(handle, distance)| RayHit {
            handle,
            point: origin + direction * distance,
            distance,
        })
    }

    fn position(&self, handle: K) -> Option<V> {
        self.get(handle).map(|c| c.position)
    }

    fn layer(&self, handle: K) -> Option<Layer> {
        self.get(handle).map(|c| c.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::presets::{AGENT, OBSTACLE, ZONE};
    use glam::{Vec2, Vec3};

    #[test]
    fn overlap_visits_in_insertion_order() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        let far = world.spawn(Collider::new(Vec3::new(4.0, 0.0, 0.0), Shape::ball(0.5), AGENT));
        let near = world.spawn(Collider::new(Vec3::new(1.0, 0.0, 0.0), Shape::ball(0.5), AGENT));
        world.spawn(Collider::new(Vec3::new(20.0, 0.0, 0.0), Shape::ball(0.5), AGENT));
        world.spawn(Collider::new(Vec3::new(2.0, 0.0, 0.0), Shape::ball(0.5), OBSTACLE));

        let hits = world.overlap_region(Vec3::ZERO, 5.0, AGENT.mask());
        assert_eq!(hits, vec![far, near]);
    }

    #[test]
    fn overlap_counts_volume_not_center() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        let big = world.spawn(Collider::new(
            Vec3::new(6.0, 0.0, 0.0),
            Shape::cuboid(Vec3::splat(2.0)),
            ZONE,
        ));
        assert_eq!(world.overlap_region(Vec3::ZERO, 4.5, ZONE.mask()), vec![big]);
        assert!(world.overlap_region(Vec3::ZERO, 3.5, ZONE.mask()).is_empty());
    }

    #[test]
    fn overlap_into_truncates_to_slice() {
        let mut world: SimpleWorld<Vec2> = SimpleWorld::new();
        for i in 0..5 {
            world.spawn(Collider::new(Vec2::new(i as f32, 0.0), Shape::ball(0.25), AGENT));
        }
        let mut out = [None; 3];
        let n = world.overlap_region_into(Vec2::ZERO, 10.0, LayerMask::ALL, &mut out);
        assert_eq!(n, 3);
        assert_eq!(out, [Some(ColliderId(0)), Some(ColliderId(1)), Some(ColliderId(2))]);
    }

    #[test]
    fn raycast_returns_nearest_entry() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        let far = world.spawn(Collider::new(Vec3::new(8.0, 0.0, 0.0), Shape::ball(1.0), AGENT));
        let wall = world.spawn(Collider::new(
            Vec3::new(3.0, 0.0, 0.0),
            Shape::cuboid(Vec3::new(0.5, 1.0, 1.0)),
            OBSTACLE,
        ));

        let hit = world
            .raycast_first_hit(Vec3::ZERO, Vec3::X * 3.0, 20.0, LayerMask::ALL)
            .expect("hit");
        assert_eq!(hit.handle, wall);
        assert!((hit.distance - 2.5).abs() < 1e-5);
        assert!((hit.point - Vec3::new(2.5, 0.0, 0.0)).length() < 1e-5);

        let hit = world
            .raycast_first_hit(Vec3::ZERO, Vec3::X, 20.0, AGENT.mask())
            .expect("hit");
        assert_eq!(hit.handle, far);
        assert!((hit.distance - 7.0).abs() < 1e-5);
    }

    #[test]
    fn raycast_respects_max_distance() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        world.spawn(Collider::new(Vec3::new(8.0, 0.0, 0.0), Shape::ball(1.0), AGENT));
        assert!(world
            .raycast_first_hit(Vec3::ZERO, Vec3::X, 6.5, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn raycast_from_inside_skips_enclosing_shape() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        world.spawn(Collider::new(Vec3::ZERO, Shape::cuboid(Vec3::ONE), ZONE));
        let outside = world.spawn(Collider::new(Vec3::new(5.0, 0.0, 0.0), Shape::ball(0.5), AGENT));

        let hit = world
            .raycast_first_hit(Vec3::ZERO, Vec3::X, 10.0, LayerMask::ALL)
            .expect("hit");
        assert_eq!(hit.handle, outside);
        assert!(world
            .raycast_first_hit(Vec3::ZERO, Vec3::NEG_X, 10.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn zero_direction_never_hits() {
        let mut world: SimpleWorld<Vec3> = SimpleWorld::new();
        world.spawn(Collider::new(Vec3::X, Shape::ball(0.5), AGENT));
        assert!(world
            .raycast_first_hit(Vec3::ZERO, Vec3::ZERO, 10.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut world = SimpleWorld::<Vec2, &'static str>::new();
        world.insert("a", Collider::new(Vec2::ZERO, Shape::ball(1.0), AGENT));
        world.insert("b", Collider::new(Vec2::X, Shape::ball(1.0), AGENT));
        world.insert("a", Collider::new(Vec2::Y, Shape::ball(1.0), ZONE));
        let keys: Vec<_> = world.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(world.layer("a"), Some(ZONE));
        assert_eq!(world.remove("b").map(|c| c.position), Some(Vec2::X));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn rebuild_replaces_contents_in_given_order() {
        let mut world = SimpleWorld::<Vec2, u8>::new();
        world.insert(9, Collider::new(Vec2::ZERO, Shape::ball(1.0), AGENT));
        world.rebuild([
            (2, Collider::new(Vec2::X, Shape::ball(1.0), AGENT)),
            (1, Collider::new(Vec2::Y, Shape::ball(1.0), ZONE)),
        ]);
        let keys: Vec<_> = world.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![2, 1]);
        assert!(world.get(9).is_none());
    }
}
