use core::fmt::Debug;

use crate::{Layer, LayerMask, SpaceVector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First object hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RayHit<V, H> {
    pub handle: H,
    pub point: V,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Spatial world queries the detectors are built on.
///
/// Implemented by physics backends (see `sight-bevy`) and by the in-memory
/// [`crate::SimpleWorld`]. Providers report objects in their own iteration order; detectors
/// preserve that order and never sort.
pub trait SpatialQuery<V: SpaceVector> {
    /// Identifies one object for the duration of a query.
    type Handle: Copy + Eq + Debug;

    /// Call `visitor` for every object whose volume intersects the region (circle in 2D,
    /// sphere in 3D) and whose layer is in `mask`. Stop as soon as `visitor` returns `false`.
    fn visit_overlaps(
        &self,
        center: V,
        radius: f32,
        mask: LayerMask,
        visitor: &mut dyn FnMut(Self::Handle) -> bool,
    );

    /// First object along the ray whose layer is in `mask`, within `max_distance`.
    ///
    /// `direction` need not be normalized; a zero direction returns `None`.
    fn raycast_first_hit(
        &self,
        origin: V,
        direction: V,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit<V, Self::Handle>>;

    /// Reference position of an object. `None` when the handle no longer resolves.
    fn position(&self, handle: Self::Handle) -> Option<V>;

    /// Classification of an object. `None` when the handle no longer resolves.
    fn layer(&self, handle: Self::Handle) -> Option<Layer>;

    /// Allocating overlap query.
    fn overlap_region(&self, center: V, radius: f32, mask: LayerMask) -> Vec<Self::Handle> {
        let mut out = Vec::new();
        self.visit_overlaps(center, radius, mask, &mut |handle| {
            out.push(handle);
            true
        });
        out
    }

    /// Non-allocating overlap query.
    ///
    /// Writes at most `out.len()` handles from the front of `out` and returns how many were
    /// written. Extra results are dropped. Slots past the returned count are left untouched.
    fn overlap_region_into(
        &self,
        center: V,
        radius: f32,
        mask: LayerMask,
        out: &mut [Option<Self::Handle>],
    ) -> usize {
        let capacity = out.len();
        if capacity == 0 {
            return 0;
        }
        let mut count = 0;
        self.visit_overlaps(center, radius, mask, &mut |handle| {
            out[count] = Some(handle);
            count += 1;
            count < capacity
        });
        count
    }
}

impl<V: SpaceVector, W: SpatialQuery<V> + ?Sized> SpatialQuery<V> for &W {
    type Handle = W::Handle;

    fn visit_overlaps(
        &self,
        center: V,
        radius: f32,
        mask: LayerMask,
        visitor: &mut dyn FnMut(Self::Handle) -> bool,
    ) {
        (**self).visit_overlaps(center, radius, mask, visitor)
    }

    fn raycast_first_hit(
        &self,
        origin: V,
        direction: V,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit<V, Self::Handle>> {
        (**self).raycast_first_hit(origin, direction, max_distance, mask)
    }

    fn position(&self, handle: Self::Handle) -> Option<V> {
        (**self).position(handle)
    }

    fn layer(&self, handle: Self::Handle) -> Option<Layer> {
        (**self).layer(handle)
    }
}
