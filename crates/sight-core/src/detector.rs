//! Single- and multi-target detection.

use crate::visibility::{is_visible, ray_reaches, within_field_of_view};
use crate::{DetectionConfig, Pose, QueryBuffers, SpaceVector, SpatialQuery};

/// Radius of the probe that finds a detectable volume enclosing the eye point.
///
/// Occlusion rays cast from inside a collider never report that collider, so
/// [`find_all`] uses this tiny overlap to recognise "standing inside" a target instead.
pub const ORIGIN_PROBE_RADIUS: f32 = 0.025;

/// Return the first visible candidate, or `None`.
///
/// Candidates are examined in the order the provider returns them and the scan stops at the
/// first one that passes the visibility test, so the result is *a* visible target, not
/// necessarily the nearest. Sort externally if nearest-first is required.
pub fn find_first<V, W>(world: &W, pose: &Pose<V>, config: &DetectionConfig<V>) -> Option<W::Handle>
where
    V: SpaceVector,
    W: SpatialQuery<V> + ?Sized,
{
    if config.range() <= 0.0 {
        return None;
    }

    let eye = pose.transform_point(config.origin_offset());
    let front = pose.transform_direction(config.front());

    let mut found = None;
    world.visit_overlaps(eye, config.range(), config.detectable(), &mut |candidate| {
        if is_visible(world, eye, front, candidate, config) {
            found = Some(candidate);
            false
        } else {
            true
        }
    });

    if let Some(target) = found {
        tracing::debug!(?target, "target acquired");
    }
    found
}

/// Collect every visible candidate into `buffers`, returning whether any was found.
///
/// Results are available through [`QueryBuffers::output`] in provider order. Nothing is
/// allocated as long as the output list has room for `buffers.capacity()` targets, which
/// [`QueryBuffers::with_capacity`] reserves. At most `buffers.capacity()` candidates are
/// examined; the rest of a larger range query is dropped.
///
/// A detectable volume enclosing the eye point is accepted without a ray (rays cast from
/// inside it can't hit it) as long as it passes the field-of-view check.
pub fn find_all<V, W>(
    world: &W,
    pose: &Pose<V>,
    config: &DetectionConfig<V>,
    buffers: &mut QueryBuffers<W::Handle>,
) -> bool
where
    V: SpaceVector,
    W: SpatialQuery<V> + ?Sized,
{
    let (raw, output) = buffers.split_mut();
    output.clear();

    if config.range() <= 0.0 || raw.is_empty() {
        return false;
    }

    let eye = pose.transform_point(config.origin_offset());
    let front = pose.transform_direction(config.front());
    let detectable = config.detectable();

    let inside_origin = if world.overlap_region_into(eye, ORIGIN_PROBE_RADIUS, detectable, raw) > 0
    {
        raw[0]
    } else {
        None
    };

    let count = world.overlap_region_into(eye, config.range(), detectable, raw);
    if count == raw.len() {
        tracing::debug!(
            capacity = raw.len(),
            "candidate buffer full; later candidates in range are not examined"
        );
    }

    for slot in &raw[..count] {
        let Some(candidate) = *slot else { continue };
        let (Some(position), Some(layer)) = (world.position(candidate), world.layer(candidate))
        else {
            continue;
        };

        let relative = position - eye;
        if !within_field_of_view(front, relative, config.field_of_view_degrees()) {
            continue;
        }

        if inside_origin == Some(candidate) && detectable.contains(layer) {
            output.push(candidate);
            continue;
        }

        if ray_reaches(world, eye, relative, candidate, config) {
            output.push(candidate);
        }
    }

    tracing::trace!(candidates = count, visible = output.len(), "find_all");
    !output.is_empty()
}

/// A config bundled with the buffers it scans into.
///
/// Convenient for hosts that keep one detector per agent and run it every frame.
#[derive(Debug, Clone)]
pub struct Detector<V: SpaceVector, H> {
    pub config: DetectionConfig<V>,
    buffers: QueryBuffers<H>,
}

impl<V: SpaceVector, H: Copy + Eq + core::fmt::Debug> Detector<V, H> {
    pub fn new(config: DetectionConfig<V>, capacity: usize) -> Self {
        Self {
            config,
            buffers: QueryBuffers::with_capacity(capacity),
        }
    }

    /// Run [`find_all`] and return the visible targets.
    pub fn scan<W>(&mut self, world: &W, pose: &Pose<V>) -> &[H]
    where
        W: SpatialQuery<V, Handle = H> + ?Sized,
    {
        find_all(world, pose, &self.config, &mut self.buffers);
        self.buffers.output()
    }

    /// Run [`find_first`].
    pub fn first<W>(&self, world: &W, pose: &Pose<V>) -> Option<H>
    where
        W: SpatialQuery<V, Handle = H> + ?Sized,
    {
        find_first(world, pose, &self.config)
    }

    /// Targets from the last [`Self::scan`].
    pub fn targets(&self) -> &[H] {
        self.buffers.output()
    }

    pub fn buffers(&self) -> &QueryBuffers<H> {
        &self.buffers
    }
}
