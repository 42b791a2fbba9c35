//! Bevy adapter for `sight-core`.
//!
//! Entities with a [`SightBody`] are mirrored into the [`SightWorld`] resource every frame, and
//! every [`SightDetector`] scans it with [`sight_core::find_all`], writing what it sees into its
//! [`DetectedTargets`].
//!
//! ## Scheduling
//!
//! Systems run in [`bevy_app::Update`] by default. Use [`SightPlugin::in_fixed_update`] to run
//! them with the simulation step instead (this needs Bevy's time plugin to drive the loop).
//!
//! ## Features
//!
//! - `physics`: [`physics::RapierSightPlugin`] scans Rapier colliders directly instead of
//!   `SightBody` components.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

use bevy_app::{App, FixedUpdate, Plugin, Update};
use bevy_ecs::prelude::{Component, Entity, Query, Res, ResMut, Resource, SystemSet};
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_transform::components::{GlobalTransform, Transform};
use sight_core::{
    Collider, DetectionConfig, Detector, Layer, LayerMask, Pose, RayHit, Shape, SimpleWorld,
    SpatialQuery, Vec3,
};

#[cfg(feature = "physics")]
#[cfg_attr(docsrs, doc(cfg(feature = "physics")))]
pub mod physics;

/// Candidate capacity used by [`SightDetector::new`].
pub const DEFAULT_TARGET_CAPACITY: usize = 32;

/// Detectable or occluding volume, positioned by the entity's [`Transform`].
///
/// Rotation and scale are ignored: cuboids stay axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(Component)]
#[require(Transform)]
pub struct SightBody {
    pub shape: Shape<Vec3>,
    pub layer: Layer,
}

impl SightBody {
    pub fn new(shape: Shape<Vec3>, layer: Layer) -> Self {
        Self { shape, layer }
    }
}

/// Looks out from the entity's [`Transform`].
///
/// An entity that is both a detector and a [`SightBody`] never detects itself.
#[derive(Debug, Clone)]
#[derive(Component)]
#[require(Transform, DetectedTargets)]
pub struct SightDetector {
    pub detector: Detector<Vec3, Entity>,
}

impl SightDetector {
    pub fn new(config: DetectionConfig<Vec3>) -> Self {
        Self::with_capacity(config, DEFAULT_TARGET_CAPACITY)
    }

    /// `capacity` bounds how many in-range candidates are examined per frame.
    pub fn with_capacity(config: DetectionConfig<Vec3>, capacity: usize) -> Self {
        Self {
            detector: Detector::new(config, capacity),
        }
    }

    pub fn config(&self) -> &DetectionConfig<Vec3> {
        &self.detector.config
    }
}

/// Entities the detector saw on its last run, in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[derive(Component)]
pub struct DetectedTargets(pub Vec<Entity>);

impl DetectedTargets {
    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Snapshot of every [`SightBody`], rebuilt by [`sync_sight_world`].
#[derive(Debug, Default)]
#[derive(Resource)]
pub struct SightWorld(pub SimpleWorld<Vec3, Entity>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightSchedule {
    Update,
    FixedUpdate,
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SightSet {
    SyncWorld,
    Detect,
}

/// Detector pose from a transform.
pub fn pose_from_transform(transform: &Transform) -> Pose<Vec3> {
    Pose::new(transform.translation, transform.rotation)
}

/// World-space detector pose. Scale is dropped.
pub fn pose_from_global_transform(transform: &GlobalTransform) -> Pose<Vec3> {
    let (_, rotation, translation) = transform.to_scale_rotation_translation();
    Pose::new(translation, rotation)
}

/// Hides one entity from overlap queries so a detector doesn't report its own body.
///
/// Rays need no filtering: they start inside the body (or ahead of it) and never report it.
pub struct ExcludeEntity<'a, W> {
    pub world: &'a W,
    pub excluded: Entity,
}

impl<W: SpatialQuery<Vec3, Handle = Entity>> SpatialQuery<Vec3> for ExcludeEntity<'_, W> {
    type Handle = Entity;

    fn visit_overlaps(
        &self,
        center: Vec3,
        radius: f32,
        mask: LayerMask,
        visitor: &mut dyn FnMut(Entity) -> bool,
    ) {
        let excluded = self.excluded;
        self.world
            .visit_overlaps(center, radius, mask, &mut |entity| {
                entity == excluded || visitor(entity)
            });
    }

    fn raycast_first_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit<Vec3, Entity>> {
        self.world
            .raycast_first_hit(origin, direction, max_distance, mask)
    }

    fn position(&self, handle: Entity) -> Option<Vec3> {
        self.world.position(handle)
    }

    fn layer(&self, handle: Entity) -> Option<Layer> {
        self.world.layer(handle)
    }
}

pub fn sync_sight_world(
    mut world: ResMut<SightWorld>,
    bodies: Query<(Entity, &Transform, &SightBody)>,
) {
    world.0.rebuild(bodies.iter().map(|(entity, transform, body)| {
        (
            entity,
            Collider::new(transform.translation, body.shape, body.layer),
        )
    }));
}

pub fn run_sight_detectors(
    world: Res<SightWorld>,
    mut detectors: Query<(Entity, &Transform, &mut SightDetector, &mut DetectedTargets)>,
) {
    for (entity, transform, mut detector, mut detected) in &mut detectors {
        let view = ExcludeEntity {
            world: &world.0,
            excluded: entity,
        };
        let targets = detector.detector.scan(&view, &pose_from_transform(transform));
        tracing::debug!(?entity, targets = targets.len(), "sight detector scanned");

        detected.0.clear();
        detected.0.extend_from_slice(targets);
    }
}

/// Registers [`SightWorld`] and the sync/detect systems.
pub struct SightPlugin {
    schedule: SightSchedule,
}

impl Default for SightPlugin {
    fn default() -> Self {
        Self {
            schedule: SightSchedule::Update,
        }
    }
}

impl SightPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_fixed_update(mut self) -> Self {
        self.schedule = SightSchedule::FixedUpdate;
        self
    }

    pub fn schedule(&self) -> SightSchedule {
        self.schedule
    }
}

impl Plugin for SightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SightWorld>();

        let systems = (
            sync_sight_world.in_set(SightSet::SyncWorld),
            run_sight_detectors.in_set(SightSet::Detect),
        );

        match self.schedule {
            SightSchedule::Update => {
                app.configure_sets(Update, (SightSet::SyncWorld, SightSet::Detect).chain());
                app.add_systems(Update, systems);
            }
            SightSchedule::FixedUpdate => {
                app.configure_sets(
                    FixedUpdate,
                    (SightSet::SyncWorld, SightSet::Detect).chain(),
                );
                app.add_systems(FixedUpdate, systems);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sight_core::Quat;

    #[test]
    fn global_pose_follows_the_parent() {
        let parent = Transform::from_xyz(10.0, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_y(-core::f32::consts::FRAC_PI_2));
        let eyes = Transform::from_xyz(0.0, 0.0, -1.0);
        let global = GlobalTransform::from(parent) * eyes;

        let pose = pose_from_global_transform(&global);
        assert!(pose.position.abs_diff_eq(Vec3::new(11.0, 0.0, 0.0), 1e-5));
        let front = pose.transform_direction(Vec3::NEG_Z);
        assert!(front.abs_diff_eq(Vec3::X, 1e-5), "{front:?}");

        // The local transform alone places the eye near the world origin.
        let local = pose_from_transform(&eyes);
        assert_eq!(local.position, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn global_pose_ignores_scale() {
        let global = GlobalTransform::from(
            Transform::from_xyz(1.0, 2.0, 3.0).with_scale(Vec3::splat(4.0)),
        );
        let pose = pose_from_global_transform(&global);
        assert!(pose.position.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
        assert!(pose
            .transform_direction(Vec3::NEG_Z)
            .abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }
}
