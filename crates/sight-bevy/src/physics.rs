//! Detection against Rapier3D colliders.
//!
//! A collider's [`Layer`] is the lowest membership bit of its [`CollisionGroups`] (bit 0 when
//! it has none). Sensors are never reported. Rays ignore colliders that enclose the ray origin,
//! so the origin-overlap handling of [`sight_core::find_all`] behaves the same as with
//! [`sight_core::SimpleWorld`].
//!
//! Detector poses and collider positions are both read from [`GlobalTransform`], so detectors
//! may be children of other entities. Globals are propagated in `PostUpdate`; detectors see the
//! previous frame's placement.
//!
//! ```rust,ignore
//! use sight_bevy::physics::RapierSightPlugin;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
//!     .add_plugins(RapierSightPlugin::default())
//!     .run();
//! ```

use bevy_app::{App, FixedUpdate, Plugin, Update};
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_rapier3d::prelude::*;
use bevy_transform::components::GlobalTransform;
use sight_core::{Layer, LayerMask, RayHit, SpatialQuery, Vec3};

use crate::{
    pose_from_global_transform, DetectedTargets, ExcludeEntity, SightDetector, SightSchedule,
    SightSet,
};

/// Colliders enclosing a ray origin that a single ray will skip.
const MAX_ENCLOSING: usize = 8;

/// Fixed-size set of colliders enclosing a ray origin.
#[derive(Debug, Default)]
struct EnclosingColliders {
    entities: [Option<Entity>; MAX_ENCLOSING],
    len: usize,
}

impl EnclosingColliders {
    /// Returns `false` once full.
    fn push(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.entities.get_mut(self.len) else {
            return false;
        };
        *slot = Some(entity);
        self.len += 1;
        true
    }

    fn contains(&self, entity: Entity) -> bool {
        self.entities[..self.len].contains(&Some(entity))
    }
}

/// Collider data the provider reads besides Rapier's own sets.
pub type SightColliderData = (&'static GlobalTransform, Option<&'static CollisionGroups>);

/// [`SpatialQuery`] over a Rapier context.
///
/// Use with the `ReadRapierContext` system param and a query over [`SightColliderData`].
pub struct RapierSightQuery<'a, 'w, 's> {
    context: &'a RapierContext<'a>,
    colliders: &'a Query<'w, 's, SightColliderData>,
}

impl<'a, 'w, 's> RapierSightQuery<'a, 'w, 's> {
    pub fn new(
        context: &'a RapierContext<'a>,
        colliders: &'a Query<'w, 's, SightColliderData>,
    ) -> Self {
        Self { context, colliders }
    }

    fn layer_in(&self, entity: Entity, mask: LayerMask) -> bool {
        self.layer(entity).is_some_and(|layer| mask.contains(layer))
    }
}

/// Lowest membership bit of `groups`, or layer 0 without groups.
pub fn layer_from_groups(groups: Option<&CollisionGroups>) -> Option<Layer> {
    match groups {
        None => Some(Layer::new(0)),
        Some(groups) => {
            let bits = groups.memberships.bits();
            if bits == 0 {
                None
            } else {
                Layer::try_new(bits.trailing_zeros() as u8)
            }
        }
    }
}

impl SpatialQuery<Vec3> for RapierSightQuery<'_, '_, '_> {
    type Handle = Entity;

    fn visit_overlaps(
        &self,
        center: Vec3,
        radius: f32,
        mask: LayerMask,
        visitor: &mut dyn FnMut(Entity) -> bool,
    ) {
        if radius <= 0.0 {
            return;
        }
        let shape = Collider::ball(radius);
        let filter = QueryFilter::default().exclude_sensors();
        self.context.intersections_with_shape(
            center,
            bevy_rapier3d::math::Rot::default(),
            &shape,
            filter,
            |entity| {
                if self.layer_in(entity, mask) {
                    visitor(entity)
                } else {
                    true
                }
            },
        );
    }

    fn raycast_first_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit<Vec3, Entity>> {
        let direction = direction.try_normalize()?;

        let mut enclosing = EnclosingColliders::default();
        self.context.intersections_with_point(
            origin,
            QueryFilter::default().exclude_sensors(),
            |entity| {
                if enclosing.push(entity) {
                    true
                } else {
                    tracing::debug!(
                        capacity = MAX_ENCLOSING,
                        "too many colliders enclose the ray origin; the rest can block the ray"
                    );
                    false
                }
            },
        );

        let predicate =
            |entity: Entity| self.layer_in(entity, mask) && !enclosing.contains(entity);
        let filter = QueryFilter::default()
            .exclude_sensors()
            .predicate(&predicate);

        self.context
            .cast_ray(origin, direction, max_distance, true, filter)
            .map(|(entity, toi)| RayHit {
                handle: entity,
                point: origin + direction * toi,
                distance: toi,
            })
    }

    fn position(&self, handle: Entity) -> Option<Vec3> {
        self.colliders
            .get(handle)
            .ok()
            .map(|(transform, _)| transform.translation())
    }

    fn layer(&self, handle: Entity) -> Option<Layer> {
        let (_, groups) = self.colliders.get(handle).ok()?;
        layer_from_groups(groups)
    }
}

pub fn run_rapier_sight_detectors(
    read_context: ReadRapierContext,
    colliders: Query<SightColliderData>,
    mut detectors: Query<(
        Entity,
        &GlobalTransform,
        &mut SightDetector,
        &mut DetectedTargets,
    )>,
) {
    let Ok(context) = read_context.single() else {
        tracing::warn!("no Rapier context; skipping sight detectors");
        return;
    };
    let world = RapierSightQuery::new(&context, &colliders);

    for (entity, transform, mut detector, mut detected) in &mut detectors {
        let view = ExcludeEntity {
            world: &world,
            excluded: entity,
        };
        let targets = detector
            .detector
            .scan(&view, &pose_from_global_transform(transform));
        tracing::debug!(?entity, targets = targets.len(), "rapier sight detector scanned");

        detected.0.clear();
        detected.0.extend_from_slice(targets);
    }
}

/// Runs every [`SightDetector`] against Rapier colliders.
///
/// Use instead of [`crate::SightPlugin`], not alongside it. Add Rapier's own physics plugin
/// separately.
pub struct RapierSightPlugin {
    schedule: SightSchedule,
}

impl Default for RapierSightPlugin {
    fn default() -> Self {
        Self {
            schedule: SightSchedule::Update,
        }
    }
}

impl RapierSightPlugin {
    pub fn in_fixed_update(mut self) -> Self {
        self.schedule = SightSchedule::FixedUpdate;
        self
    }
}

impl Plugin for RapierSightPlugin {
    fn build(&self, app: &mut App) {
        let system = run_rapier_sight_detectors.in_set(SightSet::Detect);
        match self.schedule {
            SightSchedule::Update => {
                app.add_systems(Update, system);
            }
            SightSchedule::FixedUpdate => {
                app.add_systems(FixedUpdate, system);
            }
        }
    }
}
