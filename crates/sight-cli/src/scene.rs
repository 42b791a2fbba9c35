//! YAML scene description: colliders and the detectors looking at them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sight_core::layers::presets;
use sight_core::{
    Collider, DetectionConfig, Layer, LayerMask, Pose, Quat, Shape, SimpleWorld, Vec3,
};

/// Scene written by `sight init`.
pub const EXAMPLE_SCENE: &str = r#"# sight scene
#
# Layers can be given by index (0-31) or by name. Built-in names: default (0),
# agent (1), obstacle (2), zone (3). Add your own under `layers`.
layers:
  pickup: 4

colliders:
  - name: guard
    position: [0.0, 0.0, -6.0]
    shape: { ball: { radius: 0.5 } }
    layer: agent
  - name: hidden_guard
    position: [0.0, 0.0, 6.0]
    shape: { ball: { radius: 0.5 } }
    layer: agent
  - name: crate
    position: [3.0, 0.0, -6.0]
    shape: { cuboid: { half_extents: [0.5, 0.5, 0.5] } }
    layer: obstacle
  - name: capture_zone
    position: [0.0, 0.0, -1.0]
    shape: { cuboid: { half_extents: [2.0, 2.0, 2.0] } }
    layer: zone

detectors:
  - name: tower
    position: [0.0, 0.0, 0.0]
    rotation_degrees: [0.0, 0.0, 0.0]
    range: 10.0
    fov: 90.0
    detectable: [agent, zone]
    origin_offset: [0.0, 0.5, 0.0]
    buffer_capacity: 16
  - name: sentry
    position: [6.0, 0.0, -6.0]
    rotation_degrees: [0.0, 90.0, 0.0]
    range: 8.0
    fov: 60.0
    detectable: [agent]
"#;

/// Layer by index or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerRef {
    Index(u8),
    Name(String),
}

impl Default for LayerRef {
    fn default() -> Self {
        Self::Index(presets::DEFAULT.index())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Extra layer names, on top of the built-in ones.
    pub layers: BTreeMap<String, u8>,
    pub colliders: Vec<ColliderDef>,
    pub detectors: Vec<DetectorDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDef {
    pub name: String,
    pub position: Vec3,
    pub shape: Shape<Vec3>,
    #[serde(default)]
    pub layer: LayerRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorDef {
    pub name: String,

    #[serde(default)]
    pub position: Vec3,

    /// Euler angles (XYZ order) in degrees.
    #[serde(default)]
    pub rotation_degrees: Vec3,

    pub range: f32,

    /// Full cone angle in degrees.
    pub fov: f32,

    /// Defaults to every layer.
    #[serde(default)]
    pub detectable: Option<Vec<LayerRef>>,

    /// Defaults to every layer.
    #[serde(default)]
    pub occluders: Option<Vec<LayerRef>>,

    #[serde(default)]
    pub origin_offset: Vec3,

    /// Detector-local facing; defaults to -Z.
    #[serde(default)]
    pub front: Option<Vec3>,

    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

fn default_buffer_capacity() -> usize {
    32
}

impl DetectorDef {
    pub fn pose(&self) -> Pose<Vec3> {
        let [x, y, z] = self.rotation_degrees.to_array().map(f32::to_radians);
        Pose::new(
            self.position,
            Quat::from_euler(sight_core::glam::EulerRot::XYZ, x, y, z),
        )
    }
}

/// World built from a scene. Keys index into `names`.
pub struct SceneWorld {
    pub world: SimpleWorld<Vec3, usize>,
    pub names: Vec<String>,
}

impl SceneWorld {
    pub fn name(&self, key: usize) -> &str {
        self.names.get(key).map(String::as_str).unwrap_or("?")
    }
}

impl Scene {
    /// Load a scene from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene from {}", path.display()))?;
        let scene: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse scene from {}", path.display()))?;
        Ok(scene)
    }

    pub fn resolve_layer(&self, layer: &LayerRef) -> Result<Layer> {
        let index = match layer {
            LayerRef::Index(index) => *index,
            LayerRef::Name(name) => match self.layers.get(name) {
                Some(index) => *index,
                None => builtin_layer(name)
                    .map(Layer::index)
                    .with_context(|| format!("unknown layer `{name}`"))?,
            },
        };
        Layer::try_from(index).map_err(Into::into)
    }

    fn resolve_mask(&self, layers: Option<&[LayerRef]>) -> Result<LayerMask> {
        let Some(layers) = layers else {
            return Ok(LayerMask::ALL);
        };
        let mut mask = LayerMask::NONE;
        for layer in layers {
            mask |= self.resolve_layer(layer)?.mask();
        }
        Ok(mask)
    }

    pub fn build_world(&self) -> Result<SceneWorld> {
        let mut world = SimpleWorld::new();
        let mut names = Vec::with_capacity(self.colliders.len());

        for (key, def) in self.colliders.iter().enumerate() {
            if names.contains(&def.name) {
                tracing::warn!(name = %def.name, "duplicate collider name");
            }
            let layer = self
                .resolve_layer(&def.layer)
                .with_context(|| format!("collider `{}`", def.name))?;
            world.insert(key, Collider::new(def.position, def.shape, layer));
            names.push(def.name.clone());
        }

        Ok(SceneWorld { world, names })
    }

    pub fn detector_config(&self, def: &DetectorDef) -> Result<DetectionConfig<Vec3>> {
        let build = || -> Result<DetectionConfig<Vec3>> {
            let mut builder = DetectionConfig::builder(def.range, def.fov)
                .detectable(self.resolve_mask(def.detectable.as_deref())?)
                .occluders(self.resolve_mask(def.occluders.as_deref())?)
                .origin_offset(def.origin_offset);
            if let Some(front) = def.front {
                builder = builder.front(front);
            }
            Ok(builder.build()?)
        };
        build().with_context(|| format!("detector `{}`", def.name))
    }

    pub fn detector(&self, name: &str) -> Result<&DetectorDef> {
        match self.detectors.iter().find(|d| d.name == name) {
            Some(def) => Ok(def),
            None => bail!("scene has no detector named `{name}`"),
        }
    }
}

fn builtin_layer(name: &str) -> Option<Layer> {
    match name {
        "default" => Some(presets::DEFAULT),
        "agent" => Some(presets::AGENT),
        "obstacle" => Some(presets::OBSTACLE),
        "zone" => Some(presets::ZONE),
        _ => None,
    }
}
