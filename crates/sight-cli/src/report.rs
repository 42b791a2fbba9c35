use std::fmt;

use anyhow::Result;
use serde::Serialize;
use sight_core::{find_all, find_first, QueryBuffers, SpatialQuery};

use crate::scene::{DetectorDef, Scene, SceneWorld};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    First,
    All,
}

/// What one detector sees.
#[derive(Debug, Clone, Serialize)]
pub struct DetectorReport {
    pub detector: String,
    pub mode: ScanMode,
    pub targets: Vec<String>,
    /// More detectable colliders were in range than `buffer_capacity`; some were not examined.
    pub truncated: bool,
}

impl fmt::Display for DetectorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.targets.is_empty() {
            write!(f, "{}: nothing in sight", self.detector)?;
        } else {
            write!(f, "{}: {}", self.detector, self.targets.join(", "))?;
        }
        if self.truncated {
            write!(f, " (truncated to buffer capacity)")?;
        }
        Ok(())
    }
}

pub fn scan(
    scene: &Scene,
    world: &SceneWorld,
    def: &DetectorDef,
    mode: ScanMode,
) -> Result<DetectorReport> {
    let config = scene.detector_config(def)?;
    let pose = def.pose();

    let (targets, truncated) = match mode {
        ScanMode::First => {
            let found = find_first(&world.world, &pose, &config);
            (found.into_iter().collect::<Vec<_>>(), false)
        }
        ScanMode::All => {
            let mut buffers = QueryBuffers::with_capacity(def.buffer_capacity);
            find_all(&world.world, &pose, &config, &mut buffers);

            let eye = pose.transform_point(config.origin_offset());
            let in_range = world
                .world
                .overlap_region(eye, config.range(), config.detectable())
                .len();
            (buffers.take_output(), in_range > def.buffer_capacity)
        }
    };

    tracing::debug!(
        detector = %def.name,
        ?mode,
        found = targets.len(),
        "scanned"
    );

    Ok(DetectorReport {
        detector: def.name.clone(),
        mode,
        targets: targets.into_iter().map(|key| world.name(key).to_owned()).collect(),
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EXAMPLE_SCENE;

    fn example() -> (Scene, SceneWorld) {
        let scene: Scene = serde_yaml::from_str(EXAMPLE_SCENE).expect("parse");
        let world = scene.build_world().expect("world");
        (scene, world)
    }

    #[test]
    fn tower_sees_guard_and_the_zone_it_stands_in() {
        let (scene, world) = example();
        let tower = scene.detector("tower").expect("tower");

        let all = scan(&scene, &world, tower, ScanMode::All).expect("scan");
        assert_eq!(all.targets, vec!["guard", "capture_zone"]);
        assert!(!all.truncated);

        let first = scan(&scene, &world, tower, ScanMode::First).expect("scan");
        assert_eq!(first.targets, vec!["guard"]);
    }

    #[test]
    fn sentry_is_blocked_by_the_crate() {
        let (scene, world) = example();
        let sentry = scene.detector("sentry").expect("sentry");
        let report = scan(&scene, &world, sentry, ScanMode::All).expect("scan");
        assert!(report.targets.is_empty(), "{report}");
        assert_eq!(report.to_string(), "sentry: nothing in sight");
    }

    #[test]
    fn small_buffer_is_reported_as_truncated() {
        let (mut scene, world) = example();
        scene.detectors[0].buffer_capacity = 1;
        let tower = scene.detectors[0].clone();
        let report = scan(&scene, &world, &tower, ScanMode::All).expect("scan");
        assert!(report.truncated);
        assert_eq!(report.targets.len(), 1);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = DetectorReport {
            detector: "tower".into(),
            mode: ScanMode::All,
            targets: vec!["guard".into()],
            truncated: false,
        };
        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["mode"], "all");
        assert_eq!(json["targets"][0], "guard");
    }
}
