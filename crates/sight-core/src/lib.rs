//! Engine-agnostic line-of-sight detection.
//!
//! A detector looks out from a [`Pose`] through a field-of-view cone and reports which
//! candidates returned by a [`SpatialQuery`] provider it can actually see. Two modes exist:
//!
//! - [`find_first`]: returns the first visible candidate in provider order.
//! - [`find_all`]: fills caller-owned [`QueryBuffers`] with every visible candidate and never
//!   allocates, so it can run every frame.
//!
//! The same code drives 2D (`glam::Vec2`, rotation in radians) and 3D (`glam::Vec3`,
//! `glam::Quat`) worlds through [`SpaceVector`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod config;
pub mod detector;
pub mod error;
pub mod layers;
pub mod pose;
pub mod query;
pub mod vector;
pub mod visibility;
pub mod world;

pub use buffers::QueryBuffers;
pub use config::{DetectionConfig, DetectionConfigBuilder};
pub use detector::{find_all, find_first, Detector, ORIGIN_PROBE_RADIUS};
pub use error::ConfigError;
pub use layers::{Layer, LayerMask};
pub use pose::Pose;
pub use query::{RayHit, SpatialQuery};
pub use vector::SpaceVector;
pub use visibility::{is_visible, within_field_of_view};
pub use world::{Collider, ColliderId, Shape, SimpleWorld};

pub use glam;
pub use glam::{Quat, Vec2, Vec3};
