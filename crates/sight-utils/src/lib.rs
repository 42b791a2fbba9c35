//! Helpers that sit around the detection engine in a game loop.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod color;
pub mod input;
pub mod looping;
pub mod math;
pub mod registry;

pub use color::{ColorError, Rgba8};
pub use input::{AxisDebouncer, AxisSource, AxisState, DEFAULT_DEADZONE};
pub use looping::LoopingList;
pub use registry::{Registration, Registry, RegistryError};
