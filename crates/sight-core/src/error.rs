use crate::LayerMask;

/// A detection configuration that cannot be evaluated meaningfully.
///
/// Returned by [`crate::DetectionConfigBuilder::build`]; the detectors only accept built
/// configs, so these are reported at the call boundary instead of degrading silently.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("detection range must be finite and >= 0, got {0}")]
    InvalidRange(f32),

    #[error("field of view must be within (0, 360] degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("detectable mask is empty; nothing could ever be detected")]
    EmptyDetectableMask,

    #[error(
        "occluder mask {occluders:?} does not include every detectable layer of {detectable:?}; \
         rays could never hit those targets"
    )]
    OccludersExcludeDetectable {
        detectable: LayerMask,
        occluders: LayerMask,
    },

    #[error("front direction must be finite and non-zero")]
    InvalidFront,

    #[error("origin offset must be finite")]
    InvalidOriginOffset,
}
