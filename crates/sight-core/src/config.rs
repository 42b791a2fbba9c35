use crate::{ConfigError, LayerMask, SpaceVector};

/// Validated per-call detection parameters.
///
/// Construct through [`DetectionConfig::builder`]. Fields are read-only afterwards so a
/// config handed to a detector always satisfies the invariants checked by
/// [`DetectionConfigBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig<V: SpaceVector> {
    range: f32,
    field_of_view_degrees: f32,
    detectable: LayerMask,
    occluders: LayerMask,
    origin_offset: V,
    front: V,
}

impl<V: SpaceVector> DetectionConfig<V> {
    /// Start a config with the given range and total cone angle.
    ///
    /// Defaults: every layer detectable and occluding, zero eye offset, and
    /// [`SpaceVector::DEFAULT_FRONT`] as the facing.
    pub fn builder(range: f32, field_of_view_degrees: f32) -> DetectionConfigBuilder<V> {
        DetectionConfigBuilder {
            range,
            field_of_view_degrees,
            detectable: LayerMask::ALL,
            occluders: LayerMask::ALL,
            origin_offset: V::ZERO,
            front: V::DEFAULT_FRONT,
        }
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn field_of_view_degrees(&self) -> f32 {
        self.field_of_view_degrees
    }

    /// Half of the cone angle; candidates must be strictly inside it.
    pub fn half_field_of_view_degrees(&self) -> f32 {
        self.field_of_view_degrees * 0.5
    }

    pub fn detectable(&self) -> LayerMask {
        self.detectable
    }

    pub fn occluders(&self) -> LayerMask {
        self.occluders
    }

    pub fn origin_offset(&self) -> V {
        self.origin_offset
    }

    /// Detector-local unit facing.
    pub fn front(&self) -> V {
        self.front
    }

    /// Reopen the config for modification.
    pub fn to_builder(&self) -> DetectionConfigBuilder<V> {
        DetectionConfigBuilder {
            range: self.range,
            field_of_view_degrees: self.field_of_view_degrees,
            detectable: self.detectable,
            occluders: self.occluders,
            origin_offset: self.origin_offset,
            front: self.front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfigBuilder<V: SpaceVector> {
    range: f32,
    field_of_view_degrees: f32,
    detectable: LayerMask,
    occluders: LayerMask,
    origin_offset: V,
    front: V,
}

impl<V: SpaceVector> DetectionConfigBuilder<V> {
    pub fn range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view_degrees = degrees;
        self
    }

    /// Layers that count as targets.
    pub fn detectable(mut self, mask: impl Into<LayerMask>) -> Self {
        self.detectable = mask.into();
        self
    }

    /// Layers that block sight. Must include the detectable layers.
    pub fn occluders(mut self, mask: impl Into<LayerMask>) -> Self {
        self.occluders = mask.into();
        self
    }

    /// Eye position relative to the pose origin, in detector-local space.
    pub fn origin_offset(mut self, offset: V) -> Self {
        self.origin_offset = offset;
        self
    }

    /// Detector-local facing; normalized by [`Self::build`].
    pub fn front(mut self, front: V) -> Self {
        self.front = front;
        self
    }

    pub fn build(self) -> Result<DetectionConfig<V>, ConfigError> {
        if !self.range.is_finite() || self.range < 0.0 {
            return Err(ConfigError::InvalidRange(self.range));
        }
        let fov = self.field_of_view_degrees;
        if !fov.is_finite() || fov <= 0.0 || fov > 360.0 {
            return Err(ConfigError::InvalidFieldOfView(fov));
        }
        if self.detectable.is_empty() {
            return Err(ConfigError::EmptyDetectableMask);
        }
        if !self.occluders.includes(self.detectable) {
            return Err(ConfigError::OccludersExcludeDetectable {
                detectable: self.detectable,
                occluders: self.occluders,
            });
        }
        if !self.origin_offset.all_finite() {
            return Err(ConfigError::InvalidOriginOffset);
        }
        if !self.front.all_finite() {
            return Err(ConfigError::InvalidFront);
        }
        let front = self.front.normalized_or_zero();
        if front == V::ZERO {
            return Err(ConfigError::InvalidFront);
        }

        Ok(DetectionConfig {
            range: self.range,
            field_of_view_degrees: fov,
            detectable: self.detectable,
            occluders: self.occluders,
            origin_offset: self.origin_offset,
            front,
        })
    }
}
