//! Classification layers and masks.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign, Not};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A classification index in `0..32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(try_from = "u8", into = "u8"))]
pub struct Layer(u8);

impl Layer {
    pub const COUNT: u8 = 32;

    /// Panics if `index >= 32`. Usable in const context.
    pub const fn new(index: u8) -> Self {
        assert!(index < Self::COUNT, "layer index must be < 32");
        Self(index)
    }

    pub const fn try_new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Mask containing only this layer.
    pub const fn mask(self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

impl TryFrom<u8> for Layer {
    type Error = InvalidLayer;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::try_new(index).ok_or(InvalidLayer(index))
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> Self {
        layer.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("layer index {0} is out of range (0..32)")]
pub struct InvalidLayer(pub u8);

/// Set of layers, one bit per layer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_layer(layer: Layer) -> Self {
        layer.mask()
    }

    pub fn from_layers(layers: impl IntoIterator<Item = Layer>) -> Self {
        layers.into_iter().fold(Self::NONE, |mask, layer| mask | layer)
    }

    pub const fn contains(self, layer: Layer) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    /// True when every layer in `other` is also in `self`.
    pub const fn includes(self, other: LayerMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn layers(self) -> impl Iterator<Item = Layer> {
        (0..Layer::COUNT)
            .map(Layer)
            .filter(move |layer| self.contains(*layer))
    }
}

impl fmt::Debug for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerMask({:#034b})", self.0)
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Layer> for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Layer) -> Self {
        self | rhs.mask()
    }
}

impl BitOrAssign for LayerMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for LayerMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for LayerMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}

/// Conventional layer assignments used by the adapters and the CLI.
pub mod presets {
    use super::Layer;

    pub const DEFAULT: Layer = Layer::new(0);
    /// Agents that can be perceived (players, NPCs).
    pub const AGENT: Layer = Layer::new(1);
    /// Opaque static geometry (walls, crates).
    pub const OBSTACLE: Layer = Layer::new(2);
    /// Volumes that can be perceived from inside (capture zones).
    pub const ZONE: Layer = Layer::new(3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_contains_only_its_layers() {
        let mask = LayerMask::from_layers([presets::AGENT, presets::ZONE]);
        assert!(mask.contains(presets::AGENT));
        assert!(mask.contains(presets::ZONE));
        assert!(!mask.contains(presets::OBSTACLE));
        assert_eq!(mask.layers().collect::<Vec<_>>(), vec![presets::AGENT, presets::ZONE]);
    }

    #[test]
    fn includes_is_superset_test() {
        let occluders = presets::AGENT.mask() | presets::OBSTACLE;
        assert!(occluders.includes(presets::AGENT.mask()));
        assert!(!presets::AGENT.mask().includes(occluders));
        assert!(occluders.includes(LayerMask::NONE));
    }

    #[test]
    fn layer_index_is_bounded() {
        assert!(Layer::try_new(31).is_some());
        assert_eq!(Layer::try_from(32), Err(InvalidLayer(32)));
        assert_eq!(Layer::new(31).mask().bits(), 1 << 31);
    }
}
