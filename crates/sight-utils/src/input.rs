//! Edge detection for analog axes (triggers, sticks, keys mapped to axes).

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_DEADZONE: f32 = 0.4;

/// Reads the raw value of a named axis.
pub trait AxisSource {
    fn axis_value(&self, axis: &str) -> f32;
}

impl<F: Fn(&str) -> f32> AxisSource for F {
    fn axis_value(&self, axis: &str) -> f32 {
        self(axis)
    }
}

impl AxisSource for HashMap<String, f32> {
    fn axis_value(&self, axis: &str) -> f32 {
        self.get(axis).copied().unwrap_or(0.0)
    }
}

/// Press/release tracking for a single axis.
///
/// `trigger_down` and `trigger_up` keep separate latches, so each reports its own edge once
/// no matter how often the other is polled.
///
/// A new state counts as released. The first `trigger_up` poll below the deadzone returns
/// `false`; a release is only reported after the axis has gone past the deadzone. Input
/// managers that start with the release latch cleared report a release on that first poll
/// instead.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisState {
    pub deadzone: f32,
    down: bool,
    up: bool,
}

impl Default for AxisState {
    fn default() -> Self {
        Self::new(DEFAULT_DEADZONE)
    }
}

impl AxisState {
    /// A released axis: `trigger_up` stays false until the axis has been pressed.
    pub fn new(deadzone: f32) -> Self {
        Self {
            deadzone,
            down: false,
            up: true,
        }
    }

    /// True only on the poll where `value` first rises past the deadzone.
    pub fn trigger_down(&mut self, value: f32) -> bool {
        if self.down {
            self.down = value > self.deadzone;
            return false;
        }
        if value > self.deadzone {
            self.down = true;
            return true;
        }
        false
    }

    /// True only on the poll where `value` first drops below the deadzone.
    pub fn trigger_up(&mut self, value: f32) -> bool {
        if self.up {
            self.up = value < self.deadzone;
            return false;
        }
        if value < self.deadzone {
            self.up = true;
            return true;
        }
        false
    }

    pub fn held(&self, value: f32) -> bool {
        value > self.deadzone
    }
}

/// Per-axis [`AxisState`]s keyed by axis name, created on first use.
#[derive(Debug, Clone, Default)]
pub struct AxisDebouncer {
    axes: HashMap<String, AxisState>,
    default_deadzone: Option<f32>,
}

impl AxisDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadzone given to axes seen for the first time.
    pub fn with_default_deadzone(deadzone: f32) -> Self {
        Self {
            axes: HashMap::new(),
            default_deadzone: Some(deadzone),
        }
    }

    pub fn set_deadzone(&mut self, axis: &str, deadzone: f32) {
        self.state_mut(axis).deadzone = deadzone;
    }

    pub fn deadzone(&self, axis: &str) -> f32 {
        self.axes
            .get(axis)
            .map(|state| state.deadzone)
            .unwrap_or_else(|| self.default_deadzone())
    }

    pub fn trigger_down(&mut self, source: &impl AxisSource, axis: &str) -> bool {
        let value = source.axis_value(axis);
        let pressed = self.state_mut(axis).trigger_down(value);
        if pressed {
            tracing::trace!(axis, value, "axis pressed");
        }
        pressed
    }

    pub fn trigger_up(&mut self, source: &impl AxisSource, axis: &str) -> bool {
        let value = source.axis_value(axis);
        let released = self.state_mut(axis).trigger_up(value);
        if released {
            tracing::trace!(axis, value, "axis released");
        }
        released
    }

    pub fn held(&self, source: &impl AxisSource, axis: &str) -> bool {
        source.axis_value(axis) > self.deadzone(axis)
    }

    pub fn state(&self, axis: &str) -> Option<&AxisState> {
        self.axes.get(axis)
    }

    fn default_deadzone(&self) -> f32 {
        self.default_deadzone.unwrap_or(DEFAULT_DEADZONE)
    }

    fn state_mut(&mut self, axis: &str) -> &mut AxisState {
        let deadzone = self.default_deadzone();
        self.axes
            .entry(axis.to_owned())
            .or_insert_with(|| AxisState::new(deadzone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_reports_once_per_rise() {
        let mut state = AxisState::default();
        assert!(!state.trigger_down(0.1));
        assert!(state.trigger_down(0.9));
        assert!(!state.trigger_down(1.0));
        assert!(!state.trigger_down(0.0));
        assert!(state.trigger_down(0.5));
    }

    #[test]
    fn release_reports_once_per_fall() {
        let mut state = AxisState::default();
        // Starts released: no edge until after a press.
        assert!(!state.trigger_up(0.0));
        assert!(!state.trigger_up(0.8));
        assert!(state.trigger_up(0.1));
        assert!(!state.trigger_up(0.0));
    }

    #[test]
    fn deadzone_boundary_is_neither_pressed_nor_released() {
        let mut state = AxisState::new(0.5);
        assert!(!state.trigger_down(0.5));
        assert!(!state.held(0.5));
        assert!(!state.trigger_up(0.7));
        assert!(!state.trigger_up(0.5));
    }

    #[test]
    fn debouncer_tracks_axes_independently() {
        let mut values: HashMap<String, f32> = HashMap::new();
        let mut input = AxisDebouncer::new();

        values.insert("fire".into(), 1.0);
        assert!(input.trigger_down(&values, "fire"));
        assert!(!input.trigger_down(&values, "jump"));
        assert!(input.held(&values, "fire"));

        values.insert("fire".into(), 0.0);
        values.insert("jump".into(), 1.0);
        assert!(!input.trigger_down(&values, "fire"));
        assert!(input.trigger_down(&values, "jump"));
    }

    #[test]
    fn custom_deadzone_applies_per_axis() {
        let source = |_: &str| 0.3_f32;
        let mut input = AxisDebouncer::new();
        assert!(!input.held(&source, "aim"));
        input.set_deadzone("aim", 0.2);
        assert!(input.held(&source, "aim"));
        assert!(input.trigger_down(&source, "aim"));
        assert_eq!(input.deadzone("other"), DEFAULT_DEADZONE);
    }

    #[test]
    fn default_deadzone_can_be_overridden() {
        let input = AxisDebouncer::with_default_deadzone(0.1);
        assert!(input.held(&|_: &str| 0.2_f32, "any"));
    }
}
