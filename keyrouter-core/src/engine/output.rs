//! Side effects the router asks the host to perform

use std::fmt;

use crate::types::LayerState;
use super::color::Hsv;

/// A single outbound call into the host firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Activate one layer
    LayerOn(u8),
    /// Deactivate one layer
    LayerOff(u8),
    /// Deactivate every layer
    LayerClear,
    /// Replace the whole layer state
    LayerStateSet(LayerState),
    /// Replace the default layer state
    DefaultLayerSet(LayerState),
    /// Full device reset into the bootloader
    HardReset,
    /// Reboot into the current firmware
    SoftReset,
    /// Set the global indicator color, optionally persisted by the host
    SetColor { hsv: Hsv, persist: bool },
    /// Paint a single LED for the current frame
    PaintLed { index: u8, hsv: Hsv },
}

impl Effect {
    /// Applies this effect to a layer state mirror, returning the new state.
    ///
    /// Effects that do not touch the active layers leave it unchanged.
    pub fn apply_to_layers(&self, state: LayerState) -> LayerState {
        match *self {
            Effect::LayerOn(layer) => state.with(layer),
            Effect::LayerOff(layer) => state.without(layer),
            Effect::LayerClear => LayerState::EMPTY,
            Effect::LayerStateSet(new_state) => new_state,
            _ => state,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::LayerOn(layer) => write!(f, "layer_on({})", layer),
            Effect::LayerOff(layer) => write!(f, "layer_off({})", layer),
            Effect::LayerClear => f.write_str("layer_clear()"),
            Effect::LayerStateSet(state) => write!(f, "layer_state_set({})", state),
            Effect::DefaultLayerSet(state) => write!(f, "default_layer_set({})", state),
            Effect::HardReset => f.write_str("reset_keyboard()"),
            Effect::SoftReset => f.write_str("soft_reset_keyboard()"),
            Effect::SetColor { hsv, persist: true } => write!(f, "set_color({})", hsv),
            Effect::SetColor { hsv, persist: false } => write!(f, "set_color_noeeprom({})", hsv),
            Effect::PaintLed { index, hsv } => write!(f, "paint_led({}, {})", index, hsv),
        }
    }
}

/// Result of a callback that reports whether it consumed the event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    /// `true` stops further processing of the triggering event in the host
    pub handled: bool,
    /// Host calls to perform, in order
    pub effects: Vec<Effect>,
}

impl Outcome {
    /// Creates an outcome that consumes the event
    pub fn handled(effects: Vec<Effect>) -> Self {
        Self {
            handled: true,
            effects,
        }
    }

    /// Creates an outcome that lets the host continue normal processing
    pub fn pass_through() -> Self {
        Self {
            handled: false,
            effects: Vec::new(),
        }
    }

    /// Creates a not-handled outcome that still carries effects
    pub fn unhandled_with(effects: Vec<Effect>) -> Self {
        Self {
            handled: false,
            effects,
        }
    }
}

/// Result of a layer-state notification: the (possibly modified) state plus effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerOutcome {
    pub state: LayerState,
    pub effects: Vec<Effect>,
}
