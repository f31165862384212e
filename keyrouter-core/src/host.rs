//! Host firmware seam

use std::collections::BTreeMap;

use crate::engine::{DebugSnapshot, Effect, Hsv};
use crate::types::{Layer, LayerState};

/// Performs the effects the router asks for.
pub trait Host {
    fn apply(&mut self, effect: &Effect);

    /// Receives a periodic debug dump
    fn debug_dump(&mut self, _snapshot: &DebugSnapshot) {}
}

/// Records effects in order
impl Host for Vec<Effect> {
    fn apply(&mut self, effect: &Effect) {
        self.push(*effect);
    }
}

/// In-memory stand-in for the firmware: tracks layers, colors and resets.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    pub layer_state: LayerState,
    pub default_layer_state: LayerState,
    /// Color currently shown
    pub color: Option<Hsv>,
    /// Color that would survive a power cycle
    pub saved_color: Option<Hsv>,
    /// LEDs painted since the last [`SimulatedHost::clear_frame`]
    pub frame: BTreeMap<u8, Hsv>,
    pub hard_resets: usize,
    pub soft_resets: usize,
    pub dumps: Vec<DebugSnapshot>,
    /// Every effect applied, in order
    pub history: Vec<Effect>,
}

impl SimulatedHost {
    /// Powered-on host: no active layers, MAC_BASE as the default layer
    pub fn new() -> Self {
        Self {
            layer_state: LayerState::EMPTY,
            default_layer_state: Layer::MacBase.mask(),
            color: None,
            saved_color: None,
            frame: BTreeMap::new(),
            hard_resets: 0,
            soft_resets: 0,
            dumps: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn clear_frame(&mut self) {
        self.frame.clear();
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SimulatedHost {
    fn apply(&mut self, effect: &Effect) {
        self.history.push(*effect);
        self.layer_state = effect.apply_to_layers(self.layer_state);

        match *effect {
            Effect::DefaultLayerSet(state) => self.default_layer_state = state,
            Effect::HardReset => self.hard_resets += 1,
            Effect::SoftReset => self.soft_resets += 1,
            Effect::SetColor { hsv, persist } => {
                self.color = Some(hsv);
                if persist {
                    self.saved_color = Some(hsv);
                }
            }
            Effect::PaintLed { index, hsv } => {
                self.frame.insert(index, hsv);
            }
            _ => {}
        }
    }

    fn debug_dump(&mut self, snapshot: &DebugSnapshot) {
        self.dumps.push(*snapshot);
    }
}
