use std::collections::HashMap;

use crate::types::{Layer, LayerState};
use super::actions::CustomKeyAction;

/// What a momentary press saved for its release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    /// The press changed nothing; the release has nothing to undo
    Nothing,
    /// Layer switched off by the press
    Layer(u8),
    /// Whole layer state before the press
    State(LayerState),
    /// OS fn layer switched on alongside the common fn layer, if it exists
    FnOffset(Option<u8>),
}

/// Tunables applied when a router is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Minimum milliseconds between two debug dumps
    pub debug_interval_ms: u16,
    /// Start with the periodic debug dump enabled
    pub debug_enabled: bool,
}

impl RouterConfig {
    pub const DEFAULT_DEBUG_INTERVAL_MS: u16 = 500;
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            debug_interval_ms: Self::DEFAULT_DEBUG_INTERVAL_MS,
            debug_enabled: false,
        }
    }
}

/// Represents the current state of the router
#[derive(Debug, Clone)]
pub struct RouterState {
    /// Mirror of the host's active layers
    pub layer_state: LayerState,
    /// Mirror of the host's default layers; the host boots on MAC_BASE
    pub default_layer_state: LayerState,
    /// Default layers chosen by the last OS detection
    pub os_selected: Option<LayerState>,
    /// One slot per momentary action with an outstanding press
    pending: HashMap<CustomKeyAction, Saved>,
    /// Periodic debug dump enabled
    pub debug_enabled: bool,
    /// Armed once the host is configured; suspend then triggers a soft reset
    pub ready_for_reset: bool,
    /// Tick of the last debug dump
    pub debug_timer: Option<u16>,
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterState {
    pub fn new() -> Self {
        Self {
            layer_state: LayerState::EMPTY,
            default_layer_state: Layer::MacBase.mask(),
            os_selected: None,
            pending: HashMap::new(),
            debug_enabled: false,
            ready_for_reset: false,
            debug_timer: None,
        }
    }

    /// Reset the router state, keeping only the debug flag
    pub fn reset(&mut self) {
        let debug_enabled = self.debug_enabled;
        *self = Self::new();
        self.debug_enabled = debug_enabled;
    }

    /// Check if a momentary action is currently held
    pub fn is_pending(&self, action: CustomKeyAction) -> bool {
        self.pending.contains_key(&action)
    }

    /// Remember what a press did
    pub fn save(&mut self, action: CustomKeyAction, saved: Saved) {
        self.pending.insert(action, saved);
    }

    /// Take what the paired press saved, if any
    pub fn take(&mut self, action: CustomKeyAction) -> Option<Saved> {
        self.pending.remove(&action)
    }

    /// Number of held momentary actions
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug_enabled = !self.debug_enabled;
        self.debug_enabled
    }
}
