use crate::{
    Result,
    host::Host,
    keymap::Layout,
    types::{Keycode, Layer, LayerState, ModMask},
};
use super::{
    actions::CustomKeyAction,
    color::hsv_for_layer,
    debug::{DebugSnapshot, DumpThrottle},
    indicator::paint_indicators,
    input::HostEvent,
    os::{select_default_layer, OsVariant},
    output::{Effect, LayerOutcome, Outcome},
    overrides::OverrideMatch,
    power::UsbDeviceState,
    state::{RouterConfig, RouterState, Saved},
};

/// Reacts to host callbacks with layer changes, colors and resets.
///
/// The router never calls into the host itself: each callback returns the
/// effects to perform, and the router's mirrors of the layer state are updated
/// as if the host had performed them.
pub struct KeyEventRouter {
    layout: Layout,
    state: RouterState,
    throttle: DumpThrottle,
}

impl Default for KeyEventRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyEventRouter {
    /// Create a router for the built-in K1 Pro ISO layout
    pub fn new() -> Self {
        Self::with_layout(Layout::k1_pro_iso())
    }

    /// Create a router using the layout's own configuration
    pub fn with_layout(layout: Layout) -> Self {
        let config = layout.config;
        Self::with_config(layout, config)
    }

    pub fn with_config(layout: Layout, config: RouterConfig) -> Self {
        let mut state = RouterState::new();
        state.debug_enabled = config.debug_enabled;
        Self {
            layout,
            state,
            throttle: DumpThrottle::new(config.debug_interval_ms),
        }
    }

    /// Create a router from KLB binary data
    pub fn load_layout(data: &[u8]) -> Result<Self> {
        Ok(Self::with_layout(Layout::load(data)?))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    pub fn layer_state(&self) -> LayerState {
        self.state.layer_state
    }

    pub fn default_layer_state(&self) -> LayerState {
        self.state.default_layer_state
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.state.debug_enabled
    }

    pub fn is_ready_for_reset(&self) -> bool {
        self.state.ready_for_reset
    }

    /// Forget held actions and mirrored layers
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Key press or release. Custom actions are handled; every other keycode
    /// passes through to normal processing.
    pub fn process_record(&mut self, keycode: Keycode, pressed: bool) -> Outcome {
        let Some(action) = CustomKeyAction::from_keycode(keycode) else {
            return Outcome::pass_through();
        };

        let effects = if pressed {
            log::debug!("{} pressed", action);
            self.press(action)
        } else {
            log::debug!("{} released", action);
            self.release(action)
        };

        self.mirror(&effects);
        Outcome::handled(effects)
    }

    fn press(&mut self, action: CustomKeyAction) -> Vec<Effect> {
        if action.is_momentary() && self.state.is_pending(action) {
            log::warn!("{} pressed again before release, ignoring", action);
            return Vec::new();
        }

        let layer_state = self.state.layer_state;
        match action {
            CustomKeyAction::MomentaryOffHighest => {
                let highest = layer_state.highest();
                if highest > 0 {
                    self.state.save(action, Saved::Layer(highest));
                    vec![Effect::LayerOff(highest)]
                } else {
                    self.state.save(action, Saved::Nothing);
                    Vec::new()
                }
            }
            CustomKeyAction::MomentaryOffAll => {
                self.state.save(action, Saved::State(layer_state));
                vec![Effect::LayerClear]
            }
            CustomKeyAction::ToggleOffAll => vec![Effect::LayerClear],
            CustomKeyAction::MomentaryFn => {
                let offset = self.state.default_layer_state.highest() + 1;
                let fn_layer = (offset < LayerState::MAX_LAYERS).then_some(offset);
                if fn_layer.is_none() {
                    log::warn!("no fn layer above default layer {}", offset - 1);
                }
                self.state.save(action, Saved::FnOffset(fn_layer));
                let mut effects = vec![Effect::LayerOn(Layer::CommonFn.index())];
                effects.extend(fn_layer.map(Effect::LayerOn));
                effects
            }
            CustomKeyAction::HardReset => vec![Effect::HardReset],
            CustomKeyAction::SoftReset => vec![Effect::SoftReset],
            CustomKeyAction::ToggleDebug => {
                let enabled = self.state.toggle_debug();
                log::debug!("debug dump {}", if enabled { "on" } else { "off" });
                Vec::new()
            }
        }
    }

    fn release(&mut self, action: CustomKeyAction) -> Vec<Effect> {
        if !action.is_momentary() {
            return Vec::new();
        }

        match self.state.take(action) {
            None => {
                log::debug!("{} released without a matching press", action);
                Vec::new()
            }
            Some(Saved::Nothing) => Vec::new(),
            Some(Saved::Layer(layer)) => vec![Effect::LayerOn(layer)],
            Some(Saved::State(state)) => vec![Effect::LayerStateSet(state)],
            Some(Saved::FnOffset(fn_layer)) => {
                let mut effects = vec![Effect::LayerOff(Layer::CommonFn.index())];
                effects.extend(fn_layer.map(Effect::LayerOff));
                effects
            }
        }
    }

    /// Override lookup against the active and default layers
    pub fn key_override(&self, keycode: Keycode, mods: ModMask) -> Option<OverrideMatch> {
        let active = self.state.layer_state.union(self.state.default_layer_state);
        let found = self.layout.overrides.find_match(keycode, mods, active);
        if let Some(ref m) = found {
            log::trace!("override {} matched: {} -> {}", m.index, keycode, m.replacement);
        }
        found
    }

    /// Layer state notification, passed through unchanged
    pub fn layer_state_set(&mut self, state: LayerState) -> LayerState {
        self.state.layer_state = state;
        state
    }

    /// Default layer notification; shows the new default layer's color
    pub fn default_layer_state_set(&mut self, state: LayerState) -> LayerOutcome {
        log::debug!("default_layer_state_set: {}({})", state, state.highest());
        self.state.default_layer_state = state;
        LayerOutcome {
            state,
            effects: vec![Effect::SetColor {
                hsv: hsv_for_layer(state.highest()),
                persist: true,
            }],
        }
    }

    pub fn process_detected_host_os(&mut self, os: OsVariant) -> Outcome {
        log::debug!("OS detection: {:?}", os);
        let default_layer_state = self.state.default_layer_state;
        let selected = self.state.os_selected.filter(|&state| state == default_layer_state);
        let effects = select_default_layer(os, selected);
        for effect in &effects {
            if let Effect::DefaultLayerSet(state) = *effect {
                self.state.default_layer_state = state;
                self.state.os_selected = Some(state);
            }
        }
        Outcome::handled(effects)
    }

    pub fn usb_device_state_changed(&mut self, usb_state: UsbDeviceState) -> Vec<Effect> {
        log::debug!("USB device state: {:?}", usb_state);
        if usb_state.arms_reset() {
            self.state.ready_for_reset = true;
        }
        vec![Effect::SetColor {
            hsv: usb_state.indicator(),
            persist: false,
        }]
    }

    /// Soft reset once per configured connection, so the host re-runs OS detection
    pub fn suspend_power_down(&mut self) -> Vec<Effect> {
        if !self.state.ready_for_reset {
            return Vec::new();
        }
        log::debug!("Power down");
        self.state.ready_for_reset = false;
        vec![Effect::SoftReset]
    }

    /// Indicator frame for `[led_min, led_max)`; never consumes the frame
    pub fn rgb_indicators(&self, led_min: u8, led_max: u8) -> Outcome {
        Outcome::unhandled_with(paint_indicators(
            &self.layout.keymap,
            &self.layout.leds,
            self.state.layer_state,
            self.state.default_layer_state,
            led_min,
            led_max,
        ))
    }

    /// Periodic tick; returns a snapshot when a debug dump is due
    pub fn matrix_scan(&mut self, now_ms: u16) -> Option<DebugSnapshot> {
        let last = match self.state.debug_timer {
            Some(last) => last,
            None => {
                self.state.debug_timer = Some(now_ms);
                now_ms
            }
        };

        if !self.state.debug_enabled || !self.throttle.is_due(last, now_ms) {
            return None;
        }

        let snapshot = DebugSnapshot {
            layer_state: self.state.layer_state,
            default_layer_state: self.state.default_layer_state,
        };
        for line in snapshot.to_string().lines() {
            log::info!("{}", line);
        }
        self.state.debug_timer = Some(now_ms);
        Some(snapshot)
    }

    /// Route one host callback and apply the resulting effects to `host`.
    ///
    /// Returns whether the event was handled.
    pub fn dispatch<H: Host + ?Sized>(&mut self, event: HostEvent, host: &mut H) -> bool {
        match event {
            HostEvent::Key(record) => {
                let outcome = self.process_record(record.keycode, record.pressed);
                self.apply(&outcome.effects, host);
                outcome.handled
            }
            HostEvent::LayerStateChanged(state) => {
                self.layer_state_set(state);
                false
            }
            HostEvent::DefaultLayerStateChanged(state) => {
                let outcome = self.default_layer_state_set(state);
                self.apply(&outcome.effects, host);
                false
            }
            HostEvent::HostOsDetected(os) => {
                let outcome = self.process_detected_host_os(os);
                self.apply(&outcome.effects, host);
                outcome.handled
            }
            HostEvent::UsbStateChanged(usb_state) => {
                let effects = self.usb_device_state_changed(usb_state);
                self.apply(&effects, host);
                false
            }
            HostEvent::SuspendPowerDown => {
                let effects = self.suspend_power_down();
                self.apply(&effects, host);
                false
            }
            HostEvent::MatrixScan(now_ms) => {
                if let Some(snapshot) = self.matrix_scan(now_ms) {
                    host.debug_dump(&snapshot);
                }
                false
            }
            HostEvent::Indicators { led_min, led_max } => {
                let outcome = self.rgb_indicators(led_min, led_max);
                self.apply(&outcome.effects, host);
                outcome.handled
            }
        }
    }

    /// Hands effects to the host. A default layer change is notified back,
    /// as the firmware does after `default_layer_set`.
    fn apply<H: Host + ?Sized>(&mut self, effects: &[Effect], host: &mut H) {
        for effect in effects {
            host.apply(effect);
            if let Effect::DefaultLayerSet(state) = *effect {
                let outcome = self.default_layer_state_set(state);
                for follow_up in &outcome.effects {
                    host.apply(follow_up);
                }
            }
        }
    }

    fn mirror(&mut self, effects: &[Effect]) {
        for effect in effects {
            self.state.layer_state = effect.apply_to_layers(self.state.layer_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router_with(layers: &[Layer]) -> KeyEventRouter {
        let mut router = KeyEventRouter::new();
        router.layer_state_set(LayerState::from_layers(layers));
        router
    }

    #[test]
    fn test_unknown_keycode_passes_through() {
        let mut router = KeyEventRouter::new();
        assert_eq!(router.process_record(Keycode::A, true), Outcome::pass_through());
    }

    #[test]
    fn test_mof_hl_round_trip() {
        let mut router = router_with(&[Layer::MacBase, Layer::WinFn]);
        let kc = CustomKeyAction::MomentaryOffHighest.keycode();

        let press = router.process_record(kc, true);
        assert_eq!(press.effects, vec![Effect::LayerOff(3)]);
        assert_eq!(router.layer_state(), LayerState(0b1));

        let release = router.process_record(kc, false);
        assert_eq!(release.effects, vec![Effect::LayerOn(3)]);
        assert_eq!(router.layer_state(), LayerState(0b1001));
    }

    #[test]
    fn test_reentrant_press_rejected() {
        let mut router = router_with(&[Layer::Numpad, Layer::Mouse]);
        let kc = CustomKeyAction::MomentaryOffHighest.keycode();

        router.process_record(kc, true);
        let second = router.process_record(kc, true);
        assert!(second.handled);
        assert!(second.effects.is_empty());
        assert_eq!(router.layer_state(), Layer::Numpad.mask());
    }

    #[test]
    fn test_mofn_on_top_default_layer() {
        let mut router = KeyEventRouter::new();
        router.default_layer_state_set(LayerState::single(31));
        let kc = CustomKeyAction::MomentaryFn.keycode();

        let press = router.process_record(kc, true);
        assert_eq!(press.effects, vec![Effect::LayerOn(4)]);

        let release = router.process_record(kc, false);
        assert_eq!(release.effects, vec![Effect::LayerOff(4)]);
        assert_eq!(router.layer_state(), LayerState::EMPTY);
    }

    #[test]
    fn test_boot_default_is_mac_base() {
        let mut router = KeyEventRouter::new();
        assert_eq!(router.default_layer_state(), Layer::MacBase.mask());

        router.default_layer_state_set(Layer::WinBase.mask());
        router.reset();
        assert_eq!(router.default_layer_state(), Layer::MacBase.mask());
    }

    #[test]
    fn test_mofn_uses_offset_from_press() {
        let mut router = KeyEventRouter::new();
        router.default_layer_state_set(Layer::WinBase.mask());
        let kc = CustomKeyAction::MomentaryFn.keycode();

        router.process_record(kc, true);
        assert_eq!(router.layer_state(), LayerState::from_layers(&[Layer::WinFn, Layer::CommonFn]));

        router.default_layer_state_set(Layer::MacBase.mask());
        let release = router.process_record(kc, false);
        assert_eq!(release.effects, vec![Effect::LayerOff(4), Effect::LayerOff(3)]);
        assert_eq!(router.layer_state(), LayerState::EMPTY);
    }

    #[test]
    fn test_debug_toggle_handled() {
        let mut router = KeyEventRouter::new();
        let outcome = router.process_record(CustomKeyAction::ToggleDebug.keycode(), true);
        assert!(outcome.handled);
        assert!(router.is_debug_enabled());
    }
}
