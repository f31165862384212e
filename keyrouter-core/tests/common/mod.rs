#![allow(dead_code)]

use keyrouter_core::{CustomKeyAction, Effect, KeyEventRouter, Layer, LayerState, Layout};

/// Compiles KLS source through the real compiler and loads the KLB bytes
pub fn compile_layout(source: &str) -> Layout {
    let bytes = kls2klb::compile_kls_to_bytes(source).expect("script should compile");
    Layout::load(&bytes).expect("compiled layout should load")
}

/// Built-in router with the given layers active
pub fn router_with_layers(layers: &[Layer]) -> KeyEventRouter {
    let mut router = KeyEventRouter::new();
    router.layer_state_set(LayerState::from_layers(layers));
    router
}

/// Built-in router on the given default layer, with only that layer active
pub fn router_on_base(base: Layer) -> KeyEventRouter {
    let mut router = KeyEventRouter::new();
    router.default_layer_state_set(base.mask());
    router.layer_state_set(base.mask());
    router
}

/// Press then release an action, returning the effects of each
pub fn tap(router: &mut KeyEventRouter, action: CustomKeyAction) -> (Vec<Effect>, Vec<Effect>) {
    let press = router.process_record(action.keycode(), true);
    let release = router.process_record(action.keycode(), false);
    (press.effects, release.effects)
}

/// Parses a hex fixture, ignoring whitespace
pub fn hex_bytes(text: &str) -> Vec<u8> {
    let compact: String = text.split_whitespace().collect();
    hex::decode(compact).expect("valid hex fixture")
}
