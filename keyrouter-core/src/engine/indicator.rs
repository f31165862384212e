//! Per-frame LED painting for active overlay layers

use crate::keymap::{Keymap, LedMatrix, NO_LED};
use crate::types::LayerState;
use super::color::hsv_for_layer;
use super::output::Effect;

/// Paints every LED in `[led_min, led_max)` bound on an active layer other
/// than the current default layer.
///
/// Layers are visited in ascending order, so a higher layer repaints the LEDs
/// it shares with a lower one. Nothing is painted while only layer 0 is active.
pub fn paint_indicators(
    keymap: &Keymap,
    leds: &LedMatrix,
    layer_state: LayerState,
    default_layer_state: LayerState,
    led_min: u8,
    led_max: u8,
) -> Vec<Effect> {
    let top = layer_state.highest();
    if top == 0 {
        return Vec::new();
    }

    let default_layer = default_layer_state.highest();
    let mut effects = Vec::new();

    for layer in (0..=top).filter(|&layer| layer_state.is_on(layer) && layer != default_layer) {
        let hsv = hsv_for_layer(layer);
        for row in 0..keymap.rows() {
            for col in 0..keymap.cols() {
                let index = leds.index(row, col);
                if index >= led_min
                    && index < led_max
                    && index != NO_LED
                    && keymap.keycode(layer, row, col).is_bound()
                {
                    effects.push(Effect::PaintLed { index, hsv });
                }
            }
        }
    }

    effects
}
