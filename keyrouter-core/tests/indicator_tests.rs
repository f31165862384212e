use keyrouter_core::*;

mod common;
use common::*;

fn painted(outcome: &Outcome) -> Vec<(u8, Hsv)> {
    outcome
        .effects
        .iter()
        .filter_map(|effect| match *effect {
            Effect::PaintLed { index, hsv } => Some((index, hsv)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_indicators_never_handled() {
    let mut router = router_on_base(Layer::MacBase);
    assert!(!router.rgb_indicators(0, 255).handled);

    router.layer_state_set(LayerState::from_layers(&[Layer::MacBase, Layer::Numpad]));
    let outcome = router.rgb_indicators(0, 255);
    assert!(!outcome.handled);
    assert!(!outcome.effects.is_empty());
}

#[test]
fn test_base_only_paints_nothing() {
    // The default layer itself is never painted
    for base in [Layer::MacBase, Layer::WinBase] {
        let router = router_on_base(base);
        assert!(router.rgb_indicators(0, 255).effects.is_empty(), "{}", base);
    }
}

#[test]
fn test_fn_layers_paint_yellow() {
    let mut router = router_on_base(Layer::WinBase);
    router.process_record(CustomKeyAction::MomentaryFn.keycode(), true);

    let leds = painted(&router.rgb_indicators(0, 255));
    assert!(leds.iter().all(|(_, hsv)| *hsv == Hsv::YELLOW));
    // 29 keys on WIN_FN, 7 on COMMON_FN
    assert_eq!(leds.len(), 36);

    // Fn key itself is transparent on both overlays
    let fn_led = router.layout().leds.index(5, 6);
    assert!(leds.iter().all(|(index, _)| *index != fn_led));
}

#[test]
fn test_higher_layer_paints_last() {
    let router = router_with_layers(&[Layer::MacBase, Layer::Numpad, Layer::Mouse]);
    let leds = painted(&router.rgb_indicators(0, 255));

    // Row 2 col 7 is KC_P4 on NUMPAD and KC_WH_U on MOUSE
    let shared = router.layout().leds.index(2, 7);
    let colors: Vec<Hsv> = leds
        .iter()
        .filter(|(index, _)| *index == shared)
        .map(|(_, hsv)| *hsv)
        .collect();
    assert_eq!(colors, vec![Hsv::GREEN, Hsv::PURPLE]);
}

#[test]
fn test_led_window() {
    let router = router_with_layers(&[Layer::MacBase, Layer::Numpad]);
    let full = painted(&router.rgb_indicators(0, 255));
    let first = painted(&router.rgb_indicators(0, 44));
    let second = painted(&router.rgb_indicators(44, 88));

    assert_eq!(first.len() + second.len(), full.len());
    assert!(first.iter().all(|(index, _)| *index < 44));
    assert!(second.iter().all(|(index, _)| (44..88).contains(index)));
    assert!(painted(&router.rgb_indicators(88, 255)).is_empty());
}

#[test]
fn test_compiled_layout_indicators() {
    let layout = compile_layout(
        r#"
layer 0 { [ KC_A KC_B KC_C ] }
layer 3 { [ _______ KC_1 XXXXXXX ] }
leds { [ 10 NO_LED 12 ] }
"#,
    );
    let mut router = KeyEventRouter::with_layout(layout);
    router.layer_state_set(LayerState::from_layers(&[Layer::MacBase, Layer::WinFn]));

    // KC_1 sits on a position without an LED
    assert!(router.rgb_indicators(0, 255).effects.is_empty());

    let layout = compile_layout(
        r#"
layer 0 { [ KC_A KC_B KC_C ] }
layer 5 { [ _______ KC_1 KC_2 ] }
"#,
    );
    let mut router = KeyEventRouter::with_layout(layout);
    router.layer_state_set(LayerState(0b10_0001));
    assert_eq!(
        router.rgb_indicators(0, 255).effects,
        vec![
            Effect::PaintLed { index: 1, hsv: Hsv::GREEN },
            Effect::PaintLed { index: 2, hsv: Hsv::GREEN },
        ]
    );
}
