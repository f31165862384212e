use keyrouter_core::klb::{KlbError, KlbLoader};
use keyrouter_core::*;
use pretty_assertions::assert_eq;

mod common;
use common::hex_bytes;

/// Two layers over a 1x2 matrix, a name, a debug interval and one override
const TWO_LAYER_KLB: &str = "
    4b4c5242 01 00 02 01 02 00 0200 0100
    6e616d65 0200 4b31
    64626769 0200 e803
    2900 2052
    0100 0400
    00 ff
    02 2f00 2600 01000000
";

#[test]
fn test_load_header_and_sections() {
    let file = KlbLoader::load(&hex_bytes(TWO_LAYER_KLB)).unwrap();

    assert_eq!(file.header.magic_code, KLB_MAGIC);
    assert_eq!(file.header.major_version, 1);
    assert_eq!((file.header.layer_count, file.header.rows, file.header.cols), (2, 1, 2));
    assert_eq!(file.info_string(INFO_NAME).as_deref(), Some("K1"));
    assert_eq!(file.info_u16(INFO_DEBUG_INTERVAL), Some(1000));
    assert_eq!(file.info(INFO_DESCRIPTION), None);
    assert_eq!(file.keymap, vec![0x0029, 0x5220, 0x0001, 0x0004]);
    assert_eq!(file.leds, vec![0, NO_LED]);
    assert_eq!(
        file.overrides,
        vec![OverrideEntry { mods: 0x02, trigger: 0x002F, replacement: 0x0026, layers: 1 }]
    );
}

#[test]
fn test_layout_from_bytes() {
    let layout = Layout::load(&hex_bytes(TWO_LAYER_KLB)).unwrap();

    assert_eq!(layout.name, "K1");
    assert_eq!(layout.description, "");
    assert_eq!(layout.config.debug_interval_ms, 1000);
    assert_eq!(layout.keymap.layer_count(), 2);
    assert_eq!(layout.keymap.keycode(0, 0, 0), Keycode::ESC);
    assert_eq!(layout.keymap.keycode(0, 0, 1), Keycode::momentary(0));
    assert_eq!(layout.keymap.keycode(1, 0, 0), Keycode::TRNS);
    assert_eq!(layout.keymap.keycode(1, 0, 1), Keycode::A);
    assert_eq!(layout.leds.index(0, 0), 0);
    assert_eq!(layout.leds.index(0, 1), NO_LED);
    assert_eq!(layout.leds.led_count(), 1);

    let found = layout
        .overrides
        .find_match(Keycode::LBRC, ModMask::LSFT, LayerState(1))
        .unwrap();
    assert_eq!(found.replacement, Keycode::N9);
    assert!(layout.overrides.find_match(Keycode::LBRC, ModMask::LSFT, LayerState(2)).is_none());
}

#[test]
fn test_router_runs_loaded_layout() {
    let layout = Layout::load(&hex_bytes(TWO_LAYER_KLB)).unwrap();
    let mut router = KeyEventRouter::with_layout(layout);
    router.default_layer_state_set(LayerState(1));

    assert!(router.key_override(Keycode::LBRC, ModMask::LSFT).is_some());

    router.layer_state_set(LayerState(0b11));
    let outcome = router.rgb_indicators(0, 255);
    // Layer 1 binds KC_A only on the position without an LED
    assert!(outcome.effects.is_empty());
}

#[test]
fn test_bad_magic() {
    let mut data = hex_bytes(TWO_LAYER_KLB);
    data[..4].copy_from_slice(b"KLRA");
    assert!(matches!(
        KlbLoader::load(&data),
        Err(KlbError::InvalidMagicCode(magic)) if &magic == b"KLRA"
    ));
}

#[test]
fn test_unsupported_version() {
    let mut data = hex_bytes(TWO_LAYER_KLB);
    data[4] = 2;
    data[5] = 3;

    let err = KlbLoader::load(&data).unwrap_err();
    assert!(matches!(err, KlbError::UnsupportedVersion { major: 2, minor: 3 }));
    assert_eq!(err.to_string(), "Unsupported version: 2.3");

    // Surfaces through the layout loader as a wrapped format error
    assert!(matches!(
        Layout::load(&data),
        Err(Error::Klb(KlbError::UnsupportedVersion { .. }))
    ));
}

#[test]
fn test_minor_version_is_accepted() {
    let mut data = hex_bytes(TWO_LAYER_KLB);
    data[5] = 9;
    assert_eq!(KlbLoader::load(&data).unwrap().header.minor_version, 9);
}

#[test]
fn test_too_many_layers() {
    let data = hex_bytes("4b4c5242 01 00 21 01 01 00 0000 0000");
    assert!(matches!(
        KlbLoader::load(&data),
        Err(KlbError::InvalidDimensions { layers: 33, rows: 1, cols: 1 })
    ));
}

#[test]
fn test_zero_sized_matrix() {
    let data = hex_bytes("4b4c5242 01 00 01 00 11 00 0000 0000");
    assert!(matches!(
        KlbLoader::load(&data),
        Err(KlbError::InvalidDimensions { rows: 0, .. })
    ));
}

#[test]
fn test_short_header() {
    let data = hex_bytes("4b4c5242 01 00 01");
    assert!(matches!(KlbLoader::load(&data), Err(KlbError::FileTooSmall(7))));
}

#[test]
fn test_truncated_sections() {
    let data = hex_bytes(TWO_LAYER_KLB);
    // Cut inside the override entry, then inside the LED section
    for len in [data.len() - 1, data.len() - 10] {
        assert!(
            matches!(KlbLoader::load(&data[..len]), Err(KlbError::Io(_))),
            "length {}",
            len
        );
    }
}

#[test]
fn test_trailing_data() {
    let mut data = hex_bytes(TWO_LAYER_KLB);
    data.extend_from_slice(&[0xAA, 0xBB]);
    assert!(matches!(KlbLoader::load(&data), Err(KlbError::TrailingData(2))));
}

#[test]
fn test_short_debug_interval_is_ignored() {
    // dbgi with a single byte falls back to the default interval
    let data = hex_bytes(
        "4b4c5242 01 00 01 01 01 00 0100 0000
         64626769 0100 05
         0400
         00",
    );
    let layout = Layout::load(&data).unwrap();
    assert_eq!(layout.config.debug_interval_ms, RouterConfig::DEFAULT_DEBUG_INTERVAL_MS);
    assert_eq!(layout.keymap.keycode(0, 0, 0), Keycode::A);
}

#[test]
fn test_compiled_bytes_load() {
    let bytes = kls2klb::compile_kls_to_bytes("layer 0 { [ KC_ESC KC_A ] [ KC_B KC_C ] }").unwrap();
    let file = KlbLoader::load(&bytes).unwrap();
    assert_eq!((file.header.layer_count, file.header.rows, file.header.cols), (1, 2, 2));
    assert_eq!(file.keymap, vec![0x29, 0x04, 0x05, 0x06]);
    assert_eq!(file.leds, vec![0, 1, 2, 3]);
}
