use std::collections::HashMap;
use std::fmt;

use super::modifiers::ModMask;

/// A 16-bit keycode in the host firmware's encoding.
///
/// Basic codes follow the HID usage table, modifier-wrapped codes carry a
/// 5-bit modifier field in bits 8..=12, and the layer/RGB/keyboard ranges sit
/// above that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Keycode(pub u16);

// Range bases
pub const QK_BASIC_MAX: u16 = 0x00FF;
pub const QK_MODS: u16 = 0x0100;
pub const QK_MODS_MAX: u16 = 0x1FFF;
pub const QK_TO: u16 = 0x5200;
pub const QK_MOMENTARY: u16 = 0x5220;
pub const QK_DEF_LAYER: u16 = 0x5240;
pub const QK_TOGGLE_LAYER: u16 = 0x5260;
pub const QK_LAYER_MAX: u16 = 0x527F;
pub const QK_KB_0: u16 = 0x7E00;

/// First keycode available to the keymap after the keyboard-level codes.
pub const NEW_SAFE_RANGE: u16 = QK_KB_0 + 13;

impl Keycode {
    pub const NO: Self = Self(0x0000);
    pub const TRNS: Self = Self(0x0001);

    // Letters
    pub const A: Self = Self(0x04);
    pub const B: Self = Self(0x05);
    pub const C: Self = Self(0x06);
    pub const D: Self = Self(0x07);
    pub const E: Self = Self(0x08);
    pub const F: Self = Self(0x09);
    pub const G: Self = Self(0x0A);
    pub const H: Self = Self(0x0B);
    pub const I: Self = Self(0x0C);
    pub const J: Self = Self(0x0D);
    pub const K: Self = Self(0x0E);
    pub const L: Self = Self(0x0F);
    pub const M: Self = Self(0x10);
    pub const N: Self = Self(0x11);
    pub const O: Self = Self(0x12);
    pub const P: Self = Self(0x13);
    pub const Q: Self = Self(0x14);
    pub const R: Self = Self(0x15);
    pub const S: Self = Self(0x16);
    pub const T: Self = Self(0x17);
    pub const U: Self = Self(0x18);
    pub const V: Self = Self(0x19);
    pub const W: Self = Self(0x1A);
    pub const X: Self = Self(0x1B);
    pub const Y: Self = Self(0x1C);
    pub const Z: Self = Self(0x1D);

    // Digits
    pub const N1: Self = Self(0x1E);
    pub const N2: Self = Self(0x1F);
    pub const N3: Self = Self(0x20);
    pub const N4: Self = Self(0x21);
    pub const N5: Self = Self(0x22);
    pub const N6: Self = Self(0x23);
    pub const N7: Self = Self(0x24);
    pub const N8: Self = Self(0x25);
    pub const N9: Self = Self(0x26);
    pub const N0: Self = Self(0x27);

    // Control and punctuation
    pub const ENT: Self = Self(0x28);
    pub const ESC: Self = Self(0x29);
    pub const BSPC: Self = Self(0x2A);
    pub const TAB: Self = Self(0x2B);
    pub const SPC: Self = Self(0x2C);
    pub const MINS: Self = Self(0x2D);
    pub const EQL: Self = Self(0x2E);
    pub const LBRC: Self = Self(0x2F);
    pub const RBRC: Self = Self(0x30);
    pub const BSLS: Self = Self(0x31);
    pub const NUHS: Self = Self(0x32);
    pub const SCLN: Self = Self(0x33);
    pub const QUOT: Self = Self(0x34);
    pub const GRV: Self = Self(0x35);
    pub const COMM: Self = Self(0x36);
    pub const DOT: Self = Self(0x37);
    pub const SLSH: Self = Self(0x38);
    pub const CAPS: Self = Self(0x39);

    // Function keys
    pub const F1: Self = Self(0x3A);
    pub const F2: Self = Self(0x3B);
    pub const F3: Self = Self(0x3C);
    pub const F4: Self = Self(0x3D);
    pub const F5: Self = Self(0x3E);
    pub const F6: Self = Self(0x3F);
    pub const F7: Self = Self(0x40);
    pub const F8: Self = Self(0x41);
    pub const F9: Self = Self(0x42);
    pub const F10: Self = Self(0x43);
    pub const F11: Self = Self(0x44);
    pub const F12: Self = Self(0x45);

    // Navigation
    pub const PSCR: Self = Self(0x46);
    pub const SCRL: Self = Self(0x47);
    pub const PAUS: Self = Self(0x48);
    pub const INS: Self = Self(0x49);
    pub const HOME: Self = Self(0x4A);
    pub const PGUP: Self = Self(0x4B);
    pub const DEL: Self = Self(0x4C);
    pub const END: Self = Self(0x4D);
    pub const PGDN: Self = Self(0x4E);
    pub const RGHT: Self = Self(0x4F);
    pub const LEFT: Self = Self(0x50);
    pub const DOWN: Self = Self(0x51);
    pub const UP: Self = Self(0x52);

    // Keypad
    pub const NUM: Self = Self(0x53);
    pub const PSLS: Self = Self(0x54);
    pub const PAST: Self = Self(0x55);
    pub const PMNS: Self = Self(0x56);
    pub const PPLS: Self = Self(0x57);
    pub const PENT: Self = Self(0x58);
    pub const P1: Self = Self(0x59);
    pub const P2: Self = Self(0x5A);
    pub const P3: Self = Self(0x5B);
    pub const P4: Self = Self(0x5C);
    pub const P5: Self = Self(0x5D);
    pub const P6: Self = Self(0x5E);
    pub const P7: Self = Self(0x5F);
    pub const P8: Self = Self(0x60);
    pub const P9: Self = Self(0x61);
    pub const P0: Self = Self(0x62);
    pub const PDOT: Self = Self(0x63);
    pub const NUBS: Self = Self(0x64);
    pub const APP: Self = Self(0x65);

    // Media and system
    pub const MUTE: Self = Self(0xA8);
    pub const VOLU: Self = Self(0xA9);
    pub const VOLD: Self = Self(0xAA);
    pub const MNXT: Self = Self(0xAB);
    pub const MPRV: Self = Self(0xAC);
    pub const MSTP: Self = Self(0xAD);
    pub const MPLY: Self = Self(0xAE);
    pub const BRIU: Self = Self(0xBD);
    pub const BRID: Self = Self(0xBE);
    pub const MCTL: Self = Self(0xC1);
    pub const LPAD: Self = Self(0xC2);

    // Mouse keys
    pub const MS_U: Self = Self(0xCD);
    pub const MS_D: Self = Self(0xCE);
    pub const MS_L: Self = Self(0xCF);
    pub const MS_R: Self = Self(0xD0);
    pub const BTN1: Self = Self(0xD1);
    pub const BTN2: Self = Self(0xD2);
    pub const BTN3: Self = Self(0xD3);
    pub const WH_U: Self = Self(0xD9);
    pub const WH_D: Self = Self(0xDA);

    // Modifier keys
    pub const LCTL: Self = Self(0xE0);
    pub const LSFT: Self = Self(0xE1);
    pub const LALT: Self = Self(0xE2);
    pub const LGUI: Self = Self(0xE3);
    pub const RCTL: Self = Self(0xE4);
    pub const RSFT: Self = Self(0xE5);
    pub const RALT: Self = Self(0xE6);
    pub const RGUI: Self = Self(0xE7);

    // Host features
    pub const NK_TOGG: Self = Self(0x7013);
    pub const RGB_TOG: Self = Self(0x7820);
    pub const RGB_MOD: Self = Self(0x7821);
    pub const RGB_RMOD: Self = Self(0x7822);
    pub const RGB_HUI: Self = Self(0x7823);
    pub const RGB_HUD: Self = Self(0x7824);
    pub const RGB_SAI: Self = Self(0x7825);
    pub const RGB_SAD: Self = Self(0x7826);
    pub const RGB_VAI: Self = Self(0x7827);
    pub const RGB_VAD: Self = Self(0x7828);
    pub const RGB_SPI: Self = Self(0x7829);
    pub const RGB_SPD: Self = Self(0x782A);

    // Keyboard-level codes
    pub const LOPTN: Self = Self(QK_KB_0);
    pub const ROPTN: Self = Self(QK_KB_0 + 1);
    pub const LCMMD: Self = Self(QK_KB_0 + 2);
    pub const RCMMD: Self = Self(QK_KB_0 + 3);
    pub const SIRI: Self = Self(QK_KB_0 + 4);
    pub const TASK: Self = Self(QK_KB_0 + 5);
    pub const FILE: Self = Self(QK_KB_0 + 6);
    pub const SNAP: Self = Self(QK_KB_0 + 7);
    pub const CTANA: Self = Self(QK_KB_0 + 8);
    pub const BT_HST1: Self = Self(QK_KB_0 + 9);
    pub const BT_HST2: Self = Self(QK_KB_0 + 10);
    pub const BT_HST3: Self = Self(QK_KB_0 + 11);
    pub const BAT_LVL: Self = Self(QK_KB_0 + 12);

    /// Creates from raw value
    pub const fn from_raw(value: u16) -> Self {
        Self(value)
    }

    /// Gets the raw value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Wraps a basic keycode with modifiers, e.g. `RALT(KC_8)`.
    ///
    /// Modifiers from both sides cannot be combined in this encoding; if any
    /// right-hand bit is present the whole field is marked right-handed.
    pub fn with_mods(self, mods: ModMask) -> Self {
        let basic = self.basic().0;
        let mod5 = mods.to_mod5() as u16;
        Self((mod5 << 8) | basic)
    }

    /// The basic (unmodified) part of this keycode.
    pub fn basic(self) -> Self {
        if self.is_modified() {
            Self(self.0 & QK_BASIC_MAX)
        } else {
            self
        }
    }

    /// Modifiers carried by a modifier-wrapped keycode, empty otherwise.
    pub fn mods(self) -> ModMask {
        if self.is_modified() {
            ModMask::from_mod5(((self.0 >> 8) & 0x1F) as u8)
        } else {
            ModMask::NONE
        }
    }

    pub fn is_modified(self) -> bool {
        (QK_MODS..=QK_MODS_MAX).contains(&self.0)
    }

    pub fn is_basic(self) -> bool {
        self.0 <= QK_BASIC_MAX
    }

    /// Whether this keycode does something on its layer.
    ///
    /// `KC_NO` and `KC_TRNS` both count as empty for indicator purposes.
    pub fn is_bound(self) -> bool {
        self.0 > Self::TRNS.0
    }

    /// `MO(layer)`
    pub const fn momentary(layer: u8) -> Self {
        Self(QK_MOMENTARY | (layer as u16 & 0x1F))
    }

    /// `TG(layer)`
    pub const fn toggle(layer: u8) -> Self {
        Self(QK_TOGGLE_LAYER | (layer as u16 & 0x1F))
    }

    /// `TO(layer)`
    pub const fn to_layer(layer: u8) -> Self {
        Self(QK_TO | (layer as u16 & 0x1F))
    }

    /// `DF(layer)`
    pub const fn default_layer(layer: u8) -> Self {
        Self(QK_DEF_LAYER | (layer as u16 & 0x1F))
    }

    /// Target layer of a layer key (`MO`, `TG`, `TO`, `DF`).
    pub fn layer_target(self) -> Option<u8> {
        if (QK_TO..=QK_LAYER_MAX).contains(&self.0) {
            Some((self.0 & 0x1F) as u8)
        } else {
            None
        }
    }

    /// Looks up a keycode by its symbolic name (`KC_LBRC`, `_______`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        KEYCODE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, kc)| *kc)
    }

    /// Canonical symbolic name for plain (non-composite) keycodes.
    pub fn name(self) -> Option<&'static str> {
        KEYCODE_NAMES
            .iter()
            .find(|(_, kc)| *kc == self)
            .map(|(n, _)| *n)
    }
}

impl From<u16> for Keycode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }
        if self.is_modified() {
            let wrappers = self.mods().bit_names();
            for name in &wrappers {
                write!(f, "{}(", name)?;
            }
            write!(f, "{}", self.basic())?;
            for _ in &wrappers {
                f.write_str(")")?;
            }
            return Ok(());
        }
        if let Some(layer) = self.layer_target() {
            let wrapper = match self.0 & !0x1F {
                QK_TO => "TO",
                QK_MOMENTARY => "MO",
                QK_DEF_LAYER => "DF",
                _ => "TG",
            };
            return write!(f, "{}({})", wrapper, layer);
        }
        write!(f, "{:#06X}", self.0)
    }
}

/// Symbolic names, canonical name first for each keycode.
pub static KEYCODE_NAMES: &[(&str, Keycode)] = &[
    ("KC_NO", Keycode::NO),
    ("XXXXXXX", Keycode::NO),
    ("KC_TRNS", Keycode::TRNS),
    ("KC_TRANSPARENT", Keycode::TRNS),
    ("_______", Keycode::TRNS),
    ("KC_A", Keycode::A),
    ("KC_B", Keycode::B),
    ("KC_C", Keycode::C),
    ("KC_D", Keycode::D),
    ("KC_E", Keycode::E),
    ("KC_F", Keycode::F),
    ("KC_G", Keycode::G),
    ("KC_H", Keycode::H),
    ("KC_I", Keycode::I),
    ("KC_J", Keycode::J),
    ("KC_K", Keycode::K),
    ("KC_L", Keycode::L),
    ("KC_M", Keycode::M),
    ("KC_N", Keycode::N),
    ("KC_O", Keycode::O),
    ("KC_P", Keycode::P),
    ("KC_Q", Keycode::Q),
    ("KC_R", Keycode::R),
    ("KC_S", Keycode::S),
    ("KC_T", Keycode::T),
    ("KC_U", Keycode::U),
    ("KC_V", Keycode::V),
    ("KC_W", Keycode::W),
    ("KC_X", Keycode::X),
    ("KC_Y", Keycode::Y),
    ("KC_Z", Keycode::Z),
    ("KC_1", Keycode::N1),
    ("KC_2", Keycode::N2),
    ("KC_3", Keycode::N3),
    ("KC_4", Keycode::N4),
    ("KC_5", Keycode::N5),
    ("KC_6", Keycode::N6),
    ("KC_7", Keycode::N7),
    ("KC_8", Keycode::N8),
    ("KC_9", Keycode::N9),
    ("KC_0", Keycode::N0),
    ("KC_ENT", Keycode::ENT),
    ("KC_ENTER", Keycode::ENT),
    ("KC_ESC", Keycode::ESC),
    ("KC_ESCAPE", Keycode::ESC),
    ("KC_BSPC", Keycode::BSPC),
    ("KC_BACKSPACE", Keycode::BSPC),
    ("KC_TAB", Keycode::TAB),
    ("KC_SPC", Keycode::SPC),
    ("KC_SPACE", Keycode::SPC),
    ("KC_MINS", Keycode::MINS),
    ("KC_MINUS", Keycode::MINS),
    ("KC_EQL", Keycode::EQL),
    ("KC_EQUAL", Keycode::EQL),
    ("KC_LBRC", Keycode::LBRC),
    ("KC_LEFT_BRACKET", Keycode::LBRC),
    ("KC_RBRC", Keycode::RBRC),
    ("KC_RIGHT_BRACKET", Keycode::RBRC),
    ("KC_BSLS", Keycode::BSLS),
    ("KC_BACKSLASH", Keycode::BSLS),
    ("KC_NUHS", Keycode::NUHS),
    ("KC_SCLN", Keycode::SCLN),
    ("KC_SEMICOLON", Keycode::SCLN),
    ("KC_QUOT", Keycode::QUOT),
    ("KC_QUOTE", Keycode::QUOT),
    ("KC_GRV", Keycode::GRV),
    ("KC_GRAVE", Keycode::GRV),
    ("KC_COMM", Keycode::COMM),
    ("KC_COMMA", Keycode::COMM),
    ("KC_DOT", Keycode::DOT),
    ("KC_SLSH", Keycode::SLSH),
    ("KC_SLASH", Keycode::SLSH),
    ("KC_CAPS", Keycode::CAPS),
    ("KC_CAPS_LOCK", Keycode::CAPS),
    ("KC_F1", Keycode::F1),
    ("KC_F2", Keycode::F2),
    ("KC_F3", Keycode::F3),
    ("KC_F4", Keycode::F4),
    ("KC_F5", Keycode::F5),
    ("KC_F6", Keycode::F6),
    ("KC_F7", Keycode::F7),
    ("KC_F8", Keycode::F8),
    ("KC_F9", Keycode::F9),
    ("KC_F10", Keycode::F10),
    ("KC_F11", Keycode::F11),
    ("KC_F12", Keycode::F12),
    ("KC_PSCR", Keycode::PSCR),
    ("KC_SCRL", Keycode::SCRL),
    ("KC_PAUS", Keycode::PAUS),
    ("KC_INS", Keycode::INS),
    ("KC_INSERT", Keycode::INS),
    ("KC_HOME", Keycode::HOME),
    ("KC_PGUP", Keycode::PGUP),
    ("KC_DEL", Keycode::DEL),
    ("KC_DELETE", Keycode::DEL),
    ("KC_END", Keycode::END),
    ("KC_PGDN", Keycode::PGDN),
    ("KC_RGHT", Keycode::RGHT),
    ("KC_RIGHT", Keycode::RGHT),
    ("KC_LEFT", Keycode::LEFT),
    ("KC_DOWN", Keycode::DOWN),
    ("KC_UP", Keycode::UP),
    ("KC_NUM", Keycode::NUM),
    ("KC_PSLS", Keycode::PSLS),
    ("KC_PAST", Keycode::PAST),
    ("KC_PMNS", Keycode::PMNS),
    ("KC_PPLS", Keycode::PPLS),
    ("KC_PENT", Keycode::PENT),
    ("KC_P1", Keycode::P1),
    ("KC_P2", Keycode::P2),
    ("KC_P3", Keycode::P3),
    ("KC_P4", Keycode::P4),
    ("KC_P5", Keycode::P5),
    ("KC_P6", Keycode::P6),
    ("KC_P7", Keycode::P7),
    ("KC_P8", Keycode::P8),
    ("KC_P9", Keycode::P9),
    ("KC_P0", Keycode::P0),
    ("KC_PDOT", Keycode::PDOT),
    ("KC_NUBS", Keycode::NUBS),
    ("KC_APP", Keycode::APP),
    ("KC_MUTE", Keycode::MUTE),
    ("KC_VOLU", Keycode::VOLU),
    ("KC_VOLD", Keycode::VOLD),
    ("KC_MNXT", Keycode::MNXT),
    ("KC_MPRV", Keycode::MPRV),
    ("KC_MSTP", Keycode::MSTP),
    ("KC_MPLY", Keycode::MPLY),
    ("KC_BRIU", Keycode::BRIU),
    ("KC_BRID", Keycode::BRID),
    ("KC_MCTL", Keycode::MCTL),
    ("KC_LPAD", Keycode::LPAD),
    ("KC_MS_U", Keycode::MS_U),
    ("KC_MS_D", Keycode::MS_D),
    ("KC_MS_L", Keycode::MS_L),
    ("KC_MS_R", Keycode::MS_R),
    ("KC_BTN1", Keycode::BTN1),
    ("KC_BTN2", Keycode::BTN2),
    ("KC_BTN3", Keycode::BTN3),
    ("KC_WH_U", Keycode::WH_U),
    ("KC_WH_D", Keycode::WH_D),
    ("KC_LCTL", Keycode::LCTL),
    ("KC_LSFT", Keycode::LSFT),
    ("KC_LALT", Keycode::LALT),
    ("KC_LGUI", Keycode::LGUI),
    ("KC_LWIN", Keycode::LGUI),
    ("KC_RCTL", Keycode::RCTL),
    ("KC_RSFT", Keycode::RSFT),
    ("KC_RALT", Keycode::RALT),
    ("KC_RGUI", Keycode::RGUI),
    ("NK_TOGG", Keycode::NK_TOGG),
    ("RGB_TOG", Keycode::RGB_TOG),
    ("RGB_MOD", Keycode::RGB_MOD),
    ("RGB_RMOD", Keycode::RGB_RMOD),
    ("RGB_HUI", Keycode::RGB_HUI),
    ("RGB_HUD", Keycode::RGB_HUD),
    ("RGB_SAI", Keycode::RGB_SAI),
    ("RGB_SAD", Keycode::RGB_SAD),
    ("RGB_VAI", Keycode::RGB_VAI),
    ("RGB_VAD", Keycode::RGB_VAD),
    ("RGB_SPI", Keycode::RGB_SPI),
    ("RGB_SPD", Keycode::RGB_SPD),
    ("KC_LOPTN", Keycode::LOPTN),
    ("KC_ROPTN", Keycode::ROPTN),
    ("KC_LCMMD", Keycode::LCMMD),
    ("KC_RCMMD", Keycode::RCMMD),
    ("KC_SIRI", Keycode::SIRI),
    ("KC_TASK", Keycode::TASK),
    ("KC_FILE", Keycode::FILE),
    ("KC_SNAP", Keycode::SNAP),
    ("KC_CTANA", Keycode::CTANA),
    ("BT_HST1", Keycode::BT_HST1),
    ("BT_HST2", Keycode::BT_HST2),
    ("BT_HST3", Keycode::BT_HST3),
    ("BAT_LVL", Keycode::BAT_LVL),
    ("CKC_MOF_HL", Keycode(NEW_SAFE_RANGE)),
    ("CKC_MOF_ALL", Keycode(NEW_SAFE_RANGE + 1)),
    ("CKC_TF_ALL", Keycode(NEW_SAFE_RANGE + 2)),
    ("CKC_MOFN", Keycode(NEW_SAFE_RANGE + 3)),
    ("CKC_HARD_RESET", Keycode(NEW_SAFE_RANGE + 4)),
    ("CKC_SOFT_RESET", Keycode(NEW_SAFE_RANGE + 5)),
    ("CKC_DEBUG", Keycode(NEW_SAFE_RANGE + 6)),
];

/// Name lookup map for compilers that resolve many names in a row.
pub fn create_keycode_map() -> HashMap<&'static str, Keycode> {
    KEYCODE_NAMES.iter().copied().collect()
}
