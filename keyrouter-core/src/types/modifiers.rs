//! Live modifier masks and override requirements

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// 8-bit modifier mask as reported by the host: left modifiers in the low
/// nibble, right modifiers in the high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModMask(pub u8);

impl ModMask {
    pub const NONE: Self = Self(0x00);
    pub const LCTL: Self = Self(0x01);
    pub const LSFT: Self = Self(0x02);
    pub const LALT: Self = Self(0x04);
    pub const LGUI: Self = Self(0x08);
    pub const RCTL: Self = Self(0x10);
    pub const RSFT: Self = Self(0x20);
    pub const RALT: Self = Self(0x40);
    pub const RGUI: Self = Self(0x80);

    pub const CTRL: Self = Self(0x11);
    pub const SHIFT: Self = Self(0x22);
    pub const ALT: Self = Self(0x44);
    pub const GUI: Self = Self(0x88);

    /// Order used when naming individual bits.
    const BIT_NAMES: [(&'static str, ModMask); 8] = [
        ("LCTL", Self::LCTL),
        ("LSFT", Self::LSFT),
        ("LALT", Self::LALT),
        ("LGUI", Self::LGUI),
        ("RCTL", Self::RCTL),
        ("RSFT", Self::RSFT),
        ("RALT", Self::RALT),
        ("RGUI", Self::RGUI),
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: ModMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: ModMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Decodes the 5-bit modifier field of a modifier-wrapped keycode.
    pub fn from_mod5(mod5: u8) -> Self {
        let kinds = mod5 & 0x0F;
        if mod5 & 0x10 != 0 {
            Self(kinds << 4)
        } else {
            Self(kinds)
        }
    }

    /// Encodes into the 5-bit modifier field of a keycode.
    pub fn to_mod5(self) -> u8 {
        let left = self.0 & 0x0F;
        let right = self.0 >> 4;
        if right != 0 {
            0x10 | left | right
        } else {
            left
        }
    }

    /// Names of the set bits, e.g. `["RSFT", "RALT"]`.
    pub fn bit_names(self) -> Vec<&'static str> {
        Self::BIT_NAMES
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Whether a live modifier mask satisfies this mask taken as a requirement.
    ///
    /// A one-sided bit must be held on that side. When both sides of a kind
    /// are required, either side is enough.
    pub fn satisfied_by(self, live: ModMask) -> bool {
        (0..4).all(|kind| {
            let left = 1u8 << kind;
            let right = left << 4;
            match (self.0 & left != 0, self.0 & right != 0) {
                (false, false) => true,
                (true, true) => live.0 & (left | right) != 0,
                (true, false) => live.0 & left != 0,
                (false, true) => live.0 & right != 0,
            }
        })
    }

    /// Whether every live mask satisfying `other` also satisfies `self`.
    pub fn implied_by(self, other: ModMask) -> bool {
        (0..4).all(|kind| {
            let left = 1u8 << kind;
            let right = left << 4;
            let theirs = (other.0 & left != 0, other.0 & right != 0);
            match (self.0 & left != 0, self.0 & right != 0) {
                (false, false) => true,
                (true, true) => theirs != (false, false),
                (true, false) => theirs == (true, false),
                (false, true) => theirs == (false, true),
            }
        })
    }

    /// Modifier names accepted in scripts and chords.
    pub fn from_name(name: &str) -> Option<Self> {
        let mask = match name {
            "MOD_BIT_LCTRL" | "LCTL" | "LCTRL" => Self::LCTL,
            "MOD_BIT_LSHIFT" | "LSFT" | "LSHIFT" | "S" => Self::LSFT,
            "MOD_BIT_LALT" | "LALT" | "LOPT" => Self::LALT,
            "MOD_BIT_LGUI" | "LGUI" | "LCMD" | "LWIN" => Self::LGUI,
            "MOD_BIT_RCTRL" | "RCTL" | "RCTRL" => Self::RCTL,
            "MOD_BIT_RSHIFT" | "RSFT" | "RSHIFT" => Self::RSFT,
            "MOD_BIT_RALT" | "RALT" | "ROPT" | "ALGR" => Self::RALT,
            "MOD_BIT_RGUI" | "RGUI" | "RCMD" | "RWIN" => Self::RGUI,
            "MOD_MASK_CTRL" => Self::CTRL,
            "MOD_MASK_SHIFT" => Self::SHIFT,
            "MOD_MASK_ALT" => Self::ALT,
            "MOD_MASK_GUI" => Self::GUI,
            "MOD_MASK_CS" => Self::CTRL | Self::SHIFT,
            "MOD_MASK_CA" => Self::CTRL | Self::ALT,
            "MOD_MASK_SA" => Self::SHIFT | Self::ALT,
            _ => return None,
        };
        Some(mask)
    }
}

impl BitOr for ModMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ModMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for ModMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        f.write_str(&self.bit_names().join("|"))
    }
}
