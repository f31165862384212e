//! Custom keycodes handled by the router

use std::fmt;

use crate::types::{Keycode, NEW_SAFE_RANGE};

/// Keymap-level actions living right after the keyboard's own keycodes.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomKeyAction {
    /// Momentarily turn off the highest active layer
    MomentaryOffHighest = NEW_SAFE_RANGE,
    /// Momentarily turn off every layer
    MomentaryOffAll,
    /// Turn off every layer until something turns them back on
    ToggleOffAll,
    /// Momentarily turn on the common fn layer and the OS fn layer
    MomentaryFn,
    HardReset,
    SoftReset,
    /// Flip the periodic debug dump
    ToggleDebug,
}

impl CustomKeyAction {
    pub const ALL: [CustomKeyAction; 7] = [
        CustomKeyAction::MomentaryOffHighest,
        CustomKeyAction::MomentaryOffAll,
        CustomKeyAction::ToggleOffAll,
        CustomKeyAction::MomentaryFn,
        CustomKeyAction::HardReset,
        CustomKeyAction::SoftReset,
        CustomKeyAction::ToggleDebug,
    ];

    pub fn from_keycode(keycode: Keycode) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.keycode() == keycode)
    }

    pub const fn keycode(self) -> Keycode {
        Keycode(self as u16)
    }

    /// Actions whose release undoes what the press did
    pub fn is_momentary(self) -> bool {
        matches!(
            self,
            CustomKeyAction::MomentaryOffHighest
                | CustomKeyAction::MomentaryOffAll
                | CustomKeyAction::MomentaryFn
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            CustomKeyAction::MomentaryOffHighest => "CKC_MOF_HL",
            CustomKeyAction::MomentaryOffAll => "CKC_MOF_ALL",
            CustomKeyAction::ToggleOffAll => "CKC_TF_ALL",
            CustomKeyAction::MomentaryFn => "CKC_MOFN",
            CustomKeyAction::HardReset => "CKC_HARD_RESET",
            CustomKeyAction::SoftReset => "CKC_SOFT_RESET",
            CustomKeyAction::ToggleDebug => "CKC_DEBUG",
        }
    }
}

impl fmt::Display for CustomKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
