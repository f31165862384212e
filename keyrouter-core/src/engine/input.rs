//! Input events delivered to the router by the host firmware

use crate::types::{Keycode, LayerState, ModMask};
use super::os::OsVariant;
use super::power::UsbDeviceState;

/// A key press or release resolved to the keycode of the active layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    pub keycode: Keycode,
    /// `true` for a press, `false` for a release
    pub pressed: bool,
    /// Modifiers held while this key changed state
    pub mods: ModMask,
}

impl KeyRecord {
    pub fn press(keycode: Keycode) -> Self {
        Self {
            keycode,
            pressed: true,
            mods: ModMask::NONE,
        }
    }

    pub fn release(keycode: Keycode) -> Self {
        Self {
            keycode,
            pressed: false,
            mods: ModMask::NONE,
        }
    }

    pub fn with_mods(mut self, mods: ModMask) -> Self {
        self.mods = mods;
        self
    }
}

/// Every callback the host can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Key(KeyRecord),
    LayerStateChanged(LayerState),
    DefaultLayerStateChanged(LayerState),
    HostOsDetected(OsVariant),
    UsbStateChanged(UsbDeviceState),
    SuspendPowerDown,
    /// Periodic matrix scan carrying the 16-bit millisecond tick
    MatrixScan(u16),
    /// Indicator frame for the LED range `[min, max)`
    Indicators { led_min: u8, led_max: u8 },
}
