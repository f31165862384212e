//! USB device power state indication

use super::color::Hsv;

/// Device state reported by the host's USB stack
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsbDeviceState {
    NoInit = 0,
    Init = 1,
    Configured = 2,
    Suspend = 3,
}

impl UsbDeviceState {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(UsbDeviceState::NoInit),
            1 => Some(UsbDeviceState::Init),
            2 => Some(UsbDeviceState::Configured),
            3 => Some(UsbDeviceState::Suspend),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "no-init" | "no_init" | "noinit" => Some(UsbDeviceState::NoInit),
            "init" => Some(UsbDeviceState::Init),
            "configured" => Some(UsbDeviceState::Configured),
            "suspend" => Some(UsbDeviceState::Suspend),
            _ => None,
        }
    }

    /// Indicator color shown while in this state
    pub fn indicator(self) -> Hsv {
        match self {
            UsbDeviceState::Init => Hsv::RED,
            UsbDeviceState::NoInit => Hsv::PURPLE,
            UsbDeviceState::Configured => Hsv::GREEN,
            UsbDeviceState::Suspend => Hsv::ORANGE,
        }
    }

    /// Whether entering this state arms the soft reset on power down
    pub fn arms_reset(self) -> bool {
        self == UsbDeviceState::Configured
    }
}
