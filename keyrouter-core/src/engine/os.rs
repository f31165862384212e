//! Host OS classification and the default layer it selects

use crate::types::{Layer, LayerState};
use super::color::Hsv;
use super::output::Effect;

/// Host OS as classified by the firmware's detection heuristics
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsVariant {
    Unsure = 0,
    Linux = 1,
    Windows = 2,
    MacOs = 3,
    Ios = 4,
}

impl OsVariant {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(OsVariant::Unsure),
            1 => Some(OsVariant::Linux),
            2 => Some(OsVariant::Windows),
            3 => Some(OsVariant::MacOs),
            4 => Some(OsVariant::Ios),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "unsure" => Some(OsVariant::Unsure),
            "linux" => Some(OsVariant::Linux),
            "windows" | "win" => Some(OsVariant::Windows),
            "macos" | "mac" => Some(OsVariant::MacOs),
            "ios" => Some(OsVariant::Ios),
            _ => None,
        }
    }

    /// Base layer matching this OS, `None` when undetermined
    pub fn base_layer(self) -> Option<Layer> {
        match self {
            OsVariant::MacOs | OsVariant::Ios => Some(Layer::MacBase),
            OsVariant::Windows | OsVariant::Linux => Some(Layer::WinBase),
            OsVariant::Unsure => None,
        }
    }
}

/// Effects for a detection, given the default layers an earlier detection
/// selected and that are still in place.
///
/// Re-detecting the OS that is already selected changes nothing.
pub fn select_default_layer(os: OsVariant, selected: Option<LayerState>) -> Vec<Effect> {
    match os.base_layer() {
        Some(layer) if selected == Some(layer.mask()) => Vec::new(),
        Some(layer) => vec![Effect::DefaultLayerSet(layer.mask())],
        None => vec![Effect::SetColor {
            hsv: Hsv::PURPLE,
            persist: true,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_family() {
        for os in [OsVariant::MacOs, OsVariant::Ios] {
            assert_eq!(
                select_default_layer(os, None),
                vec![Effect::DefaultLayerSet(LayerState(1 << 0))]
            );
        }
    }

    #[test]
    fn test_windows_family() {
        for os in [OsVariant::Windows, OsVariant::Linux] {
            assert_eq!(
                select_default_layer(os, Some(Layer::MacBase.mask())),
                vec![Effect::DefaultLayerSet(LayerState(1 << 2))]
            );
        }
    }

    #[test]
    fn test_unsure_only_colors() {
        assert_eq!(
            select_default_layer(OsVariant::Unsure, Some(Layer::WinBase.mask())),
            vec![Effect::SetColor { hsv: Hsv::PURPLE, persist: true }]
        );
    }

    #[test]
    fn test_repeat_detection_is_quiet() {
        assert!(select_default_layer(OsVariant::MacOs, Some(Layer::MacBase.mask())).is_empty());
    }

    #[test]
    fn test_first_detection_always_selects() {
        assert_eq!(
            select_default_layer(OsVariant::Ios, None),
            vec![Effect::DefaultLayerSet(Layer::MacBase.mask())]
        );
    }
}
