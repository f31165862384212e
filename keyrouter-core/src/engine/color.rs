//! Indicator colors

use std::fmt;

use crate::types::Layer;

/// Hue/saturation/value triple in the host's 8-bit ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    pub const WHITE: Self = Self::new(0, 0, 255);
    pub const RED: Self = Self::new(0, 255, 255);
    pub const ORANGE: Self = Self::new(21, 255, 255);
    pub const YELLOW: Self = Self::new(43, 255, 255);
    pub const GREEN: Self = Self::new(85, 255, 255);
    pub const PURPLE: Self = Self::new(191, 255, 255);
    /// Base color of the Windows layer.
    pub const WIN_BLUE: Self = Self::new(150, 247, 255);
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsv({}, {}, {})", self.h, self.s, self.v)
    }
}

/// Color shown for a layer; unknown identifiers get red.
pub fn hsv_for_layer(layer: u8) -> Hsv {
    match Layer::from_index(layer) {
        Some(Layer::MacBase) => Hsv::WHITE,
        Some(Layer::WinBase) => Hsv::WIN_BLUE,
        Some(Layer::MacFn | Layer::WinFn | Layer::CommonFn) => Hsv::YELLOW,
        Some(Layer::Numpad) => Hsv::GREEN,
        Some(Layer::Mouse) => Hsv::PURPLE,
        None => Hsv::RED,
    }
}
