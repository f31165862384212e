use std::fmt;

/// Layers of the K1 Pro ISO keymap, in priority order.
///
/// A higher identifier overlays every lower one, so the declaration order
/// matters: the OS fn layer of each base layer must directly follow it.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    MacBase = 0,
    MacFn = 1,
    WinBase = 2,
    WinFn = 3,
    CommonFn = 4,
    Numpad = 5,
    Mouse = 6,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::MacBase,
        Layer::MacFn,
        Layer::WinBase,
        Layer::WinFn,
        Layer::CommonFn,
        Layer::Numpad,
        Layer::Mouse,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Single-bit mask `1 << layer`.
    pub fn mask(self) -> LayerState {
        LayerState::single(self.index())
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::MacBase => "MAC_BASE",
            Layer::MacFn => "MAC_FN",
            Layer::WinBase => "WIN_BASE",
            Layer::WinFn => "WIN_FN",
            Layer::CommonFn => "COMMON_FN",
            Layer::Numpad => "NUMPAD",
            Layer::Mouse => "MOUSE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|layer| layer.name() == name)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bitmask over layers, one bit per layer index.
///
/// Used both for the host's active-layer state and for the applicability
/// masks of key overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerState(pub u32);

impl LayerState {
    pub const EMPTY: Self = Self(0);
    pub const MAX_LAYERS: u8 = 32;

    pub fn single(index: u8) -> Self {
        if index < Self::MAX_LAYERS {
            Self(1u32 << index)
        } else {
            Self::EMPTY
        }
    }

    pub fn from_layers(layers: &[Layer]) -> Self {
        layers
            .iter()
            .fold(Self::EMPTY, |state, layer| state.with(layer.index()))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_on(self, index: u8) -> bool {
        self.0 & Self::single(index).0 != 0
    }

    pub fn with(self, index: u8) -> Self {
        Self(self.0 | Self::single(index).0)
    }

    pub fn without(self, index: u8) -> Self {
        Self(self.0 & !Self::single(index).0)
    }

    pub fn intersects(self, other: LayerState) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: LayerState) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: LayerState) -> Self {
        Self(self.0 | other.0)
    }

    /// Numerically greatest active layer, 0 when nothing is active.
    pub fn highest(self) -> u8 {
        if self.0 == 0 {
            0
        } else {
            (31 - self.0.leading_zeros()) as u8
        }
    }

    /// Active layer indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..Self::MAX_LAYERS).filter(move |&index| self.is_on(index))
    }
}

impl From<Layer> for LayerState {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_layer() {
        assert_eq!(LayerState::EMPTY.highest(), 0);
        assert_eq!(LayerState(0b1).highest(), 0);
        assert_eq!(LayerState(0b1010).highest(), 3);
        assert_eq!(LayerState(1 << 31).highest(), 31);
    }

    #[test]
    fn test_masks_follow_enum() {
        assert_eq!(Layer::MacBase.mask(), LayerState(1));
        assert_eq!(Layer::WinBase.mask(), LayerState(4));
        assert_eq!(
            LayerState::from_layers(&[Layer::MacFn, Layer::CommonFn]),
            LayerState(0b10010)
        );
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(LayerState::single(40), LayerState::EMPTY);
        assert!(!LayerState(u32::MAX).is_on(40));
    }

    #[test]
    fn test_names() {
        assert_eq!(Layer::from_name("COMMON_FN"), Some(Layer::CommonFn));
        assert_eq!(Layer::from_index(6), Some(Layer::Mouse));
        assert_eq!(Layer::from_index(7), None);
    }
}
