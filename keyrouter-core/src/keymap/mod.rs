//! Keymap tables: keycodes per layer and the LED index of every matrix position

mod k1_pro_iso;

use crate::{
    Error, Result,
    engine::{OverrideTable, RouterConfig},
    klb::KlbLoader,
    types::{Keycode, KlbFile, INFO_DEBUG_INTERVAL, INFO_DESCRIPTION, INFO_NAME},
};

pub use k1_pro_iso::{k1_pro_iso_keymap, k1_pro_iso_overrides, MATRIX_COLS, MATRIX_ROWS};

/// Marks a matrix position without an LED
pub const NO_LED: u8 = 255;

/// Keycodes of every layer over a `rows × cols` matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    rows: usize,
    cols: usize,
    /// Row-major keycodes, one vector per layer
    layers: Vec<Vec<Keycode>>,
}

impl Keymap {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            layers: Vec::new(),
        }
    }

    /// Builds a keymap from row-major layers, rejecting layers of the wrong size
    pub fn from_layers(rows: usize, cols: usize, layers: Vec<Vec<Keycode>>) -> Result<Self> {
        let mut keymap = Self::new(rows, cols);
        for keys in layers {
            keymap.push_layer(keys)?;
        }
        Ok(keymap)
    }

    pub fn push_layer(&mut self, keys: Vec<Keycode>) -> Result<()> {
        if keys.len() != self.rows * self.cols {
            return Err(Error::InvalidLayout(format!(
                "layer {} has {} keys, expected {}",
                self.layers.len(),
                keys.len(),
                self.rows * self.cols
            )));
        }
        if self.layers.len() >= 32 {
            return Err(Error::InvalidLayout("more than 32 layers".to_string()));
        }
        self.layers.push(keys);
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Keycode bound at a position; `KC_NO` for anything outside the keymap
    pub fn keycode(&self, layer: u8, row: usize, col: usize) -> Keycode {
        if row >= self.rows || col >= self.cols {
            return Keycode::NO;
        }
        self.layers
            .get(layer as usize)
            .map(|keys| keys[row * self.cols + col])
            .unwrap_or(Keycode::NO)
    }

    pub fn layer(&self, layer: u8) -> Option<&[Keycode]> {
        self.layers.get(layer as usize).map(|keys| keys.as_slice())
    }

    /// Positions bound to something other than `KC_NO` on any layer
    pub fn is_populated(&self, row: usize, col: usize) -> bool {
        (0..self.layers.len()).any(|layer| self.keycode(layer as u8, row, col) != Keycode::NO)
    }
}

/// LED index of every matrix position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedMatrix {
    rows: usize,
    cols: usize,
    indices: Vec<u8>,
}

impl LedMatrix {
    pub fn from_indices(rows: usize, cols: usize, indices: Vec<u8>) -> Result<Self> {
        if indices.len() != rows * cols {
            return Err(Error::InvalidLayout(format!(
                "LED matrix has {} entries, expected {}",
                indices.len(),
                rows * cols
            )));
        }
        Ok(Self { rows, cols, indices })
    }

    /// Numbers populated positions in row-major order
    pub fn sequential(keymap: &Keymap) -> Self {
        let mut next = 0u8;
        let mut indices = Vec::with_capacity(keymap.rows() * keymap.cols());
        for row in 0..keymap.rows() {
            for col in 0..keymap.cols() {
                if keymap.is_populated(row, col) && next < NO_LED {
                    indices.push(next);
                    next += 1;
                } else {
                    indices.push(NO_LED);
                }
            }
        }
        Self {
            rows: keymap.rows(),
            cols: keymap.cols(),
            indices,
        }
    }

    pub fn index(&self, row: usize, col: usize) -> u8 {
        if row >= self.rows || col >= self.cols {
            return NO_LED;
        }
        self.indices[row * self.cols + col]
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Number of positions carrying an LED
    pub fn led_count(&self) -> usize {
        self.indices.iter().filter(|&&index| index != NO_LED).count()
    }
}

/// A complete keyboard description the router runs against
#[derive(Debug, Clone)]
pub struct Layout {
    pub name: String,
    pub description: String,
    pub keymap: Keymap,
    pub leds: LedMatrix,
    pub overrides: OverrideTable,
    pub config: RouterConfig,
}

impl Layout {
    /// The built-in Keychron K1 Pro ISO layout
    pub fn k1_pro_iso() -> Self {
        let keymap = k1_pro_iso_keymap();
        let leds = LedMatrix::sequential(&keymap);
        Self {
            name: "K1 Pro ISO".to_string(),
            description: "Keychron K1 Pro ISO with OS-adaptive base layers".to_string(),
            keymap,
            leds,
            overrides: k1_pro_iso_overrides(),
            config: RouterConfig::default(),
        }
    }

    /// Builds a layout from a parsed KLB file
    pub fn from_klb(file: &KlbFile) -> Result<Self> {
        let rows = file.header.rows as usize;
        let cols = file.header.cols as usize;
        let per_layer = rows * cols;

        let layers = file
            .keymap
            .chunks(per_layer.max(1))
            .map(|chunk| chunk.iter().copied().map(Keycode).collect())
            .collect();
        let keymap = Keymap::from_layers(rows, cols, layers)?;
        let leds = LedMatrix::from_indices(rows, cols, file.leds.clone())?;

        let mut config = RouterConfig::default();
        if let Some(interval) = file.info_u16(INFO_DEBUG_INTERVAL) {
            config.debug_interval_ms = interval;
        }

        Ok(Self {
            name: file.info_string(INFO_NAME).unwrap_or_default(),
            description: file.info_string(INFO_DESCRIPTION).unwrap_or_default(),
            keymap,
            leds,
            overrides: OverrideTable::new(file.overrides.iter().map(|entry| entry.to_override()).collect()),
            config,
        })
    }

    /// Parses KLB bytes into a layout
    pub fn load(data: &[u8]) -> Result<Self> {
        let file = KlbLoader::load(data)?;
        Self::from_klb(&file)
    }
}
