use crate::engine::KeyOverride;
use crate::types::{Keycode, LayerState, ModMask};

pub const KLB_MAGIC: [u8; 4] = *b"KLRB";
pub const KLB_MAJOR_VERSION: u8 = 1;
pub const KLB_MINOR_VERSION: u8 = 0;

/// Size of the fixed header in bytes
pub const KLB_HEADER_SIZE: usize = 14;

pub const INFO_NAME: [u8; 4] = *b"name";
pub const INFO_DESCRIPTION: [u8; 4] = *b"desc";
pub const INFO_DEBUG_INTERVAL: [u8; 4] = *b"dbgi";

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KlbHeader {
    pub magic_code: [u8; 4],    // "KLRB"
    pub major_version: u8,      // 1
    pub minor_version: u8,      // 0
    pub layer_count: u8,
    pub rows: u8,
    pub cols: u8,
    pub padding: u8,
    pub info_count: u16,
    pub override_count: u16,
}

impl KlbHeader {
    pub fn new(layer_count: u8, rows: u8, cols: u8) -> Self {
        KlbHeader {
            magic_code: KLB_MAGIC,
            major_version: KLB_MAJOR_VERSION,
            minor_version: KLB_MINOR_VERSION,
            layer_count,
            rows,
            cols,
            padding: 0,
            info_count: 0,
            override_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoEntry {
    pub id: [u8; 4],
    pub data: Vec<u8>,
}

/// Override rule as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideEntry {
    pub mods: u8,
    pub trigger: u16,
    pub replacement: u16,
    pub layers: u32,
}

impl OverrideEntry {
    pub fn to_override(self) -> KeyOverride {
        KeyOverride::new(
            ModMask(self.mods),
            Keycode(self.trigger),
            Keycode(self.replacement),
            LayerState(self.layers),
        )
    }
}

impl From<&KeyOverride> for OverrideEntry {
    fn from(rule: &KeyOverride) -> Self {
        Self {
            mods: rule.mods.bits(),
            trigger: rule.trigger.raw(),
            replacement: rule.replacement.raw(),
            layers: rule.layers.bits(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KlbFile {
    pub header: KlbHeader,
    pub info: Vec<InfoEntry>,
    /// `layer_count × rows × cols` raw keycodes, layer-major then row-major
    pub keymap: Vec<u16>,
    /// `rows × cols` LED indices
    pub leds: Vec<u8>,
    pub overrides: Vec<OverrideEntry>,
}

impl KlbFile {
    pub fn new(layer_count: u8, rows: u8, cols: u8) -> Self {
        KlbFile {
            header: KlbHeader::new(layer_count, rows, cols),
            info: Vec::new(),
            keymap: Vec::new(),
            leds: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn add_info(&mut self, id: [u8; 4], data: Vec<u8>) {
        self.info.push(InfoEntry { id, data });
        self.header.info_count = self.info.len() as u16;
    }

    pub fn add_override(&mut self, entry: OverrideEntry) {
        self.overrides.push(entry);
        self.header.override_count = self.overrides.len() as u16;
    }

    pub fn info(&self, id: [u8; 4]) -> Option<&[u8]> {
        self.info
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.data.as_slice())
    }

    pub fn info_string(&self, id: [u8; 4]) -> Option<String> {
        self.info(id)
            .and_then(|data| String::from_utf8(data.to_vec()).ok())
    }

    /// Little-endian u16 info value
    pub fn info_u16(&self, id: [u8; 4]) -> Option<u16> {
        match self.info(id)? {
            [lo, hi] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }
}
