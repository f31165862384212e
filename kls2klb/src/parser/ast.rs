use std::collections::HashMap;

// AST nodes for KLS parsing
#[derive(Debug)]
pub struct KlsFile {
    pub options: HashMap<String, String>,
    pub layers: Vec<LayerDecl>,
    pub leds: Option<LedDecl>,
    pub overrides: Vec<OverrideDecl>,
}

/// Layer named by identifier (`MAC_BASE`) or index (`3`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerRef {
    Named(String),
    Index(u32),
}

#[derive(Debug, Clone)]
pub struct LayerDecl {
    pub layer: LayerRef,
    pub rows: Vec<Vec<KeyExpr>>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedValue {
    Index(u32),
    NoLed,
}

#[derive(Debug, Clone)]
pub struct LedDecl {
    pub rows: Vec<Vec<LedValue>>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyExpr {
    Name(String),       // KC_A, _______, CKC_MOFN
    Raw(u32),           // 0x7E0D
    Call(String, Box<KeyExpr>), // RALT(KC_8), MO(NUMPAD)
}

#[derive(Debug, Clone)]
pub struct OverrideDecl {
    pub mods: Vec<String>,
    pub trigger: KeyExpr,
    pub replacement: KeyExpr,
    pub layers: Vec<LayerRef>,
    pub line: usize,
}

impl KlsFile {
    pub fn new() -> Self {
        Self {
            options: HashMap::new(),
            layers: Vec::new(),
            leds: None,
            overrides: Vec::new(),
        }
    }
}

impl Default for KlsFile {
    fn default() -> Self {
        Self::new()
    }
}
