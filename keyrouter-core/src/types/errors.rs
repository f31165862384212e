use thiserror::Error;

#[derive(Error, Debug)]
pub enum KlsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown keycode: {0}")]
    UnknownKeycode(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Layer {layer} row {row} has {found} keys, expected {expected}")]
    RaggedLayout { layer: String, row: usize, found: usize, expected: usize },

    #[error("Layer {layer} row {row} has no keys")]
    EmptyRow { layer: String, row: usize },

    #[error("Layer {layer} has {found} rows, expected {expected}")]
    RowCountMismatch { layer: String, found: usize, expected: usize },

    #[error("Invalid LED matrix: {0}")]
    InvalidLedMatrix(String),

    #[error("Invalid option {name}: {value}")]
    InvalidOption { name: String, value: String },

    #[error("Layer declared twice: {0}")]
    DuplicateLayer(String),

    #[error("Override #{shadowed} can never fire: override #{shadowing} always matches first")]
    ShadowedOverride { shadowed: usize, shadowing: usize },

    #[error("Too many layers: {0} (max 32)")]
    TooManyLayers(usize),

    #[error("Binary write error: {0}")]
    BinaryWrite(String),
}
