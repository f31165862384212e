use thiserror::Error;

#[derive(Error, Debug)]
pub enum KlbError {
    #[error("Invalid magic code: expected 'KLRB', got {0:?}")]
    InvalidMagicCode([u8; 4]),

    #[error("Unsupported version: {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("File too small: {0} bytes")]
    FileTooSmall(usize),

    #[error("Invalid dimensions: {layers} layers of {rows}x{cols}")]
    InvalidDimensions { layers: u8, rows: u8, cols: u8 },

    #[error("Trailing data: {0} bytes after the last section")]
    TrailingData(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KlbError>;
