//! Error types for the key router

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("KLB format error: {0}")]
    Klb(#[from] crate::klb::KlbError),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
