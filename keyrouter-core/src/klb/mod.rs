pub mod error;
pub mod loader;

pub use error::KlbError;
pub use loader::KlbLoader;
