pub mod types;
pub mod error;
pub mod klb;
pub mod keymap;
pub mod engine;
pub mod host;
pub mod chord;
pub mod ffi;

pub use types::*;

// Re-export commonly used types
pub use types::klb::{KlbFile, KlbHeader, InfoEntry, OverrideEntry};
pub use types::errors::KlsError;
pub use error::{Error, Result};
pub use engine::{KeyEventRouter, HostEvent, KeyRecord, Effect, Outcome, LayerOutcome, OverrideMatch, CustomKeyAction, OsVariant, UsbDeviceState, Hsv, RouterConfig};
pub use keymap::{Keymap, LedMatrix, Layout, NO_LED};
pub use host::{Host, SimulatedHost};
pub use chord::KeyChord;
