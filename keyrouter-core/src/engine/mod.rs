//! Key event router - reacts to host firmware callbacks
//!
//! Each callback is a state transition returning the effects the host should
//! perform. [`KeyEventRouter::dispatch`] drives a [`crate::host::Host`] with them.

mod router;
mod input;
mod output;
mod state;
mod actions;
mod overrides;
mod debug;
mod indicator;
mod os;
mod power;
mod color;

pub use router::KeyEventRouter;
pub use input::{HostEvent, KeyRecord};
pub use output::{Effect, LayerOutcome, Outcome};
pub use state::{RouterConfig, RouterState, Saved};
pub use actions::CustomKeyAction;
pub use overrides::{KeyOverride, OverrideMatch, OverrideTable};
pub use debug::{format_binary, DebugSnapshot, DumpThrottle};
pub use indicator::paint_indicators;
pub use os::{select_default_layer, OsVariant};
pub use power::UsbDeviceState;
pub use color::{hsv_for_layer, Hsv};

// Re-export error types
pub use crate::error::{Error, Result};
