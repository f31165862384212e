pub mod keycodes;
pub mod modifiers;
pub mod layers;
pub mod klb;
pub mod errors;

pub use keycodes::*;
pub use modifiers::*;
pub use layers::*;
pub use klb::*;
pub use errors::*;
