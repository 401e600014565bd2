//! Collaborators the server drives but does not own the semantics of.
//!
//! Handlers only see these traits: where documents come from, how a named
//! boolean property maps onto hardware, and how the device is restarted.

mod restart;
mod state;
mod store;

// Re-export public items
pub use restart::{ExitRestart, Restart};
pub use state::{DeviceState, PinBank};
pub use store::{DirStore, FileStore, MemoryStore};
