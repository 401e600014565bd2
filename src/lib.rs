//! A bounded-memory Web of Things endpoint for a single device.
//!
//! The server exposes one physical device (a "Thing") over a small REST-style
//! protocol modeled on the W3C Web of Things HTTP binding:
//!
//! - `/` and `/things/<name>`: the Thing Description
//! - `/things`: the Things collection
//! - `/things/<name>/properties/<property>`: read (`GET`) and write (`PUT`)
//!   boolean device state
//! - `/things/<name>/actions`: trigger device actions (`POST`), including
//!   `reboot`
//! - `/things/<name>/events`: a stub
//!
//! Requests are ingested through fixed-capacity buffers sized once at startup.
//! Anything longer than a buffer is truncated, never grown into. Connections
//! are served strictly one at a time and each carries exactly one request.
//!
//! # Examples
//!
//! ```no_run
//! use microwot_rs::device::{ExitRestart, MemoryStore, PinBank};
//! use microwot_rs::{ServerConfig, WotServer};
//!
//! # async fn serve() -> Result<(), microwot_rs::ServerError> {
//! let store = MemoryStore::new()
//!     .with_document("/thing.jsn", r#"{"name":"wot"}"#)
//!     .with_document("/property/on.jsn", r#"{"on":false}"#);
//! let device = PinBank::new().with_pin("on", 8, false);
//!
//! let server = WotServer::new(ServerConfig::default(), store, device, ExitRestart::default());
//! server.run().await
//! # }
//! ```

// Export the device collaborators
pub mod device;

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, Method, Request};
pub use server::{Error as ServerError, Outcome, ServerConfig, StatusCode, WotServer};
