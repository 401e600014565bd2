//! The Web of Things server.
//!
//! This module routes parsed requests to the resources of a single Thing,
//! applies property and action state transitions, and emits responses through
//! a bounded working buffer, one connection at a time.

mod actions;
mod config;
mod error;
mod handler;
mod http_server;
mod response;
mod router;

// Re-export public items
pub use actions::{ActionEffect, ActionRegistry, REBOOT};
pub use config::{
    DEFAULT_JSON_CAPACITY, DEFAULT_LINE_CAPACITY, DEFAULT_METHOD_CAPACITY, DEFAULT_PATH_CAPACITY,
    ServerConfig,
};
pub use error::Error;
pub use handler::{PORTAL_DOCUMENT, PropertySpec, THING_DOCUMENT, ThingResources};
pub use http_server::{Outcome, RequestBuffers, WotServer};
pub use response::{AfterReply, Body, ContentType, Emitter, Reply, StatusCode};
pub use router::{Route, Router};
