//! Beacon - embeddable single-threaded HTTP server
//!
//! Core library: request parsing, wildcard routing, static files and the
//! per-connection read/process/write state machine.

pub mod config;
pub mod http;
pub mod router;
pub mod server;

pub use router::Handler;
pub use server::{Server, ShutdownHandle};
