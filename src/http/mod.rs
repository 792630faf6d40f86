//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one request per connection, no
//! keep-alive, no chunked encoding, no URL decoding.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine driven by socket readiness
//! - **`parser`**: Builds a `Request` from the bytes read off the socket
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation and status codes
//! - **`writer`**: Serializes a response and tracks how much of it was flushed
//! - **`static_files`**: Serves files from the configured static root
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │ ← Socket registered for read readiness
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Reading   │ ← One non-blocking read (≤ 16 KiB) per readiness event
//!        └──────┬──────┘
//!               │ Bytes received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, route, handler / static file / 404
//!        └──────┬───────────┘
//!               │ Response serialized
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← One non-blocking write per readiness event
//!        └──────┬───────────┘
//!               │ Fully flushed, peer gone, or error
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← Socket closed, client removed from the registry
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod static_files;
pub mod writer;
