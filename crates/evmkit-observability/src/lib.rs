//! # evmkit-observability
//!
//! Logging setup shared by the EvmKit CLI and demos.
//!
//! The library crates only emit `tracing` events (mostly `debug!` around
//! encode, decode and hashing); installing a subscriber is left to the
//! binary. Logs go to stderr so command output on stdout stays clean.
//!
//! ## Structured logging
//! Plain text by default, JSON lines with `json = true`. Levels are
//! configurable globally and per component (crate name).

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
