//! # remotecc
//!
//! Remote compiler offload over a distcc-style binary wire protocol:
//! - Fixed 12-byte tokens (4-byte name + 8 lowercase hex digits)
//! - Length-prefixed payload streaming with strict partial-I/O checks
//! - Synchronous one-request/one-response exchange per TCP connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────┐   DIST ARGC ARGV×N DOTI   ┌──────────────────┐
//! │   ClientDriver   │ ─────────────────────────▶│   ServerDriver   │
//! │ (send + receive) │                           │ (parse request)  │
//! │                  │   DONE STAT SERR SOUT     │        │         │
//! │                  │◀───────────────[DOTO]──── │  exec backend    │
//! └──────────────────┘                           └──────────────────┘
//! ```
//!
//! The compiler-wrapper layer (`wrapper`) turns a local invocation into
//! a preprocessor command and a remote-transferable compilation; the
//! protocol layer never interprets compiler flags itself.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;
pub mod server;
pub mod wrapper;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::{compile_file, ClientDriver};
pub use config::ClientConfig;
pub use error::{RemoteccError, Result};
pub use server::ServerDriver;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of remotecc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
