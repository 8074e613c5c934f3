//! Protocol Module
//!
//! Defines the distcc-style wire protocol for one compile exchange.
//!
//! ## Wire Format
//!
//! Every token is exactly 12 bytes: a 4-byte ASCII name and an 8-digit
//! lowercase-hex u32 value. A "blob" is a token whose value is a byte
//! count, immediately followed by that many raw bytes.
//!
//! ### Request (client → server)
//! ```text
//! DIST <version>
//! ARGC <n>
//! ARGV <len> <bytes>     (×n, in order)
//! DOTI <len> <bytes>     (preprocessed source)
//! ```
//!
//! ### Response (server → client)
//! ```text
//! DONE <version>
//! STAT <exit status>
//! SERR <len> <bytes>     (compiler stderr)
//! SOUT <len> <bytes>     (compiler stdout)
//! DOTO <len> <bytes>     (object file, only if STAT == 0)
//! ```
//!
//! One connection carries exactly one request and one response; there is
//! no multiplexing, pipelining, compression, or retry at this layer.

mod token;

pub use token::{
    copy_exact, encode_string_token, encode_token, read_token, read_token_to, send_string_token,
    send_token, TokenName, TOKEN_LEN, TOKEN_NAME_LEN,
};

/// Protocol version spoken by this implementation
pub const PROTOCOL_VERSION: u32 = 1;

// =============================================================================
// Token Vocabulary
// =============================================================================

/// Request greeting: protocol version
pub const DIST: TokenName = TokenName::from_bytes(*b"DIST");

/// Argument count
pub const ARGC: TokenName = TokenName::from_bytes(*b"ARGC");

/// One argument (blob)
pub const ARGV: TokenName = TokenName::from_bytes(*b"ARGV");

/// Preprocessed source payload (blob)
pub const DOTI: TokenName = TokenName::from_bytes(*b"DOTI");

/// Response greeting: protocol version
pub const DONE: TokenName = TokenName::from_bytes(*b"DONE");

/// Remote compiler exit status
pub const STAT: TokenName = TokenName::from_bytes(*b"STAT");

/// Captured stderr (blob)
pub const SERR: TokenName = TokenName::from_bytes(*b"SERR");

/// Captured stdout (blob)
pub const SOUT: TokenName = TokenName::from_bytes(*b"SOUT");

/// Compiled object payload (blob)
pub const DOTO: TokenName = TokenName::from_bytes(*b"DOTO");
