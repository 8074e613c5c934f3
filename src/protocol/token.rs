//! Token codec
//!
//! Encoding and decoding of the fixed-width wire tokens and their
//! length-prefixed payloads. Every token is exactly 12 bytes: a 4-byte
//! ASCII name followed by an unsigned 32-bit value rendered as 8
//! lowercase hex digits.
//!
//! ```text
//! ┌───────────────┬──────────────────────────┐
//! │   Name (4)    │     Value (8, hex)       │
//! └───────────────┴──────────────────────────┘
//! ```
//!
//! A short transfer in either direction is always an error here; callers
//! never see a partially-decoded token or a partially-copied payload.
//! This module performs no logging so it can be tested in isolation
//! against in-memory streams.

use std::fmt;
use std::io::{ErrorKind, Read, Write};

use crate::error::{RemoteccError, Result};

/// Total size of an encoded token
pub const TOKEN_LEN: usize = 12;

/// Size of the token name field
pub const TOKEN_NAME_LEN: usize = 4;

/// Copy buffer size for streaming payloads
const COPY_BUF_LEN: usize = 8 * 1024;

// =============================================================================
// Token Names
// =============================================================================

/// A validated 4-byte token name.
///
/// Names shorter than 4 bytes are NUL-padded; names longer than 4 bytes
/// are rejected at construction rather than silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenName([u8; TOKEN_NAME_LEN]);

impl TokenName {
    /// Construct a name from exactly 4 raw bytes (for protocol constants)
    pub const fn from_bytes(bytes: [u8; TOKEN_NAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Construct a name from a string, validating length and charset
    pub fn new(name: &str) -> Result<Self> {
        if name.len() > TOKEN_NAME_LEN || !name.bytes().all(|b| b.is_ascii() && b != 0) {
            return Err(RemoteccError::InvalidTokenName(name.to_string()));
        }
        let mut bytes = [0u8; TOKEN_NAME_LEN];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self(bytes))
    }

    /// The raw 4-byte wire form of this name
    pub fn as_bytes(&self) -> &[u8; TOKEN_NAME_LEN] {
        &self.0
    }
}

impl fmt::Display for TokenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter().take_while(|&&b| b != 0) {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a token to its 12-byte wire form
pub fn encode_token(name: TokenName, value: u32) -> [u8; TOKEN_LEN] {
    let mut buf = [0u8; TOKEN_LEN];
    buf[..TOKEN_NAME_LEN].copy_from_slice(name.as_bytes());
    let hex = format!("{value:08x}");
    buf[TOKEN_NAME_LEN..].copy_from_slice(hex.as_bytes());
    buf
}

/// Encode a length-prefixed blob: a token carrying the payload length,
/// followed by the raw payload bytes
pub fn encode_string_token(name: TokenName, payload: &[u8]) -> Result<Vec<u8>> {
    let len = payload_len(name, payload)?;
    let mut out = Vec::with_capacity(TOKEN_LEN + payload.len());
    out.extend_from_slice(&encode_token(name, len));
    out.extend_from_slice(payload);
    Ok(out)
}

fn payload_len(name: TokenName, payload: &[u8]) -> Result<u32> {
    u32::try_from(payload.len()).map_err(|_| {
        RemoteccError::MalformedRequest(format!(
            "{name} payload of {} bytes does not fit a 32-bit length",
            payload.len()
        ))
    })
}

// =============================================================================
// Stream Writing
// =============================================================================

/// Write a buffer in full, verifying the byte count.
///
/// A writer that accepts zero bytes without reporting an error is a
/// short write, never a silent success.
pub(crate) fn write_full<W: Write>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                return Err(RemoteccError::ShortWrite {
                    expected: buf.len(),
                    written,
                })
            }
            Ok(n) => written += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Send a single token
pub fn send_token<W: Write>(writer: &mut W, name: TokenName, value: u32) -> Result<()> {
    write_full(writer, &encode_token(name, value))
}

/// Send a length-prefixed blob from an in-memory payload
pub fn send_string_token<W: Write>(writer: &mut W, name: TokenName, payload: &[u8]) -> Result<()> {
    let encoded = encode_string_token(name, payload)?;
    write_full(writer, &encoded)
}

/// Copy exactly `len` bytes from `reader` to `writer`.
///
/// Used to stream a blob payload whose length token has already been
/// sent. The source running dry before `len` bytes is `Truncated`;
/// write-side failures surface as transport errors.
pub fn copy_exact<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    len: u64,
    name: TokenName,
) -> Result<()> {
    let mut buf = [0u8; COPY_BUF_LEN];
    let mut received = 0u64;
    while received < len {
        let want = usize::try_from((len - received).min(COPY_BUF_LEN as u64)).unwrap_or(COPY_BUF_LEN);
        let n = match reader.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(RemoteccError::Truncated {
                    token: name.to_string(),
                    expected: len,
                    received,
                })
            }
            Ok(n) => n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        write_full(writer, &buf[..n])?;
        received += n as u64;
    }
    Ok(())
}

// =============================================================================
// Stream Reading
// =============================================================================

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => {
                return Err(RemoteccError::ShortRead {
                    expected: buf.len(),
                    read,
                })
            }
            Ok(n) => read += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Read one token and return its value, verifying the name.
///
/// Fails with `ShortRead` if the stream ends before 12 bytes,
/// `NameMismatch` if the name field differs from `expected`, and
/// `MalformedValue` if the value field is not 8 hex digits.
pub fn read_token<R: Read>(reader: &mut R, expected: TokenName) -> Result<u32> {
    let mut buf = [0u8; TOKEN_LEN];
    read_full(reader, &mut buf)?;

    if &buf[..TOKEN_NAME_LEN] != expected.as_bytes() {
        return Err(RemoteccError::NameMismatch {
            expected: expected.to_string(),
            actual: String::from_utf8_lossy(&buf[..TOKEN_NAME_LEN]).into_owned(),
        });
    }

    let value = &buf[TOKEN_NAME_LEN..];
    if !value.iter().all(|b| b.is_ascii_hexdigit()) {
        return Err(RemoteccError::MalformedValue(
            String::from_utf8_lossy(value).into_owned(),
        ));
    }
    // The charset check above guarantees valid UTF-8 and a clean parse.
    let text = std::str::from_utf8(value).map_err(|_| {
        RemoteccError::MalformedValue(String::from_utf8_lossy(value).into_owned())
    })?;
    u32::from_str_radix(text, 16)
        .map_err(|_| RemoteccError::MalformedValue(text.to_string()))
}

/// Read a length-prefixed blob, streaming its payload into `sink`.
///
/// The token's value is the payload byte count; exactly that many bytes
/// are copied. The stream ending early is `Truncated`; a sink refusing
/// a write is `Sink`.
pub fn read_token_to<R: Read, W: Write>(
    reader: &mut R,
    expected: TokenName,
    sink: &mut W,
) -> Result<u64> {
    let len = u64::from(read_token(reader, expected)?);
    let mut buf = [0u8; COPY_BUF_LEN];
    let mut received = 0u64;
    while received < len {
        let want = usize::try_from((len - received).min(COPY_BUF_LEN as u64)).unwrap_or(COPY_BUF_LEN);
        let n = match reader.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(RemoteccError::Truncated {
                    token: expected.to_string(),
                    expected: len,
                    received,
                })
            }
            Ok(n) => n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        sink.write_all(&buf[..n]).map_err(|e| RemoteccError::Sink {
            token: expected.to_string(),
            source: e,
        })?;
        received += n as u64;
    }
    Ok(len)
}
