//! Server Request Parser
//!
//! Decode-only mirror of the client's send phase, plus the response
//! writer a compilation backend uses to answer. A driver instance
//! handles exactly one request and is discarded afterwards; on any
//! decode failure the backend closes the connection without responding.

use std::io::{Read, Write};

use crate::error::{RemoteccError, Result};
use crate::protocol::{
    read_token, read_token_to, send_string_token, send_token, ARGC, ARGV, DIST, DONE, DOTI, DOTO,
    PROTOCOL_VERSION, SERR, SOUT, STAT,
};

/// Server side of one compile exchange.
pub struct ServerDriver<R: Read, W: Write> {
    version: u32,
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> ServerDriver<R, W> {
    /// Create a driver over the read/write halves of an accepted
    /// connection
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            reader,
            writer,
        }
    }

    /// Parse the request head: DIST (version check), ARGC, ARGV×N.
    ///
    /// Returns the reconstructed argument vector in order. The DOTI
    /// payload that follows is left on the stream for
    /// [`read_source_to`](Self::read_source_to).
    pub fn read_request(&mut self) -> Result<Vec<String>> {
        let version = read_token(&mut self.reader, DIST)?;
        if version != self.version {
            tracing::warn!("unsupported protocol version {version}");
            return Err(RemoteccError::VersionMismatch {
                ours: self.version,
                theirs: version,
            });
        }
        self.read_compiler_args()
    }

    fn read_compiler_args(&mut self) -> Result<Vec<String>> {
        let argc = read_token(&mut self.reader, ARGC)?;
        if argc == 0 {
            return Err(RemoteccError::MalformedRequest(
                "non-positive argument count".to_string(),
            ));
        }
        if argc > i32::MAX as u32 {
            return Err(RemoteccError::MalformedRequest(format!(
                "argument count {argc} out of range"
            )));
        }
        let mut args = Vec::with_capacity(argc as usize);
        for i in 0..argc {
            let mut buf = Vec::new();
            read_token_to(&mut self.reader, ARGV, &mut buf).map_err(|e| {
                tracing::warn!("failed to read argument {i}: {e}");
                e
            })?;
            let arg = String::from_utf8(buf).map_err(|_| {
                RemoteccError::MalformedRequest(format!("argument {i} is not valid UTF-8"))
            })?;
            args.push(arg);
        }
        Ok(args)
    }

    /// Stream the DOTI payload into `sink`, returning its byte length.
    ///
    /// Called by the execution backend after
    /// [`read_request`](Self::read_request) to land the preprocessed
    /// source wherever the compiler needs it.
    pub fn read_source_to(&mut self, sink: &mut impl Write) -> Result<u64> {
        read_token_to(&mut self.reader, DOTI, sink)
    }

    /// Write the response: DONE, STAT, SERR, SOUT, and DOTO only when
    /// the status is 0.
    pub fn send_response(
        &mut self,
        status: i32,
        stderr: &[u8],
        stdout: &[u8],
        object: Option<&[u8]>,
    ) -> Result<()> {
        send_token(&mut self.writer, DONE, self.version)?;
        send_token(&mut self.writer, STAT, status as u32)?;
        send_string_token(&mut self.writer, SERR, stderr)?;
        send_string_token(&mut self.writer, SOUT, stdout)?;
        if status == 0 {
            send_string_token(&mut self.writer, DOTO, object.unwrap_or_default())?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
