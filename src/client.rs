//! Client Driver
//!
//! Sends one compile request and consumes one response over a single
//! connection. Fully synchronous: the send phase and receive phase run
//! on the caller's stack, fail fast on the first error, and never retry.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{RemoteccError, Result};
use crate::protocol::{
    copy_exact, read_token, read_token_to, send_string_token, send_token, ARGC, ARGV, DIST, DONE,
    DOTI, DOTO, PROTOCOL_VERSION, SERR, SOUT, STAT,
};

/// Drives one compile exchange over a connection.
///
/// A driver owns nothing beyond the connection halves it is given; the
/// source stream and output sinks are supplied per call and remain
/// owned by the caller. One driver instance serves one exchange.
pub struct ClientDriver<R: Read, W: Write> {
    version: u32,
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> ClientDriver<R, W> {
    /// Create a driver over the read/write halves of a connection
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            reader,
            writer,
        }
    }

    /// Send phase: DIST, ARGC, ARGV×N, then the DOTI blob streamed from
    /// `source`.
    ///
    /// `source_len` is the exact byte length announced in the DOTI
    /// token; transferring fewer bytes is an error. Aborts on the first
    /// failed or short write; nothing further is sent.
    pub fn send_request(
        &mut self,
        args: &[String],
        source: &mut impl Read,
        source_len: u64,
    ) -> Result<()> {
        send_token(&mut self.writer, DIST, self.version)?;
        send_token(&mut self.writer, ARGC, args.len() as u32)?;
        for (i, arg) in args.iter().enumerate() {
            send_string_token(&mut self.writer, ARGV, arg.as_bytes()).map_err(|e| {
                tracing::debug!("failed to send argument {i}: {e}");
                e
            })?;
        }
        let len = u32::try_from(source_len).map_err(|_| {
            RemoteccError::MalformedRequest(format!(
                "source of {source_len} bytes does not fit a 32-bit length"
            ))
        })?;
        send_token(&mut self.writer, DOTI, len)?;
        copy_exact(source, &mut self.writer, source_len, DOTI)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Receive phase: DONE (version check), STAT, SERR, SOUT, and the
    /// DOTO object blob only when the status is 0.
    ///
    /// Returns the remote compiler's exit status.
    pub fn read_response(
        &mut self,
        stdout: &mut impl Write,
        stderr: &mut impl Write,
        object: &mut impl Write,
    ) -> Result<i32> {
        let version = read_token(&mut self.reader, DONE)?;
        if version != self.version {
            return Err(RemoteccError::VersionMismatch {
                ours: self.version,
                theirs: version,
            });
        }
        let status = read_token(&mut self.reader, STAT)? as i32;
        read_token_to(&mut self.reader, SERR, stderr)?;
        read_token_to(&mut self.reader, SOUT, stdout)?;
        if status == 0 {
            read_token_to(&mut self.reader, DOTO, object)?;
        }
        Ok(status)
    }

    /// Run one full exchange: send the request, then read the response.
    ///
    /// `Ok(status)` means the remote compiler ran and reported that
    /// exit code. `Err(_)` means the exchange itself failed before a
    /// status was known.
    pub fn compile(
        &mut self,
        args: &[String],
        source: &mut impl Read,
        source_len: u64,
        stdout: &mut impl Write,
        stderr: &mut impl Write,
        object: &mut impl Write,
    ) -> Result<i32> {
        self.send_request(args, source, source_len).map_err(|e| {
            tracing::debug!("failed to enqueue compilation: {e}");
            e
        })?;
        self.read_response(stdout, stderr, object).map_err(|e| {
            tracing::debug!("failed to process server response: {e}");
            e
        })
    }
}

/// Compile one preprocessed source file on a remote daemon.
///
/// Dials `config.server_addr`, streams `source_path` as the DOTI
/// payload, and writes the returned object to `object_path`. The
/// remote compiler's stderr and stdout are forwarded to this process's
/// stderr and stdout. The connection and both file handles are scoped
/// to this call and released on every exit path.
pub fn compile_file(
    config: &ClientConfig,
    args: &[String],
    source_path: &Path,
    object_path: &Path,
) -> Result<i32> {
    let mut source = File::open(source_path).map_err(|e| {
        tracing::error!("failed to open preprocessed source {}: {e}", source_path.display());
        e
    })?;
    let source_len = source.metadata()?.len();

    let mut object = File::create(object_path).map_err(|e| {
        tracing::error!("failed to create object file {}: {e}", object_path.display());
        e
    })?;

    let stream = TcpStream::connect(&config.server_addr).map_err(|e| {
        tracing::error!("failed to connect to {}: {e}", config.server_addr);
        e
    })?;
    stream.set_nodelay(true)?;
    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
    }

    let read_stream = stream.try_clone()?;
    let mut driver = ClientDriver::new(BufReader::new(read_stream), BufWriter::new(stream));

    tracing::debug!(
        "offloading {} ({source_len} bytes) to {}",
        source_path.display(),
        config.server_addr
    );
    driver.compile(
        args,
        &mut source,
        source_len,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
        &mut object,
    )
}
