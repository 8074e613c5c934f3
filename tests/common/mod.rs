//! Shared test streams
//!
//! In-memory readers and writers that misbehave in controlled ways.
#![allow(dead_code)]

use std::io::{self, Read, Write};

/// Writer that rejects every write with an error
pub struct FaultyWriter;

impl Write for FaultyWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "you shall not pass"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reader that rejects every read with an error
pub struct FaultyReader;

impl Read for FaultyReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "you shall not pass"))
    }
}

/// Writer that accepts at most `capacity` bytes, then reports
/// zero-byte writes
pub struct LimitedWriter {
    remaining: usize,
}

impl LimitedWriter {
    pub fn new(capacity: usize) -> Self {
        Self {
            remaining: capacity,
        }
    }
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.remaining.min(buf.len());
        self.remaining -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reader that yields a single byte and then end-of-stream
pub struct ShortReader {
    emitted: bool,
}

impl ShortReader {
    pub fn new() -> Self {
        Self { emitted: false }
    }
}

impl Read for ShortReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.emitted || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = b'a';
        self.emitted = true;
        Ok(1)
    }
}
