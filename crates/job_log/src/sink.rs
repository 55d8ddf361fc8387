use std::io::{self, Write};

use tracing::Level;

/// Target used for every mirrored record, so subscribers can filter the
/// build-output firehose independently of the host's own diagnostics.
pub const LOG_TARGET: &str = "job_log";

/// Destination for the formatted records a [`LineLoggingSink`] produces.
///
/// Injected rather than reached through a global so the sink stays testable
/// in isolation; a failing `append` surfaces to the writer as an I/O error
/// and is never swallowed.
pub trait RecordSink: Send {
    fn append(&mut self, record: &str) -> io::Result<()>;

    /// Whether records are currently consumed at all. When this returns
    /// false, writes are accepted and dropped without formatting.
    fn enabled(&self) -> bool {
        true
    }
}

/// Emits records through the process-wide `tracing` subscriber at INFO.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRecordSink;

impl RecordSink for TracingRecordSink {
    fn append(&mut self, record: &str) -> io::Result<()> {
        tracing::info!(target: LOG_TARGET, "{record}");
        Ok(())
    }

    fn enabled(&self) -> bool {
        tracing::enabled!(target: LOG_TARGET, Level::INFO)
    }
}

/// Adapts a byte-stream writer onto a structured logger.
///
/// Every chunk written becomes at most one record: the bytes are decoded as
/// UTF-8 (lossily), trimmed, prefixed with the build identifier, and handed
/// to the record sink. Whitespace-only chunks are dropped unless the
/// suppression policy says otherwise. There is no buffering, so `flush` has
/// nothing to do and never fails.
pub struct LineLoggingSink<S> {
    prefix: String,
    suppress_empty: bool,
    records: S,
}

impl<S: RecordSink> LineLoggingSink<S> {
    pub const DEFAULT_SUPPRESS_EMPTY: bool = true;

    /// Sink with the default suppression policy (drop empty records).
    pub fn new(identifier: &str, records: S) -> Self {
        Self::with_suppress_empty(identifier, Self::DEFAULT_SUPPRESS_EMPTY, records)
    }

    pub fn with_suppress_empty(identifier: &str, suppress_empty: bool, records: S) -> Self {
        Self {
            prefix: format!("{identifier}: "),
            suppress_empty,
            records,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suppress_empty(&self) -> bool {
        self.suppress_empty
    }

    /// Single-byte write path, kept separate from [`Write::write`].
    ///
    /// The byte is rendered as a signed 8-bit integer, not a character:
    /// `write_byte(65)` logs `65`, not `A`. Long-standing behavior that
    /// consumers may depend on either way, so it is preserved as-is.
    /// Suppression does not apply; every call emits exactly one record.
    pub fn write_byte(&mut self, b: u8) -> io::Result<()> {
        if !self.records.enabled() {
            return Ok(());
        }
        self.records.append(&format!("{}{}", self.prefix, b as i8))
    }

    fn write_chunk(&mut self, buf: &[u8]) -> io::Result<()> {
        if !self.records.enabled() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(buf);
        let trimmed = text.trim();
        if trimmed.is_empty() && self.suppress_empty {
            return Ok(());
        }
        self.records.append(&format!("{}{}", self.prefix, trimmed))
    }
}

impl<S: RecordSink> Write for LineLoggingSink<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
