use std::io::{self, Write};

/// Duplicates every write to two downstream writers.
///
/// Both branches observe the full byte sequence (`write_all` on each), and
/// the first error either branch reports is propagated to the caller.
pub struct TeeWriter<A, B> {
    primary: A,
    mirror: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(primary: A, mirror: B) -> Self {
        Self { primary, mirror }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.primary, self.mirror)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        self.mirror.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.mirror.flush()
    }
}
