use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::io::{AsRawFd, RawFd};

/// Duplicates every write to a primary stream into a secondary one.
///
/// Bytes reach the primary first; whatever prefix the primary accepts is
/// then force-fed to the secondary, so both destinations observe the same
/// bytes in the same order. No locking is performed beyond what the
/// underlying streams provide.
#[derive(Debug)]
pub struct StreamTee<P: Write, S: Write> {
    primary: P,
    secondary: S,
}

impl<P: Write, S: Write> StreamTee<P, S> {
    /// Binds `primary` to `secondary` for the lifetime of the tee.
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    /// Shared access to the primary stream.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Shared access to the secondary stream.
    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    /// Releases both streams, flushing neither.
    pub fn into_parts(self) -> (P, S) {
        (self.primary, self.secondary)
    }
}

impl<P: Write, S: Write> Write for StreamTee<P, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.primary.write(buf)?;
        self.secondary.write_all(&buf[..written])?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        self.secondary.flush()
    }
}

#[cfg(unix)]
impl<P: Write + AsRawFd, S: Write> AsRawFd for StreamTee<P, S> {
    /// Descriptor-level tools keep talking to the primary stream.
    fn as_raw_fd(&self) -> RawFd {
        self.primary.as_raw_fd()
    }
}
