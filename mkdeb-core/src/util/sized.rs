use std::io::{Error, ErrorKind, Read, Result};

/// Reader that yields exactly `limit` bytes from `inner`.
///
/// Content sizes are fixed when the manifest is resolved and written into
/// tar headers up front; a source that shrank afterwards is an error, and
/// one that grew is cut at the declared length.
pub struct SizedReader<R: Read> {
    inner: R,
    remaining: u64,
}

impl<R: Read> SizedReader<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<R: Read> Read for SizedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let want = buf.len().min(self.remaining.min(usize::MAX as u64) as usize);
        let n = self.inner.read(&mut buf[..want])?;
        if n == 0 {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("content ended {} bytes short of its resolved size", self.remaining),
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}
