use std::io::{Read, Result, Write};

/// Reader adapter that forwards the chunks it yields into `tap`.
///
/// A chunk reaches the tap only when the caller comes back for the next one
/// (or hits end of input), i.e. after the caller has written it on. With tar
/// copying content into the compressor, the digest therefore only ever
/// covers bytes the compressed stream has already accepted.
pub struct HashingForward<'a, R: Read, T: Write> {
    inner: R,
    tap: &'a mut T,
    pending: Vec<u8>,
}

impl<'a, R: Read, T: Write> HashingForward<'a, R, T> {
    pub fn new(inner: R, tap: &'a mut T) -> Self {
        Self {
            inner,
            tap,
            pending: Vec::new(),
        }
    }
}

impl<'a, R: Read, T: Write> Read for HashingForward<'a, R, T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.pending.is_empty() {
            self.tap.write_all(&self.pending)?;
            self.pending.clear();
        }
        let n = self.inner.read(buf)?;
        self.pending.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}
