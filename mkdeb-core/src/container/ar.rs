//! The `ar` container dpkg expects around the two tarballs.

use std::io::{self, Read, Write};

use crate::error::{ContractError, Result};

pub const MAGIC: &[u8; 8] = b"!<arch>\n";
pub const HEADER_LEN: usize = 60;
const NAME_LEN: usize = 16;

// Fixed fields: 2020-01-01T00:00:00Z, uid 0, gid 0, mode 100644.
const MTIME: &[u8; 12] = b"1577836800  ";
const OWNER: &[u8; 6] = b"0     ";
const MODE: &[u8; 8] = b"100644  ";
const TRAILER: &[u8; 2] = b"`\n";

/// Header of one member. The name is space padded to 16 bytes and the size
/// left-justified in 10.
pub fn entry_header(name: &str, size: u64) -> std::result::Result<[u8; HEADER_LEN], ContractError> {
    let size_text = size.to_string();
    if name.len() > NAME_LEN {
        return Err(ContractError::NameTooLong(name.to_string()));
    }
    if size_text.len() > 10 {
        return Err(ContractError::MemberTooLarge {
            name: name.to_string(),
            size,
        });
    }

    let mut h = [b' '; HEADER_LEN];
    h[..name.len()].copy_from_slice(name.as_bytes());
    h[16..28].copy_from_slice(MTIME);
    h[28..34].copy_from_slice(OWNER);
    h[34..40].copy_from_slice(OWNER);
    h[40..48].copy_from_slice(MODE);
    h[48..48 + size_text.len()].copy_from_slice(size_text.as_bytes());
    h[58..60].copy_from_slice(TRAILER);
    Ok(h)
}

/// Streams members into an archive. The magic is written on construction.
pub struct ArWriter<W: Write> {
    inner: W,
}

impl<W: Write> ArWriter<W> {
    pub fn new(mut inner: W) -> io::Result<Self> {
        inner.write_all(MAGIC)?;
        Ok(Self { inner })
    }

    /// Append `name` with exactly `size` bytes taken from `reader`.
    pub fn append(&mut self, name: &str, size: u64, reader: impl Read) -> Result<()> {
        let header = entry_header(name, size)?;
        self.inner.write_all(&header)?;

        let copied = io::copy(&mut reader.take(size), &mut self.inner)?;
        if copied != size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{name}: expected {size} bytes, got {copied}"),
            )
            .into());
        }
        if size % 2 == 1 {
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Read every member of an archive into memory.
pub fn read_members(mut r: impl Read) -> io::Result<Vec<(String, Vec<u8>)>> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(io::ErrorKind::InvalidData.into());
    }

    let mut members = Vec::new();
    loop {
        let mut header = [0u8; HEADER_LEN];
        match r.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
        if &header[58..60] != TRAILER {
            return Err(io::ErrorKind::InvalidData.into());
        }
        let name = String::from_utf8_lossy(&header[..NAME_LEN])
            .trim_end()
            .to_string();
        let size: u64 = std::str::from_utf8(&header[48..58])
            .ok()
            .and_then(|s| s.trim_end().parse().ok())
            .ok_or(io::ErrorKind::InvalidData)?;

        let mut body = Vec::new();
        (&mut r).take(size).read_to_end(&mut body)?;
        if body.len() as u64 != size {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        if size % 2 == 1 {
            let mut pad = [0u8; 1];
            r.read_exact(&mut pad)?;
        }
        members.push((name, body));
    }
    Ok(members)
}
