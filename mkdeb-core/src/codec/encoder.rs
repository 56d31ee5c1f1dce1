use super::CompressAlgorithm;
use std::io::{self, Write};

const ZSTD_LEVEL: i32 = 19;

/// Streaming compressor for one tarball.
///
/// The tar layer must be finished before [`Encoder::finish`] so that the
/// compressed trailer follows tar's end-of-archive marker.
pub enum Encoder<W: Write> {
    Store(W),
    Gzip(flate2::write::GzEncoder<W>),
    Bzip2(bzip2::write::BzEncoder<W>),
    Xz(xz2::write::XzEncoder<W>),
    Zstd(zstd::stream::Encoder<'static, W>),
}

impl<W: Write> Encoder<W> {
    pub fn new(algo: CompressAlgorithm, dst: W) -> io::Result<Self> {
        Ok(match algo {
            CompressAlgorithm::None => Encoder::Store(dst),
            CompressAlgorithm::Gzip => {
                Encoder::Gzip(flate2::write::GzEncoder::new(dst, flate2::Compression::best()))
            }
            CompressAlgorithm::Bzip2 => {
                Encoder::Bzip2(bzip2::write::BzEncoder::new(dst, bzip2::Compression::best()))
            }
            CompressAlgorithm::Xz => Encoder::Xz(xz2::write::XzEncoder::new(dst, 6)),
            CompressAlgorithm::Zstd => {
                let mut enc = zstd::stream::Encoder::new(dst, ZSTD_LEVEL)?;
                enc.include_checksum(true)?;
                Encoder::Zstd(enc)
            }
            CompressAlgorithm::Auto => return Self::new(algo.resolve(), dst),
        })
    }

    /// Write the compressed trailer and hand back the sink.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Encoder::Store(mut w) => {
                w.flush()?;
                Ok(w)
            }
            Encoder::Gzip(e) => e.finish(),
            Encoder::Bzip2(e) => e.finish(),
            Encoder::Xz(e) => e.finish(),
            Encoder::Zstd(e) => e.finish(),
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Encoder::Store(w) => w.write(buf),
            Encoder::Gzip(e) => e.write(buf),
            Encoder::Bzip2(e) => e.write(buf),
            Encoder::Xz(e) => e.write(buf),
            Encoder::Zstd(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Encoder::Store(w) => w.flush(),
            Encoder::Gzip(e) => e.flush(),
            Encoder::Bzip2(e) => e.flush(),
            Encoder::Xz(e) => e.flush(),
            Encoder::Zstd(e) => e.flush(),
        }
    }
}
