use crate::error::ParseTokenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub mod encoder;

pub use encoder::Encoder;

/// Compression applied to both tarballs of a package.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CompressAlgorithm {
    /// Resolved to [`CompressAlgorithm::Gzip`] at build time.
    #[default]
    Auto,
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

const ALIASES: &[(&str, CompressAlgorithm)] = &[
    ("", CompressAlgorithm::Auto),
    ("auto", CompressAlgorithm::Auto),
    ("none", CompressAlgorithm::None),
    ("gzip", CompressAlgorithm::Gzip),
    ("gz", CompressAlgorithm::Gzip),
    ("bzip2", CompressAlgorithm::Bzip2),
    ("bzip", CompressAlgorithm::Bzip2),
    ("bz2", CompressAlgorithm::Bzip2),
    ("xz", CompressAlgorithm::Xz),
    ("zstd", CompressAlgorithm::Zstd),
    ("zst", CompressAlgorithm::Zstd),
];

impl CompressAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            CompressAlgorithm::Auto => "auto",
            CompressAlgorithm::None => "none",
            CompressAlgorithm::Gzip => "gzip",
            CompressAlgorithm::Bzip2 => "bzip2",
            CompressAlgorithm::Xz => "xz",
            CompressAlgorithm::Zstd => "zstd",
        }
    }

    pub fn resolve(self) -> Self {
        match self {
            CompressAlgorithm::Auto => CompressAlgorithm::Gzip,
            other => other,
        }
    }

    /// Suffix appended to `control.tar` / `data.tar`.
    pub fn suffix(self) -> &'static str {
        match self {
            CompressAlgorithm::Auto | CompressAlgorithm::None => "",
            CompressAlgorithm::Gzip => ".gz",
            CompressAlgorithm::Bzip2 => ".bz2",
            CompressAlgorithm::Xz => ".xz",
            CompressAlgorithm::Zstd => ".zst",
        }
    }

    /// Wrap `dst` in a streaming compressor. `Auto` is resolved first.
    pub fn encoder<W: Write>(self, dst: W) -> std::io::Result<Encoder<W>> {
        Encoder::new(self.resolve(), dst)
    }
}

impl fmt::Display for CompressAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressAlgorithm {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, value)| *value)
            .ok_or_else(|| ParseTokenError::new("compression algorithm", s))
    }
}

impl TryFrom<String> for CompressAlgorithm {
    type Error = ParseTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompressAlgorithm> for String {
    fn from(value: CompressAlgorithm) -> Self {
        value.as_str().to_string()
    }
}
