use std::fmt;
use std::str::FromStr;

use digest::DynDigest;
use serde::{Deserialize, Serialize};

use crate::error::ParseTokenError;

/// Digest algorithms recorded in the control tarball, one checksum file each.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

/// The default set, in checksum-file order.
pub const STANDARD_HASHES: [HashAlgorithm; 3] =
    [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256];

const ALIASES: &[(&str, HashAlgorithm)] = &[
    ("md5", HashAlgorithm::Md5),
    ("md-5", HashAlgorithm::Md5),
    ("sha1", HashAlgorithm::Sha1),
    ("sha-1", HashAlgorithm::Sha1),
    ("sha256", HashAlgorithm::Sha256),
    ("sha-256", HashAlgorithm::Sha256),
    ("sha2", HashAlgorithm::Sha256),
    ("sha-2", HashAlgorithm::Sha256),
];

impl HashAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha256 => "SHA256",
        }
    }

    /// Name of the checksum file inside the control tarball.
    pub fn file_name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5sum",
            HashAlgorithm::Sha1 => "sha1sum",
            HashAlgorithm::Sha256 => "sha256sum",
        }
    }

    pub fn hasher(self) -> Box<dyn DynDigest> {
        match self {
            HashAlgorithm::Md5 => Box::new(md5::Md5::default()),
            HashAlgorithm::Sha1 => Box::new(sha1::Sha1::default()),
            HashAlgorithm::Sha256 => Box::new(sha2::Sha256::default()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, value)| *value)
            .ok_or_else(|| ParseTokenError::new("hash algorithm", s))
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = ParseTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(value: HashAlgorithm) -> Self {
        value.as_str().to_string()
    }
}
