use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseTokenError;

/// Kind of filesystem entry described by one manifest row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntryType {
    /// Inferred from the entry name during validation.
    #[default]
    Auto,
    Directory,
    RegularFile,
    Symlink,
    Fifo,
    CharDevice,
    BlockDevice,
}

const ALIASES: &[(&str, EntryType)] = &[
    ("", EntryType::Auto),
    ("auto", EntryType::Auto),
    ("directory", EntryType::Directory),
    ("dir", EntryType::Directory),
    ("d", EntryType::Directory),
    ("regular-file", EntryType::RegularFile),
    ("regular", EntryType::RegularFile),
    ("reg", EntryType::RegularFile),
    ("r", EntryType::RegularFile),
    ("file", EntryType::RegularFile),
    ("f", EntryType::RegularFile),
    ("-", EntryType::RegularFile),
    ("symlink", EntryType::Symlink),
    ("link", EntryType::Symlink),
    ("l", EntryType::Symlink),
    ("symbolic-link", EntryType::Symlink),
    ("sym-link", EntryType::Symlink),
    ("fifo", EntryType::Fifo),
    ("pipe", EntryType::Fifo),
    ("p", EntryType::Fifo),
    ("char-device", EntryType::CharDevice),
    ("char-dev", EntryType::CharDevice),
    ("chardev", EntryType::CharDevice),
    ("char", EntryType::CharDevice),
    ("chr-dev", EntryType::CharDevice),
    ("chrdev", EntryType::CharDevice),
    ("chr", EntryType::CharDevice),
    ("c", EntryType::CharDevice),
    ("block-device", EntryType::BlockDevice),
    ("block-dev", EntryType::BlockDevice),
    ("blockdev", EntryType::BlockDevice),
    ("block", EntryType::BlockDevice),
    ("blk-dev", EntryType::BlockDevice),
    ("blkdev", EntryType::BlockDevice),
    ("blk", EntryType::BlockDevice),
    ("b", EntryType::BlockDevice),
];

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Auto => "auto",
            EntryType::Directory => "directory",
            EntryType::RegularFile => "regular-file",
            EntryType::Symlink => "symlink",
            EntryType::Fifo => "fifo",
            EntryType::CharDevice => "char-device",
            EntryType::BlockDevice => "block-device",
        }
    }

    pub fn is_device(self) -> bool {
        matches!(self, EntryType::CharDevice | EntryType::BlockDevice)
    }

    /// Permission used when the manifest leaves `perm` at zero.
    pub fn default_perm(self) -> u32 {
        match self {
            EntryType::Directory => 0o755,
            EntryType::RegularFile => 0o644,
            EntryType::Symlink => 0o777,
            _ => 0o600,
        }
    }

    /// `S_IFMT` bits for this type. `Auto` has none.
    pub fn format_bits(self) -> u32 {
        match self {
            EntryType::Auto => 0,
            EntryType::Directory => 0o040000,
            EntryType::RegularFile => 0o100000,
            EntryType::Symlink => 0o120000,
            EntryType::Fifo => 0o010000,
            EntryType::CharDevice => 0o020000,
            EntryType::BlockDevice => 0o060000,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, value)| *value)
            .ok_or_else(|| ParseTokenError::new("entry type", s))
    }
}

impl TryFrom<String> for EntryType {
    type Error = ParseTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryType> for String {
    fn from(value: EntryType) -> Self {
        value.as_str().to_string()
    }
}
