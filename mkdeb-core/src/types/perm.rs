use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseTokenError;

pub const PERM_MASK: u16 = 0o7777;

/// POSIX permission bits (including setuid/setgid/sticky).
/// Zero means "use the default for the entry type".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Perm(u16);

impl Perm {
    pub const fn new(bits: u16) -> Self {
        Self(bits & PERM_MASK)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl FromStr for Perm {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Perm(0));
        }
        let digits = s
            .strip_prefix("0o")
            .or_else(|| s.strip_prefix("0O"))
            .unwrap_or(s);
        u16::from_str_radix(digits, 8)
            .map(Perm::new)
            .map_err(|_| ParseTokenError::new("octal permission", s))
    }
}

impl Serialize for Perm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPerm {
    Null(()),
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Perm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawPerm::deserialize(deserializer)? {
            RawPerm::Null(()) => Ok(Perm(0)),
            // numbers are taken as-is, then masked
            RawPerm::Number(n) => Ok(Perm::new((n & u64::from(PERM_MASK)) as u16)),
            RawPerm::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
