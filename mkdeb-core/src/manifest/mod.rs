use serde::Deserialize;

use crate::error::Result;
use crate::types::entry_type::EntryType;

pub mod file;
pub mod render;
pub mod validate;

pub use file::{Content, FileEntry};
pub use render::MaintainerScript;

/// Declarative description of one binary package.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub essential: String,
    #[serde(default)]
    pub depends: String,
    #[serde(default)]
    pub pre_depends: String,
    #[serde(default)]
    pub recommends: String,
    #[serde(default)]
    pub suggests: String,
    #[serde(default)]
    pub enhances: String,
    #[serde(default)]
    pub breaks: String,
    #[serde(default)]
    pub conflicts: String,
    #[serde(default)]
    pub maintainer: String,
    #[serde(default)]
    pub home_page: String,
    #[serde(default)]
    pub built_using: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: Vec<String>,
    #[serde(default)]
    pub implicit_dirs: Vec<String>,
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub pre_install: Vec<String>,
    #[serde(default)]
    pub post_install: Vec<String>,
    #[serde(default)]
    pub pre_remove: Vec<String>,
    #[serde(default)]
    pub post_remove: Vec<String>,

    #[serde(skip)]
    installed_size: Option<u64>,
}

impl Manifest {
    /// Strict parse: unknown fields and conflicting content sources fail.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Sum of block-padded regular file sizes, in bytes. Set by `resolve`.
    pub fn installed_size(&self) -> Option<u64> {
        self.installed_size
    }

    pub fn is_resolved(&self) -> bool {
        self.installed_size.is_some()
    }

    /// True once every regular file carries digests.
    pub fn is_hashed(&self) -> bool {
        self.is_resolved()
            && self
                .files
                .iter()
                .filter(|f| f.kind == EntryType::RegularFile)
                .all(|f| f.digests().is_some())
    }
}
