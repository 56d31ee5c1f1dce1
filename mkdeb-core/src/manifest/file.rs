use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::{ContractError, MkdebError, Result, StepExt, ValidationError, ValidationReason};
use crate::hash::multi::Digests;
use crate::types::entry_type::EntryType;
use crate::types::owner::Owner;
use crate::types::perm::Perm;
use crate::util::{path, syntax};

/// Where a regular file's bytes come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Content {
    /// The entry's own name, relative to the content root.
    #[default]
    Implicit,
    /// An explicit path relative to the content root.
    Path(String),
    Text(String),
    Bytes(Vec<u8>),
}

/// One row of the manifest's `files` list.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "RawFileEntry")]
pub struct FileEntry {
    pub name: String,
    pub kind: EntryType,
    pub is_conf: bool,
    pub perm: Perm,
    pub user: Owner,
    pub group: Owner,
    pub mtime: Option<OffsetDateTime>,
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub link: Option<String>,
    pub content: Content,

    size: Option<u64>,
    digests: Option<Digests>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawFileEntry {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: EntryType,
    #[serde(default)]
    is_conf: bool,
    #[serde(default)]
    perm: Perm,
    #[serde(default)]
    user: Owner,
    #[serde(default)]
    group: Owner,
    #[serde(default, with = "time::serde::rfc3339::option")]
    mtime: Option<OffsetDateTime>,
    major: Option<u32>,
    minor: Option<u32>,
    path: Option<String>,
    text: Option<String>,
    #[serde(default, deserialize_with = "base64_bytes")]
    bytes: Option<Vec<u8>>,
    link: Option<String>,
}

fn base64_bytes<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<u8>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    encoded
        .map(|s| {
            data_encoding::BASE64
                .decode(s.as_bytes())
                .map_err(serde::de::Error::custom)
        })
        .transpose()
}

impl TryFrom<RawFileEntry> for FileEntry {
    type Error = ValidationError;

    fn try_from(raw: RawFileEntry) -> std::result::Result<Self, Self::Error> {
        let content = match (raw.path, raw.text, raw.bytes) {
            (None, None, None) => Content::Implicit,
            (Some(p), None, None) => Content::Path(p),
            (None, Some(t), None) => Content::Text(t),
            (None, None, Some(b)) => Content::Bytes(b),
            (Some(_), Some(_), _) => {
                return Err(ValidationError::new("text", ValidationReason::Conflict("path")));
            }
            (Some(_), None, Some(_)) => {
                return Err(ValidationError::new("bytes", ValidationReason::Conflict("path")));
            }
            (None, Some(_), Some(_)) => {
                return Err(ValidationError::new("bytes", ValidationReason::Conflict("text")));
            }
        };
        Ok(FileEntry {
            name: raw.name,
            kind: raw.kind,
            is_conf: raw.is_conf,
            perm: raw.perm,
            user: raw.user,
            group: raw.group,
            mtime: raw.mtime,
            major: raw.major,
            minor: raw.minor,
            link: raw.link,
            content,
            size: None,
            digests: None,
        })
    }
}

impl FileEntry {
    pub fn new(name: impl Into<String>, kind: EntryType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    /// Resolved content length; `None` until [`FileEntry::resolve`] ran.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn is_resolved(&self) -> bool {
        self.size.is_some()
    }

    /// Digests captured while the data tarball was written.
    pub fn digests(&self) -> Option<&Digests> {
        self.digests.as_ref()
    }

    pub(crate) fn set_digests(&mut self, digests: Option<Digests>) {
        self.digests = digests;
    }

    /// Check the entry on its own. Resolves `Auto` and normalizes directory
    /// names to end in `/`.
    pub fn validate(&mut self) -> std::result::Result<(), ValidationError> {
        use ValidationReason as R;

        if self.name.is_empty() {
            return Err(ValidationError::new("name", R::Missing));
        }
        if !syntax::is_unix_path(&self.name) {
            return Err(invalid("name", "Unix path", &self.name));
        }

        if self.kind == EntryType::Auto {
            self.kind = if self.name.ends_with('/') {
                EntryType::Directory
            } else {
                EntryType::RegularFile
            };
        }

        if self.kind == EntryType::Directory {
            self.name = format!("{}/", self.name.trim_end_matches('/'));
        } else if self.name == "." || self.name.ends_with('/') {
            return Err(ValidationError::new(
                "name",
                R::DirectoryOnly(self.name.clone()),
            ));
        }

        if self.kind == EntryType::RegularFile {
            if let Content::Path(p) = &self.content {
                if !syntax::is_unix_path(p) {
                    return Err(invalid("path", "Unix path", p));
                }
                if p.ends_with('/') {
                    return Err(ValidationError::new("path", R::TrailingSlash(p.clone())));
                }
            }
        } else {
            if self.is_conf {
                return Err(ValidationError::new("isConf", R::Conflict("type")));
            }
            match self.content {
                Content::Implicit => {}
                Content::Path(_) => return Err(ValidationError::new("path", R::Unexpected)),
                Content::Text(_) => return Err(ValidationError::new("text", R::Unexpected)),
                Content::Bytes(_) => return Err(ValidationError::new("bytes", R::Unexpected)),
            }
        }

        if self.kind == EntryType::Symlink {
            let Some(link) = &self.link else {
                return Err(ValidationError::new("link", R::Missing));
            };
            let clean = path::clean(link);
            if *link != clean {
                return Err(ValidationError::new(
                    "link",
                    R::NotCanonical {
                        expected: clean,
                        got: link.clone(),
                    },
                ));
            }
        } else if self.link.is_some() {
            return Err(ValidationError::new("link", R::Unexpected));
        }

        if self.kind.is_device() {
            if self.major.is_none() {
                return Err(ValidationError::new("major", R::Missing));
            }
            if self.minor.is_none() {
                return Err(ValidationError::new("minor", R::Missing));
            }
        } else {
            if self.major.is_some() {
                return Err(ValidationError::new("major", R::Unexpected));
            }
            if self.minor.is_some() {
                return Err(ValidationError::new("minor", R::Unexpected));
            }
        }

        if !self.user.is_valid() {
            return Err(invalid("user", "owner name", &self.user.to_string()));
        }
        if !self.group.is_valid() {
            return Err(invalid("group", "owner name", &self.group.to_string()));
        }

        if let Some(mtime) = self.mtime {
            if mtime.unix_timestamp() < 0 {
                return Err(ValidationError::new("mtime", R::BeforeEpoch));
            }
        }

        Ok(())
    }

    /// Validate, then fix the content size. Regular files backed by the
    /// filesystem are looked up under `root`.
    pub fn resolve(&mut self, root: &Path) -> Result<()> {
        self.size = None;
        self.digests = None;
        self.validate()?;

        let size = match (&self.kind, &self.content) {
            (EntryType::RegularFile, Content::Bytes(b)) => b.len() as u64,
            (EntryType::RegularFile, Content::Text(t)) => t.len() as u64,
            (EntryType::RegularFile, _) => {
                let (field, full) = self.source_path(root);
                let md = fs::metadata(&full).map_err(|source| MkdebError::SourceUnavailable {
                    field: field.to_string(),
                    path: full.clone(),
                    source,
                })?;
                if !md.is_file() {
                    return Err(MkdebError::SourceUnavailable {
                        field: field.to_string(),
                        path: full,
                        source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
                    });
                }
                md.len()
            }
            _ => 0,
        };

        self.size = Some(size);
        Ok(())
    }

    fn source_path(&self, root: &Path) -> (&'static str, PathBuf) {
        match &self.content {
            Content::Path(p) => ("path", root.join(p)),
            _ => ("name", root.join(&self.name)),
        }
    }

    /// Tar header for this entry. Entries without an explicit mtime get
    /// `fallback_mtime` so the output does not depend on the build clock.
    pub fn to_header(&self, fallback_mtime: u64) -> Result<tar::Header> {
        let size = self
            .size
            .ok_or(ContractError::NotResolved("FileEntry::to_header"))?;

        let tar_type = match self.kind {
            EntryType::Auto => return Err(ContractError::UnresolvedType(self.name.clone()).into()),
            EntryType::Directory => tar::EntryType::Directory,
            EntryType::RegularFile => tar::EntryType::Regular,
            EntryType::Symlink => tar::EntryType::Symlink,
            EntryType::Fifo => tar::EntryType::Fifo,
            EntryType::CharDevice => tar::EntryType::Char,
            EntryType::BlockDevice => tar::EntryType::Block,
        };

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar_type);
        let perm = if self.perm.is_zero() {
            self.kind.default_perm()
        } else {
            u32::from(self.perm.bits())
        };
        header.set_mode(self.kind.format_bits() | perm);
        header.set_size(if self.kind == EntryType::RegularFile {
            size
        } else {
            0
        });
        let mtime = self
            .mtime
            .and_then(|t| u64::try_from(t.unix_timestamp()).ok())
            .unwrap_or(fallback_mtime);
        header.set_mtime(mtime);
        header.set_uid(0);
        header.set_gid(0);

        match &self.user {
            Owner::Unspecified => {}
            Owner::ById(id) => header.set_uid(u64::from(*id)),
            Owner::ByName(name) => header
                .set_username(name)
                .step(|| format!("{}: user", self.name))?,
        }
        match &self.group {
            Owner::Unspecified => {}
            Owner::ById(id) => header.set_gid(u64::from(*id)),
            Owner::ByName(name) => header
                .set_groupname(name)
                .step(|| format!("{}: group", self.name))?,
        }

        if let (Some(major), Some(minor)) = (self.major, self.minor) {
            header
                .set_device_major(major)
                .step(|| format!("{}: major", self.name))?;
            header
                .set_device_minor(minor)
                .step(|| format!("{}: minor", self.name))?;
        }

        Ok(header)
    }

    /// Single-pass content stream. Non-regular entries yield nothing.
    pub fn open_content(&self, root: &Path) -> Result<Box<dyn Read + '_>> {
        if self.size.is_none() {
            return Err(ContractError::NotResolved("FileEntry::open_content").into());
        }
        if self.kind != EntryType::RegularFile {
            return Ok(Box::new(io::empty()));
        }
        match &self.content {
            Content::Bytes(b) => Ok(Box::new(&b[..])),
            Content::Text(t) => Ok(Box::new(t.as_bytes())),
            Content::Path(_) | Content::Implicit => {
                let (field, full) = self.source_path(root);
                let f = File::open(&full).map_err(|source| MkdebError::SourceUnavailable {
                    field: field.to_string(),
                    path: full,
                    source,
                })?;
                Ok(Box::new(f))
            }
        }
    }
}

fn invalid(field: &str, what: &'static str, value: &str) -> ValidationError {
    ValidationError::new(
        field,
        ValidationReason::Invalid {
            what,
            value: value.to_string(),
        },
    )
}
