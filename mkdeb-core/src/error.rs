use std::path::PathBuf;

use thiserror::Error;

use crate::hash::algorithm::HashAlgorithm;
use crate::pack::pipeline::Stage;

#[derive(Error, Debug)]
pub enum MkdebError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O failure attributed to a named pipeline step.
    #[error("{step}: {source}")]
    Step {
        step: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{field}: failed to stat {path:?}: {source}")]
    SourceUnavailable {
        field: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline was driven out of contract. Never caused by manifest data.
    #[error("internal error: {0}")]
    Contract(#[from] ContractError),
}

impl MkdebError {
    pub fn is_contract(&self) -> bool {
        matches!(self, MkdebError::Contract(_))
    }

    /// Prefix field paths carried by this error with `parent`.
    pub fn within(self, parent: &str) -> Self {
        match self {
            MkdebError::Validation(e) => MkdebError::Validation(e.within(parent)),
            MkdebError::SourceUnavailable {
                field,
                path,
                source,
            } => MkdebError::SourceUnavailable {
                field: format!("{parent}.{field}"),
                path,
                source,
            },
            MkdebError::Step { step, source } => MkdebError::Step {
                step: format!("{parent}: {step}"),
                source,
            },
            other => other,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, MkdebError>;

/// Attach a step name to a raw I/O result.
pub trait StepExt<T> {
    fn step(self, step: impl FnOnce() -> String) -> Result<T>;
}

impl<T> StepExt<T> for std::io::Result<T> {
    fn step(self, step: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|source| MkdebError::Step {
            step: step(),
            source,
        })
    }
}

/// A manifest invariant that does not hold, located by its field path
/// (e.g. `files[3].link`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }

    /// Prefix the field path with the location of the enclosing value.
    pub fn within(mut self, parent: &str) -> Self {
        self.field = if self.field.is_empty() {
            parent.to_string()
        } else {
            format!("{parent}.{}", self.field)
        };
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    #[error("missing required field")]
    Missing,

    #[error("invalid {what} {value:?}")]
    Invalid { what: &'static str, value: String },

    #[error("conflict with field {0:?}")]
    Conflict(&'static str),

    #[error("unexpected value for field")]
    Unexpected,

    #[error("value is only appropriate for a directory: {0:?}")]
    DirectoryOnly(String),

    #[error("unexpected trailing '/': {0:?}")]
    TrailingSlash(String),

    #[error("value is not canonical: expected {expected:?}, got {got:?}")]
    NotCanonical { expected: String, got: String },

    #[error("duplicate file {name:?} has the same name as files[{first}]")]
    Duplicate { name: String, first: usize },

    #[error("directory {0:?} might not exist yet")]
    UnknownDirectory(String),

    #[error("timestamp precedes the Unix epoch")]
    BeforeEpoch,

    #[error("installed size overflows")]
    SizeOverflow,
}

/// Misuse of the build pipeline by its caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("{operation} requires stage {expected:?}, but the pipeline is at {actual:?}")]
    OutOfOrder {
        operation: &'static str,
        expected: Stage,
        actual: Stage,
    },

    #[error("{0} called before resolve")]
    NotResolved(&'static str),

    #[error("{0} called before the data partition was hashed")]
    NotHashed(&'static str),

    #[error("entry {0:?} still has an unresolved type")]
    UnresolvedType(String),

    #[error("entry {name:?} has no {algo} digest")]
    MissingDigest { name: String, algo: HashAlgorithm },

    #[error("ar member name {0:?} exceeds 16 bytes")]
    NameTooLong(String),

    #[error("ar member {name:?} is too large ({size} bytes)")]
    MemberTooLarge { name: String, size: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseTokenError {
    #[error("failed to parse {input:?} as {kind}")]
    UnrecognizedToken { kind: &'static str, input: String },
}

impl ParseTokenError {
    pub(crate) fn new(kind: &'static str, input: &str) -> Self {
        ParseTokenError::UnrecognizedToken {
            kind,
            input: input.to_string(),
        }
    }
}
