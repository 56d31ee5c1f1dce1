#![forbid(unsafe_code)]

pub mod build_info;
pub mod error;

pub mod types {
    pub mod entry_type;
    pub mod owner;
    pub mod perm;
}

pub mod util {
    pub mod hash_forward;
    pub mod pad;
    pub mod path;
    pub mod sized;
    pub mod syntax;
}

pub mod hash {
    pub mod algorithm;
    pub mod multi;
}

pub mod codec;

pub mod manifest;

pub mod container {
    pub mod ar;
}

pub mod pack {
    pub mod control;
    pub mod data;
    pub mod pipeline;
    pub mod writer;
}

// Re-exports: stable API surface
pub use build_info::BuildInfo;
pub use codec::CompressAlgorithm;
pub use error::{ContractError, MkdebError, Result, StepExt, ValidationError, ValidationReason};
pub use hash::algorithm::HashAlgorithm;
pub use manifest::{Content, FileEntry, MaintainerScript, Manifest};
pub use pack::pipeline::{Pipeline, Stage};
pub use pack::writer::{PackOptions, pack};
pub use types::{entry_type::EntryType, owner::Owner, perm::Perm};
