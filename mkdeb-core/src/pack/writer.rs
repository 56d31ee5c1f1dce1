use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::codec::CompressAlgorithm;
use crate::error::{Result, StepExt};
use crate::hash::algorithm::{HashAlgorithm, STANDARD_HASHES};
use crate::manifest::Manifest;

use super::pipeline::Pipeline;

/// 2020-01-01T00:00:00Z
pub const DEFAULT_EPOCH: u64 = 1_577_836_800;

#[derive(Clone, Debug)]
pub struct PackOptions {
    /// Directory that relative content paths are looked up in.
    pub root: PathBuf,
    /// Applied to both tarballs. `Auto` means gzip.
    pub compression: CompressAlgorithm,
    /// One checksum file per algorithm, in this order.
    pub hashes: Vec<HashAlgorithm>,
    /// mtime for control members and for entries without one.
    pub epoch: u64,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            compression: CompressAlgorithm::Auto,
            hashes: STANDARD_HASHES.to_vec(),
            epoch: DEFAULT_EPOCH,
        }
    }
}

/// Build a complete `.deb` from `manifest` into `out`.
///
/// Both partitions are spooled to a temporary directory, which is removed
/// whether or not the build succeeds. Returns the manifest with digests
/// filled in.
pub fn pack<W: Write>(manifest: Manifest, out: W, opts: Option<&PackOptions>) -> Result<Manifest> {
    let mut pipeline = Pipeline::new(manifest, opts);
    pipeline.resolve()?;

    let spool = tempfile::Builder::new()
        .prefix("mkdeb-")
        .tempdir()
        .step(|| "create spool directory".into())?;
    debug!(path = %spool.path().display(), "spooling partitions");

    let data = tempfile::tempfile_in(spool.path()).step(|| "create data spool".into())?;
    let data = pipeline.build_data(data)?;

    let control = tempfile::tempfile_in(spool.path()).step(|| "create control spool".into())?;
    let control = pipeline.build_control(control)?;

    pipeline.assemble(out, control, data)?;
    spool.close().step(|| "remove spool directory".into())?;

    Ok(pipeline.into_manifest())
}
