use std::fs::{self, File};
use std::path::Path;

use mkdeb_core::error::Result;
use mkdeb_core::{CompressAlgorithm, Manifest, PackOptions, StepExt, pack};
use tracing::info;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Read the manifest, build the package, and move it into place.
///
/// Relative manifest and output paths are taken from `root`. The package is
/// written to a temporary file next to `output` and renamed over it only
/// once it is complete and synced.
pub fn handle_build(
    root: &Path,
    manifest: &Path,
    output: &Path,
    compression: CompressAlgorithm,
) -> Result<()> {
    let root = std::path::absolute(root)
        .step(|| format!("failed to make path absolute: {root:?}"))?;
    let manifest_path = root.join(manifest);
    let output_path = root.join(output);

    let bytes = fs::read(&manifest_path)
        .step(|| format!("failed to read manifest file: {manifest_path:?}"))?;
    let manifest = Manifest::from_json(&bytes)?;

    let opts = PackOptions {
        root: root.clone(),
        compression,
        ..Default::default()
    };

    let dir = output_path.parent().unwrap_or(&root);
    let mut tmp = tempfile::Builder::new()
        .prefix(".mkdeb-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .step(|| format!("failed to create output file in {dir:?}"))?;

    let built = pack(manifest, tmp.as_file_mut(), Some(&opts))?;

    #[cfg(unix)]
    tmp.as_file()
        .set_permissions(fs::Permissions::from_mode(0o644))
        .step(|| "failed to set output permissions".into())?;
    tmp.as_file()
        .sync_all()
        .step(|| "failed to sync output file".into())?;
    tmp.persist(&output_path)
        .map_err(|e| e.error)
        .step(|| format!("failed to rename output file into place: {output_path:?}"))?;
    File::open(dir)
        .and_then(|d| d.sync_all())
        .step(|| format!("failed to sync directory {dir:?}"))?;

    info!(
        package = %built.package,
        version = %built.version,
        output = %output_path.display(),
        "package written"
    );
    Ok(())
}
