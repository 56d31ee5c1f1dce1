use std::io::Write;

use tracing::debug;

use crate::error::{Result, StepExt};
use crate::manifest::{MaintainerScript, Manifest};

use super::writer::PackOptions;

const REG_MODE: u32 = 0o100644;
const EXEC_MODE: u32 = 0o100755;

/// Write `control`, the checksum files, `conffiles` and the maintainer
/// scripts into a compressed tarball.
pub(crate) fn write_control<W: Write>(manifest: &Manifest, opts: &PackOptions, w: W) -> Result<W> {
    let enc = opts
        .compression
        .encoder(w)
        .step(|| "control: start compressor".into())?;
    let mut tar = tar::Builder::new(enc);

    append(&mut tar, "control", REG_MODE, opts.epoch, &manifest.control_file()?)?;

    let mut written = Vec::with_capacity(opts.hashes.len());
    for &algo in &opts.hashes {
        if written.contains(&algo) {
            continue;
        }
        written.push(algo);
        append(
            &mut tar,
            algo.file_name(),
            REG_MODE,
            opts.epoch,
            &manifest.checksums(algo)?,
        )?;
    }

    if let Some(conffiles) = manifest.conffiles()? {
        append(&mut tar, "conffiles", REG_MODE, opts.epoch, &conffiles)?;
    }

    for script in MaintainerScript::ALL {
        if let Some(body) = manifest.maintainer_script(script)? {
            append(&mut tar, script.file_name(), EXEC_MODE, opts.epoch, &body)?;
        }
    }

    let enc = tar.into_inner().step(|| "control: finish tar".into())?;
    enc.finish().step(|| "control: finish compressor".into())
}

fn append<W: Write>(
    tar: &mut tar::Builder<W>,
    name: &str,
    mode: u32,
    mtime: u64,
    body: &[u8],
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_mode(mode);
    header.set_size(body.len() as u64);
    header.set_mtime(mtime);
    header.set_uid(0);
    header.set_gid(0);
    tar.append_data(&mut header, name, body)
        .step(|| format!("control: write {name}"))?;
    debug!(name, size = body.len(), "control entry written");
    Ok(())
}
