use std::io::{self, Write};

use tracing::debug;

use crate::error::{ContractError, MkdebError, Result, StepExt};
use crate::hash::multi::MultiHasher;
use crate::manifest::Manifest;
use crate::types::entry_type::EntryType;
use crate::util::hash_forward::HashingForward;
use crate::util::sized::SizedReader;

use super::writer::PackOptions;

/// Stream every entry into a compressed tarball. Regular file content goes
/// through a hashing tap, and the digests land on the entries.
pub(crate) fn write_data<W: Write>(
    manifest: &mut Manifest,
    opts: &PackOptions,
    w: W,
) -> Result<W> {
    let enc = opts
        .compression
        .encoder(w)
        .step(|| "data: start compressor".into())?;
    let mut tar = tar::Builder::new(enc);

    for (index, file) in manifest.files.iter_mut().enumerate() {
        let at = format!("files[{index}]");
        let mut header = file.to_header(opts.epoch).map_err(|e| e.within(&at))?;

        match file.kind {
            EntryType::Symlink => {
                let target = file.link.as_deref().unwrap_or_default();
                tar.append_link(&mut header, &file.name, target)
                    .step(|| format!("{at}: write symlink"))?;
                file.set_digests(None);
            }
            EntryType::RegularFile => {
                let size = file
                    .size()
                    .ok_or(ContractError::NotResolved("write_data"))?;
                let mut hasher = MultiHasher::new(&opts.hashes);
                {
                    let content = file
                        .open_content(&opts.root)
                        .map_err(|e| e.within(&at))?;
                    let mut tap = HashingForward::new(SizedReader::new(content, size), &mut hasher);
                    tar.append_data(&mut header, &file.name, &mut tap)
                        .step(|| format!("{at}: copy content"))?;
                }
                if hasher.written() != size {
                    return Err(MkdebError::Step {
                        step: format!("{at}: copy content"),
                        source: io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!("copied {} of {size} bytes", hasher.written()),
                        ),
                    });
                }
                file.set_digests(Some(hasher.finish()));
            }
            _ => {
                tar.append_data(&mut header, &file.name, io::empty())
                    .step(|| format!("{at}: write header"))?;
                file.set_digests(None);
            }
        }
        debug!(name = %file.name, kind = %file.kind, size = file.size(), "data entry written");
    }

    let enc = tar.into_inner().step(|| "data: finish tar".into())?;
    enc.finish().step(|| "data: finish compressor".into())
}
