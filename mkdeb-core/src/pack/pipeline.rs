use std::io::{Read, Seek, SeekFrom, Write};

use tracing::{debug, info};

use crate::container::ar::ArWriter;
use crate::error::{ContractError, Result, StepExt};
use crate::manifest::Manifest;

use super::writer::PackOptions;
use super::{control, data};

const DEBIAN_BINARY: &[u8] = b"2.0\n";

/// How far a [`Pipeline`] has progressed. Steps run strictly in this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    Unresolved,
    Resolved,
    DataBuilt,
    ControlBuilt,
    Assembled,
}

/// Drives one manifest through resolve, data, control and assembly.
pub struct Pipeline {
    manifest: Manifest,
    opts: PackOptions,
    stage: Stage,
}

impl Pipeline {
    pub fn new(manifest: Manifest, opts: Option<&PackOptions>) -> Self {
        let mut opts = opts.cloned().unwrap_or_default();
        opts.compression = opts.compression.resolve();
        Self {
            manifest,
            opts,
            stage: Stage::Unresolved,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn options(&self) -> &PackOptions {
        &self.opts
    }

    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    fn expect(&self, operation: &'static str, expected: Stage) -> std::result::Result<(), ContractError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ContractError::OutOfOrder {
                operation,
                expected,
                actual: self.stage,
            })
        }
    }

    /// Validate the manifest and size its content under the content root.
    pub fn resolve(&mut self) -> Result<()> {
        self.expect("resolve", Stage::Unresolved)?;
        self.manifest.resolve(&self.opts.root)?;
        info!(
            package = %self.manifest.package,
            files = self.manifest.files.len(),
            installed_size = self.manifest.installed_size(),
            "manifest resolved"
        );
        self.stage = Stage::Resolved;
        Ok(())
    }

    /// Write the compressed data tarball into `w`, hashing regular files on
    /// the way through.
    pub fn build_data<W: Write>(&mut self, w: W) -> Result<W> {
        self.expect("build_data", Stage::Resolved)?;
        let w = data::write_data(&mut self.manifest, &self.opts, w)?;
        info!(compression = %self.opts.compression, "data partition built");
        self.stage = Stage::DataBuilt;
        Ok(w)
    }

    /// Write the compressed control tarball into `w`.
    pub fn build_control<W: Write>(&mut self, w: W) -> Result<W> {
        self.expect("build_control", Stage::DataBuilt)?;
        let w = control::write_control(&self.manifest, &self.opts, w)?;
        info!("control partition built");
        self.stage = Stage::ControlBuilt;
        Ok(w)
    }

    /// Wrap both partitions into the final `ar` archive.
    ///
    /// The partition streams are measured by seeking to their end, then
    /// rewound and copied.
    pub fn assemble<W, C, D>(&mut self, out: W, mut control: C, mut data: D) -> Result<W>
    where
        W: Write,
        C: Read + Seek,
        D: Read + Seek,
    {
        self.expect("assemble", Stage::ControlBuilt)?;

        let control_len = measure(&mut control).step(|| "assemble: measure control".into())?;
        let data_len = measure(&mut data).step(|| "assemble: measure data".into())?;
        debug!(control_len, data_len, "partition sizes");

        let suffix = self.opts.compression.suffix();
        let control_name = format!("control.tar{suffix}");
        let data_name = format!("data.tar{suffix}");

        let mut ar = ArWriter::new(out).step(|| "assemble: write magic".into())?;
        ar.append("debian-binary", DEBIAN_BINARY.len() as u64, DEBIAN_BINARY)
            .map_err(|e| e.within("assemble"))?;
        ar.append(&control_name, control_len, &mut control)
            .map_err(|e| e.within("assemble"))?;
        ar.append(&data_name, data_len, &mut data)
            .map_err(|e| e.within("assemble"))?;

        let mut out = ar.into_inner();
        out.flush().step(|| "assemble: flush".into())?;
        info!(package = %self.manifest.package, "package assembled");
        self.stage = Stage::Assembled;
        Ok(out)
    }
}

fn measure(s: &mut (impl Read + Seek)) -> std::io::Result<u64> {
    let len = s.seek(SeekFrom::End(0))?;
    s.seek(SeekFrom::Start(0))?;
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MkdebError;
    use std::io::Cursor;

    fn pipeline() -> Pipeline {
        let manifest = Manifest::from_json(
            br#"{
                "package": "tiny",
                "version": "0.1",
                "arch": "all",
                "maintainer": "Nobody <nobody@example.org>",
                "shortDescription": "tiny package",
                "files": [{"name": "README", "text": "hi\n"}]
            }"#,
        )
        .unwrap();
        Pipeline::new(manifest, None)
    }

    fn out_of_order(err: MkdebError) -> (&'static str, Stage, Stage) {
        match err {
            MkdebError::Contract(ContractError::OutOfOrder {
                operation,
                expected,
                actual,
            }) => (operation, expected, actual),
            other => panic!("expected a contract error, got {other}"),
        }
    }

    #[test]
    fn control_before_data_is_rejected() {
        let mut p = pipeline();
        p.resolve().unwrap();
        let err = p.build_control(Vec::new()).unwrap_err();
        assert!(err.is_contract());
        assert_eq!(
            out_of_order(err),
            ("build_control", Stage::DataBuilt, Stage::Resolved)
        );
        assert_eq!(p.stage(), Stage::Resolved);
    }

    #[test]
    fn data_before_resolve_is_rejected() {
        let mut p = pipeline();
        let err = p.build_data(Vec::new()).unwrap_err();
        assert_eq!(
            out_of_order(err),
            ("build_data", Stage::Resolved, Stage::Unresolved)
        );
    }

    #[test]
    fn resolve_twice_is_rejected() {
        let mut p = pipeline();
        p.resolve().unwrap();
        assert!(p.resolve().unwrap_err().is_contract());
    }

    #[test]
    fn stages_advance_in_order() {
        let mut p = pipeline();
        p.resolve().unwrap();
        let data = p.build_data(Vec::new()).unwrap();
        assert_eq!(p.stage(), Stage::DataBuilt);
        let control = p.build_control(Vec::new()).unwrap();
        assert_eq!(p.stage(), Stage::ControlBuilt);
        let out = p
            .assemble(Vec::new(), Cursor::new(control), Cursor::new(data))
            .unwrap();
        assert_eq!(p.stage(), Stage::Assembled);
        assert!(out.starts_with(crate::container::ar::MAGIC));
        assert!(p.assemble(Vec::new(), Cursor::new(vec![]), Cursor::new(vec![])).is_err());
    }

    #[test]
    fn auto_compression_is_resolved_up_front() {
        let p = pipeline();
        assert_eq!(p.options().compression, crate::codec::CompressAlgorithm::Gzip);
    }
}
