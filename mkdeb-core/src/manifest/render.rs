use super::Manifest;
use crate::error::ContractError;
use crate::hash::algorithm::HashAlgorithm;
use crate::types::entry_type::EntryType;

const SCRIPT_PREAMBLE: &str = "#!/bin/bash\nset -euo pipefail\numask 022\ncd /\n";

/// The four dpkg maintainer hooks, in control-tarball order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaintainerScript {
    PreInst,
    PostInst,
    PreRm,
    PostRm,
}

impl MaintainerScript {
    pub const ALL: [MaintainerScript; 4] = [
        MaintainerScript::PreInst,
        MaintainerScript::PostInst,
        MaintainerScript::PreRm,
        MaintainerScript::PostRm,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            MaintainerScript::PreInst => "preinst",
            MaintainerScript::PostInst => "postinst",
            MaintainerScript::PreRm => "prerm",
            MaintainerScript::PostRm => "postrm",
        }
    }
}

impl Manifest {
    fn require_resolved(&self, operation: &'static str) -> Result<u64, ContractError> {
        self.installed_size
            .ok_or(ContractError::NotResolved(operation))
    }

    /// The `control` stanza.
    pub fn control_file(&self) -> Result<Vec<u8>, ContractError> {
        let installed = self.require_resolved("Manifest::control_file")?;

        let mut out = String::with_capacity(512);
        field(&mut out, "Package", &self.package);
        field(&mut out, "Version", &self.version);
        field(&mut out, "Section", &self.section);
        field(&mut out, "Priority", &self.priority);
        field(&mut out, "Architecture", &self.arch);
        field(&mut out, "Essential", &self.essential);
        field(&mut out, "Depends", &self.depends);
        field(&mut out, "Pre-Depends", &self.pre_depends);
        field(&mut out, "Recommends", &self.recommends);
        field(&mut out, "Suggests", &self.suggests);
        field(&mut out, "Enhances", &self.enhances);
        field(&mut out, "Breaks", &self.breaks);
        field(&mut out, "Conflicts", &self.conflicts);
        field(&mut out, "Installed-Size", &installed.to_string());
        field(&mut out, "Maintainer", &self.maintainer);
        field(&mut out, "Homepage", &self.home_page);
        field(&mut out, "Built-Using", &self.built_using);
        field(&mut out, "Description", &self.short_description);
        for line in &self.long_description {
            if line.is_empty() {
                out.push_str(" .\n");
            } else {
                out.push(' ');
                out.push_str(line);
                out.push('\n');
            }
        }
        Ok(out.into_bytes())
    }

    /// Names of configuration files, one per line. `None` when there are none.
    pub fn conffiles(&self) -> Result<Option<Vec<u8>>, ContractError> {
        self.require_resolved("Manifest::conffiles")?;
        let mut out = String::new();
        for file in self.files.iter().filter(|f| f.is_conf) {
            out.push_str(&file.name);
            out.push('\n');
        }
        Ok((!out.is_empty()).then(|| out.into_bytes()))
    }

    pub fn maintainer_script(
        &self,
        which: MaintainerScript,
    ) -> Result<Option<Vec<u8>>, ContractError> {
        self.require_resolved("Manifest::maintainer_script")?;
        let lines = match which {
            MaintainerScript::PreInst => &self.pre_install,
            MaintainerScript::PostInst => &self.post_install,
            MaintainerScript::PreRm => &self.pre_remove,
            MaintainerScript::PostRm => &self.post_remove,
        };
        if lines.is_empty() {
            return Ok(None);
        }
        let mut out = String::from(SCRIPT_PREAMBLE);
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        Ok(Some(out.into_bytes()))
    }

    /// `<hex>  <name>` for every regular file, in manifest order.
    pub fn checksums(&self, algo: HashAlgorithm) -> Result<Vec<u8>, ContractError> {
        self.require_resolved("Manifest::checksums")?;
        let mut out = String::new();
        for file in self.files.iter().filter(|f| f.kind == EntryType::RegularFile) {
            let digests = file
                .digests()
                .ok_or(ContractError::NotHashed("Manifest::checksums"))?;
            let digest = digests
                .hex(algo)
                .ok_or_else(|| ContractError::MissingDigest {
                    name: file.name.clone(),
                    algo,
                })?;
            out.push_str(&digest);
            out.push_str("  ");
            out.push_str(&file.name);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

fn field(out: &mut String, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str(key);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}
