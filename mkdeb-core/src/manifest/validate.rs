use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use super::Manifest;
use crate::error::{Result, ValidationError, ValidationReason};
use crate::types::entry_type::EntryType;
use crate::util::pad::{BLOCK_SHIFT, pad};
use crate::util::{path, syntax};

impl Manifest {
    /// Check every invariant, normalizing entries in place.
    ///
    /// Runs the metadata checks first, then each entry on its own, then the
    /// checks that span entries (duplicate names, parent directories).
    pub fn validate(&mut self) -> std::result::Result<(), ValidationError> {
        self.validate_metadata()?;
        for (index, file) in self.files.iter_mut().enumerate() {
            file.validate()
                .map_err(|e| e.within(&format!("files[{index}]")))?;
        }
        self.validate_tree()
    }

    /// Validate, then size every regular file and compute the installed size.
    pub fn resolve(&mut self, root: &Path) -> Result<()> {
        self.installed_size = None;
        self.validate()?;

        let mut installed: u64 = 0;
        for (index, file) in self.files.iter_mut().enumerate() {
            let at = format!("files[{index}]");
            file.resolve(root).map_err(|e| e.within(&at))?;
            if file.kind != EntryType::RegularFile {
                continue;
            }
            let size = file.size().unwrap_or_default();
            installed = pad(size, BLOCK_SHIFT)
                .and_then(|padded| installed.checked_add(padded))
                .ok_or_else(|| ValidationError::new(at, ValidationReason::SizeOverflow))?;
            debug!(name = %file.name, size, "resolved entry");
        }

        self.installed_size = Some(installed);
        Ok(())
    }

    fn validate_metadata(&self) -> std::result::Result<(), ValidationError> {
        required("package", &self.package, "Debian package name", syntax::is_package)?;
        required("version", &self.version, "Debian package version", syntax::is_version)?;
        required("arch", &self.arch, "Debian package architecture", syntax::is_arch)?;
        optional("section", &self.section, "Debian package section", syntax::is_section)?;
        optional("priority", &self.priority, "Debian package priority", syntax::is_priority)?;

        // Relation fields are carried verbatim, but must stay on one line.
        for (field, value) in [
            ("essential", &self.essential),
            ("depends", &self.depends),
            ("preDepends", &self.pre_depends),
            ("recommends", &self.recommends),
            ("suggests", &self.suggests),
            ("enhances", &self.enhances),
            ("breaks", &self.breaks),
            ("conflicts", &self.conflicts),
        ] {
            optional(field, value, "dependency spec", single_line)?;
        }

        required("maintainer", &self.maintainer, "Maintainer line", single_line)?;
        optional("homePage", &self.home_page, "URL", single_line)?;
        optional("builtUsing", &self.built_using, "Built-Using line", single_line)?;

        required(
            "shortDescription",
            &self.short_description,
            "Description line",
            syntax::is_description_line,
        )?;
        for (index, line) in self.long_description.iter().enumerate() {
            if !syntax::is_description_line(line) {
                return Err(invalid(
                    format!("longDescription[{index}]"),
                    "Description continuation line",
                    line,
                ));
            }
        }

        Ok(())
    }

    fn validate_tree(&self) -> std::result::Result<(), ValidationError> {
        let mut known: HashSet<&str> = HashSet::from(["."]);
        for (index, dir) in self.implicit_dirs.iter().enumerate() {
            if !syntax::is_unix_path(dir) {
                return Err(invalid(format!("implicitDirs[{index}]"), "Unix path", dir));
            }
            let trimmed = dir.trim_end_matches('/');
            known.insert(if trimmed.is_empty() { "." } else { trimmed });
        }

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(self.files.len());
        for (index, file) in self.files.iter().enumerate() {
            let at = || format!("files[{index}]");
            let name = file.name.trim_end_matches('/');

            if let Some(&first) = seen.get(name) {
                return Err(ValidationError::new(
                    at(),
                    ValidationReason::Duplicate {
                        name: file.name.clone(),
                        first,
                    },
                ));
            }
            seen.insert(name, index);

            let parent = path::parent(&file.name);
            if !known.contains(parent) {
                return Err(ValidationError::new(
                    at(),
                    ValidationReason::UnknownDirectory(parent.to_string()),
                ));
            }
            if file.kind == EntryType::Directory {
                known.insert(name);
            }
        }

        Ok(())
    }
}

fn single_line(s: &str) -> bool {
    !s.chars().any(char::is_control)
}

fn required(
    field: &str,
    value: &str,
    what: &'static str,
    check: impl Fn(&str) -> bool,
) -> std::result::Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, ValidationReason::Missing));
    }
    optional(field, value, what, check)
}

fn optional(
    field: &str,
    value: &str,
    what: &'static str,
    check: impl Fn(&str) -> bool,
) -> std::result::Result<(), ValidationError> {
    if value.is_empty() || check(value) {
        Ok(())
    } else {
        Err(invalid(field.to_string(), what, value))
    }
}

fn invalid(field: String, what: &'static str, value: &str) -> ValidationError {
    ValidationError::new(
        field,
        ValidationReason::Invalid {
            what,
            value: value.to_string(),
        },
    )
}
