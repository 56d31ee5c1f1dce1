use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildInfoError {
    #[error("duplicate key {key:?}: conflict between {old:?} and {new:?}")]
    DuplicateKey { key: String, old: String, new: String },
}

/// Ordered `key=value` pairs describing how the binary was built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pairs: Vec<(String, String)>,
}

impl BuildInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. Keys are unique, ignoring ASCII case.
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, BuildInfoError> {
        let key = key.into();
        let value = value.into();
        if let Some((old_key, old)) = self
            .pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            return Err(BuildInfoError::DuplicateKey {
                key: old_key.clone(),
                old: old.clone(),
                new: value,
            });
        }
        self.pairs.push((key, value));
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in self.iter() {
            writeln!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_in_insertion_order() {
        let info = BuildInfo::new()
            .with("version", "1.2.3")
            .and_then(|b| b.with("git.commit", "devel"))
            .unwrap();
        assert_eq!(info.to_string(), "version=1.2.3\ngit.commit=devel\n");
        assert_eq!(info.get("git.commit"), Some("devel"));
    }

    #[test]
    fn keys_are_unique_ignoring_case() {
        let err = BuildInfo::new()
            .with("Version", "1")
            .and_then(|b| b.with("version", "2"))
            .unwrap_err();
        assert_eq!(
            err,
            BuildInfoError::DuplicateKey {
                key: "Version".into(),
                old: "1".into(),
                new: "2".into()
            }
        );
    }
}
