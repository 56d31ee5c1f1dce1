use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseTokenError;

/// File owner (user or group), either numeric or symbolic.
///
/// Text form is `""` for unspecified, `#<id>` for a numeric id and the bare
/// name otherwise. Two owners are only equal within the same variant, so
/// `ById(0)` and `ByName("root")` differ.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Owner {
    #[default]
    Unspecified,
    ById(u32),
    ByName(String),
}

impl Owner {
    /// Names must be non-empty and must not look like the `#<id>` form.
    pub fn is_valid(&self) -> bool {
        match self {
            Owner::ByName(name) => !name.is_empty() && !name.starts_with('#'),
            _ => true,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Unspecified => Ok(()),
            Owner::ById(id) => write!(f, "#{id}"),
            Owner::ByName(name) => f.write_str(name),
        }
    }
}

impl FromStr for Owner {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Owner::Unspecified);
        }
        if let Some(digits) = s.strip_prefix('#') {
            if let Ok(id) = digits.parse::<u32>() {
                return Ok(Owner::ById(id));
            }
        }
        Ok(Owner::ByName(s.to_string()))
    }
}

impl Serialize for Owner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Owner::Unspecified => serializer.serialize_none(),
            Owner::ById(id) => serializer.serialize_u32(*id),
            Owner::ByName(name) => serializer.serialize_str(name),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOwner {
    Null(()),
    Id(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for Owner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawOwner::deserialize(deserializer)? {
            RawOwner::Null(()) => Ok(Owner::Unspecified),
            RawOwner::Id(id) => Ok(Owner::ById(id)),
            RawOwner::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Owner::Unspecified)]
    #[case(Owner::ById(0))]
    #[case(Owner::ById(65534))]
    #[case(Owner::ByName("root".into()))]
    #[case(Owner::ByName("www-data".into()))]
    fn round_trip(#[case] owner: Owner) {
        let text = owner.to_string();
        let parsed: Owner = text.parse().unwrap();
        assert_eq!(parsed, owner);
        assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn hash_without_digits_is_a_name() {
        let owner: Owner = "#staff".parse().unwrap();
        assert_eq!(owner, Owner::ByName("#staff".into()));
        assert!(!owner.is_valid());
    }

    #[test]
    fn equality_is_per_variant() {
        assert_ne!(Owner::ById(0), Owner::ByName("root".into()));
        assert_ne!(Owner::Unspecified, Owner::ByName(String::new()));
    }

    #[test]
    fn json_forms() {
        let o: Owner = serde_json::from_str("1000").unwrap();
        assert_eq!(o, Owner::ById(1000));
        let o: Owner = serde_json::from_str("\"#7\"").unwrap();
        assert_eq!(o, Owner::ById(7));
        let o: Owner = serde_json::from_str("\"daemon\"").unwrap();
        assert_eq!(o, Owner::ByName("daemon".into()));
        let o: Owner = serde_json::from_str("null").unwrap();
        assert_eq!(o, Owner::Unspecified);
        let o: Owner = serde_json::from_str("\"\"").unwrap();
        assert_eq!(o, Owner::Unspecified);
    }
}
