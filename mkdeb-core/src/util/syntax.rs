//! Syntactic grammars for Debian control fields and archive paths.

use regex::Regex;
use std::sync::LazyLock;

const NAME_COMPONENT: &str = r"(?:[.-]|_+)?[0-9A-Za-z]+(?:(?:[.-]|_+)[0-9A-Za-z]+)*";

static UNIX_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:[.]|(?:{NAME_COMPONENT}/)*{NAME_COMPONENT})/?$"
    ))
    .expect("path grammar compiles")
});
static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-z][0-9a-z]+(?:[.+-][0-9a-z]+)*$").expect("package grammar compiles"));
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[1-9][0-9]*:)?[0-9][0-9A-Za-z]*(?:[.~+-][0-9A-Za-z]+)*$")
        .expect("version grammar compiles")
});
static ARCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]+(?:-[0-9A-Za-z]+)*$").expect("arch grammar compiles"));
static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-z]+(?:[/-][0-9a-z]+)*$").expect("section grammar compiles"));

pub const PRIORITIES: [&str; 5] = ["required", "important", "standard", "optional", "extra"];

pub fn is_unix_path(s: &str) -> bool {
    UNIX_PATH.is_match(s)
}

pub fn is_package(s: &str) -> bool {
    PACKAGE.is_match(s)
}

pub fn is_version(s: &str) -> bool {
    VERSION.is_match(s)
}

pub fn is_arch(s: &str) -> bool {
    ARCH.is_match(s)
}

pub fn is_section(s: &str) -> bool {
    SECTION.is_match(s)
}

pub fn is_priority(s: &str) -> bool {
    PRIORITIES.contains(&s)
}

/// No control characters, and no trailing run of whitespace.
pub fn is_description_line(s: &str) -> bool {
    if s.chars().any(char::is_control) {
        return false;
    }
    !s.ends_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(".", true)]
    #[case("./", true)]
    #[case("usr", true)]
    #[case("usr/", true)]
    #[case("usr/lib/x86_64-linux-gnu/libfoo.so.1", true)]
    #[case("etc/.hidden", true)]
    #[case("/usr", false)]
    #[case("usr//bin", false)]
    #[case("usr/../etc", false)]
    #[case("", false)]
    #[case("a b", false)]
    fn unix_paths(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(is_unix_path(input), ok, "{input:?}");
    }

    #[rstest]
    #[case("foo", true)]
    #[case("libfoo1.2+git", true)]
    #[case("f", false)]
    #[case("Foo", false)]
    #[case("", false)]
    fn packages(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(is_package(input), ok, "{input:?}");
    }

    #[rstest]
    #[case("1.0", true)]
    #[case("2:1.0~rc1-3", true)]
    #[case("0:1.0", false)]
    #[case("v1.0", false)]
    #[case("1.0-", false)]
    #[case("", false)]
    fn versions(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(is_version(input), ok, "{input:?}");
    }

    #[test]
    fn arch_section_priority() {
        assert!(is_arch("amd64"));
        assert!(is_arch("linux-any"));
        assert!(!is_arch("amd64 "));
        assert!(is_section("contrib/net"));
        assert!(!is_section("Net"));
        assert!(is_priority("optional"));
        assert!(!is_priority("Optional"));
    }

    #[rstest]
    #[case("A short summary", true)]
    #[case("", true)]
    #[case("trailing space ", false)]
    #[case("trailing nbsp\u{a0}", false)]
    #[case("tab\tinside", false)]
    #[case("bell\u{7}", false)]
    fn description_lines(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(is_description_line(input), ok, "{input:?}");
    }
}
