//! Lexical helpers for `/`-separated archive paths. Nothing here touches the
//! filesystem.

/// Shortest equivalent of `p`, by purely lexical processing: repeated
/// separators, `.` and resolvable `..` components are removed. The empty
/// path cleans to `.`.
pub fn clean(p: &str) -> String {
    if p.is_empty() {
        return ".".to_string();
    }
    let rooted = p.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for comp in p.split('/') {
        match comp {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ => {
                    // `..` above the root of an absolute path is dropped
                    if !rooted {
                        parts.push("..");
                    }
                }
            },
            c => parts.push(c),
        }
    }
    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Parent directory of an archive name, ignoring a trailing `/`.
/// Top-level names live in `.`.
pub fn parent(name: &str) -> &str {
    let trimmed = name.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(i) => &trimmed[..i],
        None => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ".")]
    #[case(".", ".")]
    #[case("a/b", "a/b")]
    #[case("a//b/", "a/b")]
    #[case("./a/./b", "a/b")]
    #[case("a/../b", "b")]
    #[case("../a", "../a")]
    #[case("../../a/..", "../..")]
    #[case("/../a", "/a")]
    #[case("/", "/")]
    #[case("/usr/bin/../lib", "/usr/lib")]
    fn cleans(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean(input), expected);
    }

    #[rstest]
    #[case("usr/bin/ls", "usr/bin")]
    #[case("usr/", ".")]
    #[case("usr/share/doc/", "usr/share")]
    #[case("README", ".")]
    #[case("./", ".")]
    fn parents(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parent(input), expected);
    }
}
