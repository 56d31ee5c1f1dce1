pub mod handlers;

use std::ffi::OsString;
use std::io::Write;

use clap::Parser;
use clap::error::ErrorKind;
use mkdeb_core::BuildInfo;

use crate::presentation::cli::Cli;

/// Parse `args`, run the build, and return the process exit code.
pub fn run<I, T>(args: I, info: &BuildInfo, stdout: &mut impl Write, stderr: &mut impl Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            let _ = write!(stdout, "{}", e.render());
            return 0;
        }
        Err(e) => {
            let rendered = e.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            let msg = first.strip_prefix("error: ").unwrap_or(first);
            let _ = writeln!(stderr, "error: {msg}");
            return 1;
        }
    };

    if cli.version {
        let _ = write!(stdout, "{info}");
        return 0;
    }

    let Some(manifest) = cli.manifest else {
        let _ = writeln!(stderr, "error: missing required flag: -m / --manifest");
        return 1;
    };
    let Some(output) = cli.output else {
        let _ = writeln!(stderr, "error: missing required flag: -o / --output");
        return 1;
    };

    match handlers::handle_build(&cli.root, &manifest, &output, cli.compression) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(stderr, "error: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> BuildInfo {
        BuildInfo::new()
            .with("version", "9.9.9")
            .and_then(|b| b.with("git.commit", "devel"))
            .unwrap()
    }

    fn run_with(args: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(
            std::iter::once("mkdeb").chain(args.iter().copied()),
            &info(),
            &mut out,
            &mut err,
        );
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_exits_zero() {
        let (code, out, err) = run_with(&["--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("--manifest"), "{out}");
        assert!(err.is_empty());
    }

    #[test]
    fn version_prints_pairs() {
        let (code, out, _) = run_with(&["-V"]);
        assert_eq!(code, 0);
        assert_eq!(out, "version=9.9.9\ngit.commit=devel\n");
    }

    #[test]
    fn missing_flags_are_single_line_errors() {
        let (code, out, err) = run_with(&["-o", "x.deb"]);
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(err, "error: missing required flag: -m / --manifest\n");

        let (code, _, err) = run_with(&["-m", "x.json"]);
        assert_eq!(code, 1);
        assert_eq!(err, "error: missing required flag: -o / --output\n");
    }

    #[test]
    fn bad_flag_is_single_line() {
        let (code, _, err) = run_with(&["--frobnicate"]);
        assert_eq!(code, 1);
        assert!(err.starts_with("error: "), "{err}");
        assert_eq!(err.lines().count(), 1, "{err}");
    }

    #[test]
    fn builds_into_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pkg.json"),
            br#"{
                "package": "cli-test",
                "version": "1.0",
                "arch": "all",
                "maintainer": "x",
                "shortDescription": "x",
                "files": [{"name": "hello", "text": "hi\n"}]
            }"#,
        )
        .unwrap();
        let root = dir.path().to_str().unwrap();
        let (code, _, err) = run_with(&["-R", root, "-m", "pkg.json", "-o", "pkg.deb", "-c", "none"]);
        assert_eq!(code, 0, "{err}");

        let bytes = std::fs::read(dir.path().join("pkg.deb")).unwrap();
        let names: Vec<_> = mkdeb_core::container::ar::read_members(&bytes[..])
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["debian-binary", "control.tar", "data.tar"]);
    }
}
