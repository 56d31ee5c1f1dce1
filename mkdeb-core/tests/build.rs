use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use mkdeb_core::container::ar::{MAGIC, read_members};
use mkdeb_core::{
    CompressAlgorithm, ContractError, HashAlgorithm, Manifest, MkdebError, PackOptions, Pipeline,
    Stage, pack,
};
use pretty_assertions::assert_eq;
use sha2::{Digest, Sha256};

const MINIMAL: &[u8] = br#"{
    "package": "foo",
    "version": "1.0",
    "arch": "amd64",
    "maintainer": "A <a@example.com>",
    "shortDescription": "x",
    "files": [{"name": "hello.txt", "text": "hi\n"}]
}"#;

fn untar(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    archive
        .entries()
        .unwrap()
        .map(|e| {
            let mut e = e.unwrap();
            let name = e.path().unwrap().to_string_lossy().into_owned();
            let mut body = Vec::new();
            e.read_to_end(&mut body).unwrap();
            (name, body)
        })
        .collect()
}

fn member<'a>(members: &'a [(String, Vec<u8>)], name: &str) -> &'a [u8] {
    &members
        .iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("no member {name}"))
        .1
}

#[test]
fn minimal_package_layout() {
    let mut out = Vec::new();
    pack(Manifest::from_json(MINIMAL).unwrap(), &mut out, None).unwrap();

    assert_eq!(&out[..8], MAGIC);
    let members = read_members(&out[..]).unwrap();
    let names: Vec<_> = members.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["debian-binary", "control.tar.gz", "data.tar.gz"]);
    assert_eq!(members[0].1, b"2.0\n");

    let data = untar(&members[2].1);
    assert_eq!(data, vec![("hello.txt".to_string(), b"hi\n".to_vec())]);

    let control = untar(&members[1].1);
    let names: Vec<_> = control.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["control", "md5sum", "sha1sum", "sha256sum"]);
    let stanza = String::from_utf8(member(&control, "control").to_vec()).unwrap();
    assert_eq!(
        stanza,
        "Package: foo\n\
         Version: 1.0\n\
         Architecture: amd64\n\
         Installed-Size: 4096\n\
         Maintainer: A <a@example.com>\n\
         Description: x\n"
    );
}

#[test]
fn output_is_reproducible() {
    let mut a = Vec::new();
    let mut b = Vec::new();
    let opts = PackOptions {
        compression: CompressAlgorithm::Zstd,
        ..Default::default()
    };
    pack(Manifest::from_json(MINIMAL).unwrap(), &mut a, Some(&opts)).unwrap();
    pack(Manifest::from_json(MINIMAL).unwrap(), &mut b, Some(&opts)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn installed_size_is_block_padded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ten"), [1u8; 10]).unwrap();
    std::fs::write(dir.path().join("page"), [2u8; 4096]).unwrap();
    std::fs::write(dir.path().join("page-and-one"), [3u8; 4097]).unwrap();

    let mut m = Manifest::from_json(
        br#"{
            "package": "sizes",
            "version": "1",
            "arch": "all",
            "maintainer": "x",
            "shortDescription": "x",
            "files": [
                {"name": "ten"},
                {"name": "page"},
                {"name": "page-and-one"}
            ]
        }"#,
    )
    .unwrap();
    m.resolve(dir.path()).unwrap();
    assert_eq!(m.installed_size(), Some(16384));
    let stanza = String::from_utf8(m.control_file().unwrap()).unwrap();
    assert!(stanza.contains("Installed-Size: 16384\n"), "{stanza}");
}

#[test]
fn sha256_line_matches_independent_digest() {
    let content = "The quick brown fox jumps over the lazy dog\n";
    let json = format!(
        r#"{{
            "package": "fox",
            "version": "1",
            "arch": "all",
            "maintainer": "x",
            "shortDescription": "x",
            "files": [{{"name": "fox.txt", "text": {content:?}}}]
        }}"#
    );
    let mut out = Vec::new();
    pack(Manifest::from_json(json.as_bytes()).unwrap(), &mut out, None).unwrap();

    let members = read_members(&out[..]).unwrap();
    let control = untar(&members[1].1);
    let line = String::from_utf8(member(&control, "sha256sum").to_vec()).unwrap();
    let expected = format!("{}  fox.txt\n", hex::encode(Sha256::digest(content.as_bytes())));
    assert_eq!(line, expected);
}

fn ordering_manifest() -> Manifest {
    Manifest::from_json(
        br#"{
            "package": "order",
            "version": "1",
            "arch": "all",
            "maintainer": "x",
            "shortDescription": "x",
            "files": [
                {"name": "b", "text": "second"},
                {"name": "d/"},
                {"name": "d/link", "type": "symlink", "link": "../b"},
                {"name": "a", "text": "first"}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn control_before_data_fails() {
    let mut p = Pipeline::new(ordering_manifest(), None);
    p.resolve().unwrap();
    let err = p.build_control(Vec::new()).unwrap_err();
    assert!(err.is_contract(), "{err}");
    assert!(matches!(
        err,
        MkdebError::Contract(ContractError::OutOfOrder {
            operation: "build_control",
            expected: Stage::DataBuilt,
            actual: Stage::Resolved,
        })
    ));
}

#[test]
fn checksum_files_follow_configured_order() {
    let opts = PackOptions {
        hashes: vec![HashAlgorithm::Sha256, HashAlgorithm::Md5],
        ..Default::default()
    };
    let mut p = Pipeline::new(ordering_manifest(), Some(&opts));
    p.resolve().unwrap();
    let data = p.build_data(Vec::new()).unwrap();
    let control = p.build_control(Vec::new()).unwrap();
    let out = p
        .assemble(Vec::new(), Cursor::new(control), Cursor::new(data))
        .unwrap();

    let members = read_members(&out[..]).unwrap();
    let control = untar(&members[1].1);
    let names: Vec<_> = control.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["control", "sha256sum", "md5sum"]);

    for algo in [HashAlgorithm::Sha256, HashAlgorithm::Md5] {
        let text = String::from_utf8(member(&control, algo.file_name()).to_vec()).unwrap();
        let listed: Vec<_> = text
            .lines()
            .map(|l| l.split_once("  ").unwrap().1)
            .collect();
        assert_eq!(listed, vec!["b", "a"], "{algo}");
    }
}
