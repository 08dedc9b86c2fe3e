//! Tests for the `xml2vrt` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn xml2vrt() -> Command {
    Command::new(assert_cmd::cargo_bin!("xml2vrt"))
}

#[test]
fn test_convert_to_stdout() {
    let d = tempdir().unwrap();
    let input = d.path().join("input.xml");
    fs::write(&input, r#"<s><w lemma="dog">dogs</w><w lemma="run">run</w></s>"#).unwrap();

    xml2vrt()
        .args(["convert", input.to_str().unwrap(), "--attributes", "lemma"])
        .assert()
        .success()
        .stdout("<s>\ndogs\tdog\n<g/>\nrun\trun\n</s>\n");
}

#[test]
fn test_convert_fixture_with_config() {
    let d = tempdir().unwrap();
    let output = d.path().join("sample.vrt");

    xml2vrt()
        .args([
            "convert",
            fixture_path("sample.xml").to_str().unwrap(),
            "--config",
            fixture_path("sample.yaml").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Tokens: 6"));

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        fs::read_to_string(fixture_path("sample.vrt")).unwrap()
    );
}

#[test]
fn test_convert_several_files_to_directory() {
    let d = tempdir().unwrap();
    let first = d.path().join("first.xml");
    let second = d.path().join("second.xml");
    fs::write(&first, "<p><w>a</w></p>").unwrap();
    fs::write(&second, "<p><w>b</w></p>").unwrap();
    let out = d.path().join("out");

    xml2vrt()
        .args([
            "convert",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--no-glue",
        ])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(out.join("first.vrt")).unwrap(), "<p>\na\n</p>\n");
    assert_eq!(fs::read_to_string(out.join("second.vrt")).unwrap(), "<p>\nb\n</p>\n");
}

#[test]
fn test_missing_input_fails() {
    xml2vrt()
        .args(["convert", "does-not-exist.xml"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Input file does not exist"));
}

#[test]
fn test_malformed_xml_fails() {
    let d = tempdir().unwrap();
    let input = d.path().join("broken.xml");
    fs::write(&input, "<s><w>a</s>").unwrap();

    xml2vrt()
        .args(["convert", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("XML parsing failed"));
}

#[test]
fn test_invalid_separator_spec_fails() {
    let d = tempdir().unwrap();
    let input = d.path().join("input.xml");
    fs::write(&input, "<s><w>a</w></s>").unwrap();

    xml2vrt()
        .args(["convert", input.to_str().unwrap(), "--flat-separator", "s@n"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid option 's@n'"));
}
