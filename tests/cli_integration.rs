use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_binpatch").to_string()
}

fn run(args: &[&Path]) -> Output {
    Command::new(bin()).args(args).output().unwrap()
}

#[test]
fn cli_create_patch_roundtrip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.bin");
    let target = dir.path().join("target.bin");
    let patch = dir.path().join("delta.patch");
    let output = dir.path().join("output.bin");

    std::fs::write(&source, b"abcde12345abcde12345").unwrap();
    std::fs::write(&target, b"abcdeXXXXXabcde12345!").unwrap();

    let st = Command::new(bin())
        .arg("create")
        .arg(&source)
        .arg(&target)
        .arg(&patch)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .arg("patch")
        .arg(&source)
        .arg(&patch)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&target).unwrap()
    );
}

#[test]
fn cli_default_output_names() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("game.dol");
    let target = dir.path().join("game_mod.dol");
    std::fs::write(&source, [0u8; 64]).unwrap();
    std::fs::write(&target, [1u8; 80]).unwrap();

    let out = Command::new(bin())
        .arg("create")
        .arg(&source)
        .arg(&target)
        .output()
        .unwrap();
    assert!(out.status.success());
    let patch = dir.path().join("game.dol_patch.bin");
    assert!(patch.exists());

    let out = Command::new(bin())
        .arg("patch")
        .arg(&source)
        .arg(&patch)
        .output()
        .unwrap();
    assert!(out.status.success());
    let patched = dir.path().join("game.dol_patched.bin");
    assert_eq!(std::fs::read(patched).unwrap(), vec![1u8; 80]);
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("s");
    let target = dir.path().join("t");
    let patch = dir.path().join("p");
    std::fs::write(&source, b"one").unwrap();
    std::fs::write(&target, b"two").unwrap();
    std::fs::write(&patch, b"existing").unwrap();

    let out = Command::new(bin())
        .arg("create")
        .arg(&source)
        .arg(&target)
        .arg(&patch)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(std::fs::read(&patch).unwrap(), b"existing");

    let out = Command::new(bin())
        .args(["--force", "create"])
        .arg(&source)
        .arg(&target)
        .arg(&patch)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_ne!(std::fs::read(&patch).unwrap(), b"existing");
}

#[test]
fn cli_exit_codes_per_error_kind() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("s");
    let other = dir.path().join("o");
    let target = dir.path().join("t");
    let patch = dir.path().join("p");
    std::fs::write(&source, b"original image").unwrap();
    std::fs::write(&other, b"different image").unwrap();
    std::fs::write(&target, b"modified image").unwrap();

    assert!(
        run(&[Path::new("create"), &source, &target, &patch])
            .status
            .success()
    );

    // Wrong source file.
    let out = run(&[Path::new("patch"), &other, &patch, &dir.path().join("o1")]);
    assert_eq!(out.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&out.stderr).contains("does not fit"));

    // Corrupted target digest: only the result check can notice.
    let mut bytes = std::fs::read(&patch).unwrap();
    bytes[36] ^= 0xFF;
    let bad_digest = dir.path().join("bad_digest");
    std::fs::write(&bad_digest, &bytes).unwrap();
    let out = run(&[Path::new("patch"), &source, &bad_digest, &dir.path().join("o2")]);
    assert_eq!(out.status.code(), Some(6));
    assert!(!dir.path().join("o2").exists());

    // Truncated body.
    let good = std::fs::read(&patch).unwrap();
    let truncated = dir.path().join("truncated");
    std::fs::write(&truncated, &good[..good.len() - 2]).unwrap();
    let out = run(&[Path::new("patch"), &source, &truncated, &dir.path().join("o3")]);
    assert_eq!(out.status.code(), Some(4));

    // Not a patch at all.
    let out = run(&[Path::new("patch"), &source, &source, &dir.path().join("o4")]);
    assert_eq!(out.status.code(), Some(3));

    // Missing input.
    let out = run(&[
        Path::new("patch"),
        &dir.path().join("missing"),
        &patch,
        &dir.path().join("o5"),
    ]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_info_json() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("s");
    let target = dir.path().join("t");
    let patch = dir.path().join("p");
    std::fs::write(&source, b"AAAA").unwrap();
    std::fs::write(&target, b"ABAAZZ").unwrap();
    assert!(
        run(&[Path::new("create"), &source, &target, &patch])
            .status
            .success()
    );

    let out = Command::new(bin())
        .args(["--quiet", "--json", "info"])
        .arg(&patch)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    let json: serde_json::Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(json["command"], "info");
    assert_eq!(json["target_size"], 6);
    assert_eq!(json["replacements"], 1);
    assert_eq!(json["addition_size"], 2);
    assert_eq!(json["patch_size"], 64 + 9 + 4 + 2);
}

#[test]
fn cli_usage_without_arguments() {
    let out = Command::new(bin()).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}
