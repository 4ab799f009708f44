//! Integration tests for the generator pipeline and CLI.

use std::path::Path;
use std::process::Command;

use offgen::{ArtifactPaths, EmitConfig, Generator, WriteStatus, load_units, write_artifacts};

const API_HEADER: &str = r"#ifndef ZHCI_API_H
#define ZHCI_API_H

#include <stdint.h>

__zhci_syscall int zhci_sc_test(int a, int b);

__zhci_syscall void zhci_log(const char *msg, uint32_t level);

int not_offloaded(int x);

#endif
";

const HCI_HEADER: &str = r"__zhci_syscall int zhci_hci_send(void *buf, size_t len);
__zhci_syscall uint32_t zhci_version(void);
";

fn write_include_dir(root: &Path) {
    let include = root.join("include");
    std::fs::create_dir_all(include.join("hci")).unwrap();
    std::fs::write(include.join("zhci_api.h"), API_HEADER).unwrap();
    std::fs::write(include.join("hci").join("send.h"), HCI_HEADER).unwrap();
}

#[test]
fn test_generate_from_include_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_include_dir(dir.path());

    let units = load_units(&[dir.path().join("include")]).unwrap();
    assert_eq!(units.len(), 2);

    let generator = Generator::new(EmitConfig::default()).unwrap();
    let artifacts = generator.generate(&units).unwrap();

    // hci/send.h sorts before zhci_api.h
    let expected_protos = [
        "int zhci_hci_send_impl(void *buf, size_t len);",
        "uint32_t zhci_version_impl(void);",
        "int zhci_sc_test_impl(int a, int b);",
        "void zhci_log_impl(const char *msg, uint32_t level);",
    ];
    let header = &artifacts.header;
    let mut last = 0;
    for proto in expected_protos {
        let pos = header.find(proto).unwrap_or_else(|| panic!("missing {proto}"));
        assert!(pos >= last, "{proto} out of order");
        last = pos;
    }
    assert!(!header.contains("not_offloaded"));

    let source = &artifacts.source;
    assert!(source.contains(
        "struct zhci_args_zhci_log {\n    const char * a0;\n    uint32_t a1;\n};\n"
    ));
    assert!(source.contains(
        "uint32_t zhci_version(void) {\n    struct zhci_args_zhci_version args = {\n    };\n"
    ));
    assert!(source.contains("    args->r = zhci_version_impl();\n"));
    assert!(source.contains("    return args.r;\n"));
}

#[test]
fn test_rerun_is_byte_identical_and_skips_writes() {
    let dir = tempfile::tempdir().unwrap();
    write_include_dir(dir.path());
    let paths = ArtifactPaths::new(
        dir.path().join("gen/zhci_syscalls.h"),
        dir.path().join("gen/zhci_syscalls.c"),
    );

    let run = || {
        let units = load_units(&[dir.path().join("include")]).unwrap();
        let artifacts = Generator::new(EmitConfig::default())
            .unwrap()
            .generate(&units)
            .unwrap();
        let statuses = write_artifacts(&paths, &artifacts).unwrap();
        (artifacts, statuses)
    };

    let (first, statuses) = run();
    assert_eq!(statuses, (WriteStatus::Written, WriteStatus::Written));

    let (second, statuses) = run();
    assert_eq!(first, second);
    assert_eq!(statuses, (WriteStatus::Unchanged, WriteStatus::Unchanged));

    let on_disk = |path: &Path| std::fs::read_to_string(path).unwrap();
    assert_eq!(on_disk(&paths.header), first.header);
    assert_eq!(on_disk(&paths.source), first.source);
}

#[test]
fn test_cli_generate_and_check() {
    let dir = tempfile::tempdir().unwrap();
    write_include_dir(dir.path());
    let header = dir.path().join("out/zhci_syscalls.h");
    let source = dir.path().join("out/zhci_syscalls.c");

    let generate = |check: bool| {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_offgen"));
        cmd.arg("--silent")
            .arg("generate")
            .arg("-i")
            .arg(dir.path().join("include"))
            .arg("--header-file")
            .arg(&header)
            .arg("--source-file")
            .arg(&source);
        if check {
            cmd.arg("--check");
        }
        cmd.status().unwrap()
    };

    assert!(
        !generate(true).success(),
        "check must fail before generation"
    );
    assert!(generate(false).success());
    assert!(generate(true).success());

    let text = std::fs::read_to_string(&header).unwrap();
    assert!(text.starts_with("#ifndef GENERATED_ZHCI_SYSCALLS_H\n"));
    assert!(text.contains("#define __zhci_syscall\n"));

    let text = std::fs::read_to_string(&source).unwrap();
    assert!(text.starts_with(
        "#include <zhci_syscalls.h>\n\n#include <app_offload.h>\n\n"
    ));
}

#[test]
fn test_cli_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.h");
    std::fs::write(&input, "\n__zhci_syscall int bad(int arr[10]);\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_offgen"))
        .arg("generate")
        .arg("-i")
        .arg(&input)
        .arg("--header-file")
        .arg(dir.path().join("x.h"))
        .arg("--source-file")
        .arg(dir.path().join("x.c"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.h:2"), "stderr: {stderr}");
    assert!(stderr.contains("int arr[10]"), "stderr: {stderr}");
    assert!(!dir.path().join("x.h").exists());
}

#[test]
fn test_cli_call_missing_library() {
    let status = Command::new(env!("CARGO_BIN_EXE_offgen"))
        .args(["--silent", "call"])
        .arg("/nonexistent/libzhci.so")
        .args(["--arg", "42", "--arg", "1337"])
        .status()
        .unwrap();
    assert!(!status.success());
}
