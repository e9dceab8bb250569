// crates/core/tests/store_symbols.rs

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use symbolize_core::dumper::DumperLines;
use symbolize_core::layout::SymbolLayout;
use symbolize_core::{store_symbols, StoredModule, SymbolizeError};
use tempfile::tempdir;

const LINUX_SYMS: &[u8] = b"MODULE Linux x86_64 492E2DD23CC306CA9C494EEF1533A3810 libfoo.so\n\
INFO CODE_ID D22D2E49C33CCA069C494EEF1533A381\n\
FILE 0 /src/foo.c\n\
FUNC 1000 10 0 foo\n\
1000 10 12 0\n";

fn store(
    output: &[u8],
    symbol_dir: &Path,
    binary: &str,
) -> (Result<Option<StoredModule>, SymbolizeError>, Vec<PathBuf>) {
    let mut written = Vec::new();
    let result = store_symbols(
        DumperLines::new(Cursor::new(output.to_vec())),
        &SymbolLayout::new(symbol_dir),
        Path::new(binary),
        |path| written.push(path.to_path_buf()),
    );
    (result, written)
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(files_under(&path));
        } else {
            files.push(path);
        }
    }
    files
}

#[test]
fn writes_full_output_under_binary_name_and_build_id() {
    let tmp = tempdir().expect("temp dir");
    let (result, written) = store(LINUX_SYMS, tmp.path(), "/build/out/libfoo.so.1");

    let stored = result.expect("store").expect("module stored");
    let expected = tmp
        .path()
        .join("libfoo.so.1")
        .join("492E2DD23CC306CA9C494EEF1533A3810")
        .join("libfoo.so.sym");
    assert_eq!(stored.path, expected);
    assert_eq!(stored.module.name, "libfoo.so");
    assert_eq!(written, vec![expected.clone()]);
    assert_eq!(fs::read(&expected).unwrap(), LINUX_SYMS);
    assert_eq!(files_under(tmp.path()), vec![expected]);
}

#[test]
fn passes_non_utf8_bytes_and_missing_final_newline_through() {
    let tmp = tempdir().expect("temp dir");
    let output = b"MODULE Linux x86_64 ABCDEF01 a.out\nFUNC 10 2 0 caf\xe9\nPUBLIC 20 0 end";
    let (result, _) = store(output, tmp.path(), "a.out");

    let stored = result.unwrap().unwrap();
    assert_eq!(fs::read(stored.path).unwrap(), output);
}

#[test]
fn all_zero_build_id_writes_nothing() {
    let tmp = tempdir().expect("temp dir");
    let output = b"MODULE Linux x86_64 000000000000000000000000000000000 a.out\nFILE 0 a.c\n";
    let (result, written) = store(output, tmp.path(), "a.out");

    let err = result.unwrap_err();
    assert!(matches!(err, SymbolizeError::MissingBuildId), "unexpected error: {err:?}");
    assert_eq!(err.to_string(), "Binary lacks build id");
    assert!(written.is_empty());
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none(), "no directories expected");
}

#[test]
fn nacl_module_is_stored_as_main_nexe() {
    let tmp = tempdir().expect("temp dir");
    let output = b"MODULE Linux x86_64 5A5A5A5A0 nacl_irt_x86_64.nexe\nFILE 0 irt.c\n";
    let (result, _) = store(output, tmp.path(), "/out/irt_core_x86_64.nexe.debug");

    let stored = result.unwrap().unwrap();
    assert_eq!(stored.path, tmp.path().join("main.nexe").join("5A5A5A5A0").join("main.nexe.sym"));
    assert_eq!(fs::read(stored.path).unwrap(), output);
}

#[test]
fn second_module_header_is_fatal_and_keeps_first_file() {
    let tmp = tempdir().expect("temp dir");
    let output = b"MODULE Linux x86_64 AAAA1 first.so\nFILE 0 a.c\n\
MODULE Linux x86_64 BBBB2 second.so\nFILE 0 b.c\n";
    let (result, written) = store(output, tmp.path(), "multi.so");

    let first = tmp.path().join("multi.so").join("AAAA1").join("first.so.sym");
    match result {
        Err(SymbolizeError::MultipleModules(path)) => assert_eq!(path, first),
        other => panic!("expected MultipleModules, got {other:?}"),
    }
    assert_eq!(written, vec![first.clone()]);
    assert_eq!(fs::read(&first).unwrap(), b"MODULE Linux x86_64 AAAA1 first.so\nFILE 0 a.c\n");
    assert!(!tmp.path().join("multi.so").join("BBBB2").exists());
}

#[test]
fn data_before_module_header_is_fatal() {
    let tmp = tempdir().expect("temp dir");
    let (result, written) = store(b"FILE 0 a.c\n", tmp.path(), "a.out");

    assert!(matches!(result, Err(SymbolizeError::MissingModule)));
    assert!(written.is_empty());
}

#[test]
fn empty_output_stores_nothing() {
    let tmp = tempdir().expect("temp dir");
    let (result, written) = store(b"", tmp.path(), "a.out");

    assert!(result.unwrap().is_none());
    assert!(written.is_empty());
}

#[test]
fn rerun_overwrites_instead_of_appending() {
    let tmp = tempdir().expect("temp dir");
    let (first, _) = store(LINUX_SYMS, tmp.path(), "libfoo.so");
    let (second, _) = store(LINUX_SYMS, tmp.path(), "libfoo.so");

    let first = first.unwrap().unwrap();
    let second = second.unwrap().unwrap();
    assert_eq!(first.path, second.path);
    assert_eq!(fs::read(&second.path).unwrap(), LINUX_SYMS);
}

#[test]
fn malformed_header_is_fatal() {
    let tmp = tempdir().expect("temp dir");
    let (result, _) = store(b"MODULE Linux\n", tmp.path(), "a.out");

    assert!(matches!(result, Err(SymbolizeError::MalformedModule(_))));
}
