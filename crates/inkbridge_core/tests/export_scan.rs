use inkbridge_core::ExportScanner;
use std::fs;

fn scanner_for(folder: &std::path::Path) -> ExportScanner {
    ExportScanner::new(folder, vec![".txt".to_string()], ".processed")
}

#[test]
fn pending_exports_filters_by_extension_and_suffix() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    fs::write(dir.path().join("b.txt"), "beta").expect("write should succeed");
    fs::write(dir.path().join("a.txt"), "alpha").expect("write should succeed");
    fs::write(dir.path().join("done.txt.processed"), "old").expect("write should succeed");
    fs::write(dir.path().join("sketch.pdf"), "binary").expect("write should succeed");

    let scanner = scanner_for(dir.path());
    let pending = scanner.pending_exports().expect("scan should succeed");

    let names: Vec<String> = pending
        .iter()
        .map(|file| {
            file.path
                .file_name()
                .expect("pending file should have a name")
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
}

#[test]
fn read_text_returns_file_contents() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    fs::write(dir.path().join("note.txt"), "captured text").expect("write should succeed");

    let scanner = scanner_for(dir.path());
    let pending = scanner.pending_exports().expect("scan should succeed");
    assert_eq!(pending.len(), 1);

    let text = scanner
        .read_text(&pending[0])
        .expect("read should succeed");
    assert_eq!(text, "captured text");
}

#[test]
fn mark_processed_renames_and_hides_the_file() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    fs::write(dir.path().join("note.txt"), "captured text").expect("write should succeed");

    let scanner = scanner_for(dir.path());
    let pending = scanner.pending_exports().expect("scan should succeed");
    let renamed = scanner
        .mark_processed(&pending[0])
        .expect("rename should succeed");

    assert!(renamed.ends_with("note.txt.processed"));
    assert!(!pending[0].path.exists());
    assert!(renamed.exists());

    let after = scanner.pending_exports().expect("rescan should succeed");
    assert!(after.is_empty());
}

#[test]
fn missing_export_folder_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let scanner = scanner_for(&dir.path().join("no-such-folder"));
    let err = scanner
        .pending_exports()
        .expect_err("missing folder should fail");
    assert!(err.path.ends_with("no-such-folder"));
}
