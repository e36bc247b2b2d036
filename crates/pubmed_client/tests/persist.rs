use std::fs;

use pubmed_client::{
    ensure_output_dir, export_file_name, AtomicFileWriter, Blob, ExportFormat, ExportKind,
    PersistError,
};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("exports").join("2024");
    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn rejects_a_file_as_output_dir() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("taken");
    fs::write(&file, "x").unwrap();

    let err = ensure_output_dir(&file).unwrap_err();
    assert!(matches!(err, PersistError::NotADirectory { .. }));
}

#[test]
fn write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("job_1.csv", b"pmid\n1\n").unwrap();
    let second = writer.write("job_1.csv", b"pmid\n2\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"pmid\n2\n");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_file_is_left_when_the_directory_is_unusable() {
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("not_a_dir");
    fs::write(&not_a_dir, "x").unwrap();

    let writer = AtomicFileWriter::new(not_a_dir.clone());
    assert!(writer.write("job_1.csv", b"data").is_err());
    assert!(!temp.path().join("job_1.csv").exists());
}

#[test]
fn export_names_follow_the_kind() {
    assert_eq!(
        export_file_name("42", ExportKind::Metadata(ExportFormat::Csv)),
        "job_42_results.csv"
    );
    assert_eq!(
        export_file_name("42", ExportKind::Metadata(ExportFormat::Json)),
        "job_42_results.json"
    );
    assert_eq!(export_file_name("42", ExportKind::PdfArchive), "job_42_pdfs.zip");
    assert_eq!(export_file_name("a/b c", ExportKind::PdfArchive), "job_a_b_c_pdfs.zip");
}

#[test]
fn save_export_writes_blob_bytes() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("out"));
    let blob = Blob::new(vec![0x50, 0x4b, 0x05, 0x06], Some("application/zip"));

    let path = writer.save_export("9", ExportKind::PdfArchive, &blob).unwrap();
    assert_eq!(path, temp.path().join("out").join("job_9_pdfs.zip"));
    assert_eq!(fs::read(path).unwrap(), vec![0x50, 0x4b, 0x05, 0x06]);
}
