extern crate tempdir;

use std::path::Path;

use anyhow::Result;
use tempdir::TempDir;

use super::file_name;
use super::file_part;
use super::is_supported_document;
use super::mime_type;
use crate::domain::models::ClientError;

#[test]
fn it_accepts_supported_extensions() {
    assert!(is_supported_document(Path::new("paper.pdf")));
    assert!(is_supported_document(Path::new("notes/Report.DOCX")));
    assert!(is_supported_document(Path::new("readme.txt")));
    assert!(!is_supported_document(Path::new("image.png")));
    assert!(!is_supported_document(Path::new("Makefile")));
}

#[test]
fn it_resolves_mime_types() {
    assert_eq!(mime_type(Path::new("a.pdf")), "application/pdf");
    assert_eq!(mime_type(Path::new("a.txt")), "text/plain");
    assert_eq!(mime_type(Path::new("a.bin")), "application/octet-stream");
}

#[test]
fn it_uses_base_file_name() {
    assert_eq!(file_name(Path::new("/tmp/docs/a.pdf")), "a.pdf");
}

#[tokio::test]
async fn it_builds_part_from_file() -> Result<()> {
    let tmp_dir = TempDir::new("ragdesk")?;
    let file_path = tmp_dir.path().join("notes.txt");
    std::fs::write(&file_path, "hello")?;

    let res = file_part(&file_path).await;
    assert!(res.is_ok());
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_missing_file() {
    let res = file_part(Path::new("/definitely/not/here.pdf")).await;
    match res {
        Err(ClientError::Request { status, message }) => {
            assert_eq!(status, None);
            assert!(message.starts_with("Could not read /definitely/not/here.pdf"));
        }
        _ => panic!("expected a request error"),
    }
}
