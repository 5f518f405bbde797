use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempdir::TempDir;

use super::check_documents;
use super::parse_paths;
use super::rag_line;
use crate::domain::models::RagListItem;

#[test]
fn it_formats_a_rag_line() {
    let rag = RagListItem {
        rag_id: "r-1".to_string(),
        rag_name: "papers".to_string(),
        model: "claude".to_string(),
    };

    insta::assert_snapshot!(rag_line(&rag), @"papers (claude) [ID: r-1]");
}

#[test]
fn it_splits_paths_on_whitespace() {
    assert_eq!(
        parse_paths("  a.pdf   docs/b.txt\tc.docx "),
        vec![
            PathBuf::from("a.pdf"),
            PathBuf::from("docs/b.txt"),
            PathBuf::from("c.docx")
        ]
    );
    assert!(parse_paths("   ").is_empty());
}

#[test]
fn it_accepts_supported_documents() -> Result<()> {
    let dir = TempDir::new("ragdesk-views")?;
    let pdf = dir.path().join("paper.PDF");
    let txt = dir.path().join("notes.txt");
    fs::write(&pdf, "%PDF")?;
    fs::write(&txt, "notes")?;

    assert_eq!(check_documents(&[pdf, txt]), Ok(()));
    return Ok(());
}

#[test]
fn it_rejects_missing_documents() {
    let res = check_documents(&[PathBuf::from("/definitely/not/here.pdf")]);
    assert_eq!(
        res,
        Err("File not found: /definitely/not/here.pdf".to_string())
    );
}

#[test]
fn it_rejects_unsupported_documents() -> Result<()> {
    let dir = TempDir::new("ragdesk-views")?;
    let image = dir.path().join("scan.png");
    fs::write(&image, "png")?;

    let err = check_documents(&[image]).unwrap_err();
    assert!(err.starts_with("Unsupported file type: "));
    assert!(err.ends_with("(accepted: .pdf, .docx, .txt)"));
    return Ok(());
}
