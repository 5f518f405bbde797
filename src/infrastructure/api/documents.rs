#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;

use std::path::Path;

use reqwest::multipart::Part;
use tokio::fs;

use crate::domain::models::ClientError;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

fn extension(path: &Path) -> String {
    return path
        .extension()
        .map(|ext| return ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
}

pub fn is_supported_document(path: &Path) -> bool {
    return SUPPORTED_EXTENSIONS.contains(&extension(path).as_str());
}

pub fn mime_type(path: &Path) -> &'static str {
    return match extension(path).as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    };
}

pub fn file_name(path: &Path) -> String {
    return path
        .file_name()
        .map(|name| return name.to_string_lossy().to_string())
        .unwrap_or_else(|| return "document".to_string());
}

/// Reads a file from disk into a multipart part carrying its name and MIME
/// type, the way a browser file input would send it.
pub async fn file_part(path: &Path) -> Result<Part, ClientError> {
    let bytes = fs::read(path).await.map_err(|err| {
        tracing::error!(path = ?path, err = ?err, "Failed to read document");
        return ClientError::request(
            None,
            &format!("Could not read {}: {err}", path.display()),
        );
    })?;

    let part = Part::bytes(bytes)
        .file_name(file_name(path))
        .mime_str(mime_type(path))
        .map_err(|err| return ClientError::request(None, &err.to_string()))?;

    return Ok(part);
}
