#[cfg(test)]
#[path = "views_test.rs"]
mod tests;

use std::env;
use std::path::PathBuf;

use yansi::Paint;

use crate::domain::models::Author;
use crate::domain::models::ClientError;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::RagListItem;
use crate::infrastructure::api::is_supported_document;
use crate::infrastructure::api::SUPPORTED_EXTENSIONS;

pub const EMPTY_DASHBOARD: &str =
    "You don't have any RAG instances yet. Create one to get started.";
pub const CREATE_INCOMPLETE: &str =
    "Please fill in all fields and upload at least one document";

pub fn rag_line(rag: &RagListItem) -> String {
    return format!("{} ({}) [ID: {}]", rag.rag_name, rag.model, rag.rag_id);
}

/// Splits a line of whitespace separated paths.
pub fn parse_paths(input: &str) -> Vec<PathBuf> {
    return input.split_whitespace().map(PathBuf::from).collect();
}

/// Checks every path exists and has an extension the backend can ingest.
/// Returns the message to show for the first offending path.
pub fn check_documents(paths: &[PathBuf]) -> Result<(), String> {
    for path in paths.iter() {
        if !path.is_file() {
            return Err(format!("File not found: {}", path.display()));
        }
        if !is_supported_document(path) {
            return Err(format!(
                "Unsupported file type: {} (accepted: .{})",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", .")
            ));
        }
    }

    return Ok(());
}

pub fn terminal_width() -> usize {
    return env::var("COLUMNS")
        .ok()
        .and_then(|cols| return cols.parse::<usize>().ok())
        .filter(|cols| return *cols >= 20)
        .unwrap_or(100);
}

pub fn print_error(err: &ClientError) {
    match err.status() {
        Some(status) if status >= 500 => {
            eprintln!("{}", Paint::red(format!("Error: {err} (HTTP {status})")));
        }
        _ => eprintln!("{}", Paint::red(format!("Error: {err}"))),
    }
}

pub fn print_warning(text: &str) {
    eprintln!("{}", Paint::yellow(text));
}

pub fn print_success(text: &str) {
    println!("{}", Paint::green(text));
}

pub fn print_message(msg: &Message, width: usize) {
    let author = msg.author.to_string();
    let label = match msg.author {
        Author::User => Paint::cyan(author),
        Author::Assistant => Paint::green(author),
        Author::Ragdesk => Paint::yellow(author),
    };
    println!("\n{}", label.bold());

    for line in msg.as_string_lines(width.saturating_sub(2)) {
        if msg.message_type() == MessageType::Error {
            println!("  {}", Paint::red(line));
        } else {
            println!("  {line}");
        }
    }
}
