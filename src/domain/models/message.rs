#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use super::Author;
use super::RagQueryResponse;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

/// One line of conversation on the query screen. Messages only live as long
/// as the screen does.
#[derive(Clone, Debug)]
pub struct Message {
    pub author: Author,
    pub text: String,
    mtype: MessageType,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message {
            author: author.clone(),
            text: text.to_string().replace('\t', "  "),
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            author: author.clone(),
            text: text.to_string().replace('\t', "  "),
            mtype,
        };
    }

    /// The user's side of a question, noting an attached file by name.
    pub fn question(text: &str, attachment: Option<&str>) -> Message {
        let mut msg = Message::new(Author::User, text);
        if let Some(file_name) = attachment {
            msg.append(&format!(" [Attached: {file_name}]"));
        }

        return msg;
    }

    pub fn answer(res: &RagQueryResponse) -> Message {
        if res.response.trim().is_empty() {
            return Message::new(Author::Assistant, "No response received");
        }

        return Message::new(Author::Assistant, &res.response);
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn append(&mut self, text: &str) {
        self.text += &text.replace('\t', "  ");
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();

        for full_line in self.text.split('\n') {
            if full_line.trim().is_empty() {
                lines.push("".to_string());
                continue;
            }

            let mut char_count = 0;
            let mut current_lines: Vec<&str> = vec![];

            for word in full_line.split(' ') {
                if !current_lines.is_empty() && word.len() + char_count + 1 > line_max_width {
                    lines.push(current_lines.join(" ").trim_end().to_string());
                    current_lines = vec![word];
                    char_count = word.len() + 1;
                } else {
                    current_lines.push(word);
                    char_count += word.len() + 1;
                }
            }
            if !current_lines.is_empty() {
                lines.push(current_lines.join(" ").trim_end().to_string());
            }
        }

        return lines;
    }
}

/// Metadata line printed under an answer, e.g.
/// `claude · 3 documents · 1.52s · with attachment`.
pub fn answer_footer(res: &RagQueryResponse) -> Option<String> {
    let mut parts: Vec<String> = vec![];
    if let Some(model) = &res.model_used {
        parts.push(model.to_string());
    }
    if let Some(count) = res.documents_retrieved {
        if count == 1 {
            parts.push("1 document".to_string());
        } else {
            parts.push(format!("{count} documents"));
        }
    }
    if let Some(performance) = &res.performance {
        parts.push(performance.total_time.to_string());
    }
    if res.uploaded_doc_included == Some(true) {
        parts.push("with attachment".to_string());
    }

    if parts.is_empty() {
        return None;
    }

    return Some(parts.join(" · "));
}
