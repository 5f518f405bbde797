#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

/// Commands understood by the query screen's prompt.
pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }
        let prefix = args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_back()
            || cmd.is_attach_file()
            || cmd.is_add_documents()
            || cmd.is_clear()
            || cmd.is_logout()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_back(&self) -> bool {
        return ["/b", "/back"].contains(&self.command.as_str());
    }

    pub fn is_attach_file(&self) -> bool {
        return ["/f", "/file"].contains(&self.command.as_str());
    }

    pub fn is_add_documents(&self) -> bool {
        return ["/a", "/add"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return ["/c", "/clear"].contains(&self.command.as_str());
    }

    pub fn is_logout(&self) -> bool {
        return self.command == "/logout";
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /file [PATH] (/f) - Attach a file to the next question. Without a path, drops the pending attachment.
- /add PATH... (/a) - Upload more documents into this RAG instance.
- /clear (/c) - Clear the conversation on screen.
- /back (/b) - Return to the dashboard.
- /logout - End the session and return to login.
- /quit /exit (/q) - Exit Ragdesk.
- /help (/h) - Show this help.
    "#;

    return text.trim().to_string();
}
