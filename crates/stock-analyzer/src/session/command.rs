//! Parsing of the lines typed at the session prompts

/// One line entered while collecting symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Leave immediately, no analysis and no summary
    Quit,
    /// Stop collecting and analyze what was entered
    Done,
    /// Blank line
    Skip,
    /// Candidate ticker, trimmed and uppercased but not yet validated
    Symbol(String),
}

impl InputCommand {
    /// Parse a line read at the symbol prompt. Keywords are case-insensitive.
    pub fn parse(line: &str) -> Self {
        let normalized = line.trim().to_uppercase();
        match normalized.as_str() {
            "QUIT" => InputCommand::Quit,
            "DONE" => InputCommand::Done,
            "" => InputCommand::Skip,
            _ => InputCommand::Symbol(normalized),
        }
    }
}

/// Whether a yes/no answer means yes. Only `y` counts, in either case.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']).to_lowercase() == "y"
}
