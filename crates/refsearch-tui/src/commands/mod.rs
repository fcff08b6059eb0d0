// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use std::path::PathBuf;

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Close the app
    Quit,
    // Display help
    Help,
    // Change theme
    Theme(String),
    // Write the current results to CSV, optionally to a different file
    Export(Option<PathBuf>),
    // Replace the query text and search immediately
    Search(String),
    // Empty the query and drop the results
    Clear,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" | "q!" | "quit!" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "clear" => Ok(Command::Clear),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "w" | "export" => {
                if rest.is_empty() {
                    Ok(Command::Export(None))
                } else {
                    Ok(Command::Export(Some(PathBuf::from(rest))))
                }
            }
            "s" | "search" => {
                if rest.is_empty() {
                    Err("usage: search <term>[; <term>...]".to_string())
                } else {
                    Ok(Command::Search(rest.to_string()))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
