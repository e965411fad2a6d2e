//! Interactive shell commands.

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Replace the image reference; an empty value clears it.
    Url(String),
    Convert,
    Demo,
    View,
    Help,
    Quit,
    /// Blank line.
    Nothing,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  url <value>   set the image URL or path
  convert       recognize the image and extract name and date of birth
  demo          copy the demo image URL to the clipboard
  view          show the current result
  help          show this help
  quit          exit";

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => ShellCommand::Nothing,
            "url" => ShellCommand::Url(rest.to_string()),
            "convert" => ShellCommand::Convert,
            "demo" => ShellCommand::Demo,
            "view" => ShellCommand::View,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => ShellCommand::Unknown(word.to_string()),
        }
    }
}
