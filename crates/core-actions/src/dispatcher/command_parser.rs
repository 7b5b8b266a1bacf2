//! Structured command line parsing.
//!
//! Converts the text typed after `:` into a `ParsedCommand`. Pure classification with no side
//! effects; argument errors are their own variants so the executor can report them precisely.
//! Words are split on single spaces, so `copy  2` (two spaces) is a usage error.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Quit,
    ForceQuit,
    Write,
    WriteQuit,
    ToggleChat,
    DebugKeys,
    /// `copy <n>` with a positive response number.
    Copy(usize),
    /// `copy` without an argument.
    CopyUsage,
    /// `copy` with a non-numeric or non-positive argument.
    CopyInvalid,
    /// Bare integer; range is checked against the buffer by the executor.
    GotoLine(i64),
    Edit {
        path: PathBuf,
        force: bool,
    },
    /// `e` / `e!` without a path.
    EditMissingPath,
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(body: &str) -> ParsedCommand {
        let mut parts = body.split(' ');
        let head = parts.next().unwrap_or_default();
        match head {
            "q" => ParsedCommand::Quit,
            "q!" => ParsedCommand::ForceQuit,
            "w" => ParsedCommand::Write,
            "wq" => ParsedCommand::WriteQuit,
            "chat" => ParsedCommand::ToggleChat,
            "debugkeys" => ParsedCommand::DebugKeys,
            "copy" => match parts.next() {
                None => ParsedCommand::CopyUsage,
                Some(arg) => match arg.parse::<usize>() {
                    Ok(n) if n > 0 => ParsedCommand::Copy(n),
                    _ => ParsedCommand::CopyInvalid,
                },
            },
            "e" | "e!" => {
                let path = body[head.len()..].trim();
                if path.is_empty() {
                    ParsedCommand::EditMissingPath
                } else {
                    ParsedCommand::Edit {
                        path: PathBuf::from(path),
                        force: head == "e!",
                    }
                }
            }
            _ => match head.parse::<i64>() {
                Ok(n) => ParsedCommand::GotoLine(n),
                Err(_) => ParsedCommand::Unknown(body.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_family() {
        assert_eq!(CommandParser::parse("q"), ParsedCommand::Quit);
        assert_eq!(CommandParser::parse("q!"), ParsedCommand::ForceQuit);
        assert_eq!(CommandParser::parse("wq"), ParsedCommand::WriteQuit);
        assert_eq!(CommandParser::parse("w"), ParsedCommand::Write);
    }

    #[test]
    fn parse_copy_arguments() {
        assert_eq!(CommandParser::parse("copy 2"), ParsedCommand::Copy(2));
        assert_eq!(CommandParser::parse("copy"), ParsedCommand::CopyUsage);
        assert_eq!(CommandParser::parse("copy 0"), ParsedCommand::CopyInvalid);
        assert_eq!(CommandParser::parse("copy x"), ParsedCommand::CopyInvalid);
        assert_eq!(CommandParser::parse("copy -1"), ParsedCommand::CopyInvalid);
    }

    #[test]
    fn parse_edit() {
        assert_eq!(
            CommandParser::parse("e  foo bar.txt"),
            ParsedCommand::Edit {
                path: PathBuf::from("foo bar.txt"),
                force: false
            }
        );
        assert_eq!(
            CommandParser::parse("e! x"),
            ParsedCommand::Edit {
                path: PathBuf::from("x"),
                force: true
            }
        );
        assert_eq!(CommandParser::parse("e"), ParsedCommand::EditMissingPath);
    }

    #[test]
    fn parse_line_numbers_and_unknown() {
        assert_eq!(CommandParser::parse("12"), ParsedCommand::GotoLine(12));
        assert_eq!(CommandParser::parse("-3"), ParsedCommand::GotoLine(-3));
        assert_eq!(
            CommandParser::parse("doesnotexist now"),
            ParsedCommand::Unknown("doesnotexist now".into())
        );
        assert_eq!(CommandParser::parse(""), ParsedCommand::Unknown(String::new()));
    }
}
