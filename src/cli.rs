//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for compass using the `clap` crate,
//! and the token language of the line-driven session.
//!
//! # Commands
//!
//! - *(none)*: start a session, optionally over a DOCUMENT
//! - **convert**: convert a tree file between JSON and binary
//! - **config**: show the configuration location or contents
//!
//! # Session tokens
//!
//! In general modes each line is one token: `k` `j` `h` `l` move, `a`/`aa`
//! append, `i`/`ii` insert, `d` delete, `x` cut, `y` copy, `p` paste, `u`
//! undo, `r` redo, `enter`, `esc`, `/` search, `?` extended search, `:`
//! commands, `q` quit.
//!
//! In text-entry modes a line replaces the buffer, an empty line confirms,
//! and `<esc>`, `<up>`, `<down>` act as the corresponding keys.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::engine::{Flavor, Task};

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the configuration file location
    Path,

    /// Print the effective configuration
    Show,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Convert a tree file between JSON (.json) and binary (.ffon)
    #[command(visible_alias = "c")]
    Convert {
        /// File to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// File to write; the format follows its extension
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Parser, Debug)]
#[command(name = "compass")]
#[command(about = "Navigate and edit hierarchical documents", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this configuration file instead of the default one
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Start in editor flavor
    #[arg(long = "editor", conflicts_with = "operator")]
    pub editor: bool,

    /// Start in operator flavor
    #[arg(long = "operator", conflicts_with = "editor")]
    pub operator: bool,

    /// Do not mount any provider
    #[arg(long = "no-providers")]
    pub no_providers: bool,

    /// A .json or .ffon tree to open after the provider mounts
    #[arg(value_name = "DOCUMENT")]
    pub document: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Flavor requested on the command line, if any
    #[must_use]
    pub const fn flavor(&self) -> Option<Flavor> {
        if self.editor {
            Some(Flavor::Editor)
        } else if self.operator {
            Some(Flavor::Operator)
        } else {
            None
        }
    }
}

/// One line of session input, decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Task(Task),
    Enter,
    Escape,
    Search,
    ExtendedSearch,
    Commands,
    /// Replace the text buffer
    Text(String),
    Quit,
    Unknown(String),
}

/// Decode a session line; `text_entry` selects the text-mode rules
#[must_use]
pub fn parse_line(line: &str, text_entry: bool) -> Action {
    if text_entry {
        return match line {
            "" => Action::Enter,
            "<esc>" => Action::Escape,
            "<up>" => Action::Task(Task::Up),
            "<down>" => Action::Task(Task::Down),
            text => Action::Text(text.to_string()),
        };
    }
    match line.trim() {
        "k" => Action::Task(Task::Up),
        "j" => Action::Task(Task::Down),
        "h" => Action::Task(Task::Left),
        "l" => Action::Task(Task::Right),
        "a" => Action::Task(Task::Append),
        "aa" => Action::Task(Task::AppendAppend),
        "i" => Action::Task(Task::Insert),
        "ii" => Action::Task(Task::InsertInsert),
        "d" => Action::Task(Task::Delete),
        "x" => Action::Task(Task::Cut),
        "y" => Action::Task(Task::Copy),
        "p" => Action::Task(Task::Paste),
        "u" => Action::Task(Task::Undo),
        "r" => Action::Task(Task::Redo),
        "enter" | "" => Action::Enter,
        "esc" => Action::Escape,
        "/" => Action::Search,
        "?" => Action::ExtendedSearch,
        ":" => Action::Commands,
        "q" => Action::Quit,
        other => Action::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_general_tokens() {
        assert_eq!(parse_line("aa", false), Action::Task(Task::AppendAppend));
        assert_eq!(parse_line(" l ", false), Action::Task(Task::Right));
        assert_eq!(parse_line("?", false), Action::ExtendedSearch);
        assert_eq!(parse_line("zz", false), Action::Unknown("zz".to_string()));
    }

    #[test]
    fn test_parse_text_entry() {
        assert_eq!(parse_line("q", true), Action::Text("q".to_string()));
        assert_eq!(parse_line("", true), Action::Enter);
        assert_eq!(parse_line("<esc>", true), Action::Escape);
    }

    #[test]
    fn test_cli_document_and_flags() {
        let cli = Cli::try_parse_from(["compass", "-vv", "--editor", "notes.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.flavor(), Some(Flavor::Editor));
        assert_eq!(cli.document, Some(PathBuf::from("notes.json")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_convert() {
        let cli = Cli::try_parse_from(["compass", "convert", "a.json", "b.ffon"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Convert {
                input: PathBuf::from("a.json"),
                output: PathBuf::from("b.ffon"),
            })
        );
    }

    #[test]
    fn test_cli_rejects_both_flavors() {
        assert!(Cli::try_parse_from(["compass", "--editor", "--operator"]).is_err());
    }
}
