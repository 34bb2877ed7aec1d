//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiz_core::model::{DeckFileName, SubjectName};

use crate::config::StoreKind;

#[derive(Parser, Debug)]
#[command(name = "flashquiz")]
#[command(author, version, about = "Multiple-choice flashcard trainer for the terminal")]
#[command(long_about = r#"
Quiz yourself on multiple-choice flashcards. Cards you miss come back in the
next round until every card in the session has been answered correctly.

Decks live in <flashcards-dir>/<subject>/<file>.json as arrays of
{"question", "choices", "answer"} objects.

Configuration is loaded from (lowest to highest priority):
  built-in defaults
  ~/.config/flashquiz/config.toml
  ./flashquiz.toml
  --config <path>
  FLASHQUIZ_* environment variables
  command-line flags
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding one sub-directory of deck files per subject
    #[arg(long, global = true, value_name = "DIR")]
    pub flashcards_dir: Option<PathBuf>,

    /// Where progress is kept
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// SQLite URL used with `--store sqlite`
    #[arg(long = "db", global = true, value_name = "URL")]
    pub db_url: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick a subject and deck, then run a quiz (default)
    Study(StudyArgs),
    /// List subjects
    Subjects,
    /// Show how much of each deck file of a subject is learned
    Progress {
        subject: SubjectName,
    },
    /// Clear mastered cards and study time for a subject
    Reset {
        subject: SubjectName,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyArgs {
    /// Skip the subject menu
    #[arg(long)]
    pub subject: Option<SubjectName>,

    /// Skip the file menu and study a single deck file
    #[arg(long, requires = "subject")]
    pub file: Option<DeckFileName>,
}

impl Cli {
    /// The subcommand to run; `study` when none was given.
    #[must_use]
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Study(StudyArgs::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_study() {
        let cli = Cli::try_parse_from(["flashquiz"]).unwrap();
        assert_eq!(cli.resolved_command(), Command::Study(StudyArgs::default()));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "flashquiz",
            "progress",
            "geo",
            "--store",
            "sqlite",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.store, Some(StoreKind::Sqlite));
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.resolved_command(),
            Command::Progress {
                subject: SubjectName::new("geo").unwrap()
            }
        );
    }

    #[test]
    fn file_requires_subject() {
        assert!(Cli::try_parse_from(["flashquiz", "study", "--file", "a.json"]).is_err());
        let cli = Cli::try_parse_from([
            "flashquiz",
            "study",
            "--subject",
            "geo",
            "--file",
            "a.json",
        ])
        .unwrap();
        let Command::Study(args) = cli.resolved_command() else {
            panic!("expected study");
        };
        assert_eq!(args.file, Some(DeckFileName::new("a.json").unwrap()));
    }

    #[test]
    fn rejects_subject_with_path_separator() {
        assert!(Cli::try_parse_from(["flashquiz", "reset", "../etc"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        <Cli as CommandFactory>::command().debug_assert();
    }
}
