use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{CardDraft, DeckFileName, SubjectName};
use storage::json::JsonLibrary;

#[derive(Debug, Clone)]
struct Args {
    dir: PathBuf,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDir { raw } => write!(f, "invalid --dir value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut dir = std::env::var("FLASHQUIZ_FLASHCARDS_DIR")
            .map_or_else(|_| PathBuf::from("flashcards"), PathBuf::from);
        let mut force = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dir" => {
                    let value = require_value(&mut args, "--dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDir { raw: value });
                    }
                    dir = PathBuf::from(value);
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { dir, force })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --dir <path>      Flashcards directory (default: flashcards)");
    eprintln!("  --force           Overwrite deck files that already exist");
    eprintln!("  -h, --help        Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  FLASHQUIZ_FLASHCARDS_DIR");
}

type Sample = (&'static str, &'static [&'static str], &'static str);

const GREETINGS: &[Sample] = &[
    ("Hallo", &["Hello", "Goodbye", "Thanks"], "Hello"),
    ("Danke", &["Please", "Thank you", "Sorry"], "Thank you"),
    ("Bitte", &["Please / You are welcome", "Yes", "No"], "Please / You are welcome"),
    ("Tschuss", &["Good night", "Bye", "Welcome"], "Bye"),
    ("Guten Morgen", &["Good evening", "Good morning", "Good day"], "Good morning"),
];

const CAPITALS: &[Sample] = &[
    ("Capital of France?", &["Paris", "Lyon", "Marseille", "Nice"], "Paris"),
    ("Capital of Japan?", &["Osaka", "Kyoto", "Tokyo", "Nagoya"], "Tokyo"),
    ("Capital of Canada?", &["Toronto", "Ottawa", "Vancouver", "Montreal"], "Ottawa"),
    ("Capital of Australia?", &["Sydney", "Melbourne", "Canberra", "Perth"], "Canberra"),
];

const RIVERS: &[Sample] = &[
    ("Longest river in Africa?", &["Congo", "Nile", "Niger"], "Nile"),
    ("River through Vienna?", &["Rhine", "Elbe", "Danube"], "Danube"),
    ("River through London?", &["Thames", "Severn", "Trent"], "Thames"),
];

fn drafts(samples: &[Sample]) -> Vec<CardDraft> {
    samples
        .iter()
        .map(|(question, choices, answer)| {
            CardDraft::new(*question, choices.iter().copied(), *answer)
        })
        .collect()
}

fn sample_deck(
    subject: &str,
    file: &str,
    samples: &[Sample],
) -> Result<(SubjectName, DeckFileName, Vec<CardDraft>), quiz_core::Error> {
    let subject = SubjectName::new(subject)?;
    let file = DeckFileName::new(file)?;
    let cards = drafts(samples);
    for draft in &cards {
        draft.clone().validate()?;
    }
    Ok((subject, file, cards))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let library = JsonLibrary::new(&args.dir);
    let decks = [
        ("german", "greetings.json", GREETINGS),
        ("geography", "capitals.json", CAPITALS),
        ("geography", "rivers.json", RIVERS),
    ];

    for (subject, file, samples) in decks {
        let (subject, file, cards) = sample_deck(subject, file, samples)?;
        let target = args.dir.join(subject.as_str()).join(file.as_str());
        if target.exists() && !args.force {
            eprintln!("skipping existing {}", target.display());
            continue;
        }

        let path = library.write_deck_file(&subject, &file, &cards).await?;
        eprintln!("wrote {} ({} cards)", path.display(), cards.len());
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
