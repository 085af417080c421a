use std::fmt;
use std::num::NonZeroUsize;

use quiz_core::model::{QuestionBank, QuizSettingsDraft};
use services::{Clock, QuizServices};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod render;
mod shell;

use shell::Shell;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDelay { raw: String },
    InvalidLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDelay { raw } => write!(f, "invalid --delay-ms value: {raw}"),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <path|url>] [--delay-ms <ms>] [--limit <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank mid.json");
    eprintln!("  --delay-ms 1000");
    eprintln!("  --limit (none: ask every question)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK, QUIZ_DISPLAY_DELAY_MS, RUST_LOG");
}

struct Args {
    draft: QuizSettingsDraft,
    limit: Option<NonZeroUsize>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut draft = QuizSettingsDraft::new();
        draft.bank_location = std::env::var("QUIZ_BANK").ok();
        draft.display_delay_ms = std::env::var("QUIZ_DISPLAY_DELAY_MS")
            .ok()
            .and_then(|value| value.trim().parse().ok());
        let mut limit = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    draft.bank_location = Some(require_value(args, "--bank")?);
                }
                "--delay-ms" => {
                    let value = require_value(args, "--delay-ms")?;
                    let parsed: u64 = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidDelay { raw: value.clone() })?;
                    draft.display_delay_ms = Some(parsed);
                }
                "--limit" => {
                    let value = require_value(args, "--limit")?;
                    let parsed = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(NonZeroUsize::new)
                        .ok_or_else(|| ArgsError::InvalidLimit { raw: value.clone() })?;
                    limit = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { draft, limit })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let settings = args.draft.validate()?;

    let services = QuizServices::in_memory(settings, Clock::default_clock());

    // A missing or broken default bank is not fatal: an upload can replace it.
    let bank = match services.load_default_bank().await {
        Ok(bank) => bank,
        Err(err) => {
            warn!(error = %err, "default question bank unavailable");
            eprintln!("could not load question bank: {err}");
            QuestionBank::default()
        }
    };

    Shell::new(services, bank, args.limit).run().await
}

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
