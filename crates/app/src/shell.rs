//! Interactive stdin loop: one command per line, timer events in between.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use quiz_core::model::{QuestionBank, RecordId};
use services::{BankSource, QuizController, QuizError, QuizEvent, QuizPhase, QuizServices};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `None` falls back to the `--limit` default.
    Start(Option<NonZeroUsize>),
    /// 1-based option number.
    Answer(NonZeroUsize),
    Next,
    Bank { page: usize, keyword: String },
    Records { page: usize },
    Detail { id: RecordId, page: usize },
    Upload(PathBuf),
    Home,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    InvalidNumber(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command, or `help`"),
            CommandError::Unknown(word) => write!(f, "unknown command: {word}"),
            CommandError::MissingArgument { command, argument } => {
                write!(f, "`{command}` needs <{argument}>")
            }
            CommandError::InvalidNumber(raw) => write!(f, "not a positive number: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

fn positive(raw: &str) -> Result<NonZeroUsize, CommandError> {
    raw.parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| CommandError::InvalidNumber(raw.to_owned()))
}

fn page_arg(raw: Option<&str>) -> Result<usize, CommandError> {
    raw.map_or(Ok(1), |raw| positive(raw).map(NonZeroUsize::get))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Err(CommandError::Empty);
        };

        match first.to_ascii_lowercase().as_str() {
            "start" => words.next().map(positive).transpose().map(Command::Start),
            "next" => Ok(Command::Next),
            "bank" => {
                let rest: Vec<&str> = words.collect();
                let (page, keyword) = match rest.split_first() {
                    Some((head, tail)) if head.parse::<usize>().is_ok() => {
                        (page_arg(Some(*head))?, tail.join(" "))
                    }
                    _ => (1, rest.join(" ")),
                };
                Ok(Command::Bank { page, keyword })
            }
            "records" => Ok(Command::Records {
                page: page_arg(words.next())?,
            }),
            "detail" => {
                let raw = words.next().ok_or(CommandError::MissingArgument {
                    command: "detail",
                    argument: "id",
                })?;
                let id = raw
                    .parse::<RecordId>()
                    .map_err(|_| CommandError::InvalidNumber(raw.to_owned()))?;
                Ok(Command::Detail {
                    id,
                    page: page_arg(words.next())?,
                })
            }
            "upload" => {
                let rest: Vec<&str> = words.collect();
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "upload",
                        argument: "path",
                    });
                }
                Ok(Command::Upload(PathBuf::from(rest.join(" "))))
            }
            "home" => Ok(Command::Home),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other if other.chars().all(|c| c.is_ascii_digit()) => {
                positive(other).map(Command::Answer)
            }
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

enum Input {
    Line(Option<String>),
    Event(Result<QuizEvent, QuizError>),
}

pub struct Shell {
    services: QuizServices,
    quiz: QuizController,
    default_limit: Option<NonZeroUsize>,
}

impl Shell {
    pub fn new(
        services: QuizServices,
        bank: QuestionBank,
        default_limit: Option<NonZeroUsize>,
    ) -> Self {
        let quiz = services.controller(bank);
        Self {
            services,
            quiz,
            default_limit,
        }
    }

    /// Read commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only if stdin cannot be read.
    pub async fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        render::home(self.quiz.bank());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let listening = self.quiz.phase() == QuizPhase::InProgress
                || self.quiz.has_unsaved_completion();
            let input = tokio::select! {
                line = lines.next_line() => Input::Line(line?),
                event = self.quiz.next_event(), if listening => Input::Event(event),
            };

            match input {
                Input::Line(None) => break,
                Input::Line(Some(line)) => match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => self.execute(command).await,
                    Err(CommandError::Empty) => {}
                    Err(err) => println!("{err}"),
                },
                Input::Event(Ok(event)) => render::event(&event),
                Input::Event(Err(err)) => println!("error: {err}"),
            }
        }

        self.quiz.abandon();
        Ok(())
    }

    async fn execute(&mut self, command: Command) {
        debug!(?command, "command");
        match command {
            Command::Start(limit) => {
                let limit = limit.or(self.default_limit);
                match self.quiz.start(limit).await {
                    Ok(event) => render::event(&event),
                    Err(QuizError::EmptyBank) => {
                        println!("The question bank is empty; `upload <path>` a bank first.");
                    }
                    Err(err) => println!("cannot start: {err}"),
                }
            }
            Command::Answer(number) => match self.quiz.submit(number.get() - 1) {
                Ok(event) => render::event(&event),
                Err(err) => println!("{err}"),
            },
            Command::Next => match self.quiz.advance().await {
                Ok(event) => render::event(&event),
                Err(err) => println!("{err}"),
            },
            Command::Bank { page, keyword } => {
                let page = self.services.browse(self.quiz.bank(), &keyword, page);
                render::bank_page(&page, &keyword);
            }
            Command::Records { page } => match self.services.records().page(page).await {
                Ok(page) => render::records_page(&page),
                Err(err) => println!("{err}"),
            },
            Command::Detail { id, page } => {
                match self.services.records().detail_page(id, page).await {
                    Ok(page) => render::detail_page(id, &page),
                    Err(err) => println!("record {id}: {err}"),
                }
            }
            Command::Upload(path) => self.upload(path).await,
            Command::Home => {
                self.quiz.abandon();
                render::home(self.quiz.bank());
            }
            Command::Help => render::help(),
            Command::Quit => {}
        }
    }

    async fn upload(&mut self, path: PathBuf) {
        if self.quiz.phase() == QuizPhase::InProgress {
            println!("Leave the quiz with `home` before uploading a new bank.");
            return;
        }
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) => {
                println!("cannot read {}: {err}", path.display());
                return;
            }
        };
        let loaded = self
            .services
            .bank_service()
            .load(BankSource::Text(text))
            .await;
        match loaded {
            Ok(bank) => match self.quiz.replace_bank(bank) {
                Ok(()) => println!("Loaded {} questions.", self.quiz.bank().len()),
                Err(err) => println!("{err}"),
            },
            Err(err) => println!("upload rejected, keeping current bank: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).unwrap()
    }

    #[test]
    fn parses_start_with_and_without_limit() {
        assert_eq!("start".parse::<Command>(), Ok(Command::Start(None)));
        assert_eq!("START 3".parse::<Command>(), Ok(Command::Start(Some(n(3)))));
        assert_eq!(
            "start 0".parse::<Command>(),
            Err(CommandError::InvalidNumber("0".into()))
        );
    }

    #[test]
    fn bare_numbers_are_answers() {
        assert_eq!("2".parse::<Command>(), Ok(Command::Answer(n(2))));
        assert!("0".parse::<Command>().is_err());
    }

    #[test]
    fn bank_takes_optional_page_then_keyword() {
        assert_eq!(
            "bank".parse::<Command>(),
            Ok(Command::Bank {
                page: 1,
                keyword: String::new()
            })
        );
        assert_eq!(
            "bank 4 capital of".parse::<Command>(),
            Ok(Command::Bank {
                page: 4,
                keyword: "capital of".into()
            })
        );
        assert_eq!(
            "bank france".parse::<Command>(),
            Ok(Command::Bank {
                page: 1,
                keyword: "france".into()
            })
        );
    }

    #[test]
    fn detail_requires_an_id() {
        assert_eq!(
            "detail #2 3".parse::<Command>(),
            Ok(Command::Detail {
                id: RecordId::new(2),
                page: 3
            })
        );
        assert_eq!(
            "detail".parse::<Command>(),
            Err(CommandError::MissingArgument {
                command: "detail",
                argument: "id"
            })
        );
    }

    #[test]
    fn upload_keeps_spaces_in_paths() {
        assert_eq!(
            "upload my banks/mid.json".parse::<Command>(),
            Ok(Command::Upload(PathBuf::from("my banks/mid.json")))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".into()))
        );
    }
}
