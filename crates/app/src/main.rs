mod report;
mod session;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use reading_assistant_core::{Granularity, RankingOptions, DEFAULT_B, DEFAULT_K1, DEFAULT_SCOPE};
use session::Session;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "reading-assistant", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Folder with the documents you have already read
    #[arg(long, env = "READING_ASSISTANT_READ_DIR")]
    read_dir: PathBuf,

    /// Folder with the documents you have not read yet
    #[arg(long, env = "READING_ASSISTANT_UNREAD_DIR")]
    unread_dir: PathBuf,

    /// BM25 term-frequency saturation
    #[arg(long, default_value_t = DEFAULT_K1)]
    k1: f64,

    /// BM25 length normalization strength
    #[arg(long, default_value_t = DEFAULT_B)]
    b: f64,

    /// Only matches this many standard deviations above the mean score are shown
    #[arg(long, default_value_t = DEFAULT_SCOPE)]
    scope: f64,

    /// Folder the HTML report is written to
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// List read and unread files with their numbers.
    List,
    /// Compare an unread document to the previously read documents.
    Rank {
        /// Number of the unread file, as shown by `list`.
        unread: usize,
        /// Print the full rankings as JSON instead of the outlier summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Move a document from the unread folder to the read folder.
    Read {
        /// Number of the unread file.
        unread: usize,
    },
    /// Move a document from the read folder back to the unread folder.
    Forget {
        /// Number of the read file.
        read: usize,
    },
    /// Print a read document or paragraph, raw and normalized.
    View {
        #[arg(value_enum)]
        level: Level,
        /// Unit key, e.g. `essay.txt` or `essay.txt_pg3`.
        key: String,
    },
    /// Keep the collections in memory and accept commands interactively.
    Shell,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Document,
    Paragraph,
}

impl From<Level> for Granularity {
    fn from(value: Level) -> Self {
        match value {
            Level::Document => Granularity::Document,
            Level::Paragraph => Granularity::Paragraph,
        }
    }
}

#[derive(Parser)]
#[command(no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// List read and unread files.
    List,
    /// Compare an unread document to the read documents.
    Rank { unread: usize },
    /// Add an unread document to the read list.
    Read { unread: usize },
    /// Remove a document from the read list.
    Forget { read: usize },
    /// Print a read document or paragraph.
    View {
        #[arg(value_enum)]
        level: Level,
        key: String,
    },
    /// Change how many standard deviations above the mean a match must score.
    Scope {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Leave the shell.
    Exit,
}

fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        read_dir = %cli.read_dir.display(),
        unread_dir = %cli.unread_dir.display(),
        "reading-assistant boot"
    );

    let options = RankingOptions {
        k1: cli.k1,
        b: cli.b,
        scope: cli.scope,
    };
    let mut session = Session::open(&cli.read_dir, &cli.unread_dir, &cli.report_dir, options)?;

    match cli.command {
        Command::List => print!("{}", session.list()?),
        Command::Rank { unread, json } => {
            let outcome = session.rank(unread)?;
            if json {
                let payload = serde_json::json!({
                    "document": outcome.document,
                    "paragraph": outcome.paragraph,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", outcome.summary);
                println!("report: {}", outcome.report_path.display());
            }
        }
        Command::Read { unread } => {
            let path = session.read(unread)?;
            println!("read {}", path.display());
        }
        Command::Forget { read } => {
            let path = session.forget(read)?;
            println!("forgot {}", path.display());
        }
        Command::View { level, key } => print_view(&session, level, &key),
        Command::Shell => run_shell(&mut session)?,
    }

    Ok(())
}

fn print_view(session: &Session, level: Level, key: &str) {
    let granularity = Granularity::from(level);
    match session.view(granularity, key) {
        Some(text) => println!("{text}"),
        None => println!("{granularity} {key} not found"),
    }
}

fn run_shell(session: &mut Session) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("{}", session.list()?);
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let words = line.split_whitespace().collect::<Vec<_>>();
        if words.is_empty() {
            write!(stdout, "> ")?;
            stdout.flush()?;
            continue;
        }

        match ShellLine::try_parse_from(words) {
            Ok(ShellLine {
                command: ShellCommand::Exit,
            }) => break,
            Ok(parsed) => {
                if let Err(error) = dispatch(session, parsed.command) {
                    warn!(error = %error, "command failed");
                    println!("error: {error:#}");
                }
            }
            Err(error) => println!("{error}"),
        }

        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    Ok(())
}

fn dispatch(session: &mut Session, command: ShellCommand) -> anyhow::Result<()> {
    match command {
        ShellCommand::List => print!("{}", session.list()?),
        ShellCommand::Rank { unread } => {
            let outcome = session.rank(unread)?;
            print!("{}", outcome.summary);
            println!("report: {}", outcome.report_path.display());
        }
        ShellCommand::Read { unread } => {
            let path = session.read(unread)?;
            println!("read {}", path.display());
        }
        ShellCommand::Forget { read } => {
            let path = session.forget(read)?;
            println!("forgot {}", path.display());
        }
        ShellCommand::View { level, key } => print_view(session, level, &key),
        ShellCommand::Scope { value } => {
            session.set_scope(value)?;
            println!("scope set to {}", session.scope());
        }
        ShellCommand::Exit => {}
    }
    Ok(())
}
