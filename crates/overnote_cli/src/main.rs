//! `note` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and dispatch to one command.
//! - Start file logging before any notebook is touched.
//!
//! # Invariants
//! - Logging failure is reported on stderr and never aborts a command.
//! - `ls` with nothing to list exits with status 2; failures exit with 1.

mod commands;
mod display;
mod editor;
mod highlight;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "note")]
#[command(about = "View, search and edit notes across overlayed notebooks")]
#[command(version)]
struct Cli {
    /// Restrict every command to one notebook
    #[arg(short = 'n', long, global = true)]
    notebook: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "OVERNOTE_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display an entry
    View {
        name: String,

        /// Display the entry from every notebook that holds it
        #[arg(short = 'A', long)]
        all: bool,

        /// Comma-separated tags entries must all carry
        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List entries, optionally filtered by name
    Ls {
        filter: Option<String>,

        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Search entry bodies for a phrase
    Search {
        phrase: String,

        /// Only search the entry with this exact name
        #[arg(short, long)]
        entry: Option<String>,

        /// Treat the phrase as a case-sensitive regular expression
        #[arg(short, long)]
        regex: bool,

        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Open an entry in the editor, creating it if needed
    Edit {
        name: String,

        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Delete an entry from a writable notebook
    Rm {
        name: String,

        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List every tag in use
    Tags,
    /// List the configured notebooks
    Dirs,
    /// Write a default config file
    Init,
    /// Print version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    commands::init_cli_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let options = commands::GlobalOptions {
        notebook: cli.notebook,
        config: cli.config,
    };

    match cli.command {
        Commands::View { name, all, tags } => commands::view(&options, &name, all, &tags),
        Commands::Ls { filter, tags } => commands::list(&options, filter.as_deref(), &tags),
        Commands::Search {
            phrase,
            entry,
            regex,
            tags,
        } => commands::search(&options, &phrase, entry.as_deref(), regex, &tags),
        Commands::Edit { name, tags } => commands::edit(&options, &name, &tags),
        Commands::Rm { name, tags } => commands::remove(&options, &name, &tags),
        Commands::Tags => commands::tags(&options),
        Commands::Dirs => commands::notebooks(&options),
        Commands::Init => commands::init(&options),
        Commands::Version => commands::version(),
    }
}
