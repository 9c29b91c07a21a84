//! RosterDB CLI
//!
//! Interactive console for managing a roster of student records stored in a
//! flat comma-delimited file.
//!
//! # Menu
//!
//! 1. Add New Student
//! 2. Update Student
//! 3. Delete Student
//! 4. Search by Roll Number
//! 5. Search by Name
//! 6. Display All Students
//! 7. Exit

mod console;
mod menu;
mod render;

use clap::{Parser, ValueEnum};
use console::Console;
use menu::Menu;
use rosterdb_codec::Format;
use rosterdb_core::{Config, LoadPolicy, RecordStore, DEFAULT_FILE_NAME};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Interactive student roster backed by a delimited text file.
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the roster file
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    file: PathBuf,

    /// Row encoding of the roster file
    #[arg(long, value_enum, default_value_t = FormatArg::Legacy)]
    format: FormatArg,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Unescaped fields, compatible with existing roster files
    Legacy,
    /// Double-quote escaping for fields with commas, quotes, or line breaks
    Quoted,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Legacy => Format::Legacy,
            FormatArg::Quoted => Format::Quoted,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config::new()
            .path(&self.file)
            .format(self.format.into())
            .load_policy(if self.strict {
                LoadPolicy::Abort
            } else {
                LoadPolicy::Skip
            })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the menu.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.config();
    let mut store = RecordStore::open(&config)
        .map_err(|e| format!("cannot open {}: {e}", config.path.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());

    let mut menu = Menu::new(&mut store, console);
    menu.greet()?;
    menu.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["roster"]);
        let config = cli.config();
        assert_eq!(config.path, PathBuf::from("students.csv"));
        assert_eq!(config.format, Format::Legacy);
        assert_eq!(config.load_policy, LoadPolicy::Skip);
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::parse_from(["roster", "-f", "class.csv", "--format", "quoted", "--strict"]);
        let config = cli.config();
        assert_eq!(config.path, PathBuf::from("class.csv"));
        assert_eq!(config.format, Format::Quoted);
        assert_eq!(config.load_policy, LoadPolicy::Abort);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["roster", "--format", "tsv"]).is_err());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
