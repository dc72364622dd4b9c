//! These structs provide the CLI interface for posr.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// posr: Turns point-of-sale sales exports into ranked sales reports.
///
/// Give it the spreadsheet your point-of-sale system exports (`.xlsx`, or `.csv`) and it prints a
/// report of every item sold with the drinks listed first, ordered by revenue. Each report is kept
/// in a history file in the posr home directory so that it can be listed and shown again later.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the home directory is $HOME/posr, pass
    /// --home or set POSR_HOME if you want it somewhere else.
    Init(InitArgs),
    /// Analyze a sales export and print the report.
    Analyze(AnalyzeArgs),
    /// List or show previously generated reports.
    History(HistoryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where posr configuration and report history is held. Defaults to ~/posr
    #[arg(long, env = "POSR_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `posr init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Reports of this many bytes or more are not printed; a short notice is printed instead.
    /// Defaults to 4000.
    #[arg(long)]
    message_limit: Option<usize>,
}

impl InitArgs {
    pub fn message_limit(&self) -> Option<usize> {
        self.message_limit
    }
}

/// Args for the `posr analyze` command.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// The sales export to analyze, an `.xlsx` or `.csv` file.
    file: PathBuf,

    /// Do not save the report to the history.
    #[arg(long)]
    no_save: bool,
}

impl AnalyzeArgs {
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn no_save(&self) -> bool {
        self.no_save
    }
}

/// Args for the `posr history` command.
#[derive(Debug, Parser, Clone)]
pub struct HistoryArgs {
    #[command(subcommand)]
    subcommand: HistorySubcommand,
}

impl HistoryArgs {
    pub fn subcommand(&self) -> &HistorySubcommand {
        &self.subcommand
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistorySubcommand {
    /// List the saved reports with their dates and totals.
    List,
    /// Print a saved report.
    Show {
        /// The number of the report as shown by `posr history list`, starting at 1.
        number: usize,
    },
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("posr"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or POSR_HOME instead of relying on the default posr home \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("posr")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
