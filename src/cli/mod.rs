//! Command-line skeleton shared by the three binaries.
//!
//! Each binary declares its own `clap` struct with a flattened [`CommonArgs`].
//! Parsing never touches the file system: a help request is rendered and the
//! process exits 0, anything else clap rejects becomes [`Error::BadUsage`].

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Args, Parser};

use crate::core::errors::{Error, Result};

pub const BAD_USAGE: &str = "Bad usage! See HELP [--help|-h]";

#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

/// Print a file's bytes in reverse order.
#[derive(Debug, Parser)]
#[command(name = "revfile")]
pub struct RevArgs {
    /// Input file
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// List a directory with permissions, owner, group, size and modification time.
#[derive(Debug, Parser)]
#[command(name = "lsdir")]
pub struct ListArgs {
    /// Directory to list
    #[arg(short, long, value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Print one JSON object per entry instead of text lines
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Copy a file to another path in fixed-size chunks.
#[derive(Debug, Parser)]
#[command(name = "cpfile")]
pub struct CopyArgs {
    /// Input file
    #[arg(short, long, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Output file, created or truncated
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl RevArgs {
    pub fn log_params(&self) {
        tracing::debug!(input = %self.input.display(), verbose = self.common.verbose, "** PARAMS **");
    }
}

impl ListArgs {
    pub fn log_params(&self) {
        tracing::debug!(
            directory = %self.directory.display(),
            json = self.json,
            verbose = self.common.verbose,
            "** PARAMS **"
        );
    }
}

impl CopyArgs {
    pub fn log_params(&self) {
        tracing::debug!(
            input = %self.input.display(),
            output = %self.output.display(),
            verbose = self.common.verbose,
            "** PARAMS **"
        );
    }
}

/// Outcome of a successful parse.
#[derive(Debug)]
pub enum Parsed<T> {
    Run(T),
    /// Rendered usage text; the caller prints it and exits 0.
    Help(String),
}

pub fn try_parse_from<T, I, S>(args: I) -> Result<Parsed<T>>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(parsed) => Ok(Parsed::Run(parsed)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp => Ok(Parsed::Help(err.render().to_string())),
            _ => Err(Error::BadUsage),
        },
    }
}

/// Parses the process arguments, exiting on help or bad usage.
pub fn parse_or_exit<T: Parser>() -> T {
    match try_parse_from(std::env::args_os()) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help(usage)) => {
            print!("{usage}");
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code().into());
        }
    }
}

/// Reports a failed run on stderr and maps it to the process exit status.
pub fn finish<T>(result: Result<T>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "run failed");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
