//! Command-line glue shared by the `contacts2xml` and `messages2xml`
//! binaries: argument parsing, logging, the stdout sink and exit codes.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::ExportError;
use crate::export::export;
use crate::profile::{Encoding, Profile};

/// Exit status of every failed run (-1 as an unsigned byte).
pub const FAILURE_CODE: u8 = 255;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// OVI backup database file (SQLite)
    #[arg(value_name = "DB_FILE")]
    pub db_file: Option<PathBuf>,

    /// Output encoding: utf-8 or ascii
    #[arg(long, value_name = "ENCODING")]
    pub encoding: Option<Encoding>,

    /// Log progress to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Entry point of both binaries.
pub fn main(name: &'static str, about: &'static str, profile: Profile) -> ExitCode {
    match run(name, about, profile) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(FAILURE_CODE)
        }
    }
}

fn run(name: &'static str, about: &'static str, profile: Profile) -> Result<()> {
    let matches = Args::command().name(name).about(about).get_matches();
    let args = Args::from_arg_matches(&matches)?;

    init_logging(args.verbose);

    let db_file = args.db_file.ok_or(ExportError::Usage)?;
    if !db_file.is_file() {
        return Err(ExportError::FileNotFound(db_file).into());
    }
    let profile = match args.encoding {
        Some(encoding) => profile.with_encoding(encoding),
        None => profile,
    };
    debug!(?profile, path = %db_file.display(), "starting export");

    let document = export(&db_file, &profile)?;
    write_document(&document, profile.trim_output)
}

/// Sink: the document is the only thing ever written to stdout.
fn write_document(document: &[u8], trimmed: bool) -> Result<()> {
    let write = || -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(document)?;
        if trimmed {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()
    };
    write().map_err(|e| anyhow!("failed to write document to stdout: {e}"))?;
    debug!(bytes = document.len(), "document written");
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ovi_backup_xml=debug")
        } else {
            EnvFilter::new("ovi_backup_xml=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
