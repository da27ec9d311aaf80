mod app;
mod clipboard;
mod config;
mod display;
mod error;
mod layers;

use crate::app::{App, Lookup};
use crate::config::Config;
use crate::layers::filename::rename_file;
use anyhow::Result;
use clap::{ArgAction, Parser};
use dialoguer::Input;
use dotenvy::dotenv;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

/// Look up a DOI on Crossref and derive a YEAR_JOURNAL_AUTHOR_TITLE.pdf filename.
///
/// Without a DOI argument, DOIs are read interactively (or line by line from piped stdin).
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// DOI to look up, bare or as a doi.org URL
    doi: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Crossref works endpoint [env: CROSSREF_API_BASE]
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// Contact e-mail for Crossref's polite pool [env: CROSSREF_MAILTO]
    #[arg(long, value_name = "EMAIL")]
    mailto: Option<String>,

    /// Request timeout in seconds [env: DOI_RENAME_TIMEOUT_SECS]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Do not copy the filename to the clipboard
    #[arg(long)]
    no_copy: bool,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Rename this file to the derived filename (requires a DOI argument)
    #[arg(long, value_name = "PATH", requires = "doi")]
    rename: Option<PathBuf>,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::from_env()?
        .with_overrides(cli.api_base.as_deref(), cli.mailto.as_deref(), cli.timeout)?;
    tracing::debug!("Using configuration: {:?}", config);
    let app = App::new(&config)?;

    if let Some(doi) = &cli.doi {
        return run_once(&app, &cli, doi).await;
    }

    if std::io::stdin().is_terminal() {
        run_interactive(&app, &cli).await
    } else {
        let failures = run_batch(&app, &cli, BufReader::new(tokio::io::stdin())).await?;
        if failures > 0 {
            tracing::warn!("{} lookup(s) failed", failures);
            std::process::exit(1);
        }
        Ok(())
    }
}

async fn run_once(app: &App, cli: &Cli, doi: &str) -> Result<()> {
    let lookup = match app.lookup(doi).await {
        Ok(lookup) => lookup,
        Err(e) => {
            display::print_error(&e);
            std::process::exit(1);
        }
    };

    present(cli, &lookup, true)?;

    if let Some(path) = &cli.rename {
        let renamed = rename_file(path, &lookup.filename).await?;
        display::print_renamed(&renamed);
    }

    Ok(())
}

async fn run_interactive(app: &App, cli: &Cli) -> Result<()> {
    loop {
        let entry = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("Enter DOI")
                .allow_empty(true)
                .interact_text()
        })
        .await?;

        // EOF or a closed terminal ends the session.
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Prompt closed: {}", e);
                break;
            }
        };

        if is_quit_word(&entry) {
            break;
        }

        match app.lookup(&entry).await {
            Ok(lookup) => present(cli, &lookup, true)?,
            Err(e) => display::print_error(&e),
        }
    }

    Ok(())
}

fn is_quit_word(entry: &str) -> bool {
    QUIT_WORDS.contains(&entry.trim().to_ascii_lowercase().as_str())
}

/// Looks up one DOI per line and returns how many lines did not produce a filename.
async fn run_batch<R: AsyncBufRead + Unpin>(app: &App, cli: &Cli, mut reader: R) -> Result<usize> {
    let mut failures = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim_end_matches(['\n', '\r']),
            Err(e) => {
                tracing::warn!("Skipping input line that is not valid UTF-8: {}", e);
                failures += 1;
                display::print_error(&format!(
                    "Not a valid DOI line: {}",
                    String::from_utf8_lossy(&buf).trim_end()
                ));
                continue;
            }
        };

        match app.lookup(line).await {
            Ok(lookup) => present(cli, &lookup, false)?,
            Err(e) => {
                failures += 1;
                display::print_error(&e);
            }
        }
    }

    Ok(failures)
}

fn present(cli: &Cli, lookup: &Lookup, offer_copy: bool) -> Result<()> {
    if cli.json {
        return display::print_json(lookup);
    }

    display::print_report(lookup);
    if offer_copy && !cli.no_copy {
        display::print_copy_outcome(clipboard::copy_to_clipboard(&lookup.filename));
    }
    Ok(())
}
