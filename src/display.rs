use anyhow::Result;
use console::style;
use crate::app::Lookup;
use crate::clipboard::CopyOutcome;

static SUCCESS_PREFIX: &str = "✓ ";
static ERROR_PREFIX: &str = "✗ ";
static INFO_PREFIX: &str = "ℹ ";
static TREE_BRANCH: &str = "├";
static TREE_LEAF: &str = "└";

const NOT_AVAILABLE: &str = "N/A";

pub fn render_report(lookup: &Lookup) -> String {
    let fields = [
        ("Publication Year", &lookup.metadata.year),
        ("Journal Name", &lookup.metadata.journal),
        ("Corresponding Author", &lookup.metadata.author),
        ("Title", &lookup.metadata.title),
    ];

    let mut lines = vec![format!(
        "{}Paper information for {}",
        style(SUCCESS_PREFIX).green(),
        style(&lookup.doi).bold()
    )];
    for (label, value) in fields {
        lines.push(format!(
            "{} {}: {}",
            style(TREE_BRANCH).dim(),
            style(label).bold(),
            value.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
    }
    lines.push(format!(
        "{} {}: {}",
        style(TREE_LEAF).dim(),
        style("New filename").bold(),
        style(&lookup.filename).cyan()
    ));
    lines.join("\n")
}

pub fn print_report(lookup: &Lookup) {
    println!("{}", render_report(lookup));
}

pub fn render_json(lookup: &Lookup) -> Result<String> {
    Ok(serde_json::to_string_pretty(lookup)?)
}

pub fn print_json(lookup: &Lookup) -> Result<()> {
    println!("{}", render_json(lookup)?);
    Ok(())
}

pub fn print_copy_outcome(outcome: CopyOutcome) {
    match outcome {
        CopyOutcome::Copied(helper) => println!("{}Filename copied to clipboard ({}).", style(INFO_PREFIX).blue(), helper),
        CopyOutcome::Unavailable => println!(
            "{}Clipboard not available, copy the filename above manually.",
            style(INFO_PREFIX).yellow()
        ),
    }
}

pub fn print_renamed(path: &std::path::Path) {
    println!("{}Renamed to {}", style(SUCCESS_PREFIX).green(), path.display());
}

pub fn print_error(err: &impl std::fmt::Display) {
    eprintln!("{}{}", style(ERROR_PREFIX).red(), err);
}
