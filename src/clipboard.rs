// Best-effort clipboard hand-off through whatever the platform ships.

use std::io::Write;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Copied through the named helper program.
    Copied(&'static str),
    Unavailable,
}

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

pub fn copy_to_clipboard(text: &str) -> CopyOutcome {
    for &(program, args) in CANDIDATES {
        if pipe_into(program, args, text) {
            tracing::debug!("Copied filename to clipboard via {}", program);
            return CopyOutcome::Copied(program);
        }
        tracing::debug!("Clipboard helper {} unavailable", program);
    }
    CopyOutcome::Unavailable
}

fn pipe_into(program: &str, args: &[&str], text: &str) -> bool {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(_) => return false,
    };

    // stdin must be closed before waiting or the helper never finishes reading.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()).is_ok(),
        None => false,
    };

    match child.wait() {
        Ok(status) => written && status.success(),
        Err(_) => false,
    }
}
