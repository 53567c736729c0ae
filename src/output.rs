//! Output for todo CLI commands.
//!
//! With `--json` every command prints one envelope on stdout:
//! `{schema_version, command, status, data | error, warnings?, next_steps?}`.
//! Otherwise a [`HumanOutput`] is rendered as plain text, or suppressed by
//! `--quiet`. Errors always go to stderr in human mode.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "todo.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Plain-text rendering of a command result.
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    items: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// `key: value` line; an empty value prints the key alone.
    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.items.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

#[derive(Serialize)]
struct Envelope<'a, B: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(flatten)]
    body: B,
    #[serde(skip_serializing_if = "no_entries")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "no_entries")]
    next_steps: &'a [String],
}

#[derive(Serialize)]
struct DataBody<'a, T: Serialize> {
    data: &'a T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    message: &'a str,
    code: i32,
    kind: &'static str,
}

fn no_entries(entries: &&[String]) -> bool {
    entries.is_empty()
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let (warnings, next_steps) = human
            .map(|h| (h.warnings.as_slice(), h.next_steps.as_slice()))
            .unwrap_or_default();
        return print_json(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            body: DataBody { data },
            warnings,
            next_steps,
        });
    }

    if let Some(human) = human.filter(|_| !options.quiet) {
        println!("{}", format_human(human));
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        let message = err.to_string();
        return print_json(&Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            body: ErrorBody {
                error: ErrorDetail {
                    message: &message,
                    code: err.exit_code(),
                    kind: err.kind(),
                },
            },
            warnings: &[],
            next_steps: &next_steps,
        });
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

fn print_json<T: Serialize>(payload: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut text = output.header.clone();

    if !output.summary.is_empty() {
        text.push_str("\n\nSummary:");
        for (key, value) in &output.summary {
            if value.is_empty() {
                let _ = write!(text, "\n- {key}");
            } else {
                let _ = write!(text, "\n- {key}: {value}");
            }
        }
    }

    for (title, entries) in [
        ("Items", &output.items),
        ("Warnings", &output.warnings),
        ("Next steps", &output.next_steps),
    ] {
        if entries.is_empty() {
            continue;
        }
        let _ = write!(text, "\n\n{title}:");
        for entry in entries {
            let _ = write!(text, "\n- {entry}");
        }
    }

    text
}

/// First positional argument, used to label errors raised before or during
/// argument parsing.
pub fn infer_command_name_from_args() -> String {
    command_name(std::env::args().skip(1))
}

fn command_name(args: impl Iterator<Item = String>) -> String {
    let mut skip_value = false;
    for arg in args {
        if std::mem::take(&mut skip_value) {
            continue;
        }
        if matches!(arg.as_str(), "--store" | "--config") {
            skip_value = true;
            continue;
        }
        if !arg.starts_with('-') {
            return arg;
        }
    }
    "todo".to_string()
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::ItemNotFound(_) => vec!["todo list".to_string()],
        Error::InvalidConfig(_) => vec!["fix .todo.toml then retry".to_string()],
        Error::InvalidTransition { .. } => vec!["todo status <id> <status>".to_string()],
        Error::LockFailed(_) => vec!["retry once the other todo process finishes".to_string()],
        Error::CorruptData(_) => vec!["check the store file or pass --store".to_string()],
        Error::Store(inner) => error_next_steps(inner),
        _ => Vec::new(),
    }
}
