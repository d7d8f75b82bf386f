//! Output formatting utilities.
//!
//! Everything writes to a caller-supplied `Write` so command output can be
//! captured in tests; `main` passes stdout.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::OutputFormat;
use crate::error::Result;

/// Prints a success line.
pub fn success(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{} {}", "✓".green().bold(), message)?;
    Ok(())
}

/// Prints an informational line.
pub fn info(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{} {}", "ℹ".blue().bold(), message)?;
    Ok(())
}

/// Prints a warning line.
pub fn warning(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{} {}", "⚠".yellow().bold(), message)?;
    Ok(())
}

/// Prints an error line to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Renders a collection: a rounded table of `rows`, or pretty JSON of `items`.
///
/// `empty` is printed instead of an empty table.
pub fn list<R: Tabled, T: Serialize>(
    out: &mut impl Write,
    format: OutputFormat,
    rows: Vec<R>,
    items: &[T],
    empty: &str,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                info(out, empty)?;
            } else {
                let table = Table::new(rows).with(Style::rounded()).to_string();
                writeln!(out, "{table}")?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
        }
    }
    Ok(())
}

/// Renders one entity as aligned `label: value` lines, or pretty JSON.
pub fn detail<T: Serialize>(
    out: &mut impl Write,
    format: OutputFormat,
    fields: &[(&str, String)],
    item: &T,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
            for (label, value) in fields {
                writeln!(out, "{:<width$} {}", format!("{label}:"), value)?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(item)?)?;
        }
    }
    Ok(())
}

/// Asks a yes/no question on the terminal. Only `yes` or `y` confirm.
pub fn confirm(out: &mut impl Write, message: &str) -> Result<bool> {
    write!(out, "{message} (yes/no): ")?;
    out.flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let answer = input.trim();
    Ok(answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y"))
}

/// Display helper for optional text fields.
pub fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}
