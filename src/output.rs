//! Output formatting
//!
//! Two renderings of repository listings:
//! - a plain text table for the interactive loop and `roster view`
//! - a JSON envelope for `roster view --json`
//!
//! # JSON Contract
//! - Success: `{"ok": true, "engine": "...", "command": "...", "data": [...], "meta": {...}}`
//! - Error: `{"ok": false, "engine": "...", "command": "...", "error": {"code": "...", "message": "..."}}`

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::error::RosterError;
use crate::model::{Department, EmployeeView, RoleView};

/// Rows that can be shown as a table
pub trait Tabular {
    /// Column headers, in display order
    const HEADERS: &'static [&'static str];

    /// Cell text for each header
    fn cells(&self) -> Vec<String>;
}

impl Tabular for Department {
    const HEADERS: &'static [&'static str] = &["id", "name"];

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }
}

impl Tabular for RoleView {
    const HEADERS: &'static [&'static str] = &["id", "title", "department", "salary"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.department.clone(),
            format_salary(self.salary),
        ]
    }
}

impl Tabular for EmployeeView {
    const HEADERS: &'static [&'static str] =
        &["id", "first_name", "last_name", "title", "department", "salary", "manager"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.title.clone(),
            self.department.clone(),
            format_salary(self.salary),
            self.manager.clone().unwrap_or_default(),
        ]
    }
}

/// Whole salaries print without decimals, others with two
#[must_use]
pub fn format_salary(salary: f64) -> String {
    if salary.fract() == 0.0 {
        format!("{salary:.0}")
    } else {
        format!("{salary:.2}")
    }
}

/// Render rows as a left-aligned text table with a row count footer
#[must_use]
pub fn render_table<T: Tabular>(rows: &[T]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(Tabular::cells).collect();

    let widths: Vec<usize> = T::HEADERS
        .iter()
        .enumerate()
        .map(|(col, header)| {
            cells
                .iter()
                .map(|row| row[col].width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, T::HEADERS.iter().copied(), &widths);
    push_line(&mut out, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }

    let noun = if rows.len() == 1 { "row" } else { "rows" };
    out.push_str(&format!("({} {noun})", rows.len()));
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: impl Iterator<Item = S>, widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        let cell = cell.as_ref();
        line.push_str(cell);
        line.push_str(&" ".repeat(width - cell.width() + 2));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Success envelope for operation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always true for success envelopes
    pub ok: bool,

    /// Database engine used for this operation (postgres, sqlite)
    pub engine: String,

    /// Command that was executed (e.g. `view departments`)
    pub command: String,

    /// Operation-specific data
    pub data: T,

    /// Execution metadata
    pub meta: Metadata,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(engine: impl Into<String>, command: impl Into<String>, data: T, meta: Metadata) -> Self {
        Self { ok: true, engine: engine.into(), command: command.into(), data, meta }
    }
}

/// Error envelope for operation failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always false for error envelopes
    pub ok: bool,

    /// Database engine (empty string if the failure happened before connecting)
    pub engine: String,

    /// Command that was attempted
    pub command: String,

    pub error: ErrorInfo,
}

impl ErrorEnvelope {
    /// Create error envelope from `RosterError`
    pub fn from_error(
        engine: impl Into<String>,
        command: impl Into<String>,
        err: &RosterError,
    ) -> Self {
        Self {
            ok: false,
            engine: engine.into(),
            command: command.into(),
            error: ErrorInfo { code: err.error_code().to_string(), message: err.message() },
        }
    }
}

/// Error information structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable error code (e.g., "QUERY_FAILED", "CONNECTION_FAILED")
    pub code: String,

    pub message: String,
}

/// Execution metadata included in all success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Execution time in milliseconds
    pub execution_ms: u64,

    /// Number of rows returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_returned: Option<usize>,
}

impl Metadata {
    #[must_use]
    pub const fn with_rows(execution_ms: u64, rows_returned: usize) -> Self {
        Self { execution_ms, rows_returned: Some(rows_returned) }
    }
}
