//! Terminal output: user-facing messages and plain-text tables.

use crate::OutputFormat;
use serde_json::{json, Value};
use tablekeeper_core::{ApiError, Notifier, Route};

/// Shows API messages on the terminal in text mode. In JSON mode they only
/// go to the log; the command prints a structured result instead.
pub struct ConsoleNotifier {
    format: OutputFormat,
}

impl ConsoleNotifier {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Notifier for ConsoleNotifier {
    fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Text => eprintln!("Error: {}", message),
            OutputFormat::Json => tracing::debug!("{}", message),
        }
    }

    fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => tracing::debug!("{}", message),
        }
    }
}

pub fn error_json(error: &ApiError, route: Route) -> Value {
    match error {
        ApiError::Unauthorized => json!({
            "error": error.user_message(),
            "status": 401,
            "kind": "unauthorized",
            "route": route,
        }),
        ApiError::RequestFailed {
            message,
            status,
            kind,
        } => json!({
            "error": message,
            "status": status,
            "kind": kind,
            "route": route,
        }),
    }
}

/// Render rows as left-aligned columns under a header line.
pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![format_line(header.to_vec())];
    out.extend(rows.iter().map(|row| format_line(row.iter().map(String::as_str).collect())));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekeeper_core::FailureKind;

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "Ada".to_string()],
            vec!["12".to_string(), "Grace Hopper".to_string()],
        ];
        let table = render_table(&["ID", "NAME"], &rows);
        assert_eq!(table, "ID  NAME\n1   Ada\n12  Grace Hopper");
    }

    #[test]
    fn test_render_table_without_rows() {
        assert_eq!(render_table(&["ID", "NAME"], &[]), "ID  NAME");
    }

    #[test]
    fn test_error_json_carries_message_and_status() {
        let err = ApiError::request_failed("Table already booked", Some(409), FailureKind::Status);
        let value = error_json(&err, Route::Reservations);
        assert_eq!(value["error"], "Table already booked");
        assert_eq!(value["status"], 409);
        assert_eq!(value["kind"], "status");
        assert_eq!(value["route"], "/reservations");
    }

    #[test]
    fn test_error_json_unauthorized() {
        let value = error_json(&ApiError::Unauthorized, Route::Login);
        assert_eq!(value["status"], 401);
        assert_eq!(value["route"], "/login");
    }
}
