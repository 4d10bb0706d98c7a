//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to printing the raw body.

use crate::Response;

/// Trait for human-readable output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Response {
    fn pretty_print(&self) -> String {
        let request_line = format!("{} {}", self.method(), self.url());
        let divider = "─".repeat(request_line.chars().count().max(30));

        let mut lines = vec![
            request_line,
            divider,
            format!("Status:         {}", self.status()),
        ];

        for (name, value) in self.headers() {
            lines.push(format!(
                "{}: {}",
                name,
                String::from_utf8_lossy(value.as_bytes())
            ));
        }

        let body = body_text(self);
        if !body.is_empty() {
            lines.push(String::new());
            lines.push(body);
        }

        lines.join("\n")
    }
}

/// The body as pretty-printed JSON, or as text when it is not JSON.
pub fn body_text(response: &Response) -> String {
    match serde_json::from_slice::<serde_json::Value>(response.body()) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| response.text().into_owned()),
        Err(_) => response.text().trim_end().to_string(),
    }
}
