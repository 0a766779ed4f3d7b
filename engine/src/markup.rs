//! Tooltip markup assembly.
//!
//! Tooltips are rendered by the host with Pango-style `<span>` markup; this
//! module only builds the strings. One line per finding, in checker
//! emission order, the whole payload wrapped in a monospace span. Message
//! text is escaped; the fixed colors live here rather than in a theme
//! because they are part of the established look, matched to the gutter
//! colors in [`Severity::color`](sidelight_types::Severity::color).

use sidelight_types::Diagnostic;

/// Color of the `:` separators in the `line:col:` prefix.
const SEPARATOR_COLOR: &str = "#008899";
/// Color of the trailing rule tag.
const RULE_COLOR: &str = "#916a42";

/// Escape text for inclusion in span markup.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// One finding's tooltip line.
///
/// Columns display 1-indexed, restoring what the checker printed. The rule
/// tag is emitted unescaped: the parser's grammar restricts it to ASCII
/// letters.
#[must_use]
pub fn summary_markup(diagnostic: &Diagnostic) -> String {
    let start = diagnostic.span().start;
    let sep = format!("<span foreground=\"{SEPARATOR_COLOR}\">:</span>");
    let severity = diagnostic.severity();
    let mut line = format!(
        "{line}{sep}{col}{sep} <span foreground=\"{color}\"><b>{code}</b></span> {message}",
        line = start.line,
        col = start.col + 1,
        color = severity.color(),
        code = severity.code(),
        message = escape_markup(diagnostic.message()),
    );
    if let Some(rule) = diagnostic.rule() {
        line.push_str(&format!(
            " [<span foreground=\"{RULE_COLOR}\">{rule}</span>]"
        ));
    }
    line
}

/// Combined tooltip payload for the findings under the pointer.
#[must_use]
pub fn tooltip(diagnostics: &[&Diagnostic]) -> String {
    let body = diagnostics
        .iter()
        .map(|diagnostic| summary_markup(diagnostic))
        .collect::<Vec<_>>()
        .join("\n");
    format!("<span font=\"monospace\">{body}</span>")
}
