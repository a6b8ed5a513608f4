//! Text utilities for TUI rendering.

use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shown wherever a field has not been produced yet.
pub const PLACEHOLDER: &str = "-";

/// Wrap text to fit within a given width, handling unicode safely.
///
/// Returns a vector of lines, each fitting within the specified width.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0;

        for ch in line.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);

            if current_width + ch_width > width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
                current_width = 0;
            }

            current_line.push(ch);
            current_width += ch_width;
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Wrap text with an indent prefix, breaking on spaces where possible.
pub fn wrap_text_indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    let effective_width = width.saturating_sub(indent.width());

    if effective_width == 0 {
        return vec![format!("{}{}", indent, text)];
    }

    let mut lines = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            lines.push(indent.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0;

        for word in line.split(' ') {
            let word_width = word.width();
            let sep = usize::from(!current.is_empty());

            if current_width + sep + word_width > effective_width && !current.is_empty() {
                lines.push(format!("{}{}", indent, current));
                current.clear();
                current_width = 0;
            }

            // Words longer than a whole line are split hard
            if word_width > effective_width {
                let mut chunks = wrap_text(word, effective_width);
                // The last chunk stays open so the next word can join it
                if let Some(last) = chunks.pop() {
                    for chunk in chunks {
                        lines.push(format!("{}{}", indent, chunk));
                    }
                    current_width = last.width();
                    current = last;
                }
                continue;
            }

            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }

        if !current.is_empty() {
            lines.push(format!("{}{}", indent, current));
        }
    }

    if lines.is_empty() {
        lines.push(indent.to_string());
    }

    lines
}

/// Truncate a string to fit within a given width, adding ellipsis if needed.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    if max_width < 3 {
        return text.chars().take(max_width).collect();
    }

    let mut width = 0;
    let mut result = String::new();

    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width - 3 {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push_str("...");
    result
}

/// Pad `text` with spaces up to `width` display columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - current))
}

/// Format a JSON number the way the agent wrote it: integers without a
/// trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Display an optional value, substituting the placeholder when absent.
pub fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

/// Display an optional number, substituting the placeholder when absent.
pub fn number_or_placeholder(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_number)
}

/// Pretty-print a JSON value as indented lines. Absent values render as the
/// placeholder.
pub fn pretty_json(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => vec![PLACEHOLDER.to_string()],
        Some(value) => serde_json::to_string_pretty(value)
            .map(|text| text.lines().map(str::to_string).collect())
            .unwrap_or_else(|_| vec![PLACEHOLDER.to_string()]),
    }
}
