use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte-offset range [start, end) into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmErrorKind {
    Lex,
    Parse,
}

/// A fatal assembly-time error. The whole assembly aborts on the first one;
/// `Display` renders the line excerpt + caret form via [`render`].
#[derive(Debug, Clone)]
pub struct AsmError {
    pub kind: AsmErrorKind,
    pub span: Span,
    pub message: String,
    pub source: String,
}

impl AsmError {
    pub fn lex(source: &str, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: AsmErrorKind::Lex,
            span,
            message: message.into(),
            source: source.to_string(),
        }
    }

    pub fn parse(source: &str, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: AsmErrorKind::Parse,
            span,
            message: message.into(),
            source: source.to_string(),
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.source, self.span, &self.message))
    }
}

impl std::error::Error for AsmError {}

/// Render a source excerpt for the given span: every overlapping line
/// verbatim, a caret underline per line (at least one `^`), and a trailing
/// 1-based `At line N` / `At lines N-M` locator.
pub fn render(source: &str, span: Span, message: &str) -> String {
    let lines: Vec<&str> = source.split('\n').collect();

    let mut first = None;
    let mut last = None;
    let mut first_start = 0;
    let mut line_start = 0;
    for (i, line) in lines.iter().enumerate() {
        // A line covers offsets [line_start, line_start + len], the upper
        // bound standing in for its newline.
        if span.start < line_start + line.len() + 1 && first.is_none() {
            first = Some(i);
            first_start = line_start;
        }
        if span.end <= line_start + line.len() + 1 {
            last = Some(i);
            break;
        }
        line_start += line.len() + 1;
    }
    let first = first.unwrap_or(0);
    let last = last.unwrap_or(lines.len() - 1);

    let mut msg = format!("Failed to parse code: {message}.");
    let mut line_start = first_start;
    for line in &lines[first..=last] {
        let line_end = line_start + line.len();
        let true_start = span.start.max(line_start);
        let pad = true_start - line_start;
        let carets = span.end.min(line_end).saturating_sub(true_start).max(1);
        msg.push('\n');
        msg.push_str(line);
        msg.push('\n');
        msg.push_str(&" ".repeat(pad));
        msg.push_str(&"^".repeat(carets));
        line_start = line_end + 1;
    }
    if first == last {
        msg.push_str(&format!("\nAt line {}", first + 1));
    } else {
        msg.push_str(&format!("\nAt lines {}-{}", first + 1, last + 1));
    }
    msg
}
