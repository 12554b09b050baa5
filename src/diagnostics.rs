//! Source Diagnostics
//!
//! Renders syntax errors and validation traces against the ledger source
//! with [`ariadne`]:
//!
//! ```text
//! Error: Transaction does not balance, expected `0.00 BRL`, found 10.00 BRL
//!    ╭─[books.hta:4:1]
//!    │
//!  4 │ 2020-01-02 transaction "Lunch"
//!    │ ───────────────┬──────────────
//!    │                ╰──────────────── Inside a transaction, all debits and credits must balance.
//! ───╯
//! ```
//!
//! Traces without a span have no source to point at and print the message
//! followed by the details.

use std::io::{self, Write};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use colored::Colorize;

use crate::syntax::{Span, SyntaxError};
use crate::validate::Trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub label: Option<String>,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            label: None,
            span: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Writes the diagnostic to `out`. `span` is a byte range into `source`.
    pub fn write(&self, filename: &str, source: &str, out: &mut dyn Write) -> io::Result<()> {
        let Some(span) = self.span.clone() else {
            writeln!(out, "{}: {}", "Error".red().bold(), self.message)?;
            if let Some(label) = &self.label {
                writeln!(out, "   {} {}", "=".blue().bold(), label)?;
            }
            return Ok(());
        };

        let start = char_offset(source, span.start);
        let end = char_offset(source, span.end).max(start);
        let total = source.chars().count();

        // Empty spans still get one underlined character.
        let underline = match (start == end, start < total) {
            (false, _) => start..end,
            (true, true) => start..start + 1,
            (true, false) => start.saturating_sub(1)..start,
        };

        let mut label = Label::new((filename, underline)).with_color(Color::Red);
        if let Some(text) = &self.label {
            label = label.with_message(text);
        }

        Report::build(ReportKind::Error, filename, start)
            .with_config(Config::default().with_color(should_colorize()))
            .with_message(&self.message)
            .with_label(label)
            .finish()
            .write((filename, Source::from(source)), out)
    }
}

fn should_colorize() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

/// Characters before byte offset `byte`.
fn char_offset(source: &str, byte: usize) -> usize {
    source.char_indices().take_while(|(i, _)| *i < byte).count()
}

impl From<&SyntaxError> for Diagnostic {
    fn from(error: &SyntaxError) -> Self {
        Diagnostic::new(error.to_string())
            .with_label(error.label())
            .with_span(error.span())
    }
}

impl From<&Trace> for Diagnostic {
    fn from(trace: &Trace) -> Self {
        let mut parts = vec![trace.message.clone()];
        if let Some(expected) = &trace.expected {
            parts.push(format!("expected {}", format!("`{}`", expected).green()));
        }
        if let Some(found) = &trace.found {
            parts.push(format!("found {}", found.red()));
        }

        let diagnostic = Diagnostic::new(parts.join(", ")).with_label(trace.details.clone());
        match &trace.span {
            Some(span) => diagnostic.with_span(span.clone()),
            None => diagnostic,
        }
    }
}
