use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::position::Position;

/// The stage a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("lex error")]
    Lex,
    #[error("parse error")]
    Parse,
}

/// A single collected diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub position: Position,
    pub message: String,
}

/// The error sink injected into the lexer and parser.
///
/// Both stages query `has_errors` to stop early and push everything they
/// find through `report`; nothing in the pipeline aborts on its own.
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn report(&mut self, kind: ErrorKind, position: Position, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            kind,
            position,
            message: message.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Display every collected diagnostic with ariadne formatting.
    pub fn emit(&self, filename: &str, source: &str) {
        for diagnostic in &self.diagnostics {
            Report::build(ReportKind::Error, filename, diagnostic.position.start)
                .with_message(diagnostic.kind.to_string())
                .with_label(
                    Label::new((filename, diagnostic.position.range()))
                        .with_message(&diagnostic.message)
                        .with_color(Color::Red),
                )
                .finish()
                .eprint((filename, Source::from(source)))
                .unwrap();
        }
    }
}
