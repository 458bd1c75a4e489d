use std::fmt::{self, Write};

use crate::pipeline::Source;

use super::errors::{Diagnostic, ErrorTip};

/// The diagnostics of one compilation, in the order they were reported.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        self.diagnostics.extend(diagnostics);
    }

    /// Every diagnostic is an error; there are no warnings.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Renders every diagnostic, quoting the offending line when its file is
    /// among `sources`.
    pub fn render(&self, sources: &[Source]) -> String {
        let mut out = String::new();

        for diagnostic in &self.diagnostics {
            let source = sources.iter().find(|s| s.name == diagnostic.file());
            if render_one(&mut out, diagnostic, source.map(|s| s.text.as_str())).is_err() {
                break;
            }
        }

        out
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Diagnostics { diagnostics }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

/*
    Error: ExpectedToken (tip)
    -> main.fr:20
       |
    20 | return 1
       | expected Semicolon, found "}"
*/
pub(crate) fn render_one(
    out: &mut impl Write,
    diagnostic: &Diagnostic,
    source: Option<&str>,
) -> fmt::Result {
    let line = diagnostic.line();
    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    match diagnostic.get_tip() {
        ErrorTip::None => writeln!(out, "Error: {}", diagnostic.get_error_name())?,
        tip => writeln!(out, "Error: {} ({})", diagnostic.get_error_name(), tip)?,
    }
    writeln!(out, "-> {}:{}", diagnostic.file(), line)?;
    writeln!(out, "{:>padding$}", "|")?;

    if let Some(text) = source.and_then(|source| line_text(source, line)) {
        writeln!(out, "{} | {}", line_string, text.trim())?;
    }

    writeln!(out, "{:>padding$} {}", "|", diagnostic.kind())
}

/// The text of a 1-based line, without its line break.
pub fn line_text(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source.lines().nth(line as usize - 1)
}
