use std::borrow::Cow;

use regex::bytes::Regex;
use tracing::info;

use crate::{
    correction::CorrectionTable,
    error::{Diagnostic, Location},
    expression::{evaluate, ExpressionError},
    output::Fixed,
};

/// A square-bracketed expression that references at least one parameter, e.g. `Z[#51-0.5]`.
pub const Z_ADJUSTMENT_EXPRESSION: &str = r"\[([^\[\]]*#[0-9]+[^\[\]]*)\]";

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error(transparent)]
    Pattern(#[from] regex::Error),
    #[error("pattern '{pattern}' has no capture group for the expression")]
    MissingExpressionGroup { pattern: String },
}

/// Finds the expression region of a line. Capture group 1 is the expression text; the
/// whole match is what gets replaced.
#[derive(Clone, Debug)]
pub struct ExpressionMatcher(Regex);

impl ExpressionMatcher {
    pub fn new(pattern: &str) -> Result<Self, MatcherError> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            return Err(MatcherError::MissingExpressionGroup { pattern: pattern.to_string() });
        }
        Ok(Self(regex))
    }
    pub fn z_adjustment() -> Self {
        Self(Regex::new(Z_ADJUSTMENT_EXPRESSION).expect("Z adjustment pattern is valid"))
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl Default for ExpressionMatcher {
    fn default() -> Self {
        Self::z_adjustment()
    }
}

/// Rewrites G-code line by line. Lines are bytes: only the expression text has to be UTF-8,
/// everything around it is copied as it was.
pub struct LineRewriter<'a> {
    pub table: &'a CorrectionTable,
    pub matcher: &'a ExpressionMatcher,
    pub precision: u8,
    /// Input lines matching this pattern are echoed to the log once they were rewritten.
    pub echo: Option<&'a Regex>,
}

impl<'a> LineRewriter<'a> {
    pub fn new(table: &'a CorrectionTable, matcher: &'a ExpressionMatcher) -> Self {
        Self { table, matcher, precision: 3, echo: None }
    }

    /// Replaces the first expression region of `line` by `<value>(==<expression>)`.
    pub fn rewrite_line<'b>(&self, line: &'b [u8]) -> Result<Cow<'b, [u8]>, ExpressionError> {
        let rewritten = self.substitute(line)?;
        if let Some(pattern) = self.echo {
            if pattern.is_match(line) {
                info!("{}", String::from_utf8_lossy(line));
            }
        }
        Ok(rewritten)
    }

    fn substitute<'b>(&self, line: &'b [u8]) -> Result<Cow<'b, [u8]>, ExpressionError> {
        let Some(captures) = self.matcher.0.captures(line) else {
            return Ok(Cow::Borrowed(line));
        };
        let (Some(region), Some(expression)) = (captures.get(0), captures.get(1)) else {
            return Ok(Cow::Borrowed(line));
        };
        let expression = std::str::from_utf8(expression.as_bytes()).map_err(|_| ExpressionError::Syntax {
            expression: String::from_utf8_lossy(expression.as_bytes()).into_owned(),
        })?;
        let value = evaluate(expression, |name| self.table.get(name))?;
        let replacement = format!("{}(=={})", Fixed(self.precision, &value), expression);
        let mut output = Vec::with_capacity(line.len() + replacement.len());
        output.extend_from_slice(&line[..region.start()]);
        output.extend_from_slice(replacement.as_bytes());
        output.extend_from_slice(&line[region.end()..]);
        Ok(Cow::Owned(output))
    }

    /// Rewrites every line, stopping at the first line whose expression cannot be evaluated.
    pub fn rewrite<'b>(&self, file: &str, lines: impl IntoIterator<Item = &'b str>) -> Result<Vec<String>, Diagnostic> {
        lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                self.rewrite_line(line.as_bytes())
                    .map(|rewritten| String::from_utf8_lossy(&rewritten).into_owned())
                    .map_err(|error| Diagnostic::new(Location::line(file, index + 1), error))
            })
            .collect()
    }

    /// Like [`LineRewriter::rewrite`] over the raw contents of a file, keeping every line
    /// terminator as it was.
    pub fn rewrite_text(&self, file: &str, text: &[u8]) -> Result<RewrittenText, Diagnostic> {
        let mut output = Vec::with_capacity(text.len());
        let mut substitutions = 0;
        let mut lines = 0;
        for (index, raw) in text.split_inclusive(|&byte| byte == b'\n').enumerate() {
            let (line, terminator) = split_terminator(raw);
            let rewritten = self
                .rewrite_line(line)
                .map_err(|error| Diagnostic::new(Location::line(file, index + 1), error))?;
            if let Cow::Owned(_) = rewritten {
                substitutions += 1;
            }
            output.extend_from_slice(&rewritten);
            output.extend_from_slice(terminator);
            lines += 1;
        }
        Ok(RewrittenText { text: output, lines, substitutions })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewrittenText {
    pub text: Vec<u8>,
    pub lines: usize,
    pub substitutions: usize,
}

fn split_terminator(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(line) = raw.strip_suffix(b"\r\n") {
        (line, &b"\r\n"[..])
    } else if let Some(line) = raw.strip_suffix(b"\n") {
        (line, &b"\n"[..])
    } else {
        (raw, &b""[..])
    }
}
