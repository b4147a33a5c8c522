use std::fmt::{self, Display, Formatter};

use crate::expression::ExpressionError;

/// Where a diagnostic was raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Line { file: String, line: usize },
    File(String),
    Component(&'static str),
}
impl Location {
    pub fn line(file: impl Into<String>, line: usize) -> Self {
        Location::Line { file: file.into(), line }
    }
}
impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line { file, line } => write!(f, "{}:{}", file, line),
            Location::File(file) => write!(f, "{}", file),
            Location::Component(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("invalid line format, expected '(...T=<value>) #<number>=<value>'")]
    MalformedLine,
    #[error("{name}: '{value}' is not a number")]
    NonNumericValue { name: String, value: String },
    #[error("{name}: new value {corrected} differs from original value {original} by more than {max_correction}")]
    ToleranceExceeded {
        name: String,
        original: String,
        corrected: String,
        max_correction: f64,
    },
    #[error("{name} is already defined on line {first_line}")]
    DuplicateVariable { name: String, first_line: usize },
    #[error("no G-code files given")]
    NoInputFiles,
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[error("{location}: {kind}")]
pub struct Diagnostic {
    pub location: Location,
    pub kind: ErrorKind,
}
impl Diagnostic {
    pub fn new(location: Location, kind: impl Into<ErrorKind>) -> Self {
        Self { location, kind: kind.into() }
    }
}
