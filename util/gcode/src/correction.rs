use std::collections::{hash_map::Entry, HashMap};

use tracing::debug;

use crate::{
    error::{Diagnostic, ErrorKind, Location},
    parse::{parse_decimal, split_correction_line, CorrectionLine, CorrectionLineShape},
};

/// One accepted line of a correction file.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrectionRecord {
    pub name: String,
    pub original: f64,
    pub corrected: f64,
    pub line: usize,
}

/// Measured values keyed by parameter name (`#<number>`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorrectionTable(HashMap<String, f64>);

impl CorrectionTable {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[derive(Debug, Default)]
pub struct LoadedCorrections {
    pub table: CorrectionTable,
    pub errors: Vec<Diagnostic>,
}
impl LoadedCorrections {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
    pub fn into_result(self) -> Result<CorrectionTable, Vec<Diagnostic>> {
        if self.errors.is_empty() {
            Ok(self.table)
        } else {
            Err(self.errors)
        }
    }
}

fn parse_record(line: &CorrectionLine<'_>, line_number: usize, max_correction: f64) -> Result<CorrectionRecord, ErrorKind> {
    let name = line.name();
    let parse = |text: &str| parse_decimal(text).ok_or_else(|| ErrorKind::NonNumericValue {
        name: name.clone(),
        value: text.to_string(),
    });
    let original = parse(line.reference)?;
    let corrected = parse(line.value)?;
    if (original - corrected).abs() > max_correction {
        return Err(ErrorKind::ToleranceExceeded {
            name,
            original: line.reference.to_string(),
            corrected: line.value.to_string(),
            max_correction,
        });
    }
    Ok(CorrectionRecord { name, original, corrected, line: line_number })
}

/// Reads every line of a correction file, collecting all problems instead of stopping at the first.
///
/// `file` only labels diagnostics. The returned table holds the lines that were accepted; callers
/// must not use it when any error was reported.
pub fn load_corrections<'a>(file: &str, lines: impl IntoIterator<Item = &'a str>, max_correction: f64) -> LoadedCorrections {
    let mut values = HashMap::new();
    let mut first_lines: HashMap<String, usize> = HashMap::new();
    let mut errors = Vec::new();
    for (index, text) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        let line = match split_correction_line(text) {
            CorrectionLineShape::Blank => continue,
            CorrectionLineShape::Malformed => {
                errors.push(Diagnostic::new(Location::line(file, line_number), ErrorKind::MalformedLine));
                continue;
            }
            CorrectionLineShape::Record(line) => line,
        };
        let record = match parse_record(&line, line_number, max_correction) {
            Ok(record) => record,
            Err(kind) => {
                errors.push(Diagnostic::new(Location::line(file, line_number), kind));
                continue;
            }
        };
        match first_lines.entry(record.name.clone()) {
            Entry::Occupied(entry) => errors.push(Diagnostic::new(
                Location::line(file, line_number),
                ErrorKind::DuplicateVariable { name: record.name, first_line: *entry.get() },
            )),
            Entry::Vacant(entry) => {
                debug!("{}: {} {} -> {}", line_number, record.name, record.original, record.corrected);
                entry.insert(record.line);
                values.insert(record.name, record.corrected);
            }
        }
    }
    LoadedCorrections { table: CorrectionTable(values), errors }
}
