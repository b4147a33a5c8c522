/// The structural shape of one line of a correction file, e.g.
/// `([77.038 191.859]/L:ZA/T=5.000) #51=5.432`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorrectionLineShape<'a> {
    Blank,
    Malformed,
    Record(CorrectionLine<'a>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrectionLine<'a> {
    /// Text of the nominal value following `T=`.
    pub reference: &'a str,
    /// Digits of the variable name, without the leading `#`.
    pub number: &'a str,
    /// Text of the measured value.
    pub value: &'a str,
}
impl<'a> CorrectionLine<'a> {
    pub fn name(&self) -> String {
        format!("#{}", self.number)
    }
}

// Fields of the example above:
//   "([77.038 191.859]/L:ZA/T" "5.000)" "51" "5.432"
pub fn split_correction_line(line: &str) -> CorrectionLineShape<'_> {
    let fields: Vec<&str> = line
        .split(['#', '='])
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect();
    match fields.as_slice() {
        [] => CorrectionLineShape::Blank,
        [_, reference, number, value, ..] if is_variable_number(number) => CorrectionLineShape::Record(CorrectionLine {
            reference: reference.trim_end_matches([')', ' ']),
            number: *number,
            value: *value,
        }),
        _ => CorrectionLineShape::Malformed,
    }
}

fn is_variable_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a decimal number written with either `.` or `,` as separator.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_measured_line() {
        assert_eq!(
            split_correction_line("([77.038 191.859]/L:ZA/T=5.000) #51=5.432"),
            CorrectionLineShape::Record(CorrectionLine {
                reference: "5.000",
                number: "51",
                value: "5.432",
            })
        );
    }

    #[test]
    fn blank_lines() {
        assert_eq!(split_correction_line(""), CorrectionLineShape::Blank);
        assert_eq!(split_correction_line("   \t"), CorrectionLineShape::Blank);
        assert_eq!(split_correction_line(" # = "), CorrectionLineShape::Blank);
    }

    #[test]
    fn too_few_fields() {
        assert_eq!(split_correction_line("(T=5.000) #51"), CorrectionLineShape::Malformed);
        assert_eq!(split_correction_line("#51=5.432"), CorrectionLineShape::Malformed);
    }

    #[test]
    fn variable_must_be_numbered() {
        assert_eq!(split_correction_line("(T=5.000) #abc=5.432"), CorrectionLineShape::Malformed);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let shape = split_correction_line("(T=1,5) #7=1,6 =junk");
        assert_eq!(
            shape,
            CorrectionLineShape::Record(CorrectionLine { reference: "1,5", number: "7", value: "1,6" })
        );
    }

    #[test]
    fn decimal_separators_are_equivalent() {
        assert_eq!(parse_decimal("5,432"), parse_decimal("5.432"));
        assert_eq!(parse_decimal("-0,5"), Some(-0.5));
        assert_eq!(parse_decimal(" 12 "), Some(12.0));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("5.0)"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("1,2.3"), None);
    }
}
