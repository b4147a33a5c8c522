use regex::bytes::Regex;

use crate::rewrite::ExpressionMatcher;

pub struct AdjustConfiguration {
    /// Largest accepted difference between nominal and measured value, in mm.
    pub max_correction: f64,
    /// Lines of the clean file matching this pattern are echoed to the log.
    pub output_pattern: Option<Regex>,
    pub matcher: ExpressionMatcher,
    pub precision: u8,
}
impl AdjustConfiguration {
    pub fn new(max_correction: f64) -> Self {
        Self {
            max_correction,
            output_pattern: None,
            matcher: ExpressionMatcher::z_adjustment(),
            precision: 3,
        }
    }
    pub fn with_output_pattern(self, output_pattern: Option<Regex>) -> Self {
        Self { output_pattern, ..self }
    }
}
