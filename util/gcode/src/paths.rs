use std::path::PathBuf;

const KNOWN_SUFFIXES: [&str; 4] = [".dxf", "_Clean.gcode", "_Z.txt", ".gcode"];

/// The files taking part in one adjustment run, all derived from a common base name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjustPaths {
    pub base: String,
    pub corrections: PathBuf,
    pub clean: PathBuf,
    pub milling: PathBuf,
}

impl AdjustPaths {
    /// Accepts the drawing, any of the derived files, or the bare base name.
    pub fn from_input(input: &str) -> Self {
        let base = KNOWN_SUFFIXES
            .iter()
            .find_map(|suffix| strip_suffix_ignore_case(input, suffix))
            .unwrap_or(input);
        Self::from_base(base)
    }
    pub fn from_base(base: &str) -> Self {
        Self {
            base: base.to_string(),
            corrections: PathBuf::from(format!("{}_Z.txt", base)),
            clean: PathBuf::from(format!("{}_Clean.gcode", base)),
            milling: PathBuf::from(format!("{}_Milling.gcode", base)),
        }
    }
}

fn strip_suffix_ignore_case<'a>(input: &'a str, suffix: &str) -> Option<&'a str> {
    let split = input.len().checked_sub(suffix.len())?;
    if input.is_char_boundary(split) && input[split..].eq_ignore_ascii_case(suffix) {
        Some(&input[..split])
    } else {
        None
    }
}
