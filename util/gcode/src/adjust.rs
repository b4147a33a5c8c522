use std::{fs, path::Path};

use tracing::info;

use crate::{
    config::AdjustConfiguration,
    correction::load_corrections,
    error::{Diagnostic, Location},
    paths::AdjustPaths,
    rewrite::LineRewriter,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjustSummary {
    pub corrections: usize,
    pub lines: usize,
    pub substitutions: usize,
}

fn read_file(path: &Path) -> Result<Vec<u8>, Diagnostic> {
    info!("Reading {}", path.display());
    fs::read(path).map_err(|error| Diagnostic::new(Location::File(path.display().to_string()), error))
}

/// Loads the corrections of one base name and writes its milling file.
///
/// Nothing is written unless every correction was accepted and every expression evaluated. Bytes
/// that are not valid UTF-8 only matter inside a correction value or an expression.
pub fn adjust_file(paths: &AdjustPaths, config: &AdjustConfiguration) -> Result<AdjustSummary, Vec<Diagnostic>> {
    let corrections_name = paths.corrections.display().to_string();
    let corrections = read_file(&paths.corrections).map_err(|error| vec![error])?;
    let corrections = String::from_utf8_lossy(&corrections);
    let table = load_corrections(&corrections_name, corrections.lines(), config.max_correction).into_result()?;

    let clean_name = paths.clean.display().to_string();
    let clean = read_file(&paths.clean).map_err(|error| vec![error])?;
    let rewriter = LineRewriter {
        precision: config.precision,
        echo: config.output_pattern.as_ref(),
        ..LineRewriter::new(&table, &config.matcher)
    };
    let rewritten = rewriter.rewrite_text(&clean_name, &clean).map_err(|error| vec![error])?;

    info!("Writing {}", paths.milling.display());
    fs::write(&paths.milling, &rewritten.text)
        .map_err(|error| vec![Diagnostic::new(Location::File(paths.milling.display().to_string()), error)])?;
    Ok(AdjustSummary {
        corrections: table.len(),
        lines: rewritten.lines,
        substitutions: rewritten.substitutions,
    })
}

/// Runs [`adjust_file`] for each input in turn; a failure in one file does not affect the others.
pub fn adjust_files<'a>(
    inputs: impl IntoIterator<Item = &'a str>,
    config: &AdjustConfiguration,
) -> Vec<(AdjustPaths, Result<AdjustSummary, Vec<Diagnostic>>)> {
    inputs
        .into_iter()
        .map(|input| {
            let paths = AdjustPaths::from_input(input);
            let result = adjust_file(&paths, config);
            (paths, result)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use crate::{error::ErrorKind, expression::ExpressionError};

    use super::*;

    fn write_inputs(dir: &TempDir, corrections: impl AsRef<[u8]>, clean: impl AsRef<[u8]>) -> AdjustPaths {
        let base = dir.path().join("plate");
        let paths = AdjustPaths::from_base(&base.display().to_string());
        fs::write(&paths.corrections, corrections).unwrap();
        fs::write(&paths.clean, clean).unwrap();
        paths
    }

    #[test]
    fn writes_milling_file() {
        let dir = TempDir::new().unwrap();
        let paths = write_inputs(
            &dir,
            "([77.038 191.859]/L:ZA/T=5.000) #51=5.432\n\n([80.000 191.859]/L:ZA/T=5.000) #52=4,990\n",
            "G0 Z10\nG1 X77.038 Y191.859 Z[#51-0.5] F300\nG1 X80 Z[#52]\nM2\n",
        );
        let summary = adjust_file(&paths, &AdjustConfiguration::new(1.0)).unwrap();
        assert_eq!(summary, AdjustSummary { corrections: 2, lines: 4, substitutions: 2 });
        assert_eq!(
            fs::read_to_string(&paths.milling).unwrap(),
            "G0 Z10\nG1 X77.038 Y191.859 Z4.932(==#51-0.5) F300\nG1 X80 Z4.990(==#52)\nM2\n"
        );
    }

    #[test]
    fn non_utf8_comments_pass_through() {
        let dir = TempDir::new().unwrap();
        let paths = write_inputs(&dir, b"(Gr\xF6\xDFe T=5.000) #51=5.1\n", b"(Gr\xF6\xDFe Platte)\nG1 Z[#51]\n");
        let summary = adjust_file(&paths, &AdjustConfiguration::new(1.0)).unwrap();
        assert_eq!(summary, AdjustSummary { corrections: 1, lines: 2, substitutions: 1 });
        assert_eq!(fs::read(&paths.milling).unwrap(), b"(Gr\xF6\xDFe Platte)\nG1 Z5.100(==#51)\n");
    }

    #[test]
    fn correction_errors_prevent_output() {
        let dir = TempDir::new().unwrap();
        let paths = write_inputs(&dir, "(T=5.000) #51=5.432\n(T=5.000) #52\n", "G1 Z[#51]\n");
        for _ in 0..2 {
            let errors = adjust_file(&paths, &AdjustConfiguration::new(0.01)).unwrap_err();
            assert_eq!(errors.len(), 2);
            assert!(matches!(errors[0].kind, ErrorKind::ToleranceExceeded { .. }));
            assert!(matches!(errors[1].kind, ErrorKind::MalformedLine));
            assert!(!paths.milling.exists());
        }
    }

    #[test]
    fn unresolved_variable_prevents_output() {
        let dir = TempDir::new().unwrap();
        let paths = write_inputs(&dir, "(T=5.000) #51=5.432\n", "G1 Z[#51]\nG1 Z[#52]\n");
        let errors = adjust_file(&paths, &AdjustConfiguration::new(1.0)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, Location::line(paths.clean.display().to_string(), 2));
        assert!(matches!(
            &errors[0].kind,
            ErrorKind::Expression(ExpressionError::UnresolvedVariable { name }) if name == "#52"
        ));
        assert!(!paths.milling.exists());
    }

    #[test]
    fn missing_correction_file() {
        let dir = TempDir::new().unwrap();
        let paths = AdjustPaths::from_base(&dir.path().join("absent").display().to_string());
        let errors = adjust_file(&paths, &AdjustConfiguration::new(1.0)).unwrap_err();
        assert!(matches!(errors[0].kind, ErrorKind::Io(_)));
        assert_eq!(errors[0].location, Location::File(paths.corrections.display().to_string()));
    }

    #[test]
    fn files_are_processed_independently() {
        let good_dir = TempDir::new().unwrap();
        let bad_dir = TempDir::new().unwrap();
        let bad = write_inputs(&bad_dir, "garbage\n", "G1 Z[#51]\n");
        let good = write_inputs(&good_dir, "(T=5.000) #51=5.1\n", "G1 Z[#51]\n");
        let config = AdjustConfiguration::new(1.0);
        let bad_input = bad.clean.display().to_string();
        let good_input = good.clean.display().to_string();
        let results = adjust_files([bad_input.as_str(), good_input.as_str()], &config);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, bad);
        assert!(results[0].1.is_err());
        assert_eq!(results[1].0, good);
        assert!(results[1].1.is_ok());
        assert_eq!(fs::read_to_string(&good.milling).unwrap(), "G1 Z5.100(==#51)\n");
        assert!(!bad.milling.exists());
    }
}
