use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use clap_stdin::FileOrStdin;
use path_gcode::{adjust_files, AdjustConfiguration, Diagnostic, ErrorKind, Location, Point2, RigidTransform};
use regex::bytes::Regex;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Substitute measured Z values from <base>_Z.txt into <base>_Clean.gcode, writing <base>_Milling.gcode.
    AdjustZ {
        /// Largest accepted difference between nominal and measured value, in mm.
        #[arg(short = 'x', long, value_parser = parse_max_correction)]
        max_correction: f64,

        /// Echo every line of the clean file that matches this regular expression.
        #[arg(short, long)]
        output_pattern: Option<Regex>,

        /// Drawings or G-code files; the base name is derived from each.
        #[arg()]
        files: Vec<String>,
    },
    /// Map points through the rigid transform defined by two anchor pairs.
    MapPoints {
        /// A JSON description of the transformation: {"from": [p, p], "to": [p, p]} or a list of
        /// those, applied first to last.
        #[arg()]
        transformation: String,

        /// A JSON list of points, e.g. [{"x": 1.0, "y": 2.0}].
        #[arg()]
        points: FileOrStdin,
    },
}

fn parse_max_correction(value: &str) -> Result<f64, String> {
    match value.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(format!("expected a non-negative number, got {:?}", value)),
    }
}

#[derive(Deserialize, Debug)]
struct AnchorDescription {
    from: [Point2; 2],
    to: [Point2; 2],
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}
impl<T> OneOrMany<T> {
    pub fn to_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(value) => value,
        }
    }
}

fn description_to_transformation(description: &AnchorDescription) -> anyhow::Result<RigidTransform> {
    let [from_start, from_end] = description.from;
    let [to_start, to_end] = description.to;
    Ok(RigidTransform::new(from_start, from_end, to_start, to_end)?)
}

fn chain_transformations(descriptions: &[AnchorDescription]) -> anyhow::Result<RigidTransform> {
    let mut result: Option<RigidTransform> = None;
    for (index, description) in descriptions.iter().enumerate() {
        let transform = description_to_transformation(description)
            .with_context(|| format!("Provided transformation index {} is invalid.", index))?;
        result = Some(match result {
            None => transform,
            Some(previous) => transform
                .transform_transform(&previous)
                .with_context(|| format!("Cannot chain transformation index {}.", index))?,
        });
    }
    result.ok_or_else(|| anyhow!("No transformation given"))
}

fn map_points(transformation: &str, points: &str) -> anyhow::Result<()> {
    let descriptions = serde_json::from_str::<OneOrMany<AnchorDescription>>(transformation)
        .context("Failed while parsing transformation JSON")?
        .to_vec();
    let transform = chain_transformations(&descriptions)?;
    info!("Transformation {} rotates by {:.3} degrees", transform, transform.rotation_deg());
    let points: Vec<Point2> = serde_json::from_str(points).context("Failed while parsing points JSON")?;
    let mapped: Vec<Point2> = points.into_iter().map(|point| transform.transform_point(point)).collect();
    println!("{}", serde_json::to_string(&mapped)?);
    Ok(())
}

fn check_files(files: &[String]) -> Result<(), Diagnostic> {
    if files.is_empty() {
        return Err(Diagnostic::new(Location::Component("Options"), ErrorKind::NoInputFiles));
    }
    Ok(())
}

fn adjust_z(max_correction: f64, output_pattern: Option<Regex>, files: &[String]) -> ExitCode {
    if let Err(diagnostic) = check_files(files) {
        error!("{}", diagnostic);
        return ExitCode::from(3);
    }
    let config = AdjustConfiguration::new(max_correction).with_output_pattern(output_pattern);
    let mut failed = false;
    for (paths, result) in adjust_files(files.iter().map(String::as_str), &config) {
        match result {
            Ok(summary) => info!(
                "{}: {} corrections, {} of {} lines adjusted",
                paths.milling.display(),
                summary.corrections,
                summary.substitutions,
                summary.lines
            ),
            Err(errors) => {
                failed = true;
                for diagnostic in errors {
                    error!("{}", diagnostic);
                }
            }
        }
    }
    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = Args::parse();
    info!("path-gcode {}", env!("CARGO_PKG_VERSION"));
    match args.command {
        Command::AdjustZ { max_correction, output_pattern, files } => adjust_z(max_correction, output_pattern, &files),
        Command::MapPoints { transformation, points } => match map_points(&transformation, &points) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                error!("{:#}", error);
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn max_correction_accepts_decimal_comma() {
        assert_eq!(parse_max_correction("0,5"), Ok(0.5));
        assert!(parse_max_correction("-1").is_err());
        assert!(parse_max_correction("lots").is_err());
    }

    #[test]
    fn chains_transformations_in_order() {
        let descriptions: Vec<AnchorDescription> = serde_json::from_str::<OneOrMany<AnchorDescription>>(r#"[
            {"from": [{"x": 0, "y": 0}, {"x": 1, "y": 0}], "to": [{"x": 0, "y": 0}, {"x": 0, "y": 1}]},
            {"from": [{"x": 0, "y": 0}, {"x": 1, "y": 0}], "to": [{"x": 10, "y": 0}, {"x": 11, "y": 0}]}
        ]"#)
        .unwrap()
        .to_vec();
        let transform = chain_transformations(&descriptions).unwrap();
        let mapped = transform.transform_point(Point2::new(1.0, 0.0));
        assert!(mapped.abs_near(Point2::new(10.0, 1.0), 1e-9), "{}", mapped);
    }

    #[test]
    fn reports_invalid_transformation_index() {
        let descriptions = serde_json::from_str::<OneOrMany<AnchorDescription>>(
            r#"{"from": [{"x": 0, "y": 0}, {"x": 1, "y": 0}], "to": [{"x": 0, "y": 0}, {"x": 0, "y": 2}]}"#
        )
        .unwrap()
        .to_vec();
        let error = chain_transformations(&descriptions).unwrap_err();
        assert_eq!(error.to_string(), "Provided transformation index 0 is invalid.");
        assert!(error.root_cause().to_string().starts_with("distance"));
    }

    #[test]
    fn missing_files_are_an_options_error() {
        let diagnostic = check_files(&[]).unwrap_err();
        assert_eq!(diagnostic.location, Location::Component("Options"));
        assert_eq!(diagnostic.to_string(), "Options: no G-code files given");
        assert!(check_files(&["plate.dxf".to_string()]).is_ok());
    }
}
