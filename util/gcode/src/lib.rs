//! Rigid 2D transforms between drawing and machine coordinates, and substitution of measured Z
//! corrections into milling G-code.

pub mod adjust;
pub mod config;
pub mod coordinates;
pub mod correction;
pub mod error;
pub mod expression;
pub mod output;
pub mod parse;
pub mod paths;
pub mod rewrite;
pub mod transform;

pub use adjust::{adjust_file, adjust_files, AdjustSummary};
pub use config::AdjustConfiguration;
pub use coordinates::Point2;
pub use correction::{load_corrections, CorrectionTable};
pub use error::{Diagnostic, ErrorKind, Location};
pub use paths::AdjustPaths;
pub use transform::{RigidTransform, TransformError};
