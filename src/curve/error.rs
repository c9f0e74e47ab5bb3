use std::path::PathBuf;

use thiserror::Error;

use crate::types::time_of_day::TimeOfDay;

#[derive(Error, Debug)]
pub enum CurveError {
    #[error("failed to read volume curve {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("volume curve is empty")]
    Empty,

    #[error("curve series differ in length: {fractions} fractions, {sigmas} sigmas")]
    LengthMismatch { fractions: usize, sigmas: usize },

    #[error("window start {start} is before session open {open}")]
    WindowBeforeOpen { start: TimeOfDay, open: TimeOfDay },

    #[error("window minutes {first}..={last} exceed curve of {len} minutes")]
    WindowOutOfRange { first: usize, last: usize, len: usize },

    #[error("degenerate trajectory: window curve is flat at {value}")]
    DegenerateTrajectory { value: f64 },
}

pub type Result<T> = std::result::Result<T, CurveError>;
