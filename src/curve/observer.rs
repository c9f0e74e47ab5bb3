use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::curve::trajectory::Trajectory;
use crate::types::time_of_day::TimeOfDay;

/// Receives trajectories as they are built. Called once per build, never while scheduling.
pub trait TrajectoryObserver {
    fn on_trajectory(&self, label: &str, start: TimeOfDay, trajectory: &Trajectory);
}

/// Writes `<label>_trajectory.json` for charting outside the process.
#[derive(Debug, Clone)]
pub struct JsonTrajectoryDump {
    dir: PathBuf,
}

#[derive(Serialize)]
struct DumpRow {
    time: String,
    target: f64,
    lower_bound: f64,
    upper_bound: f64,
}

impl JsonTrajectoryDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}_trajectory.json"))
    }

    fn write(&self, label: &str, start: TimeOfDay, trajectory: &Trajectory) -> Result<PathBuf> {
        let rows: Vec<DumpRow> = trajectory
            .points()
            .enumerate()
            .map(|(minute, point)| DumpRow {
                time: start
                    .plus_minutes(minute as u32)
                    .map(|time| time.to_string())
                    .unwrap_or_else(|_| format!("+{minute}m")),
                target: point.target,
                lower_bound: point.lower_bound,
                upper_bound: point.upper_bound,
            })
            .collect();

        let path = self.path_for(label);
        let json = serde_json::to_string_pretty(&rows)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

        Ok(path)
    }
}

impl TrajectoryObserver for JsonTrajectoryDump {
    fn on_trajectory(&self, label: &str, start: TimeOfDay, trajectory: &Trajectory) {
        match self.write(label, start, trajectory) {
            Ok(path) => info!(label, path = %path.display(), "wrote trajectory"),
            Err(error) => warn!(label, ?error, "could not write trajectory"),
        }
    }
}
