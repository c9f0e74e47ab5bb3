use serde::Serialize;

/// Planned completion per minute with its uncertainty band. Index 0 is the trajectory's
/// own first minute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    target: Vec<f64>,
    lower_bound: Vec<f64>,
    upper_bound: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub target: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Trajectory {
    pub(crate) fn from_points(points: Vec<TrajectoryPoint>) -> Self {
        let mut trajectory = Self {
            target: Vec::with_capacity(points.len()),
            lower_bound: Vec::with_capacity(points.len()),
            upper_bound: Vec::with_capacity(points.len()),
        };

        for point in points {
            trajectory.target.push(point.target);
            trajectory.lower_bound.push(point.lower_bound);
            trajectory.upper_bound.push(point.upper_bound);
        }

        trajectory
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn get(&self, index: usize) -> Option<TrajectoryPoint> {
        Some(TrajectoryPoint {
            target: *self.target.get(index)?,
            lower_bound: *self.lower_bound.get(index)?,
            upper_bound: *self.upper_bound.get(index)?,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = TrajectoryPoint> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}

#[cfg(test)]
impl Trajectory {
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    pub fn lower_bound(&self) -> &[f64] {
        &self.lower_bound
    }

    pub fn upper_bound(&self) -> &[f64] {
        &self.upper_bound
    }
}
