use tracing::{debug, info};

use crate::curve::curve_loader::VolumeCurve;
use crate::curve::error::{CurveError, Result};
use crate::curve::trajectory::{Trajectory, TrajectoryPoint};
use crate::types::schedule_window::ScheduleWindow;
use crate::types::time_of_day::TimeOfDay;

/// Turns a cumulative volume curve into target/lower/upper execution trajectories.
/// The band half-width at each minute is `aggression * sigma`.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryBuilder {
    aggression: f64,
}

impl TrajectoryBuilder {
    pub fn new(aggression: f64) -> Self {
        Self { aggression }
    }

    /// Band every minute of `fractions`. The first minute is pinned to 0 and the last to 1
    /// on both bounds, whatever the band says.
    pub fn build_full_curve(&self, fractions: &[f64], sigmas: &[f64]) -> Result<Trajectory> {
        if fractions.len() != sigmas.len() {
            return Err(CurveError::LengthMismatch {
                fractions: fractions.len(),
                sigmas: sigmas.len(),
            });
        }
        if fractions.is_empty() {
            return Err(CurveError::Empty);
        }

        let last = fractions.len() - 1;
        let points = fractions
            .iter()
            .zip(sigmas)
            .enumerate()
            .map(|(index, (&target, &sigma))| {
                let half_width = self.aggression * sigma;
                let mut point = TrajectoryPoint {
                    target,
                    lower_bound: (target - half_width).max(0.0),
                    upper_bound: (target + half_width).min(1.0),
                };

                if index == 0 {
                    point.lower_bound = 0.0;
                    point.upper_bound = 0.0;
                }
                if index == last {
                    point.lower_bound = 1.0;
                    point.upper_bound = 1.0;
                }

                point
            })
            .collect();

        Ok(Trajectory::from_points(points))
    }

    /// Cut the window's minutes out of the session curve, rescale them to run from 0 to 1
    /// and band the result.
    pub fn build_window_trajectory(
        &self,
        curve: &VolumeCurve,
        window: &ScheduleWindow,
        session_open: TimeOfDay,
    ) -> Result<Trajectory> {
        let first = window
            .start()
            .minutes_since(session_open)
            .ok_or(CurveError::WindowBeforeOpen {
                start: window.start(),
                open: session_open,
            })? as usize;
        let last = first + window.trajectory_len() - 1;

        if last >= curve.len() {
            return Err(CurveError::WindowOutOfRange {
                first,
                last,
                len: curve.len(),
            });
        }

        info!(
            %window,
            minutes = window.trajectory_len(),
            first,
            last,
            "building window trajectory"
        );

        let fractions = normalize_min_max(&curve.fractions()[first..=last])?;
        let sigmas = &curve.sigmas()[first..=last];

        self.build_full_curve(&fractions, sigmas)
    }
}

/// Linear rescale so the smallest value maps to 0 and the largest to 1.
pub fn normalize_min_max(values: &[f64]) -> Result<Vec<f64>> {
    let Some(&first) = values.first() else {
        return Err(CurveError::Empty);
    };

    let (min, max) = values
        .iter()
        .fold((first, first), |(min, max), &value| (min.min(value), max.max(value)));

    let range = max - min;
    if !(range > 0.0) || !range.is_finite() {
        return Err(CurveError::DegenerateTrajectory { value: min });
    }

    debug!(min, max, "normalizing curve slice");

    Ok(values.iter().map(|value| (value - min) / range).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::curve_loader::CurveLoader;

    const EPS: f64 = 1e-12;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EPS, "{actual:?} vs {expected:?}");
        }
    }

    fn session_curve(minutes: usize) -> VolumeCurve {
        // convex ramp with a hump in sigma mid-session
        let last = (minutes - 1) as f64;
        let fractions = (0..minutes).map(|i| (i as f64 / last).powf(1.3)).collect();
        let sigmas = (0..minutes)
            .map(|i| 0.05 * (std::f64::consts::PI * i as f64 / last).sin())
            .collect();
        VolumeCurve::new(fractions, sigmas).unwrap()
    }

    fn window(start: &str, end: &str) -> ScheduleWindow {
        ScheduleWindow::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    #[test]
    fn three_minute_scenario() {
        let trajectory = TrajectoryBuilder::new(0.1)
            .build_full_curve(&[0.0, 0.5, 1.0], &[0.0, 0.2, 0.0])
            .unwrap();

        assert_close(trajectory.target(), &[0.0, 0.5, 1.0]);
        assert_close(trajectory.lower_bound(), &[0.0, 0.48, 1.0]);
        assert_close(trajectory.upper_bound(), &[0.0, 0.52, 1.0]);
    }

    #[test]
    fn boundary_clamp_overrides_band() {
        let trajectory = TrajectoryBuilder::new(5.0)
            .build_full_curve(&[0.0, 0.3, 0.9, 1.0], &[0.5, 0.5, 0.5, 0.5])
            .unwrap();

        assert_eq!(trajectory.get(0).unwrap().lower_bound, 0.0);
        assert_eq!(trajectory.get(0).unwrap().upper_bound, 0.0);
        assert_eq!(trajectory.get(3).unwrap().lower_bound, 1.0);
        assert_eq!(trajectory.get(3).unwrap().upper_bound, 1.0);

        let interior = trajectory.get(1).unwrap();
        assert_eq!(interior.lower_bound, 0.0);
        assert_eq!(interior.upper_bound, 1.0);
    }

    #[test]
    fn bounds_bracket_target_on_session_curve() {
        let curve = session_curve(CurveLoader::SESSION_MINUTES);

        for aggression in [0.0, 0.1, 1.0, 4.0] {
            let trajectory = TrajectoryBuilder::new(aggression)
                .build_full_curve(curve.fractions(), curve.sigmas())
                .unwrap();

            for point in trajectory.points() {
                assert!(point.lower_bound <= point.target + EPS);
                assert!(point.target <= point.upper_bound + EPS);
                assert!((0.0..=1.0).contains(&point.lower_bound));
                assert!((0.0..=1.0).contains(&point.upper_bound));
            }
        }
    }

    #[test]
    fn more_aggression_never_narrows_band() {
        let curve = session_curve(CurveLoader::SESSION_MINUTES);
        let narrow = TrajectoryBuilder::new(0.5)
            .build_full_curve(curve.fractions(), curve.sigmas())
            .unwrap();
        let wide = TrajectoryBuilder::new(2.0)
            .build_full_curve(curve.fractions(), curve.sigmas())
            .unwrap();

        for index in 1..curve.len() - 1 {
            let narrow = narrow.get(index).unwrap();
            let wide = wide.get(index).unwrap();
            assert!(
                wide.upper_bound - wide.lower_bound >= narrow.upper_bound - narrow.lower_bound
            );
        }
    }

    #[test]
    fn rejects_empty_and_mismatched_input() {
        let builder = TrajectoryBuilder::new(0.1);

        assert!(matches!(builder.build_full_curve(&[], &[]), Err(CurveError::Empty)));
        assert!(matches!(
            builder.build_full_curve(&[0.0, 1.0], &[0.0]),
            Err(CurveError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn window_over_full_scenario_curve_is_unchanged() {
        let curve = VolumeCurve::new(vec![0.0, 0.5, 1.0], vec![0.0, 0.2, 0.0]).unwrap();
        let trajectory = TrajectoryBuilder::new(0.1)
            .build_window_trajectory(&curve, &window("09:30", "09:32"), TimeOfDay::US_EQUITIES_OPEN)
            .unwrap();

        assert_close(trajectory.target(), &[0.0, 0.5, 1.0]);
        assert_close(trajectory.lower_bound(), &[0.0, 0.48, 1.0]);
        assert_close(trajectory.upper_bound(), &[0.0, 0.52, 1.0]);
    }

    #[test]
    fn window_slice_is_rescaled_to_unit_interval() {
        let curve = VolumeCurve::new(
            vec![0.0, 0.1, 0.2, 0.3, 0.5, 0.8, 1.0],
            vec![0.0, 0.01, 0.02, 0.03, 0.04, 0.05, 0.0],
        )
        .unwrap();

        let trajectory = TrajectoryBuilder::new(1.0)
            .build_window_trajectory(&curve, &window("09:32", "09:34"), TimeOfDay::US_EQUITIES_OPEN)
            .unwrap();

        assert_eq!(trajectory.len(), 3);
        assert_close(trajectory.target(), &[0.0, 1.0 / 3.0, 1.0]);

        let middle = trajectory.get(1).unwrap();
        assert!((middle.lower_bound - (1.0 / 3.0 - 0.03)).abs() < EPS);
        assert!((middle.upper_bound - (1.0 / 3.0 + 0.03)).abs() < EPS);
    }

    #[test]
    fn rescale_preserves_order() {
        let values = [0.42, 0.40, 0.47, 0.47, 0.55, 0.41];
        let scaled = normalize_min_max(&values).unwrap();

        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] <= values[j] {
                    assert!(scaled[i] <= scaled[j]);
                }
            }
        }
        assert_eq!(scaled[1], 0.0);
        assert_eq!(scaled[4], 1.0);
    }

    #[test]
    fn flat_window_is_degenerate() {
        let curve = VolumeCurve::new(vec![0.0, 0.4, 0.4, 0.4, 1.0], vec![0.0; 5]).unwrap();
        let error = TrajectoryBuilder::new(0.1)
            .build_window_trajectory(&curve, &window("09:31", "09:33"), TimeOfDay::US_EQUITIES_OPEN)
            .unwrap_err();

        assert!(matches!(error, CurveError::DegenerateTrajectory { value } if value == 0.4));
    }

    #[test]
    fn window_must_fit_inside_curve() {
        let curve = session_curve(10);
        let builder = TrajectoryBuilder::new(0.1);

        assert!(matches!(
            builder.build_window_trajectory(&curve, &window("09:35", "09:40"), TimeOfDay::US_EQUITIES_OPEN),
            Err(CurveError::WindowOutOfRange { first: 5, last: 10, len: 10 })
        ));
        assert!(matches!(
            builder.build_window_trajectory(&curve, &window("09:00", "09:35"), TimeOfDay::US_EQUITIES_OPEN),
            Err(CurveError::WindowBeforeOpen { .. })
        ));
    }
}
