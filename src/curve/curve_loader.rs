use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::curve::error::{CurveError, Result};

/// Historical cumulative participation curve with its per-minute sigma.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeCurve {
    fractions: Vec<f64>,
    sigmas: Vec<f64>,
}

impl VolumeCurve {
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    pub fn sigmas(&self) -> &[f64] {
        &self.sigmas
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}

#[cfg(test)]
impl VolumeCurve {
    pub fn new(fractions: Vec<f64>, sigmas: Vec<f64>) -> Result<Self> {
        if fractions.len() != sigmas.len() {
            return Err(CurveError::LengthMismatch {
                fractions: fractions.len(),
                sigmas: sigmas.len(),
            });
        }

        Ok(Self { fractions, sigmas })
    }
}

pub struct CurveLoader;

impl CurveLoader {
    /// 6.5 hour session plus the closing minute.
    pub const SESSION_MINUTES: usize = 391;

    pub fn load(path: &Path) -> Result<VolumeCurve> {
        let raw = fs::read_to_string(path).map_err(|source| CurveError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let curve = Self::parse(&raw);
        if curve.is_empty() {
            return Err(CurveError::Empty);
        }

        if curve.len() != Self::SESSION_MINUTES {
            warn!(
                path = %path.display(),
                minutes = curve.len(),
                expected = Self::SESSION_MINUTES,
                "volume curve does not cover a full session"
            );
        }
        info!(path = %path.display(), minutes = curve.len(), "loaded volume curve");

        Ok(curve)
    }

    /// Parses `cumulative_fraction,sigma` rows after a header line. Rows that do not hold
    /// two finite numbers are logged and skipped.
    pub fn parse(raw: &str) -> VolumeCurve {
        let mut fractions = Vec::with_capacity(Self::SESSION_MINUTES);
        let mut sigmas = Vec::with_capacity(Self::SESSION_MINUTES);

        for (index, line) in raw.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            match parse_row(line) {
                Some((fraction, sigma)) => {
                    fractions.push(fraction);
                    sigmas.push(sigma);
                }
                None => warn!(line = index + 1, row = line, "skipping malformed curve row"),
            }
        }

        VolumeCurve { fractions, sigmas }
    }
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split(',');
    let fraction = parse_field(fields.next()?)?;
    let sigma = parse_field(fields.next()?)?;

    Some((fraction, sigma))
}

fn parse_field(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_reads_rows_in_order() {
        let curve = CurveLoader::parse("tgt,sigma\n0.0,0.0\n0.5,0.2\n1.0,0.0\n");

        assert_eq!(curve.fractions(), &[0.0, 0.5, 1.0]);
        assert_eq!(curve.sigmas(), &[0.0, 0.2, 0.0]);
        assert_eq!(curve.len(), 3);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let raw = "tgt,sigma\n0.1,0.01\nNA,0.02\n0.3\n0.4,abc\n 0.5 , 0.05 \n\ninf,0.1\n";
        let curve = CurveLoader::parse(raw);

        assert_eq!(curve.fractions(), &[0.1, 0.5]);
        assert_eq!(curve.sigmas(), &[0.01, 0.05]);
    }

    #[test]
    fn header_only_gives_empty_curve() {
        assert!(CurveLoader::parse("tgt,sigma\n").is_empty());
        assert!(CurveLoader::parse("").is_empty());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let error = CurveLoader::load(Path::new("does/not/exist/tgtsigma.csv")).unwrap_err();

        assert!(matches!(error, CurveError::Unreadable { .. }));
    }

    #[test]
    fn file_without_rows_is_empty() {
        let path = std::env::temp_dir().join(format!("tgtsigma-{}.csv", uuid::Uuid::new_v4()));
        fs::write(&path, "tgt,sigma
NA,NA
").unwrap();

        let error = CurveLoader::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(error, CurveError::Empty));
    }
}
