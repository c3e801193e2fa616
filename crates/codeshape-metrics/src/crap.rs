//! Change Risk Anti-Patterns (CRAP) index.

use tracing::warn;

/// Coverage percentage in `[0, 100]`.
///
/// Out-of-range input is clamped; NaN counts as uncovered.
pub fn clamp_coverage(coverage: f64) -> f64 {
    if coverage.is_nan() {
        warn!("coverage is NaN, treating as 0%");
        return 0.0;
    }
    coverage.clamp(0.0, 100.0)
}

/// `CRAP = ccn² × (1 − coverage/100)³ + ccn`
///
/// Fully covered code scores its CCN; uncovered code scores `ccn² + ccn`.
pub fn crap_index(ccn: u32, coverage: f64) -> f64 {
    let ccn = f64::from(ccn);
    let uncovered = 1.0 - clamp_coverage(coverage) / 100.0;
    ccn.powi(2) * uncovered.powi(3) + ccn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_coverage_values() {
        assert_eq!(crap_index(1, 100.0), 1.0);
        assert_eq!(crap_index(1, 0.0), 2.0);
        assert_eq!(crap_index(5, 0.0), 30.0);
        assert_eq!(crap_index(5, 100.0), 5.0);
    }

    #[test]
    fn half_covered() {
        // 4² × 0.5³ + 4
        assert!((crap_index(4, 50.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn coverage_is_clamped() {
        assert_eq!(crap_index(3, 140.0), crap_index(3, 100.0));
        assert_eq!(crap_index(3, -5.0), crap_index(3, 0.0));
        assert_eq!(crap_index(3, f64::NAN), crap_index(3, 0.0));
    }
}
