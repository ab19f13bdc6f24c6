//! Curve sampling for plotting.

use crate::error::QuadResult;
use crate::expr::Equation;

pub const DEFAULT_SAMPLES: usize = 400;
pub const DEFAULT_HALF_WIDTH: f64 = 10.0;

/// Evaluate `eq` at `n` evenly spaced points over
/// `[center - half_width, center + half_width]`.
///
/// A numeric fault at any sample point propagates as an `Evaluation`
/// error naming the offending x; partial results are never returned.
pub fn sample_curve(
    eq: &Equation,
    center: f64,
    half_width: f64,
    n: usize,
) -> QuadResult<Vec<(f64, f64)>> {
    let n = n.max(2);
    let start = center - half_width;
    let step = (2.0 * half_width) / (n - 1) as f64;

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let x = start + step * i as f64;
        let y = eq.eval(x)?;
        points.push((x, y));
    }
    Ok(points)
}

/// Half-width of the plotting window centered on the vertex.
///
/// The fixed 10-unit window of the original data clips wide parabolas
/// whose x-intercepts fall outside it, so the window grows to the
/// farthest stated intercept plus a 25% margin when that is larger.
pub fn plot_half_width(vertex_x: f64, x_intercepts: &[f64]) -> f64 {
    let farthest = x_intercepts
        .iter()
        .map(|xi| (xi - vertex_x).abs())
        .fold(0.0_f64, f64::max);
    DEFAULT_HALF_WIDTH.max(farthest * 1.25)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints_and_count() {
        let eq = Equation::parse("y = x^2").unwrap();
        let points = sample_curve(&eq, 2.0, 10.0, 400).unwrap();
        assert_eq!(points.len(), 400);
        assert!((points[0].0 - -8.0).abs() < 1e-9);
        assert!((points[399].0 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_values_match_equation() {
        let eq = Equation::parse("y = -2(x - 3)^2 + 4").unwrap();
        let points = sample_curve(&eq, 3.0, 10.0, 5).unwrap();
        // Midpoint is the vertex.
        assert!((points[2].0 - 3.0).abs() < 1e-9);
        assert!((points[2].1 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_x_is_monotonic() {
        let eq = Equation::parse("x + 1").unwrap();
        let points = sample_curve(&eq, 0.0, 5.0, 50).unwrap();
        for pair in points.windows(2) {
            assert!(pair[1].0 > pair[0].0);
        }
    }

    #[test]
    fn test_sample_propagates_evaluation_error() {
        let eq = Equation::parse("1 / x").unwrap();
        // The window straddles x = 0 with an odd sample count, so one
        // sample lands exactly on the pole.
        let err = sample_curve(&eq, 0.0, 1.0, 3).unwrap_err();
        assert!(matches!(err, crate::QuadError::Evaluation { .. }));
    }

    #[test]
    fn test_default_half_width_when_intercepts_are_close() {
        assert_eq!(plot_half_width(2.0, &[1.0, 3.0]), 10.0);
        assert_eq!(plot_half_width(2.0, &[]), 10.0);
    }

    #[test]
    fn test_half_width_grows_for_distant_intercepts() {
        let hw = plot_half_width(0.0, &[-20.0, 20.0]);
        assert!((hw - 25.0).abs() < 1e-9);
    }
}
