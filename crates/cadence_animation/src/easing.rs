//! Cubic Bezier easing
//!
//! A curve is defined by two control points `(x1, y1)` and `(x2, y2)`; the end
//! points are fixed at `(0, 0)` and `(1, 1)`. Easing a progress value `x` means
//! finding the curve parameter `t` with `X(t) = x` and returning `Y(t)`.
//!
//! Inversion uses a precomputed table of 11 samples of `X(t)` to seed a guess,
//! then refines it with Newton-Raphson where the slope is usable, falling back
//! to bisection where it is not.

use crate::error::EasingError;

/// Number of precomputed samples of the x-polynomial
pub const SPLINE_TABLE_SIZE: usize = 11;

const SAMPLE_STEP: f64 = 1.0 / (SPLINE_TABLE_SIZE as f64 - 1.0);

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 1e-7;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;

#[inline]
fn coefficient_a(p1: f64, p2: f64) -> f64 {
    1.0 - 3.0 * p2 + 3.0 * p1
}

#[inline]
fn coefficient_b(p1: f64, p2: f64) -> f64 {
    3.0 * p2 - 6.0 * p1
}

#[inline]
fn coefficient_c(p1: f64) -> f64 {
    3.0 * p1
}

/// Evaluate one coordinate polynomial at `t` (Horner form)
#[inline]
fn bezier_at(t: f64, p1: f64, p2: f64) -> f64 {
    ((coefficient_a(p1, p2) * t + coefficient_b(p1, p2)) * t + coefficient_c(p1)) * t
}

/// Derivative of one coordinate polynomial at `t`
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    3.0 * coefficient_a(p1, p2) * t * t + 2.0 * coefficient_b(p1, p2) * t + coefficient_c(p1)
}

/// A validated cubic Bezier easing curve
#[derive(Clone, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    /// `None` for the identity curve, which never needs inverting
    samples: Option<[f64; SPLINE_TABLE_SIZE]>,
}

impl CubicBezier {
    /// Build a curve from its control points
    ///
    /// Fails when `x1` or `x2` lies outside `[0, 1]`; the y-coordinates are
    /// free, which is what allows overshoot curves.
    ///
    /// ```rust
    /// use cadence_animation::CubicBezier;
    ///
    /// let ease = CubicBezier::new(0.25, 0.1, 0.25, 1.0).unwrap();
    /// assert_eq!(ease.solve(0.0), 0.0);
    /// assert_eq!(ease.solve(1.0), 1.0);
    /// assert!(ease.solve(0.5) > 0.5);
    ///
    /// assert!(CubicBezier::new(2.0, 0.0, 1.0, 1.0).is_err());
    /// ```
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, EasingError> {
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(EasingError::ControlPointOutOfRange { x1, x2 });
        }

        let samples = if x1 == y1 && x2 == y2 {
            None
        } else {
            let mut table = [0.0; SPLINE_TABLE_SIZE];
            for (i, sample) in table.iter_mut().enumerate() {
                *sample = bezier_at(i as f64 * SAMPLE_STEP, x1, x2);
            }
            Some(table)
        };

        Ok(Self {
            x1,
            y1,
            x2,
            y2,
            samples,
        })
    }

    /// Build a curve from a `[x1, y1, x2, y2]` slice
    pub fn from_slice(points: &[f64]) -> Result<Self, EasingError> {
        match points {
            [x1, y1, x2, y2] => Self::new(*x1, *y1, *x2, *y2),
            _ => Err(EasingError::WrongArity(points.len())),
        }
    }

    /// The identity curve
    pub fn linear() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            samples: None,
        }
    }

    pub fn control_points(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Whether this curve maps every input to itself
    pub fn is_linear(&self) -> bool {
        self.samples.is_none()
    }

    /// Map linear progress to eased progress
    ///
    /// `0` and `1` are returned unchanged.
    pub fn solve(&self, progress: f64) -> f64 {
        if self.is_linear() || progress == 0.0 || progress == 1.0 {
            return progress;
        }
        bezier_at(self.t_for_x(progress), self.y1, self.y2)
    }

    /// Value of the x-polynomial at curve parameter `t`
    pub fn x_at(&self, t: f64) -> f64 {
        bezier_at(t, self.x1, self.x2)
    }

    /// Find the curve parameter `t` where the x-polynomial equals `x`
    pub fn t_for_x(&self, x: f64) -> f64 {
        let Some(samples) = &self.samples else {
            return x;
        };
        let last = SPLINE_TABLE_SIZE - 1;

        // X(t) is monotonic for x1, x2 in [0, 1], so the table is sorted
        let index = samples[1..last].partition_point(|&sample| sample <= x);
        let interval_start = index as f64 * SAMPLE_STEP;

        let span = samples[index + 1] - samples[index];
        let dist = if span != 0.0 {
            (x - samples[index]) / span
        } else {
            0.0
        };
        let guess = interval_start + dist * SAMPLE_STEP;

        let slope = bezier_slope(guess, self.x1, self.x2);
        if slope >= NEWTON_MIN_SLOPE {
            self.newton_raphson(x, guess)
        } else if slope == 0.0 {
            guess
        } else {
            self.bisect(x, interval_start, interval_start + SAMPLE_STEP)
        }
    }

    fn newton_raphson(&self, x: f64, guess: f64) -> f64 {
        let mut t = guess;
        for _ in 0..NEWTON_ITERATIONS {
            let slope = bezier_slope(t, self.x1, self.x2);
            if slope == 0.0 {
                return t;
            }
            t -= (bezier_at(t, self.x1, self.x2) - x) / slope;
        }
        t
    }

    fn bisect(&self, x: f64, mut lower: f64, mut upper: f64) -> f64 {
        let mut iterations = 0;
        loop {
            let t = lower + (upper - lower) / 2.0;
            let error = bezier_at(t, self.x1, self.x2) - x;
            if error > 0.0 {
                upper = t;
            } else {
                lower = t;
            }
            iterations += 1;
            if error.abs() <= SUBDIVISION_PRECISION || iterations >= SUBDIVISION_MAX_ITERATIONS {
                return t;
            }
        }
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::linear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [[f64; 4]; 5] = [
        [0.25, 0.1, 0.25, 1.0],
        [0.42, 0.0, 0.58, 1.0],
        [0.215, 0.61, 0.355, 1.0],
        [0.455, 0.03, 0.515, 0.955],
        [0.68, -0.55, 0.265, 1.55],
    ];

    #[test]
    fn test_rejects_out_of_range_x() {
        assert_eq!(
            CubicBezier::new(2.0, 0.0, 1.0, 1.0),
            Err(EasingError::ControlPointOutOfRange { x1: 2.0, x2: 1.0 })
        );
        assert!(CubicBezier::new(0.5, 0.0, -0.1, 1.0).is_err());
        assert!(CubicBezier::new(f64::NAN, 0.0, 0.5, 1.0).is_err());
        // y is unconstrained
        assert!(CubicBezier::new(0.68, -0.55, 0.265, 1.55).is_ok());
    }

    #[test]
    fn test_from_slice_arity() {
        assert_eq!(
            CubicBezier::from_slice(&[0.1, 0.2, 0.3]),
            Err(EasingError::WrongArity(3))
        );
        let curve = CubicBezier::from_slice(&[0.42, 0.0, 0.58, 1.0]).unwrap();
        assert_eq!(curve.control_points(), [0.42, 0.0, 0.58, 1.0]);
    }

    #[test]
    fn test_boundaries_exact() {
        for [x1, y1, x2, y2] in CURVES {
            let curve = CubicBezier::new(x1, y1, x2, y2).unwrap();
            assert_eq!(curve.solve(0.0), 0.0);
            assert_eq!(curve.solve(1.0), 1.0);
        }
    }

    #[test]
    fn test_linear_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(linear.is_linear());
        for i in 0..=100 {
            let p = i as f64 / 100.0;
            assert_eq!(linear.solve(p), p);
        }

        // Any curve with x1 == y1 and x2 == y2 is the identity
        let diagonal = CubicBezier::new(0.3, 0.3, 0.7, 0.7).unwrap();
        assert!(diagonal.is_linear());
        assert_eq!(diagonal.solve(0.123), 0.123);
    }

    #[test]
    fn test_inversion_accuracy() {
        for [x1, y1, x2, y2] in CURVES {
            let curve = CubicBezier::new(x1, y1, x2, y2).unwrap();
            for i in 1..100 {
                let x = i as f64 / 100.0;
                let t = curve.t_for_x(x);
                assert!(
                    (curve.x_at(t) - x).abs() < 1e-6,
                    "curve {:?} at x={}: X(t)={}",
                    curve.control_points(),
                    x,
                    curve.x_at(t)
                );
            }
        }
    }

    #[test]
    fn test_flat_slope_paths() {
        // X(t) = 0.5 + 4(t - 0.5)^3, flat at t = 0.5
        let expo = CubicBezier::new(1.0, 0.0, 0.0, 1.0).unwrap();

        // Guess lands exactly on the flat point
        assert_eq!(expo.t_for_x(0.5), 0.5);

        // Guess near the flat point takes the bisection path
        let t = expo.t_for_x(0.4999);
        assert!((expo.x_at(t) - 0.4999).abs() < 1e-5);
        assert!(t > 0.4 && t < 0.5);
    }

    #[test]
    fn test_ease_shape() {
        let ease_in = CubicBezier::new(0.42, 0.0, 1.0, 1.0).unwrap();
        let ease_out = CubicBezier::new(0.0, 0.0, 0.58, 1.0).unwrap();
        assert!(ease_in.solve(0.25) < 0.25);
        assert!(ease_out.solve(0.25) > 0.25);

        // Symmetric curve crosses the midpoint
        let ease_in_out = CubicBezier::new(0.42, 0.0, 0.58, 1.0).unwrap();
        assert!((ease_in_out.solve(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_back_curve_overshoots() {
        let back = CubicBezier::new(0.68, -0.55, 0.265, 1.55).unwrap();
        assert!(back.solve(0.1) < 0.0);
        assert!(back.solve(0.9) > 1.0);
    }

    #[test]
    fn test_monotonic_for_standard_curves() {
        let curve = CubicBezier::new(0.25, 0.1, 0.25, 1.0).unwrap();
        let mut previous = 0.0;
        for i in 1..=50 {
            let y = curve.solve(i as f64 / 50.0);
            assert!(y >= previous);
            previous = y;
        }
    }
}
