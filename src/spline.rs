use nalgebra as na;

use crate::error::CurveFitError;

/// Cubic fit; a curve needs at least `DEGREE + 1` control points.
const DEGREE: usize = 3;

/// Dense evaluation points per index step when sampling a range.
const SAMPLES_PER_STEP: usize = 4;

/// Minimum bounding-box span for a fit to be meaningful, in scene units.
const MIN_SPREAD: f32 = 1e-3;

/// Smoothing parametric curve over a trajectory's sample points.
///
/// The samples act as control points of a clamped cubic B-spline, so the
/// curve approximates rather than interpolates them, smoothing detection
/// noise. Ranges are addressed in sample-index units `0..u_len`, with
/// negative indices measured from the end.
#[derive(Debug, Clone)]
pub struct TrajectorySpline {
    curve: bspline::BSpline<na::Vector2<f32>, f32>,
    u_len: usize,
}

impl TrajectorySpline {
    /// Fits the curve to `points`. Fails on degenerate input: fewer points
    /// than a cubic needs, or no geometric spread at all.
    pub fn fit(points: Vec<na::Point2<f32>>) -> Result<Self, CurveFitError> {
        let n = points.len();
        if n < DEGREE + 1 {
            return Err(CurveFitError::TooFewPoints {
                got: n,
                need: DEGREE + 1,
            });
        }

        let (mut min, mut max) = (points[0], points[0]);
        for p in &points {
            min = na::Point2::new(min.x.min(p.x), min.y.min(p.y));
            max = na::Point2::new(max.x.max(p.x), max.y.max(p.y));
        }
        if (max.x - min.x).max(max.y - min.y) < MIN_SPREAD {
            return Err(CurveFitError::DegenerateGeometry);
        }

        // Clamped uniform knots: domain [0, n - DEGREE], endpoints pinned
        // to the first and last control point.
        let interior = n - DEGREE;
        let mut knots = Vec::with_capacity(n + DEGREE + 1);
        knots.extend(std::iter::repeat(0.0).take(DEGREE + 1));
        knots.extend((1..interior).map(|k| k as f32));
        knots.extend(std::iter::repeat(interior as f32).take(DEGREE + 1));

        let control: Vec<na::Vector2<f32>> = points.iter().map(|p| p.coords).collect();

        Ok(Self {
            curve: bspline::BSpline::new(DEGREE, control, knots),
            u_len: n,
        })
    }

    /// Number of sample-index units addressable in ranges.
    #[inline]
    pub fn u_len(&self) -> usize {
        self.u_len
    }

    /// Densely sampled smoothed points over the index range `[from, to]`,
    /// inclusive. Negative indices are measured from the end, so
    /// `(-(u_len / 10), -1)` is the trailing tenth of the curve.
    pub fn smoothed_points(&self, from: isize, to: isize) -> Vec<na::Point2<f32>> {
        let from = self.resolve(from);
        let to = self.resolve(to);
        if to <= from {
            return vec![self.eval(self.param_at(from))];
        }

        let steps = (to - from) * SAMPLES_PER_STEP;
        let (t0, t1) = (self.param_at(from), self.param_at(to));

        (0..=steps)
            .map(|i| {
                let t = t0 + (t1 - t0) * i as f32 / steps as f32;
                self.eval(t)
            })
            .collect()
    }

    /// The whole smoothed curve.
    pub fn sample_all(&self) -> Vec<na::Point2<f32>> {
        self.smoothed_points(0, -1)
    }

    fn resolve(&self, index: isize) -> usize {
        let idx = if index < 0 {
            self.u_len as isize + index
        } else {
            index
        };

        idx.clamp(0, self.u_len as isize - 1) as usize
    }

    fn param_at(&self, index: usize) -> f32 {
        let (d0, d1) = self.curve.knot_domain();
        d0 + (d1 - d0) * index as f32 / (self.u_len - 1) as f32
    }

    fn eval(&self, t: f32) -> na::Point2<f32> {
        let (d0, d1) = self.curve.knot_domain();
        // evaluating exactly at the domain end is out of range
        let t = t.clamp(d0, d1 - 1e-4);
        let v = self.curve.point(t);
        na::Point2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<na::Point2<f32>> {
        (0..n)
            .map(|i| na::Point2::new(i as f32 * 10.0, 200.0))
            .collect()
    }

    #[test]
    fn rejects_too_few_points() {
        match TrajectorySpline::fit(line(3)) {
            Err(CurveFitError::TooFewPoints { got: 3, need: 4 }) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_coincident_points() {
        let points = vec![na::Point2::new(5.0, 5.0); 10];
        match TrajectorySpline::fit(points) {
            Err(CurveFitError::DegenerateGeometry) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn clamped_curve_starts_and_ends_at_the_data() {
        let spline = TrajectorySpline::fit(line(12)).unwrap();
        let pts = spline.sample_all();

        let first = pts.first().unwrap();
        let last = pts.last().unwrap();
        assert!(na::distance(first, &na::Point2::new(0.0, 200.0)) < 1.0);
        assert!(na::distance(last, &na::Point2::new(110.0, 200.0)) < 1.0);
    }

    #[test]
    fn stays_on_a_straight_line() {
        let spline = TrajectorySpline::fit(line(20)).unwrap();
        for p in spline.sample_all() {
            assert!((p.y - 200.0).abs() < 1e-2);
        }
    }

    #[test]
    fn negative_range_addresses_the_tail() {
        let spline = TrajectorySpline::fit(line(20)).unwrap();
        let tail = spline.smoothed_points(-2, -1);
        // the tail of a 0..190 line lies past x = 170
        assert!(tail.iter().all(|p| p.x > 170.0));
    }

    #[test]
    fn range_sampling_is_dense() {
        let spline = TrajectorySpline::fit(line(20)).unwrap();
        let pts = spline.smoothed_points(0, 2);
        assert_eq!(pts.len(), 2 * SAMPLES_PER_STEP + 1);
    }
}
