use nalgebra as na;
use ndarray::{s, Array1, Zip};
use num_traits::{Float, FromPrimitive};

/// Mean tangent heading of a sampled curve, in degrees.
///
/// Takes consecutive finite differences of the points, converts each segment
/// to a heading angle via `atan2(dy, dx)` and averages across segments.
pub fn mean_heading_degrees<F>(points: &[na::Point2<F>]) -> F
where
    F: na::RealField + Float + FromPrimitive,
{
    if points.len() < 2 {
        return F::zero();
    }

    let xs: Array1<F> = points.iter().map(|p| p.x).collect();
    let ys: Array1<F> = points.iter().map(|p| p.y).collect();

    let dx = &xs.slice(s![1..]) - &xs.slice(s![..-1]);
    let dy = &ys.slice(s![1..]) - &ys.slice(s![..-1]);

    let angles =
        Zip::from(&dy).and(&dx).map_collect(|&dy, &dx| Float::to_degrees(Float::atan2(dy, dx)));

    angles.mean().unwrap_or_else(F::zero)
}

/// Average of a set of positions. `None` when the set is empty.
pub fn mean_point<I>(points: I) -> Option<na::Point2<f32>>
where
    I: IntoIterator<Item = na::Point2<f32>>,
{
    let mut sum = na::Vector2::zeros();
    let mut count = 0.0f32;

    for p in points {
        sum += p.coords;
        count += 1.0;
    }

    if count == 0.0 {
        None
    } else {
        Some((sum / count).into())
    }
}
