use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("curve fit failed: {0}")]
    CurveFit(#[from] CurveFitError),
}

/// Why a spline fit could not be produced. A failed fit is the only hard
/// failure in this crate; every other condition resolves to a label.
#[derive(Debug, Error)]
pub enum CurveFitError {
    #[error("{got} valid points, at least {need} required")]
    TooFewPoints { got: usize, need: usize },
    #[error("points have no geometric spread")]
    DegenerateGeometry,
}
