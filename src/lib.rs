pub mod classifier;
pub mod config;
pub mod error;
pub mod lanes;
pub mod math;
pub mod spline;
pub mod trajectory;
pub mod visualizer;

pub use classifier::{Primitive, PrimitiveClassifier};
pub use config::AnalysisConfig;
pub use error::Error;
pub use lanes::LaneTopology;
pub use spline::TrajectorySpline;
pub use trajectory::{AgentState, Lane, Trajectory};
pub use visualizer::{Renderer, TrajectoryVisualizer};

/// Seam for consumers that only need maneuver labels.
pub trait Classify {
    fn classify(&self, trajectory: &Trajectory) -> Result<Primitive, Error>;
}

/// Owns the scene calibration and hands it to the classifier and the
/// visualizer. One instance per scene; calls are independent, so batches of
/// trajectories can be classified in any order.
pub struct TrajectoryAnalysis {
    config: AnalysisConfig,
}

impl TrajectoryAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn plot_trajectory(&self, trajectory: &Trajectory) -> Result<image::RgbImage, Error> {
        TrajectoryVisualizer::new(&self.config).plot_trajectory(trajectory)
    }

    pub fn play(&self, trajectories: &mut [Trajectory], renderer: &mut dyn Renderer) {
        TrajectoryVisualizer::new(&self.config).play(trajectories, renderer)
    }
}

impl Default for TrajectoryAnalysis {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Classify for TrajectoryAnalysis {
    fn classify(&self, trajectory: &Trajectory) -> Result<Primitive, Error> {
        PrimitiveClassifier::new(&self.config).classify(trajectory)
    }
}
