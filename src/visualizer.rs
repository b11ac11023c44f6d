use image::{Rgb, RgbImage};
use nalgebra as na;
use rand::seq::SliceRandom;

use crate::config::{AnalysisConfig, PlotWindow};
use crate::error::Error;
use crate::trajectory::Trajectory;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const SAMPLE_COLOR: Rgb<u8> = Rgb([220, 30, 30]);
const CURVE_COLOR: Rgb<u8> = Rgb([20, 20, 160]);

/// A point to draw on the current playback frame, with its trajectory color.
pub type Waypoint = (na::Point2<f32>, Rgb<u8>);

/// Per-frame sink for scene playback, implemented by the simulator side.
pub trait Renderer {
    fn render(&mut self, timestep: usize, waypoints: &[Waypoint]);
}

/// One distinct color per trajectory: a gradient between two spectrum ends,
/// shuffled so neighboring start times don't get neighboring hues.
pub fn color_template(count: usize) -> Vec<Rgb<u8>> {
    let mut colors = Vec::with_capacity(count);

    for i in 0..count {
        let f = if count > 1 {
            i as f32 / (count - 1) as f32
        } else {
            0.0
        };

        colors.push(Rgb([
            (255.0 * (1.0 - f)) as u8,
            (126.0 * (1.0 - f)) as u8,
            (255.0 * f) as u8,
        ]));
    }

    colors.shuffle(&mut rand::thread_rng());
    colors
}

/// Qualitative inspection of trajectories against the reference scene.
/// Not part of the classification contract.
pub struct TrajectoryVisualizer<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> TrajectoryVisualizer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Raw sample points plus the smoothed spline curve in one raster frame.
    pub fn plot_trajectory(&self, trajectory: &Trajectory) -> Result<RgbImage, Error> {
        let spline = trajectory.fit_spline()?;
        let win = &self.config.plot;

        let mut frame = RgbImage::from_pixel(win.width, win.height, BACKGROUND);

        for p in spline.sample_all() {
            draw_dot(&mut frame, win, p, CURVE_COLOR, 0);
        }
        for p in trajectory.points() {
            draw_dot(&mut frame, win, p, SAMPLE_COLOR, 1);
        }

        Ok(frame)
    }

    /// Plays all trajectories against the simulated clock. A trajectory
    /// becomes active at its first valid timestep and takes the next template
    /// color; each step appends every active trajectory's next valid point to
    /// the accumulated waypoint set, so the renderer sees growing trails.
    pub fn play(&self, trajectories: &mut [Trajectory], renderer: &mut dyn Renderer) {
        let colors = color_template(trajectories.len());
        let mut color_index = 0;
        let mut active: Vec<(usize, Rgb<u8>)> = Vec::new();
        let mut waypoints: Vec<Waypoint> = Vec::new();

        for trajectory in trajectories.iter_mut() {
            trajectory.rewind();
        }

        for timestep in 0..self.config.time_horizon {
            for (index, trajectory) in trajectories.iter().enumerate() {
                if trajectory.first_timestep() == Some(timestep) {
                    active.push((index, colors[color_index]));
                    color_index += 1;
                }
            }

            for (index, color) in &active {
                if let Some(point) = trajectories[*index].advance() {
                    waypoints.push((point, *color));
                }
            }

            renderer.render(timestep, &waypoints);
        }
    }
}

/// Maps a scene point into the plot window. Scene coordinates are camera
/// coordinates, so the row index grows with y (inverted-axis convention).
fn to_pixel(win: &PlotWindow, p: na::Point2<f32>) -> (i64, i64) {
    let sx = win.width as f32 / (win.max.0 - win.min.0);
    let sy = win.height as f32 / (win.max.1 - win.min.1);

    (
        ((p.x - win.min.0) * sx) as i64,
        ((p.y - win.min.1) * sy) as i64,
    )
}

fn draw_dot(frame: &mut RgbImage, win: &PlotWindow, p: na::Point2<f32>, color: Rgb<u8>, r: i64) {
    let (cx, cy) = to_pixel(win, p);

    for y in cy - r..=cy + r {
        for x in cx - r..=cx + r {
            if x >= 0 && x < frame.width() as i64 && y >= 0 && y < frame.height() as i64 {
                frame.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
