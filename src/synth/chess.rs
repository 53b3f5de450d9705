//! The projected-quad checkerboard scene.
//!
//! Renders a 10x7 planar checkerboard at Z=0 as seen by a virtual camera
//! orbiting the board on a rocking, wandering path driven by a fixed 30fps
//! simulated clock. Geometry is fully deterministic: two scenes advanced the
//! same number of frames produce identical poses and projections. This makes
//! the source an infinitely repeatable calibration-target video with no
//! stored media.

use nalgebra::Vector3;
use std::f64::consts::PI;

use crate::camera::ProjectionModel;
use crate::frame::Frame;
use crate::geom::CameraPose;
use crate::raster::fill_convex_poly;
use crate::FrameSize;

const GRID_SIZE: (u32, u32) = (10, 7);
const TIME_STEP: f64 = 1.0 / 30.0;
const WHITE: [u8; 3] = [245, 245, 245];
const BLACK: [u8; 3] = [10, 10, 10];

pub struct ChessScene {
    grid_size: (u32, u32),
    white_quads: Vec<[Vector3<f64>; 4]>,
    black_quads: Vec<[Vector3<f64>; 4]>,
    projection: ProjectionModel,
    /// Simulated time, advanced by 1/30 inside each render. Owned by the
    /// scene; there is no shared clock.
    t: f64,
}

impl ChessScene {
    pub fn new(frame_size: FrameSize) -> Self {
        let (sx, sy) = GRID_SIZE;
        let mut white_quads = Vec::new();
        let mut black_quads = Vec::new();
        for i in 0..sy {
            for j in 0..sx {
                let (x, y) = (f64::from(j), f64::from(i));
                let quad = [
                    Vector3::new(x, y, 0.0),
                    Vector3::new(x + 1.0, y, 0.0),
                    Vector3::new(x + 1.0, y + 1.0, 0.0),
                    Vector3::new(x, y + 1.0, 0.0),
                ];
                if (i + j) % 2 == 0 {
                    white_quads.push(quad);
                } else {
                    black_quads.push(quad);
                }
            }
        }
        Self {
            grid_size: GRID_SIZE,
            white_quads,
            black_quads,
            projection: ProjectionModel::for_frame(frame_size),
            t: 0.0,
        }
    }

    /// Draw the board into `dst`, advancing the simulated clock one frame.
    pub fn render(&mut self, dst: &mut Frame) {
        let t = self.t;
        self.t += TIME_STEP;

        let pose = self.camera_pose(t);
        for (quads, color) in [(&self.white_quads, WHITE), (&self.black_quads, BLACK)] {
            for quad in quads {
                let projected = self.projection.project(&pose, quad);
                fill_convex_poly(dst, &projected, color);
            }
        }
    }

    /// Camera pose at simulated time `t`: a slow orbit with a rocking
    /// elevation and a wandering offset applied to both eye and target, so
    /// the board stays centered in view.
    fn camera_pose(&self, t: f64) -> CameraPose {
        let sx = f64::from(self.grid_size.0);
        let sy = f64::from(self.grid_size.1);
        let center = Vector3::new(0.5 * sx, 0.5 * sy, 0.0);

        let phi = PI / 3.0 + (3.0 * t).sin() * PI / 8.0;
        let ofs = Vector3::new((1.2 * t).sin(), (1.8 * t).cos(), 0.0) * (0.2 * sx);
        let orbit = Vector3::new(t.cos() * phi.cos(), t.sin() * phi.cos(), phi.sin());

        let eye = center + orbit * 15.0 + ofs;
        let target = center + ofs;
        CameraPose::look_at(eye, target)
    }
}
