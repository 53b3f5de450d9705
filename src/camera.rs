//! Pinhole projection with lens distortion.
//!
//! Conceptually the pipeline is `pixel = intrinsics(distortion(project(p)))`:
//! world points are brought into the camera frame by the pose, divided by
//! depth, pushed through a 4-coefficient Brown-Conrady distortion (k1, k2,
//! p1, p2), and finally mapped to pixels by the intrinsic matrix. Parameters
//! are fixed at construction.

use nalgebra::{Matrix3, Vector3};

use crate::geom::{rvec_to_rotation, CameraPose};
use crate::FrameSize;

/// Intrinsics + distortion for a synthetic camera. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionModel {
    intrinsics: Matrix3<f64>,
    /// Brown-Conrady coefficients: [k1, k2, p1, p2].
    distortion: [f64; 4],
}

impl ProjectionModel {
    /// The fixed model used by the synthetic scenes: focal length 0.9 times
    /// the frame width, principal point at the image center, mild barrel
    /// distortion.
    pub fn for_frame(size: FrameSize) -> Self {
        let w = f64::from(size.width);
        let h = f64::from(size.height);
        let fx = 0.9 * w;
        let intrinsics = Matrix3::new(
            fx, 0.0, 0.5 * (w - 1.0), //
            0.0, fx, 0.5 * (h - 1.0), //
            0.0, 0.0, 1.0,
        );
        Self {
            intrinsics,
            distortion: [-0.2, 0.1, 0.0, 0.0],
        }
    }

    pub fn with_distortion(mut self, coefficients: [f64; 4]) -> Self {
        self.distortion = coefficients;
        self
    }

    pub fn intrinsics(&self) -> &Matrix3<f64> {
        &self.intrinsics
    }

    /// Project world points into pixel coordinates through the given pose.
    /// The rotation is applied from the pose's compact rotation-vector form.
    pub fn project(&self, pose: &CameraPose, points: &[Vector3<f64>]) -> Vec<[f64; 2]> {
        let rotation = rvec_to_rotation(&pose.rvec);
        points
            .iter()
            .map(|p| self.project_one(&(rotation * p + pose.tvec)))
            .collect()
    }

    fn project_one(&self, cam: &Vector3<f64>) -> [f64; 2] {
        let x = cam.x / cam.z;
        let y = cam.y / cam.z;
        let [k1, k2, p1, p2] = self.distortion;

        let r2 = x * x + y * y;
        let radial = 1.0 + k1 * r2 + k2 * r2 * r2;
        let xd = x * radial + 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
        let yd = y * radial + p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;

        let fx = self.intrinsics[(0, 0)];
        let fy = self.intrinsics[(1, 1)];
        let cx = self.intrinsics[(0, 2)];
        let cy = self.intrinsics[(1, 2)];
        [fx * xd + cx, fy * yd + cy]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn identity_pose() -> CameraPose {
        CameraPose {
            rotation: Matrix3::identity(),
            rvec: Vector3::zeros(),
            tvec: Vector3::zeros(),
        }
    }

    #[test]
    fn optical_axis_hits_principal_point() {
        let model = ProjectionModel::for_frame(FrameSize::new(640, 480).unwrap());
        let px = model.project(&identity_pose(), &[Vector3::new(0.0, 0.0, 5.0)]);
        assert!((px[0][0] - 0.5 * 639.0).abs() < 1e-9);
        assert!((px[0][1] - 0.5 * 479.0).abs() < 1e-9);
    }

    #[test]
    fn undistorted_projection_is_linear() {
        let model = ProjectionModel::for_frame(FrameSize::new(640, 480).unwrap())
            .with_distortion([0.0; 4]);
        let px = model.project(&identity_pose(), &[Vector3::new(1.0, 0.5, 2.0)]);
        let fx = 0.9 * 640.0;
        assert!((px[0][0] - (fx * 0.5 + 0.5 * 639.0)).abs() < 1e-9);
        assert!((px[0][1] - (fx * 0.25 + 0.5 * 479.0)).abs() < 1e-9);
    }

    #[test]
    fn barrel_distortion_pulls_points_inward() {
        let size = FrameSize::new(640, 480).unwrap();
        let distorted = ProjectionModel::for_frame(size);
        let straight = ProjectionModel::for_frame(size).with_distortion([0.0; 4]);
        let point = [Vector3::new(0.8, 0.6, 2.0)];
        let pose = identity_pose();
        let d = distorted.project(&pose, &point)[0];
        let s = straight.project(&pose, &point)[0];
        let cx = 0.5 * 639.0;
        let cy = 0.5 * 479.0;
        let rd = ((d[0] - cx).powi(2) + (d[1] - cy).powi(2)).sqrt();
        let rs = ((s[0] - cx).powi(2) + (s[1] - cy).powi(2)).sqrt();
        assert!(rd < rs, "k1 < 0 must shrink off-center radii ({rd} vs {rs})");
    }

    #[test]
    fn projection_respects_pose_rotation() {
        let model = ProjectionModel::for_frame(FrameSize::new(640, 480).unwrap())
            .with_distortion([0.0; 4]);
        let eye = Vector3::new(1.0, -4.0, 2.5);
        let pose = CameraPose::look_at(eye, Vector3::zeros());
        // The look-at target projects onto the principal point.
        let px = model.project(&pose, &[Vector3::zeros()]);
        assert!((px[0][0] - 0.5 * 639.0).abs() < 1e-6);
        assert!((px[0][1] - 0.5 * 479.0).abs() < 1e-6);
    }
}
