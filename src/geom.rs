//! Camera pose helpers.
//!
//! Small geometry utility behind the synthetic scenes: build a camera
//! rotation/translation from an eye and target position (z-forward,
//! right-handed, world up = +Z), and convert rotation matrices to their
//! compact axis-angle (Rodrigues) form.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

/// A camera pose recomputed every frame. The rotation is carried both as a
/// matrix and as its compact rotation-vector form; translation maps world
/// points into the camera frame (`p_cam = R * p + t`).
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPose {
    pub rotation: Matrix3<f64>,
    pub rvec: Vector3<f64>,
    pub tvec: Vector3<f64>,
}

impl CameraPose {
    /// Pose of a camera at `eye` looking at `target`.
    pub fn look_at(eye: Vector3<f64>, target: Vector3<f64>) -> Self {
        let (rotation, tvec) = look_at(eye, target);
        let rvec = rotation_to_rvec(&rotation);
        Self {
            rotation,
            rvec,
            tvec,
        }
    }
}

/// Rotation matrix and translation vector for a camera at `eye` looking at
/// `target`, with world +Z as up. Rows of the matrix are the camera's right,
/// down, and forward axes; `t = -R * eye`.
pub fn look_at(eye: Vector3<f64>, target: Vector3<f64>) -> (Matrix3<f64>, Vector3<f64>) {
    let up = Vector3::new(0.0, 0.0, 1.0);
    let fwd = (target - eye).normalize();
    let right = fwd.cross(&up).normalize();
    let down = fwd.cross(&right);
    let rotation = Matrix3::new(
        right.x, right.y, right.z, //
        down.x, down.y, down.z, //
        fwd.x, fwd.y, fwd.z,
    );
    let tvec = -(rotation * eye);
    (rotation, tvec)
}

/// Compact rotation-vector (axis times angle) form of a rotation matrix.
pub fn rotation_to_rvec(rotation: &Matrix3<f64>) -> Vector3<f64> {
    let rot = Rotation3::from_matrix_unchecked(*rotation);
    UnitQuaternion::from_rotation_matrix(&rot).scaled_axis()
}

/// Rebuild a rotation matrix from its compact rotation-vector form.
pub fn rvec_to_rotation(rvec: &Vector3<f64>) -> Matrix3<f64> {
    Rotation3::new(*rvec).into_inner()
}
