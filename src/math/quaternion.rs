//! Quaternions and axis-angle rotations
//!
//! The two representations are equivalent and convert both ways. `Quat`
//! is the workhorse for composition; `Rotation` is the human-readable
//! form stored in transforms and scene files.

use std::ops::Mul;
use serde::{Serialize, Deserialize};

use super::{Mat4, Vec3, EPSILON};

/// Quaternion: real scalar plus imaginary vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f64,
    pub v: Vec3,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat { w: 1.0, v: Vec3::ZERO };

    pub fn new(w: f64, v: Vec3) -> Self {
        Self { w, v }
    }

    /// Rotation of `angle_deg` degrees about `axis`. The axis is
    /// normalized here; a degenerate axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, angle_deg: f64) -> Self {
        let axis = axis.normalized();
        if axis == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        let half = angle_deg.to_radians() * 0.5;
        Quat::new(half.cos(), axis * half.sin())
    }

    pub fn magnitude(self) -> f64 {
        (self.w * self.w + self.v.dot(self.v)).sqrt()
    }

    /// Unit-magnitude copy. Returns the identity when the magnitude is
    /// below epsilon.
    pub fn normalized(self) -> Quat {
        let mag = self.magnitude();
        if mag < EPSILON {
            return Quat::IDENTITY;
        }
        Quat::new(self.w / mag, self.v / mag)
    }

    /// Rotation matrix of a unit quaternion.
    pub fn to_matrix(self) -> Mat4 {
        let Quat { w, v: Vec3 { x, y, z } } = self;
        Mat4::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
                0.0,
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
                0.0,
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Extract the rotation from a rigid or TRS matrix (no shear) via the
    /// standard trace comparison. Scale in the matrix is tolerated but the
    /// result is only meaningful for uniform or no scale.
    pub fn from_matrix(m: &Mat4) -> Quat {
        let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Quat::new(
                0.25 * s,
                Vec3::new(
                    (m[(2, 1)] - m[(1, 2)]) / s,
                    (m[(0, 2)] - m[(2, 0)]) / s,
                    (m[(1, 0)] - m[(0, 1)]) / s,
                ),
            )
        } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
            let s = (1.0 + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt() * 2.0;
            Quat::new(
                (m[(2, 1)] - m[(1, 2)]) / s,
                Vec3::new(
                    0.25 * s,
                    (m[(0, 1)] + m[(1, 0)]) / s,
                    (m[(0, 2)] + m[(2, 0)]) / s,
                ),
            )
        } else if m[(1, 1)] > m[(2, 2)] {
            let s = (1.0 + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt() * 2.0;
            Quat::new(
                (m[(0, 2)] - m[(2, 0)]) / s,
                Vec3::new(
                    (m[(0, 1)] + m[(1, 0)]) / s,
                    0.25 * s,
                    (m[(1, 2)] + m[(2, 1)]) / s,
                ),
            )
        } else {
            let s = (1.0 + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt() * 2.0;
            Quat::new(
                (m[(1, 0)] - m[(0, 1)]) / s,
                Vec3::new(
                    (m[(0, 2)] + m[(2, 0)]) / s,
                    (m[(1, 2)] + m[(2, 1)]) / s,
                    0.25 * s,
                ),
            )
        };
        q.normalized()
    }
}

/// Hamilton product. `a * b` rotates by `b` first, then `a`.
impl Mul for Quat {
    type Output = Quat;
    fn mul(self, other: Quat) -> Quat {
        Quat::new(
            self.w * other.w - self.v.dot(other.v),
            other.v * self.w + self.v * other.w + self.v.cross(other.v),
        )
    }
}

/// Axis-angle rotation: unit axis plus angle in degrees.
///
/// The axis is re-normalized on every construction and mutation, so the
/// unit-axis invariant cannot be broken from outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RotationData")]
pub struct Rotation {
    axis: Vec3,
    angle_deg: f64,
}

/// Raw mirror so deserialized rotations go through the normalizing
/// constructor.
#[derive(Deserialize)]
struct RotationData {
    axis: Vec3,
    angle_deg: f64,
}

impl From<RotationData> for Rotation {
    fn from(raw: RotationData) -> Self {
        Rotation::new(raw.axis, raw.angle_deg)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation { axis: Vec3::UP, angle_deg: 0.0 };

    /// A zero-length axis falls back to +Y; the angle is kept.
    pub fn new(axis: Vec3, angle_deg: f64) -> Self {
        let axis = axis.normalized();
        Self {
            axis: if axis == Vec3::ZERO { Vec3::UP } else { axis },
            angle_deg,
        }
    }

    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn set_axis(&mut self, axis: Vec3) {
        *self = Rotation::new(axis, self.angle_deg);
    }

    pub fn set_angle_deg(&mut self, angle_deg: f64) {
        self.angle_deg = angle_deg;
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_axis_angle(self.axis, self.angle_deg)
    }

    pub fn from_quat(q: Quat) -> Self {
        let q = q.normalized();
        let half = q.w.clamp(-1.0, 1.0).acos();
        let sin_half = half.sin();
        if sin_half.abs() < EPSILON {
            return Rotation::IDENTITY;
        }
        Rotation::new(q.v / sin_half, (2.0 * half).to_degrees())
    }

    pub fn to_matrix(self) -> Mat4 {
        self.to_quat().to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_quat_rotates_point() {
        // 90 degrees about Y takes +X to -Z
        let q = Quat::from_axis_angle(Vec3::UP, 90.0);
        let p = q.to_matrix().transform_point(Vec3::UNIT_X);
        assert_vec_close(p, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_quat_composition_order() {
        let yaw = Quat::from_axis_angle(Vec3::UP, 90.0);
        let pitch = Quat::from_axis_angle(Vec3::UNIT_X, 90.0);
        // yaw * pitch applies pitch first
        let composed = (yaw * pitch).to_matrix();
        let expected = yaw.to_matrix() * pitch.to_matrix();
        let p = Vec3::new(0.3, -0.4, 0.8);
        assert_vec_close(composed.transform_point(p), expected.transform_point(p));
    }

    #[test]
    fn test_normalized_degenerate_is_identity() {
        let q = Quat::new(0.0, Vec3::ZERO).normalized();
        assert_eq!(q, Quat::IDENTITY);
    }

    #[test]
    fn test_rotation_axis_normalized_on_construction() {
        let r = Rotation::new(Vec3::new(0.0, 0.0, 10.0), 45.0);
        assert_vec_close(r.axis(), Vec3::UNIT_Z);
        assert_eq!(r.angle_deg(), 45.0);
    }

    #[test]
    fn test_rotation_zero_axis_fallback() {
        let r = Rotation::new(Vec3::ZERO, 30.0);
        assert_vec_close(r.axis(), Vec3::UP);
    }

    #[test]
    fn test_set_axis_renormalizes() {
        let mut r = Rotation::new(Vec3::UP, 90.0);
        r.set_axis(Vec3::new(2.0, 0.0, 0.0));
        assert_vec_close(r.axis(), Vec3::UNIT_X);
        assert_eq!(r.angle_deg(), 90.0);
    }

    #[test]
    fn test_rotation_quat_round_trip() {
        let r = Rotation::new(Vec3::new(1.0, 2.0, -0.5), 73.0);
        let back = Rotation::from_quat(r.to_quat());
        assert_vec_close(back.axis(), r.axis());
        assert!((back.angle_deg() - r.angle_deg()).abs() < 1e-9);
    }

    #[test]
    fn test_matrix_quat_round_trip() {
        let q = Quat::from_axis_angle(Vec3::new(0.2, 1.0, -0.3), 140.0);
        let back = Quat::from_matrix(&q.to_matrix());
        // q and -q encode the same rotation; compare via matrices
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_close(
            back.to_matrix().transform_point(p),
            q.to_matrix().transform_point(p),
        );
    }

    #[test]
    fn test_identity_from_quat() {
        let r = Rotation::from_quat(Quat::IDENTITY);
        assert_eq!(r.angle_deg(), 0.0);
    }
}
