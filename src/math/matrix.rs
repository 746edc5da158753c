//! Row-major 4x4 matrices

use std::ops::{Index, IndexMut, Mul};
use serde::{Serialize, Deserialize};

use super::{Vec3, Vec4, EPSILON};

/// Uniform scale applied by [`Mat4::inverse`] when the matrix is singular.
/// Downstream transforms stay finite and visibly wrong instead of crashing.
pub const SINGULAR_FALLBACK_SCALE: f64 = 1.0e9;

/// 4x4 row-major matrix over flat storage, addressed `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    m: [f64; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let mut m = [0.0; 16];
        for (r, row) in rows.iter().enumerate() {
            m[r * 4..r * 4 + 4].copy_from_slice(row);
        }
        Self { m }
    }

    pub fn translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m[(0, 3)] = t.x;
        m[(1, 3)] = t.y;
        m[(2, 3)] = t.z;
        m
    }

    pub fn scaling(s: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m[(0, 0)] = s.x;
        m[(1, 1)] = s.y;
        m[(2, 2)] = s.z;
        m
    }

    pub fn uniform_scaling(s: f64) -> Self {
        Self::scaling(Vec3::new(s, s, s))
    }

    /// Translation column of a TRS or rigid matrix
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }

    /// Multiply a homogeneous vector, no divide.
    pub fn transform_vec4(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self[(0, 0)] * v.x + self[(0, 1)] * v.y + self[(0, 2)] * v.z + self[(0, 3)] * v.w,
            self[(1, 0)] * v.x + self[(1, 1)] * v.y + self[(1, 2)] * v.z + self[(1, 3)] * v.w,
            self[(2, 0)] * v.x + self[(2, 1)] * v.y + self[(2, 2)] * v.z + self[(2, 3)] * v.w,
            self[(3, 0)] * v.x + self[(3, 1)] * v.y + self[(3, 2)] * v.z + self[(3, 3)] * v.w,
        )
    }

    /// Transform a point, dividing through by the resulting w. A result
    /// with w == 0 is left undivided.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let v = self.transform_vec4(Vec4::from_point(p));
        if v.w != 0.0 {
            Vec3::new(v.x / v.w, v.y / v.w, v.z / v.w)
        } else {
            v.truncated()
        }
    }

    /// Rotate/scale a direction, ignoring translation.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.transform_vec4(Vec4::from_direction(d)).truncated()
    }

    /// Closed-form cofactor inverse.
    ///
    /// A singular matrix (|det| <= epsilon) has no inverse; the uniform
    /// [`SINGULAR_FALLBACK_SCALE`] matrix is returned instead so callers
    /// never see NaN or a panic mid-frame.
    pub fn inverse(&self) -> Mat4 {
        let m = &self.m;
        let mut inv = [0.0f64; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det.abs() <= EPSILON {
            return Mat4::uniform_scaling(SINGULAR_FALLBACK_SCALE);
        }

        let inv_det = 1.0 / det;
        for v in inv.iter_mut() {
            *v *= inv_det;
        }
        Mat4 { m: inv }
    }
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f64;
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.m[row * 4 + col]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.m[row * 4 + col]
    }
}

/// Standard row x column composition. Not commutative: a full pipeline
/// composes as `proj * view * model`.
impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        let mut out = Mat4 { m: [0.0; 16] };
        for r in 0..4 {
            for c in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += self[(r, k)] * other[(k, c)];
                }
                out[(r, c)] = acc;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_identity(m: &Mat4) -> bool {
        for r in 0..4 {
            for c in 0..4 {
                let expect = if r == c { 1.0 } else { 0.0 };
                if (m[(r, c)] - expect).abs() > 1e-9 {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_default_is_identity() {
        let m = Mat4::default();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(m.transform_point(p), p);
    }

    #[test]
    fn test_translation() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let p = m.transform_point(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
        // Directions are unaffected by translation
        let d = m.transform_direction(Vec3::UNIT_X);
        assert_eq!(d, Vec3::UNIT_X);
    }

    #[test]
    fn test_mul_order() {
        let t = Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
        let s = Mat4::uniform_scaling(2.0);
        // t * s scales first, then translates
        let p = (t * s).transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Vec3::new(3.0, 0.0, 0.0));
        // s * t translates first, then scales
        let q = (s * t).transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(q, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        // A TRS-style matrix with rotation about Y
        let angle: f64 = 0.7;
        let rot = Mat4::from_rows([
            [angle.cos(), 0.0, angle.sin(), 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-angle.sin(), 0.0, angle.cos(), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let m = Mat4::translation(Vec3::new(5.0, -3.0, 2.0)) * rot * Mat4::uniform_scaling(1.5);
        assert!(approx_identity(&(m * m.inverse())));
        assert!(approx_identity(&(m.inverse() * m)));
    }

    #[test]
    fn test_singular_inverse_is_fallback_scale() {
        let m = Mat4::scaling(Vec3::new(1.0, 1.0, 0.0));
        let inv = m.inverse();
        assert_eq!(inv[(0, 0)], SINGULAR_FALLBACK_SCALE);
        assert_eq!(inv[(1, 1)], SINGULAR_FALLBACK_SCALE);
        assert_eq!(inv[(2, 2)], SINGULAR_FALLBACK_SCALE);
        assert_eq!(inv[(0, 1)], 0.0);
    }

    #[test]
    fn test_transform_point_divides_by_w() {
        // Last row makes w = z; a point at z = 2 is divided by 2
        let mut m = Mat4::IDENTITY;
        m[(3, 2)] = 1.0;
        m[(3, 3)] = 0.0;
        let p = m.transform_point(Vec3::new(2.0, 4.0, 2.0));
        assert_eq!(p, Vec3::new(1.0, 2.0, 1.0));
        // w == 0 leaves coordinates unchanged
        let q = m.transform_point(Vec3::new(2.0, 4.0, 0.0));
        assert_eq!(q, Vec3::new(2.0, 4.0, 0.0));
    }
}
