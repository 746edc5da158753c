//! Perspective camera

use crate::math::{Mat4, Rotation, Vec3};
use super::Object;

pub const MIN_FOV_DEG: f64 = 1.0;
pub const MAX_FOV_DEG: f64 = 179.0;

/// Smallest usable near-clip distance; requested values below this are
/// nudged up to keep the projection finite.
pub const MIN_NEAR_CLIP: f64 = 1.0e-4;

/// An [`Object`] with a field of view and clip planes. Looks down its
/// local -Z axis (right-handed).
#[derive(Debug, Clone)]
pub struct Camera {
    object: Object,
    fov_deg: f64,
    near_clip: f64,
    far_clip: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            object: Object::new(),
            fov_deg: 60.0,
            near_clip: 0.1,
            far_clip: 100.0,
        }
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut Object {
        &mut self.object
    }

    pub fn field_of_view(&self) -> f64 {
        self.fov_deg
    }

    pub fn set_field_of_view(&mut self, fov_deg: f64) {
        self.fov_deg = fov_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    }

    pub fn near_clip(&self) -> f64 {
        self.near_clip
    }

    pub fn far_clip(&self) -> f64 {
        self.far_clip
    }

    /// Near is kept strictly positive, far strictly beyond near.
    pub fn set_clip_planes(&mut self, near: f64, far: f64) {
        self.near_clip = near.max(MIN_NEAR_CLIP);
        self.far_clip = if far > self.near_clip {
            far
        } else {
            self.near_clip + MIN_NEAR_CLIP
        };
    }

    pub fn move_by(&mut self, delta: Vec3) {
        self.object.move_by(delta);
    }

    pub fn add_rotation(&mut self, rotation: Rotation) {
        self.object.add_rotation(rotation);
    }

    /// World-space forward direction (-Z rotated by the camera rotation)
    pub fn forward(&self) -> Vec3 {
        self.object
            .transform()
            .rotation()
            .to_matrix()
            .transform_direction(-Vec3::UNIT_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.object
            .transform()
            .rotation()
            .to_matrix()
            .transform_direction(Vec3::UNIT_X)
    }

    pub fn up(&self) -> Vec3 {
        self.object
            .transform()
            .rotation()
            .to_matrix()
            .transform_direction(Vec3::UNIT_Y)
    }

    /// Inverse of the camera's world transform. A singular transform
    /// propagates the degenerate-scale fallback from the inverse routine.
    pub fn view_matrix(&self) -> Mat4 {
        self.object.transform().matrix().inverse()
    }

    /// Perspective frustum from the field of view, the viewport aspect
    /// ratio, and the clip planes. Produces clip coordinates with
    /// `w = -z_view`. The viewport must not be zero-sized; the
    /// framebuffer owner guarantees that.
    pub fn projection_matrix(&self, width: usize, height: usize) -> Mat4 {
        debug_assert!(width > 0 && height > 0, "zero-sized viewport");
        let aspect = width as f64 / height as f64;
        let f = 1.0 / (self.fov_deg.to_radians() * 0.5).tan();
        let (n, fp) = (self.near_clip, self.far_clip);
        Mat4::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, (fp + n) / (n - fp), 2.0 * fp * n / (n - fp)],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }
}
