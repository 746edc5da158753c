//! Transforms and the objects that own them

use serde::{Serialize, Deserialize};

use crate::math::{Mat4, Quat, Rotation, Vec3};

/// Translation, rotation and scale composing into a single matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    translation: Vec3,
    rotation: Rotation,
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Rotation::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Rotation, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Compose scale, then rotation, then translation into one matrix.
    pub fn matrix(&self) -> Mat4 {
        let mut m = self.rotation.to_matrix();
        for r in 0..3 {
            m[(r, 0)] *= self.scale.x;
            m[(r, 1)] *= self.scale.y;
            m[(r, 2)] *= self.scale.z;
        }
        m[(0, 3)] = self.translation.x;
        m[(1, 3)] = self.translation.y;
        m[(2, 3)] = self.translation.z;
        m
    }

    /// Decompose a rigid or TRS matrix back into translation and rotation.
    /// Scale is not recovered; the stored scale is left untouched.
    pub fn set_matrix(&mut self, m: &Mat4) {
        self.translation = m.translation_part();
        self.rotation = Rotation::from_quat(Quat::from_matrix(m));
    }
}

/// Base scene entity: anything with a transform. The camera and mesh
/// instances are Objects; the input layer mutates them between frames
/// through the accumulation helpers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Object {
    transform: Transform,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Add `delta` to the current translation.
    pub fn move_by(&mut self, delta: Vec3) {
        self.add_translation(delta);
    }

    pub fn add_translation(&mut self, delta: Vec3) {
        let t = self.transform.translation();
        self.transform.set_translation(t + delta);
    }

    /// Compose `rotation` on top of the current rotation. No clamping.
    pub fn add_rotation(&mut self, rotation: Rotation) {
        let composed = rotation.to_quat() * self.transform.rotation().to_quat();
        self.transform.set_rotation(Rotation::from_quat(composed.normalized()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_matrix_composes_scale_rotate_translate() {
        let t = Transform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Rotation::new(Vec3::UP, 90.0),
            Vec3::new(2.0, 2.0, 2.0),
        );
        // +X is scaled to length 2, rotated onto -Z, then translated
        let p = t.matrix().transform_point(Vec3::UNIT_X);
        assert_vec_close(p, Vec3::new(10.0, 0.0, -2.0));
    }

    #[test]
    fn test_compose_decompose_round_trip() {
        let t = Transform::new(
            Vec3::new(1.0, -2.0, 3.0),
            Rotation::new(Vec3::new(0.5, 1.0, 0.0), 40.0),
            Vec3::ONE,
        );
        let mut back = Transform::default();
        back.set_matrix(&t.matrix());
        assert_vec_close(back.translation(), t.translation());
        assert_vec_close(
            back.rotation().to_matrix().transform_point(Vec3::UNIT_Z),
            t.rotation().to_matrix().transform_point(Vec3::UNIT_Z),
        );
    }

    #[test]
    fn test_set_matrix_keeps_scale() {
        let mut t = Transform::default();
        t.set_scale(Vec3::new(3.0, 3.0, 3.0));
        t.set_matrix(&Mat4::translation(Vec3::UNIT_X));
        assert_eq!(t.scale(), Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_object_move_accumulates() {
        let mut obj = Object::new();
        obj.move_by(Vec3::new(1.0, 0.0, 0.0));
        obj.move_by(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(obj.transform().translation(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_object_add_rotation_accumulates() {
        let mut obj = Object::new();
        obj.add_rotation(Rotation::new(Vec3::UP, 45.0));
        obj.add_rotation(Rotation::new(Vec3::UP, 45.0));
        let p = obj.transform().rotation().to_matrix().transform_point(Vec3::UNIT_X);
        assert_vec_close(p, Vec3::new(0.0, 0.0, -1.0));
    }
}
