//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::math::{Quat, Rotation, Vec3};
use crate::render::RenderSettings;
use super::Camera;

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

/// Camera placement as stored in scene files: a position plus yaw/pitch,
/// which the shell also drives for mouse look.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub fov_deg: f64,
    pub near_clip: f64,
    pub far_clip: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, 6.0),
            yaw_deg: 0.0,
            pitch_deg: -10.0,
            fov_deg: 60.0,
            near_clip: 0.1,
            far_clip: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> Camera {
        let mut camera = Camera::new();
        camera.set_field_of_view(self.fov_deg);
        camera.set_clip_planes(self.near_clip, self.far_clip);
        let transform = camera.object_mut().transform_mut();
        transform.set_translation(self.position);
        transform.set_rotation(camera_rotation(self.yaw_deg, self.pitch_deg));
        camera
    }
}

/// Yaw about world Y composed over pitch about local X.
pub fn camera_rotation(yaw_deg: f64, pitch_deg: f64) -> Rotation {
    let yaw = Quat::from_axis_angle(Vec3::UP, yaw_deg);
    let pitch = Quat::from_axis_angle(Vec3::UNIT_X, pitch_deg);
    Rotation::from_quat(yaw * pitch)
}

/// A renderable scene: mesh source, camera placement, render settings.
/// `mesh: None` renders the built-in cube.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    pub mesh: Option<String>,
    pub camera: CameraConfig,
    pub settings: RenderSettings,
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneFile, SceneError> {
    let contents = fs::read_to_string(path)?;
    let scene: SceneFile = ron::from_str(&contents)?;
    Ok(scene)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &SceneFile, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<SceneFile, SceneError> {
    let scene: SceneFile = ron::from_str(s)?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ShadingMode;

    #[test]
    fn test_round_trip_string() {
        let mut scene = SceneFile::default();
        scene.mesh = Some("assets/meshes/monkey.obj".to_string());
        scene.settings.shading = ShadingMode::DepthGray;
        scene.camera.fov_deg = 75.0;

        let text = ron::ser::to_string_pretty(&scene, ron::ser::PrettyConfig::default()).unwrap();
        let back = load_scene_from_str(&text).unwrap();
        assert_eq!(back.mesh.as_deref(), Some("assets/meshes/monkey.obj"));
        assert_eq!(back.settings.shading, ShadingMode::DepthGray);
        assert_eq!(back.camera.fov_deg, 75.0);
    }

    #[test]
    fn test_malformed_scene_is_parse_error() {
        let err = load_scene_from_str("(mesh: oops").unwrap_err();
        assert!(matches!(err, SceneError::ParseError(_)));
    }

    #[test]
    fn test_build_camera_applies_config() {
        let mut config = CameraConfig::default();
        config.position = Vec3::new(1.0, 2.0, 3.0);
        config.fov_deg = 400.0; // clamped by the camera
        config.yaw_deg = 90.0;
        config.pitch_deg = 0.0;
        let camera = config.build();
        assert_eq!(camera.object().transform().translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.field_of_view(), 179.0);
        // Yawed 90 degrees: forward turns onto -X
        assert!((camera.forward() - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-9);
    }
}
