//! Shading models and render settings

use serde::{Serialize, Deserialize};

use crate::math::Vec3;
use super::{remap, Color};

/// Shading model. Selected once at configuration time; the render pass
/// matches on it rather than dispatching through a trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    /// View depth remapped to a grayscale intensity between the clip
    /// planes (near = bright, far = dark)
    DepthGray,
    /// Ambient + diffuse + specular point light
    BlinnPhong,
}

/// Point light for the Blinn-Phong path
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    /// Scales diffuse and specular before distance falloff
    pub intensity: f64,
    /// Base intensity independent of the light
    pub ambient: f64,
    pub shininess: f64,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(4.0, 6.0, 4.0),
            intensity: 40.0,
            ambient: 0.15,
            shininess: 32.0,
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub shading: ShadingMode,
    pub light: PointLight,
    /// Surface color fed to the Blinn-Phong path
    pub base_color: Color,
    pub background: Color,
    /// Render at 320x240 instead of 640x480
    pub low_resolution: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            shading: ShadingMode::BlinnPhong,
            light: PointLight::default(),
            base_color: Color::new(200, 200, 210),
            background: Color::new(30, 30, 35),
            low_resolution: false,
        }
    }
}

/// Map a view-space depth between the clip planes to a grayscale color,
/// nearer being brighter.
pub(crate) fn shade_depth_gray(view_depth: f64, near: f64, far: f64) -> Color {
    let intensity = remap(view_depth, near, far, 255.0, 0.0).clamp(0.0, 255.0);
    Color::gray(intensity as u8)
}

/// Blinn-Phong: ambient plus diffuse and specular terms attenuated by
/// the squared distance to the light.
pub(crate) fn shade_blinn_phong(
    position: Vec3,
    normal: Vec3,
    eye: Vec3,
    light: &PointLight,
    base: Color,
) -> Color {
    let n = normal.normalized();
    let to_light = light.position - position;
    let dist_sq = to_light.length_squared().max(1.0e-6);
    let l = to_light / dist_sq.sqrt();
    let v = (eye - position).normalized();
    let h = (l + v).normalized();

    let diffuse = n.dot(l).max(0.0);
    let specular = n.dot(h).max(0.0).powf(light.shininess);
    let attenuation = light.intensity / dist_sq;

    let intensity = light.ambient + (diffuse + specular) * attenuation;
    base.shade(intensity)
}
