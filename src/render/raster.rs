//! Triangle rasterization: the per-frame render pass
//!
//! Each mesh goes through one model-view-projection composition; each
//! triangle is transformed to screen space, its clamped bounding box is
//! scanned, and pixels passing the barycentric containment and depth
//! tests are shaded and written.

use crate::math::{Mat4, Vec2, Vec3, Vec4, EPSILON};
use crate::mesh::Mesh;
use crate::scene::Camera;
use super::{shade_blinn_phong, shade_depth_gray, Framebuffer, RenderSettings, ShadingMode};

/// Minimum clip-space w. A triangle with any vertex closer than this is
/// rejected whole rather than clipped; geometry pops at the near plane.
pub const MIN_CLIP_W: f64 = 0.1;

/// A vertex after the model and MVP transforms, before the divide.
struct ClipVertex {
    clip: Vec4,
    world: Vec3,
    normal: Vec3,
}

/// A vertex in pixel coordinates carrying its interpolation attributes.
/// `inv_w` is the reciprocal depth stored in the depth buffer.
struct ScreenVertex {
    pos: Vec2,
    inv_w: f64,
    world: Vec3,
    normal: Vec3,
}

/// Signed area of triangle (a, b, p), doubled. Positive when p lies to
/// the left of a->b. Used both for containment and for the total area
/// the weights are normalized by.
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f64 {
    (b - a).cross(p - a)
}

/// Render a mesh through the camera into the framebuffer. The caller
/// clears the framebuffer once per frame before the first mesh; the
/// depth buffer orders fragments across all meshes drawn after that.
pub fn render_mesh(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    model: &Mat4,
    camera: &Camera,
    settings: &RenderSettings,
) {
    if fb.width() == 0 || fb.height() == 0 {
        return;
    }
    let mvp = camera.projection_matrix(fb.width(), fb.height()) * camera.view_matrix() * *model;
    let eye = camera.object().transform().translation();
    draw_mesh(
        fb,
        mesh,
        &mvp,
        model,
        eye,
        camera.near_clip(),
        camera.far_clip(),
        settings,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_mesh(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    mvp: &Mat4,
    model: &Mat4,
    eye: Vec3,
    near: f64,
    far: f64,
    settings: &RenderSettings,
) {
    let width = fb.width() as f64;
    let height = fb.height() as f64;

    // Transform every vertex once, then assemble triangles by index
    let clip_vertices: Vec<ClipVertex> = mesh
        .vertices()
        .iter()
        .map(|v| ClipVertex {
            clip: mvp.transform_vec4(Vec4::from_point(v.position)),
            world: model.transform_point(v.position),
            normal: model.transform_direction(v.normal),
        })
        .collect();

    for tri in mesh.tris() {
        let corners = [
            &clip_vertices[tri.indices[0]],
            &clip_vertices[tri.indices[1]],
            &clip_vertices[tri.indices[2]],
        ];

        // Whole-triangle near-plane reject; no clipping fallback
        if corners.iter().any(|c| c.clip.w < MIN_CLIP_W) {
            continue;
        }

        let screen = corners.map(|c| {
            let inv_w = 1.0 / c.clip.w;
            let ndc = c.clip * inv_w;
            ScreenVertex {
                // NDC [-1,1] to pixels, y flipped to top-down rows
                pos: Vec2::new(
                    (ndc.x + 1.0) * 0.5 * width,
                    (1.0 - ndc.y) * 0.5 * height,
                ),
                inv_w,
                world: c.world,
                normal: c.normal,
            }
        });

        rasterize_triangle(fb, &screen, eye, near, far, settings);
    }
}

fn rasterize_triangle(
    fb: &mut Framebuffer,
    tri: &[ScreenVertex; 3],
    eye: Vec3,
    near: f64,
    far: f64,
    settings: &RenderSettings,
) {
    let [a, b, c] = tri;

    // Zero-area triangles would divide the weights by zero
    let area = edge(a.pos, b.pos, c.pos);
    if area.abs() < EPSILON {
        return;
    }

    // Screen bounding box clamped to the viewport; a fully offscreen
    // triangle clamps to an empty range and the loops never run
    let (w, h) = (fb.width() as i64, fb.height() as i64);
    let min_x = (a.pos.x.min(b.pos.x).min(c.pos.x).floor() as i64).clamp(0, w) as i32;
    let max_x = (a.pos.x.max(b.pos.x).max(c.pos.x).ceil() as i64).clamp(-1, w - 1) as i32;
    let min_y = (a.pos.y.min(b.pos.y).min(c.pos.y).floor() as i64).clamp(0, h) as i32;
    let max_y = (a.pos.y.max(b.pos.y).max(c.pos.y).ceil() as i64).clamp(-1, h - 1) as i32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec2::new(x as f64 + 0.5, y as f64 + 0.5);

            // Barycentric weights via the edge functions, normalized by
            // the total signed area so either winding is accepted
            let w0 = edge(b.pos, c.pos, p) / area;
            let w1 = edge(c.pos, a.pos, p) / area;
            let w2 = edge(a.pos, b.pos, p) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            // Interpolated reciprocal depth; larger = closer
            let inv_depth = w0 * a.inv_w + w1 * b.inv_w + w2 * c.inv_w;

            let color = match settings.shading {
                ShadingMode::DepthGray => shade_depth_gray(1.0 / inv_depth, near, far),
                ShadingMode::BlinnPhong => {
                    let position = a.world * w0 + b.world * w1 + c.world * w2;
                    let normal = a.normal * w0 + b.normal * w1 + c.normal * w2;
                    shade_blinn_phong(position, normal, eye, &settings.light, settings.base_color)
                }
            };

            fb.set_pixel_with_depth(x, y, inv_depth, color);
        }
    }
}
