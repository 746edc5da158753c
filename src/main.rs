//! Facet Engine: a software 3D rasterizer
//!
//! Everything is drawn on the CPU: meshes go through a
//! model-view-projection pipeline into a depth-tested framebuffer, which
//! is blitted to the window each frame. This file is the window shell —
//! event polling, camera controls, presentation; the pipeline itself
//! lives in the other modules.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod math;
mod mesh;
mod render;
mod scene;

use macroquad::prelude::*;

use math::{Rotation, Vec3};
use mesh::{load_obj, Mesh};
use render::{render_mesh, Framebuffer, ShadingMode, HEIGHT, HEIGHT_HI, WIDTH, WIDTH_HI};
use scene::{camera_rotation, load_scene, Object, SceneFile};

const SCENE_PATH: &str = "assets/scenes/default.ron";

const MOVE_SPEED: f64 = 4.0;
const LOOK_SENSITIVITY: f64 = 0.25;
const FOV_WHEEL_STEP: f64 = 2.0;
const SPIN_DEG_PER_SEC: f64 = 30.0;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Facet Engine v{}", VERSION),
        window_width: WIDTH_HI as i32 * 2,
        window_height: HEIGHT_HI as i32 * 2,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Resolve the scene's mesh reference, falling back to the built-in cube
/// so the window never comes up empty.
fn load_scene_mesh(scene: &SceneFile) -> Mesh {
    match &scene.mesh {
        Some(path) => match load_obj(path) {
            Ok(mesh) => {
                println!(
                    "Loaded mesh {} ({} vertices, {} tris)",
                    path,
                    mesh.num_vertices(),
                    mesh.tris().len()
                );
                mesh
            }
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                Mesh::unit_cube()
            }
        },
        None => Mesh::unit_cube(),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let scene = match load_scene(SCENE_PATH) {
        Ok(scene) => {
            println!("Loaded scene {}", SCENE_PATH);
            scene
        }
        Err(e) => {
            println!("No scene at {} ({}), using defaults", SCENE_PATH, e);
            SceneFile::default()
        }
    };

    let mut mesh = load_scene_mesh(&scene);
    let mut camera = scene.camera.build();
    let mut settings = scene.settings.clone();
    let mut yaw_deg = scene.camera.yaw_deg;
    let mut pitch_deg = scene.camera.pitch_deg;

    // The rendered model is an Object so spin accumulates on its transform
    let mut model = Object::new();
    let mut spinning = true;

    let mut fb = Framebuffer::new(WIDTH_HI, HEIGHT_HI);
    let mut last_mouse = mouse_position();

    println!("=== Facet Engine ===");
    println!("WASD/QE move, right-drag look, wheel FOV");
    println!("Tab shading, L resolution, Space spin, F12 screenshot, R reload");

    loop {
        let dt = get_frame_time() as f64;

        // Resize only between frames, never mid-render
        let (target_w, target_h) = if settings.low_resolution {
            (WIDTH, HEIGHT)
        } else {
            (WIDTH_HI, HEIGHT_HI)
        };
        if fb.width() != target_w || fb.height() != target_h {
            fb.set_size(target_w, target_h);
        }

        // Mouse look while the right button is held
        let mouse = mouse_position();
        if is_mouse_button_down(MouseButton::Right) {
            let dx = (mouse.0 - last_mouse.0) as f64;
            let dy = (mouse.1 - last_mouse.1) as f64;
            yaw_deg -= dx * LOOK_SENSITIVITY;
            pitch_deg = (pitch_deg - dy * LOOK_SENSITIVITY).clamp(-89.0, 89.0);
            camera
                .object_mut()
                .transform_mut()
                .set_rotation(camera_rotation(yaw_deg, pitch_deg));
        }
        last_mouse = mouse;

        // Wheel zooms by narrowing the field of view
        let wheel = mouse_wheel().1 as f64;
        if wheel != 0.0 {
            camera.set_field_of_view(camera.field_of_view() - wheel * FOV_WHEEL_STEP);
        }

        // Fly movement along the camera basis
        let mut delta = Vec3::ZERO;
        if is_key_down(KeyCode::W) {
            delta += camera.forward();
        }
        if is_key_down(KeyCode::S) {
            delta -= camera.forward();
        }
        if is_key_down(KeyCode::A) {
            delta -= camera.right();
        }
        if is_key_down(KeyCode::D) {
            delta += camera.right();
        }
        if is_key_down(KeyCode::Q) {
            delta -= camera.up();
        }
        if is_key_down(KeyCode::E) {
            delta += camera.up();
        }
        if delta != Vec3::ZERO {
            camera.move_by(delta.normalized() * (MOVE_SPEED * dt));
        }

        if is_key_pressed(KeyCode::Tab) {
            settings.shading = match settings.shading {
                ShadingMode::DepthGray => ShadingMode::BlinnPhong,
                ShadingMode::BlinnPhong => ShadingMode::DepthGray,
            };
        }
        if is_key_pressed(KeyCode::L) {
            settings.low_resolution = !settings.low_resolution;
        }
        if is_key_pressed(KeyCode::Space) {
            spinning = !spinning;
        }
        if is_key_pressed(KeyCode::F12) {
            match fb.save_png("screenshot.png") {
                Ok(()) => println!("Saved screenshot.png"),
                Err(e) => eprintln!("Screenshot failed: {}", e),
            }
        }
        if is_key_pressed(KeyCode::R) {
            match load_scene(SCENE_PATH) {
                Ok(reloaded) => {
                    mesh = load_scene_mesh(&reloaded);
                    camera = reloaded.camera.build();
                    settings = reloaded.settings.clone();
                    yaw_deg = reloaded.camera.yaw_deg;
                    pitch_deg = reloaded.camera.pitch_deg;
                    model = Object::new();
                    println!("Reloaded {}", SCENE_PATH);
                }
                Err(e) => eprintln!("Reload failed: {}", e),
            }
        }

        if spinning {
            model.add_rotation(Rotation::new(Vec3::UP, SPIN_DEG_PER_SEC * dt));
        }

        // Render the frame
        fb.begin_frame(settings.background);
        render_mesh(&mut fb, &mesh, &model.transform().matrix(), &camera, &settings);

        // Present: letterboxed blit of the framebuffer
        clear_background(Color::from_rgba(10, 10, 12, 255));
        let screen_w = screen_width();
        let screen_h = screen_height();
        let fb_aspect = fb.width() as f32 / fb.height() as f32;
        let screen_aspect = screen_w / screen_h;
        let (draw_w, draw_h, draw_x, draw_y) = if fb_aspect > screen_aspect {
            let w = screen_w;
            let h = screen_w / fb_aspect;
            (w, h, 0.0, (screen_h - h) * 0.5)
        } else {
            let h = screen_h;
            let w = screen_h * fb_aspect;
            (w, h, (screen_w - w) * 0.5, 0.0)
        };

        let texture =
            Texture2D::from_rgba8(fb.width() as u16, fb.height() as u16, &fb.to_rgba_bytes());
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        let shading = match settings.shading {
            ShadingMode::DepthGray => "depth",
            ShadingMode::BlinnPhong => "blinn-phong",
        };
        draw_text(
            &format!(
                "{}x{} | {} | fov {:.0} | {} fps",
                fb.width(),
                fb.height(),
                shading,
                camera.field_of_view(),
                get_fps()
            ),
            8.0,
            20.0,
            20.0,
            WHITE,
        );

        next_frame().await;
    }
}
