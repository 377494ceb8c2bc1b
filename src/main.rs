//! Soft Renderer demo
//!
//! Renders one built-in primitive per frame through the software pipeline
//! and blits the finished framebuffer to the window.
//!
//! Keys: WASD/QE move, arrows look, R reset camera, B culling, L shading
//! mode, `-` perspective correction, `=` triangle half, `0` texture filter,
//! P next primitive, Esc quit. `RUST_LOG=debug` prints per-frame stats.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::path::Path;

use macroquad::prelude::*;
use soft_renderer::rasterizer::{self, Renderer, Texture, Vec3, HEIGHT, WIDTH};
use soft_renderer::scene::{load_config, FpsCounter, SceneConfig};

const SCENE_PATH: &str = "assets/scene.ron";
/// World units per second
const MOVE_SPEED: f32 = 2.0;
/// Degrees per second
const TURN_SPEED: f32 = 90.0;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Soft Renderer v{}", VERSION),
        window_width: WIDTH as i32 * 3,
        window_height: HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_scene() -> SceneConfig {
    if !Path::new(SCENE_PATH).exists() {
        log::info!("No {}, using the default scene", SCENE_PATH);
        return SceneConfig::default();
    }
    match load_config(SCENE_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load {}: {}, using the default scene", SCENE_PATH, e);
            SceneConfig::default()
        }
    }
}

fn load_texture_or_checker(path: Option<&str>) -> Texture {
    let checker = || {
        Texture::checkerboard(
            64,
            64,
            rasterizer::Color::new(230, 230, 230),
            rasterizer::Color::new(60, 90, 160),
        )
    };
    match path {
        Some(p) => Texture::from_file(p).unwrap_or_else(|e| {
            log::warn!("{}, using checkerboard", e);
            checker()
        }),
        None => checker(),
    }
}

/// Camera-relative movement from WASD/QE
fn movement_input() -> Vec3 {
    let mut v = Vec3::ZERO;
    if is_key_down(KeyCode::W) {
        v.z += 1.0;
    }
    if is_key_down(KeyCode::S) {
        v.z -= 1.0;
    }
    if is_key_down(KeyCode::D) {
        v.x += 1.0;
    }
    if is_key_down(KeyCode::A) {
        v.x -= 1.0;
    }
    if is_key_down(KeyCode::E) {
        v.y += 1.0;
    }
    if is_key_down(KeyCode::Q) {
        v.y -= 1.0;
    }
    v
}

/// (heading, pitch) direction from the arrow keys
fn look_input() -> (f32, f32) {
    let mut heading = 0.0;
    let mut pitch = 0.0;
    if is_key_down(KeyCode::Left) {
        heading -= 1.0;
    }
    if is_key_down(KeyCode::Right) {
        heading += 1.0;
    }
    if is_key_down(KeyCode::Up) {
        pitch -= 1.0;
    }
    if is_key_down(KeyCode::Down) {
        pitch += 1.0;
    }
    (heading, pitch)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let config = load_scene();
    let mut camera = match config.build_camera() {
        Ok(cam) => cam,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    let mut renderer = Renderer::new(config.width, config.height);
    renderer.set_light(config.light);
    renderer.set_texture(Some(
        load_texture_or_checker(config.texture_path.as_deref()).with_filter(config.texture_filter),
    ));
    renderer.set_bump_map(config.bump_map_path.as_deref().and_then(|p| match Texture::from_file(p) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("{}, bump mapping disabled", e);
            None
        }
    }));

    let mut state = config.render_state;
    let mut kind = config.primitive;
    let mut primitive = kind.build().with_material(config.material);
    let mut fps = FpsCounter::new();
    let mut rgba = Vec::new();

    log::info!("=== Soft Renderer v{} ===", VERSION);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        let dt = get_frame_time();

        let step = movement_input();
        if step != Vec3::ZERO {
            camera.move_by(step.normalize() * (MOVE_SPEED * dt));
        }
        let (heading, pitch) = look_input();
        if heading != 0.0 || pitch != 0.0 {
            camera.rotate(heading * TURN_SPEED * dt, pitch * TURN_SPEED * dt);
        }
        if is_key_pressed(KeyCode::R) {
            camera.reset();
        }
        if is_key_pressed(KeyCode::B) {
            state.backface_culling = !state.backface_culling;
        }
        if is_key_pressed(KeyCode::L) {
            state.shading_mode = state.shading_mode.next();
        }
        if is_key_pressed(KeyCode::Minus) {
            state.perspective_correct = !state.perspective_correct;
        }
        if is_key_pressed(KeyCode::Equal) {
            state.triangle_half = state.triangle_half.next();
        }
        if is_key_pressed(KeyCode::Key0) {
            if let Some(tex) = renderer.texture_mut() {
                tex.set_filter(tex.filter().toggle());
            }
        }
        if is_key_pressed(KeyCode::P) {
            kind = kind.next();
            primitive = kind.build().with_material(config.material);
        }

        renderer.begin_frame(&camera, config.clear_color);
        if let Err(e) = renderer.draw_primitive(&primitive, &state) {
            log::error!("{}", e);
        }
        let rasterized = renderer.frame().rasterized;
        let fb = renderer.end_frame();
        fb.write_rgba8(&mut rgba);

        clear_background(BLACK);

        // Fit the framebuffer to the window, keeping its aspect
        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let draw_w = fb.width as f32 * scale;
        let draw_h = fb.height as f32 * scale;
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &rgba);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            (screen_width() - draw_w) * 0.5,
            (screen_height() - draw_h) * 0.5,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        let filter = renderer.texture().map(|t| t.filter()).unwrap_or_default();
        draw_text(
            &format!(
                "{} | {:?} | cull {} | persp {} | half {:?} | {:?} | {} tris | {:.0} fps",
                kind.name(),
                state.shading_mode,
                state.backface_culling,
                state.perspective_correct,
                state.triangle_half,
                filter,
                rasterized,
                fps.tick(dt),
            ),
            10.0,
            20.0,
            18.0,
            Color::from_rgba(220, 220, 220, 255),
        );

        next_frame().await;
    }
}
