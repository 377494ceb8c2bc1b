//! Scene configuration loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files. Every
//! field is optional in the file and falls back to `SceneConfig::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DemoPrimitive;
use crate::rasterizer::{
    Camera, Color, FilterMode, Light, Material, Quat, RenderResult, RenderState, Vec3, Vec4,
};

/// Camera placement; the orientation is built from heading then pitch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees around world Y
    pub heading: f32,
    /// Degrees around camera X
    pub pitch: f32,
    pub near: f32,
    pub far: f32,
    /// Vertical, in degrees
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, -3.0),
            heading: 0.0,
            pitch: 0.0,
            near: 0.1,
            far: 100.0,
            fov: 60.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self, aspect: f32) -> RenderResult<Camera> {
        let orientation = Quat::rotation_y(self.heading) * Quat::rotation_x(self.pitch);
        Camera::new(self.position, orientation, self.near, self.far, self.fov, aspect)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    pub clear_color: Color,
    pub camera: CameraConfig,
    pub light: Option<Light>,
    pub material: Material,
    pub render_state: RenderState,
    pub texture_filter: FilterMode,
    pub texture_path: Option<String>,
    pub bump_map_path: Option<String>,
    pub primitive: DemoPrimitive,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: crate::rasterizer::WIDTH,
            height: crate::rasterizer::HEIGHT,
            clear_color: Color::new(30, 30, 35),
            camera: CameraConfig::default(),
            light: Some(Light {
                position: Vec3::new(-1.0, 2.0, -2.0),
                ambient: Vec4::rgb(0.2, 0.2, 0.2),
                diffuse: Vec4::rgb(0.7, 0.7, 0.7),
                specular: Vec4::rgb(0.4, 0.4, 0.4),
                attenuation: [1.0, 0.05, 0.01],
            }),
            material: Material {
                ambient: Vec4::new(0.3, 0.3, 0.3, 1.0),
                diffuse: Vec4::new(0.6, 0.8, 0.6, 1.0),
                specular: Vec4::new(0.6, 0.8, 0.6, 1.0),
                emissive: Vec4::ZERO,
                power: 16.0,
            },
            render_state: RenderState::default(),
            texture_filter: FilterMode::Nearest,
            texture_path: None,
            bump_map_path: None,
            primitive: DemoPrimitive::Pyramid,
        }
    }
}

impl SceneConfig {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn build_camera(&self) -> RenderResult<Camera> {
        self.camera.build(self.aspect())
    }
}

/// Load a scene from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> RenderResult<SceneConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents)?;
    log::info!("Loaded scene config from {}", path.display());
    Ok(config)
}

/// Save a scene to a RON file
pub fn save_config<P: AsRef<Path>>(config: &SceneConfig, path: P) -> RenderResult<()> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_config_from_str(s: &str) -> RenderResult<SceneConfig> {
    Ok(ron::from_str(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{RenderError, ShadingMode};

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = load_config_from_str(
            "(width: 160, render_state: (shading_mode: Phong, backface_culling: true, \
             perspective_correct: false, triangle_half: Both))",
        )
        .unwrap();
        assert_eq!(config.width, 160);
        assert_eq!(config.height, crate::rasterizer::HEIGHT);
        assert_eq!(config.render_state.shading_mode, ShadingMode::Phong);
        assert!(!config.render_state.perspective_correct);
        assert_eq!(config.primitive, DemoPrimitive::Pyramid);
    }

    #[test]
    fn test_save_then_load_file() {
        let mut config = SceneConfig::default();
        config.primitive = DemoPrimitive::Cube;
        config.light = None;
        config.texture_path = Some("assets/crate.png".to_string());

        let path = std::env::temp_dir().join(format!("soft-renderer-scene-{}.ron", std::process::id()));
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bundled_scene_parses() {
        let config = load_config_from_str(include_str!("../../assets/scene.ron")).unwrap();
        assert!(config.light.is_some());
        assert_eq!(config.texture_filter, FilterMode::Bilinear);
        assert!(config.render_state.backface_culling);
        assert!(config.build_camera().is_ok());
    }

    #[test]
    fn test_parse_error_reported() {
        let err = load_config_from_str("(width: \"wide\")").unwrap_err();
        assert!(matches!(err, RenderError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config("/nonexistent/scene.ron").unwrap_err();
        assert!(matches!(err, RenderError::ConfigIo(_)));
    }

    #[test]
    fn test_camera_from_config() {
        let mut config = SceneConfig::default();
        assert!(config.build_camera().is_ok());

        config.camera.heading = 90.0;
        let cam = config.build_camera().unwrap();
        let forward = cam.orientation().rotate(Vec3::new(0.0, 0.0, 1.0));
        assert!((forward - Vec3::new(1.0, 0.0, 0.0)).len() < 1e-4);

        config.camera.near = 200.0;
        assert!(matches!(
            config.build_camera(),
            Err(RenderError::InvalidCameraConfig(_))
        ));
    }
}
