//! Textures and filtered sampling

use serde::{Deserialize, Serialize};

use super::error::{RenderError, RenderResult};
use super::math::Vec4;
use super::types::Color;

/// Texel filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    Nearest,
    Bilinear,
}

impl FilterMode {
    pub fn toggle(self) -> Self {
        match self {
            FilterMode::Nearest => FilterMode::Bilinear,
            FilterMode::Bilinear => FilterMode::Nearest,
        }
    }
}

/// RGBA8 texture. UVs are clamped to [0, 1]; there is no wrap mode.
#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    name: String,
    filter: FilterMode,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
            filter: FilterMode::Nearest,
        }
    }

    /// Wrap a row-major texel buffer; its length must be `width * height`
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> RenderResult<Self> {
        if pixels.len() != width * height {
            return Err(RenderError::InvalidTexture(format!(
                "{} texels for a {}x{} texture",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            name: String::new(),
            filter: FilterMode::Nearest,
        })
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| RenderError::TextureLoad {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name);
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
            filter: FilterMode::Nearest,
        }
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self {
            width,
            height,
            pixels,
            name: "checkerboard".to_string(),
            filter: FilterMode::Nearest,
        }
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Get pixel at x,y coordinates (clamped to the edge, white if missing)
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if self.is_empty() {
            return Color::WHITE;
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels.get(y * self.width + x).copied().unwrap_or(Color::WHITE)
    }

    /// Sample with this texture's filter mode, returning normalized RGBA
    pub fn get_data_uv(&self, u: f32, v: f32) -> Vec4 {
        match self.filter {
            FilterMode::Nearest => self.sample_nearest(u, v),
            FilterMode::Bilinear => self.sample_bilinear(u, v),
        }
    }

    pub fn sample_nearest(&self, u: f32, v: f32) -> Vec4 {
        if self.is_empty() {
            return Vec4::ONE;
        }
        let u = clamp_uv(u);
        let v = clamp_uv(v);
        let tx = (u * (self.width - 1) as f32).round() as usize;
        let ty = (v * (self.height - 1) as f32).round() as usize;
        self.get_pixel(tx, ty).to_normalized()
    }

    pub fn sample_bilinear(&self, u: f32, v: f32) -> Vec4 {
        if self.is_empty() {
            return Vec4::ONE;
        }
        let fx = clamp_uv(u) * (self.width - 1) as f32;
        let fy = clamp_uv(v) * (self.height - 1) as f32;
        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let top = self
            .get_pixel(x0, y0)
            .to_normalized()
            .lerp(self.get_pixel(x1, y0).to_normalized(), tx);
        let bottom = self
            .get_pixel(x0, y1)
            .to_normalized()
            .lerp(self.get_pixel(x1, y1).to_normalized(), tx);
        top.lerp(bottom, ty)
    }

    /// Greyscale height in [0, 1] (bump maps)
    pub fn height_at(&self, u: f32, v: f32) -> f32 {
        let c = self.get_data_uv(u, v);
        0.299 * c.x + 0.587 * c.y + 0.114 * c.z
    }
}

fn clamp_uv(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Texture {
        Texture::from_pixels(
            2,
            2,
            vec![Color::BLACK, Color::WHITE, Color::RED, Color::BLUE],
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_corners() {
        let t = two_by_two();
        assert_eq!(t.sample_nearest(0.0, 0.0), Color::BLACK.to_normalized());
        assert_eq!(t.sample_nearest(1.0, 0.0), Color::WHITE.to_normalized());
        assert_eq!(t.sample_nearest(0.0, 1.0), Color::RED.to_normalized());
        assert_eq!(t.sample_nearest(1.0, 1.0), Color::BLUE.to_normalized());
    }

    #[test]
    fn test_uv_clamped() {
        let t = two_by_two();
        assert_eq!(t.sample_nearest(-3.0, 7.0), Color::RED.to_normalized());
        assert_eq!(t.sample_bilinear(2.0, -1.0), Color::WHITE.to_normalized());
    }

    #[test]
    fn test_bilinear_blends_four_texels() {
        let t = two_by_two().with_filter(FilterMode::Bilinear);
        let c = t.get_data_uv(0.5, 0.5);
        // Average of black, white, red, blue
        assert!((c.x - 0.5).abs() < 1e-5);
        assert!((c.y - 0.25).abs() < 1e-5);
        assert!((c.z - 0.5).abs() < 1e-5);
        assert!((c.w - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_bilinear_along_row() {
        let t = two_by_two().with_filter(FilterMode::Bilinear);
        let c = t.get_data_uv(0.25, 0.0);
        assert!((c.x - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_empty_texture_samples_white() {
        let t = Texture::from_pixels(0, 0, Vec::new()).unwrap();
        assert_eq!(t.get_data_uv(0.3, 0.3), Vec4::ONE);
    }

    #[test]
    fn test_short_texel_buffer_rejected() {
        let err = Texture::from_pixels(4, 4, vec![Color::WHITE; 3]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTexture(_)));
        assert!(Texture::from_pixels(2, 3, vec![Color::RED; 6]).is_ok());
    }

    #[test]
    fn test_far_corner_sampling_stays_in_bounds() {
        let mut t = two_by_two();
        t.set_filter(FilterMode::Bilinear);
        assert_eq!(t.get_data_uv(1.0, 1.0), Color::BLUE.to_normalized());
        assert_eq!(t.get_pixel(50, 50), Color::BLUE);
    }

    #[test]
    fn test_checkerboard_pattern() {
        let t = Texture::checkerboard(8, 8, Color::WHITE, Color::BLACK);
        assert_eq!(t.get_pixel(0, 0), Color::WHITE);
        assert_eq!(t.get_pixel(4, 0), Color::BLACK);
        assert_eq!(t.get_pixel(4, 4), Color::WHITE);
    }

    #[test]
    fn test_height_of_white_is_one() {
        let t = Texture::new(4, 4);
        assert!((t.height_at(0.5, 0.5) - 1.0).abs() < 1e-3);
    }
}
