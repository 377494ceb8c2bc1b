//! Core types for the rasterizer

use serde::{Deserialize, Serialize};

use super::error::{RenderError, RenderResult};
use super::math::{Vec2, Vec3, Vec4};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Clamp and quantize a normalized color
    pub fn from_normalized(c: Vec4) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Self {
            r: q(c.x),
            g: q(c.y),
            b: q(c.z),
            a: q(c.w),
        }
    }

    pub fn to_normalized(self) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }

    /// Pack as 0xAARRGGBB (framebuffer format)
    pub fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub fn from_argb(p: u32) -> Self {
        Self {
            a: (p >> 24) as u8,
            r: (p >> 16) as u8,
            g: (p >> 8) as u8,
            b: p as u8,
        }
    }

    /// Convert to [u8; 4] for RGBA uploads
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A pipeline vertex. `view_pos` caches the camera-space position for
/// per-pixel lighting; after the viewport transform `position.w` holds 1/w.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Vec4,
    pub view_pos: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2, color: Vec4) -> Self {
        Self {
            position: position.extend(1.0),
            normal,
            uv,
            color,
            view_pos: Vec3::ZERO,
        }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, y, z), Vec3::ZERO, Vec2::ZERO, Vec4::ONE)
    }

    /// Interpolate every attribute with the same parameter
    pub fn lerp(&self, other: &Vertex, k: f32) -> Vertex {
        Vertex {
            position: self.position.lerp(other.position, k),
            normal: self.normal.lerp(other.normal, k),
            uv: self.uv.lerp(other.uv, k),
            color: self.color.lerp(other.color, k),
            view_pos: self.view_pos.lerp(other.view_pos, k),
        }
    }
}

/// Three vertices, post-clip
pub type Triangle = [Vertex; 3];

/// Surface response to light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emissive: Vec4,
    /// Specular exponent
    pub power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec4::ONE,
            diffuse: Vec4::ONE,
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emissive: Vec4::new(0.0, 0.0, 0.0, 0.0),
            power: 1.0,
        }
    }
}

/// Point light with distance attenuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    /// Constant, linear and quadratic attenuation coefficients
    pub attenuation: [f32; 3],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Vec4::rgb(0.2, 0.2, 0.2),
            diffuse: Vec4::rgb(0.7, 0.7, 0.7),
            specular: Vec4::rgb(0.0, 0.0, 0.0),
            attenuation: [1.0, 0.0, 0.0],
        }
    }
}

impl Light {
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }
}

/// A list of independent triangles (every 3 vertices form one triangle).
/// Normals, UVs and colors may be left empty; otherwise they must match
/// the position count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Vec4>,
    pub material: Option<Material>,
}

impl Primitive {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = uvs;
        self
    }

    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Vertex count
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Move the buffers out, leaving this primitive empty
    pub fn take(&mut self) -> Primitive {
        std::mem::take(self)
    }

    pub fn clear(&mut self) {
        *self = Primitive::default();
    }

    pub fn validate(&self) -> RenderResult<()> {
        let n = self.positions.len();
        if n % 3 != 0 {
            return Err(RenderError::MalformedPrimitive(format!(
                "vertex count {} is not a multiple of 3",
                n
            )));
        }
        let check = |name: &str, len: usize| {
            if len != 0 && len != n {
                Err(RenderError::MalformedPrimitive(format!(
                    "{} has {} entries, expected {}",
                    name, len, n
                )))
            } else {
                Ok(())
            }
        };
        check("normals", self.normals.len())?;
        check("uvs", self.uvs.len())?;
        check("colors", self.colors.len())?;
        Ok(())
    }

    /// Build the pipeline vertex for index `i` (missing attributes default)
    pub fn vertex(&self, i: usize) -> Vertex {
        Vertex::new(
            self.positions[i],
            self.normals.get(i).copied().unwrap_or(Vec3::ZERO),
            self.uvs.get(i).copied().unwrap_or(Vec2::ZERO),
            self.colors.get(i).copied().unwrap_or(Vec4::ONE),
        )
    }

    /// Replace normals with per-face normals (cross of the first two edges)
    pub fn generate_face_normals(&mut self) {
        self.normals = self
            .positions
            .chunks_exact(3)
            .flat_map(|t| {
                let n = (t[1] - t[0]).cross(t[2] - t[0]).normalize();
                [n, n, n]
            })
            .collect();
    }
}

/// Shading mode, selected per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    Frame,      // Wireframe edges
    NoLighting, // Filled, raw vertex colors
    Flat,       // One light calculation per face
    Gouraud,    // Per-vertex lighting, interpolated
    Phong,      // Per-pixel lighting
}

impl ShadingMode {
    pub fn next(self) -> Self {
        match self {
            ShadingMode::Frame => ShadingMode::NoLighting,
            ShadingMode::NoLighting => ShadingMode::Flat,
            ShadingMode::Flat => ShadingMode::Gouraud,
            ShadingMode::Gouraud => ShadingMode::Phong,
            ShadingMode::Phong => ShadingMode::Frame,
        }
    }

    pub fn is_filled(self) -> bool {
        self != ShadingMode::Frame
    }

    pub fn is_lit(self) -> bool {
        matches!(self, ShadingMode::Flat | ShadingMode::Gouraud | ShadingMode::Phong)
    }
}

/// Which half of a split triangle gets filled (debug aid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriangleHalf {
    Both,
    UpOnly,   // Flat-bottom part (apex on top)
    DownOnly, // Flat-top part (apex at the bottom)
}

impl TriangleHalf {
    pub fn next(self) -> Self {
        match self {
            TriangleHalf::Both => TriangleHalf::UpOnly,
            TriangleHalf::UpOnly => TriangleHalf::DownOnly,
            TriangleHalf::DownOnly => TriangleHalf::Both,
        }
    }

    pub fn draws_up(self) -> bool {
        self != TriangleHalf::DownOnly
    }

    pub fn draws_down(self) -> bool {
        self != TriangleHalf::UpOnly
    }
}

/// Per-draw pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub shading_mode: ShadingMode,
    pub backface_culling: bool,
    /// Interpolate attributes over w (false = affine, warpy textures)
    pub perspective_correct: bool,
    pub triangle_half: TriangleHalf,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            shading_mode: ShadingMode::Gouraud,
            backface_culling: false,
            perspective_correct: true,
            triangle_half: TriangleHalf::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        let c = Color::with_alpha(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_argb(), 0x7812_3456);
        assert_eq!(Color::from_argb(0x7812_3456), c);
    }

    #[test]
    fn test_from_normalized_clamps() {
        let c = Color::from_normalized(Vec4::new(1.5, -0.2, 0.5, 1.0));
        assert_eq!(c, Color::with_alpha(255, 0, 128, 255));
    }

    #[test]
    fn test_validate_rejects_partial_triangle() {
        let p = Primitive::new(vec![Vec3::ZERO; 4]);
        assert!(matches!(p.validate(), Err(RenderError::MalformedPrimitive(_))));
    }

    #[test]
    fn test_validate_rejects_mismatched_attributes() {
        let p = Primitive::new(vec![Vec3::ZERO; 3]).with_uvs(vec![Vec2::ZERO; 2]);
        assert!(p.validate().is_err());
        let ok = Primitive::new(vec![Vec3::ZERO; 3]).with_colors(vec![Vec4::ONE; 3]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let mut p = Primitive::new(vec![Vec3::UP; 3])
            .with_colors(vec![Vec4::ONE; 3])
            .with_material(Material::default());
        let moved = p.take();
        assert_eq!(moved.size(), 3);
        assert!(moved.material.is_some());
        assert!(p.is_empty());
        assert!(p.colors.is_empty() && p.material.is_none());
    }

    #[test]
    fn test_missing_attributes_default() {
        let p = Primitive::new(vec![Vec3::new(1.0, 2.0, 3.0); 3]);
        let v = p.vertex(1);
        assert_eq!(v.position, Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(v.color, Vec4::ONE);
        assert_eq!(v.uv, Vec2::ZERO);
    }

    #[test]
    fn test_face_normals() {
        let mut p = Primitive::new(vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ]);
        p.generate_face_normals();
        assert_eq!(p.normals.len(), 3);
        assert!((p.normals[0].z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shading_mode_cycle() {
        let mut m = ShadingMode::Frame;
        for _ in 0..5 {
            m = m.next();
        }
        assert_eq!(m, ShadingMode::Frame);
        assert!(!ShadingMode::NoLighting.is_lit());
        assert!(ShadingMode::Phong.is_filled());
    }
}
