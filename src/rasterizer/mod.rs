//! Software rasterizer
//!
//! A fixed-function forward pipeline running entirely on the CPU:
//! - Camera-space transform with inverse-transpose normals
//! - Flat, Gouraud and per-pixel (Phong) lighting from one point light
//! - Frustum rejection, backface culling and near-plane clipping
//! - Perspective-correct scanline fill against a 1/z buffer
//! - Nearest/bilinear texturing and optional bump mapping
//! - Wireframe via Liang-Barsky clipped DDA lines

mod camera;
mod clip;
mod error;
mod framebuffer;
mod lighting;
mod math;
mod raster;
mod render;
mod texture;
mod types;

pub use camera::*;
pub use clip::*;
pub use error::*;
pub use framebuffer::*;
pub use lighting::*;
pub use math::*;
pub use raster::*;
pub use render::*;
pub use texture::*;
pub use types::*;

/// Default framebuffer size
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
