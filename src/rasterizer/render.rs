//! The frame pipeline: begin_frame / draw_primitive / end_frame
//!
//! Each draw call copies the primitive into scratch vertices, then runs
//! ModelView -> Lighting -> Clip -> Project -> Rasterize on them.

use super::camera::Camera;
use super::clip::{clip_triangle, is_backface, Frustum};
use super::error::RenderResult;
use super::framebuffer::Framebuffer;
use super::lighting::{apply_lighting, model_view_transform};
use super::math::{Mat4, Vec4};
use super::raster::{draw_triangle, draw_wireframe, viewport_transform, RasterParams};
use super::texture::Texture;
use super::types::{Color, Light, Primitive, RenderState, Triangle, Vertex};

/// Per-frame statistics, reset by `begin_frame`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameContext {
    /// Frames begun since the renderer was created (not reset)
    pub frame_index: u64,
    pub primitives: usize,
    pub triangles_in: usize,
    pub rejected: usize, // outside the frustum
    pub culled: usize,   // backfaces
    pub clipped: usize,  // triangles leaving the near-plane clipper
    pub rasterized: usize,
    pub degenerate: usize,
    pub skipped: usize, // failed a pipeline precondition
}

impl FrameContext {
    fn reset(&mut self) {
        *self = FrameContext {
            frame_index: self.frame_index + 1,
            ..Default::default()
        };
    }
}

pub struct Renderer {
    framebuffer: Framebuffer,
    light: Option<Light>,
    view_light: Option<Light>,
    texture: Option<Texture>,
    bump_map: Option<Texture>,
    view: Mat4,
    projection: Mat4,
    frustum: Frustum,
    frame: FrameContext,
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        let aspect = if height > 0 { width as f32 / height as f32 } else { 1.0 };
        Self {
            framebuffer: Framebuffer::new(width, height),
            light: None,
            view_light: None,
            texture: None,
            bump_map: None,
            view: Mat4::IDENTITY,
            projection: Mat4::perspective_lh(0.1, 100.0, std::f32::consts::FRAC_PI_2, aspect),
            frustum: Frustum {
                slope_x: aspect,
                slope_y: 1.0,
                far: Some(100.0),
            },
            frame: FrameContext::default(),
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height
    }

    pub fn frame(&self) -> &FrameContext {
        &self.frame
    }

    pub fn light(&self) -> Option<&Light> {
        self.light.as_ref()
    }

    /// Replace (or remove) the light. Takes effect immediately, even mid-frame.
    pub fn set_light(&mut self, light: Option<Light>) {
        self.light = light;
        self.view_light = light.map(|l| light_to_view(&l, &self.view));
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn texture_mut(&mut self) -> Option<&mut Texture> {
        self.texture.as_mut()
    }

    pub fn set_texture(&mut self, texture: Option<Texture>) {
        self.texture = texture;
    }

    pub fn set_bump_map(&mut self, bump_map: Option<Texture>) {
        self.bump_map = bump_map;
    }

    /// Latch the camera, move the light into camera space and clear both buffers
    pub fn begin_frame(&mut self, camera: &Camera, clear: Color) {
        self.view = camera.model_view_matrix();
        self.projection = camera.perspective_matrix();
        self.frustum = Frustum::from_camera(camera);
        self.view_light = self.light.map(|l| light_to_view(&l, &self.view));
        self.framebuffer.clear(clear);
        self.frame.reset();
    }

    /// Run one triangle list through the pipeline. Only a malformed primitive
    /// is an error; individual bad triangles are skipped and counted.
    pub fn draw_primitive(&mut self, primitive: &Primitive, state: &RenderState) -> RenderResult<()> {
        if let Err(e) = primitive.validate() {
            log::warn!("Rejected primitive: {}", e);
            return Err(e);
        }
        self.frame.primitives += 1;
        let material = primitive.material.unwrap_or_default();

        self.vertices.clear();
        self.vertices.extend((0..primitive.size()).map(|i| primitive.vertex(i)));
        model_view_transform(&mut self.vertices, &self.view);
        if state.shading_mode.is_lit() {
            apply_lighting(
                &mut self.vertices,
                state.shading_mode,
                self.view_light.as_ref(),
                &material,
            );
        }

        self.triangles.clear();
        for tri in self.vertices.chunks_exact(3) {
            self.frame.triangles_in += 1;
            if self.frustum.rejects(tri) {
                self.frame.rejected += 1;
                continue;
            }
            if state.backface_culling && is_backface(tri) {
                self.frame.culled += 1;
                continue;
            }
            if let Err(e) = clip_triangle(tri, &mut self.triangles) {
                log::warn!("Skipping triangle: {}", e);
                self.frame.skipped += 1;
            }
        }
        self.frame.clipped += self.triangles.len();

        let width = self.framebuffer.width as f32;
        let height = self.framebuffer.height as f32;
        let params = RasterParams {
            shading_mode: state.shading_mode,
            perspective_correct: state.perspective_correct,
            triangle_half: state.triangle_half,
            light: self.view_light.as_ref(),
            material: &material,
            texture: self.texture.as_ref().filter(|_| !primitive.uvs.is_empty()),
            bump_map: self.bump_map.as_ref().filter(|_| !primitive.uvs.is_empty()),
        };

        for tri in self.triangles.iter_mut() {
            let projected = tri.iter_mut().try_for_each(|v| {
                v.position = self.projection.transform(v.position);
                viewport_transform(v, width, height)
            });
            if let Err(e) = projected {
                log::warn!("Skipping triangle: {}", e);
                self.frame.skipped += 1;
                continue;
            }

            if !state.shading_mode.is_filled() {
                draw_wireframe(&mut self.framebuffer, tri);
                self.frame.rasterized += 1;
            } else if draw_triangle(&mut self.framebuffer, tri, &params) {
                self.frame.rasterized += 1;
            } else {
                self.frame.degenerate += 1;
            }
        }
        Ok(())
    }

    /// Finish the frame and hand the pixels to presentation
    pub fn end_frame(&mut self) -> &Framebuffer {
        let f = &self.frame;
        log::debug!(
            "Frame {}: {} primitives, {} triangles in, {} rejected, {} culled, {} after clip, {} rasterized, {} degenerate, {} skipped",
            f.frame_index,
            f.primitives,
            f.triangles_in,
            f.rejected,
            f.culled,
            f.clipped,
            f.rasterized,
            f.degenerate,
            f.skipped
        );
        &self.framebuffer
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }
}

fn light_to_view(light: &Light, view: &Mat4) -> Light {
    let p = light.position;
    Light {
        position: view.transform(Vec4::new(p.x, p.y, p.z, 1.0)).xyz(),
        ..*light
    }
}
