//! Screen mapping and scanline rasterization
//!
//! Triangles arrive here clipped and projected. Filled modes walk the two
//! edges of each flat-top/flat-bottom half at pixel centers (top-left fill),
//! carrying 1/w and every attribute as linear accumulators; wireframe mode
//! draws clipped DDA lines without depth.

use std::ops::{Add, Mul, Sub};

use super::clip::clip_line_2d;
use super::error::{RenderError, RenderResult};
use super::framebuffer::Framebuffer;
use super::lighting::shade;
use super::math::{Vec2, Vec3, Vec4};
use super::texture::Texture;
use super::types::{Color, Light, Material, ShadingMode, Triangle, TriangleHalf, Vertex};

/// Normal tilt per unit of height difference between neighbouring texels
pub const BUMP_STRENGTH: f32 = 2.0;

/// Perspective divide and NDC -> pixel mapping. Afterwards `position.w`
/// holds 1/w and `position.z` the NDC depth.
pub fn viewport_transform(v: &mut Vertex, width: f32, height: f32) -> RenderResult<()> {
    let w = v.position.w;
    if !(w > 0.0) {
        return Err(RenderError::DegenerateGeometry(format!(
            "cannot divide by w = {}",
            w
        )));
    }
    let rhw = 1.0 / w;
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    v.position = Vec4::new(
        v.position.x * rhw * half_w + half_w,
        -v.position.y * rhw * half_h + half_h,
        v.position.z * rhw,
        rhw,
    );
    Ok(())
}

/// Screen position (x, y, ndc z, 1/w) back to clip space
pub fn inverse_viewport(p: Vec4, width: f32, height: f32) -> Vec4 {
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    let w = 1.0 / p.w;
    let ndc_x = (p.x - half_w) / half_w;
    let ndc_y = -(p.y - half_h) / half_h;
    Vec4::new(ndc_x * w, ndc_y * w, p.z * w, w)
}

/// Everything a filled triangle needs besides its vertices
pub struct RasterParams<'a> {
    pub shading_mode: ShadingMode,
    pub perspective_correct: bool,
    pub triangle_half: TriangleHalf,
    /// Camera-space light, used only by per-pixel shading
    pub light: Option<&'a Light>,
    pub material: &'a Material,
    pub texture: Option<&'a Texture>,
    pub bump_map: Option<&'a Texture>,
}

/// Per-pixel interpolants. In perspective mode every attribute is stored
/// pre-multiplied by 1/w so screen-space interpolation stays exact.
#[derive(Debug, Clone, Copy)]
struct Varyings {
    x: f32,
    y: f32,
    rhw: f32,
    normal: Vec3,
    uv: Vec2,
    color: Vec4,
    view_pos: Vec3,
}

impl Varyings {
    fn from_vertex(v: &Vertex, perspective_correct: bool) -> Self {
        let rhw = v.position.w;
        let s = if perspective_correct { rhw } else { 1.0 };
        Self {
            x: v.position.x,
            y: v.position.y,
            rhw,
            normal: v.normal * s,
            uv: v.uv * s,
            color: v.color * s,
            view_pos: v.view_pos * s,
        }
    }

    fn lerp(self, other: Varyings, k: f32) -> Varyings {
        self + (other - self) * k
    }
}

impl Add for Varyings {
    type Output = Varyings;
    fn add(self, o: Varyings) -> Varyings {
        Varyings {
            x: self.x + o.x,
            y: self.y + o.y,
            rhw: self.rhw + o.rhw,
            normal: self.normal + o.normal,
            uv: self.uv + o.uv,
            color: self.color + o.color,
            view_pos: self.view_pos + o.view_pos,
        }
    }
}

impl Sub for Varyings {
    type Output = Varyings;
    fn sub(self, o: Varyings) -> Varyings {
        Varyings {
            x: self.x - o.x,
            y: self.y - o.y,
            rhw: self.rhw - o.rhw,
            normal: self.normal - o.normal,
            uv: self.uv - o.uv,
            color: self.color - o.color,
            view_pos: self.view_pos - o.view_pos,
        }
    }
}

impl Mul<f32> for Varyings {
    type Output = Varyings;
    fn mul(self, s: f32) -> Varyings {
        Varyings {
            x: self.x * s,
            y: self.y * s,
            rhw: self.rhw * s,
            normal: self.normal * s,
            uv: self.uv * s,
            color: self.color * s,
            view_pos: self.view_pos * s,
        }
    }
}

/// One triangle edge stepped a scanline at a time
struct Edge {
    cur: Varyings,
    step: Varyings,
}

impl Edge {
    /// Edge from `top` to `bottom`, positioned on the row whose center is `y`
    fn new(top: Varyings, bottom: Varyings, y: f32) -> Self {
        let step = (bottom - top) * (1.0 / (bottom.y - top.y));
        Self {
            cur: top + step * (y - top.y),
            step,
        }
    }

    fn advance(&mut self) {
        self.cur = self.cur + self.step;
    }
}

/// Fill a screen-space triangle. Returns false when the triangle covers no
/// pixel rows or columns and was skipped.
pub fn draw_triangle(fb: &mut Framebuffer, tri: &Triangle, params: &RasterParams) -> bool {
    let mut v: Vec<Varyings> = tri
        .iter()
        .map(|vtx| Varyings::from_vertex(vtx, params.perspective_correct))
        .collect();
    v.sort_by(|a, b| a.y.total_cmp(&b.y));
    let (v0, v1, v2) = (v[0], v[1], v[2]);

    let same_x = v0.x as i32 == v1.x as i32 && v1.x as i32 == v2.x as i32;
    let same_y = v0.y as i32 == v1.y as i32 && v1.y as i32 == v2.y as i32;
    if same_x || same_y {
        return false;
    }

    if v0.y == v1.y {
        // Flat top
        if params.triangle_half.draws_down() {
            let (l, r) = if v0.x < v1.x { (v0, v1) } else { (v1, v0) };
            fill_half(fb, (l, v2), (r, v2), params);
        }
    } else if v1.y == v2.y {
        // Flat bottom
        if params.triangle_half.draws_up() {
            let (l, r) = if v1.x < v2.x { (v1, v2) } else { (v2, v1) };
            fill_half(fb, (v0, l), (v0, r), params);
        }
    } else {
        let k = (v1.y - v0.y) / (v2.y - v0.y);
        let mut m = v0.lerp(v2, k);
        m.y = v1.y;
        let (l, r) = if v1.x < m.x { (v1, m) } else { (m, v1) };
        if params.triangle_half.draws_up() {
            fill_half(fb, (v0, l), (v0, r), params);
        }
        if params.triangle_half.draws_down() {
            fill_half(fb, (l, v2), (r, v2), params);
        }
    }
    true
}

/// Walk the rows between a left and a right edge (each given top, bottom)
fn fill_half(
    fb: &mut Framebuffer,
    left: (Varyings, Varyings),
    right: (Varyings, Varyings),
    params: &RasterParams,
) {
    let y_top = left.0.y;
    let y_bottom = left.1.y;
    if !(y_bottom > y_top) {
        return;
    }

    let y_start = ((y_top - 0.5).ceil() as i32).max(0);
    let y_end = ((y_bottom - 0.5).ceil() as i32).min(fb.height as i32);
    if y_end <= y_start {
        return;
    }

    let first = y_start as f32 + 0.5;
    let mut le = Edge::new(left.0, left.1, first);
    let mut re = Edge::new(right.0, right.1, first);

    for y in y_start..y_end {
        draw_span(fb, y as usize, &le.cur, &re.cur, params);
        le.advance();
        re.advance();
    }
}

fn draw_span(fb: &mut Framebuffer, y: usize, left: &Varyings, right: &Varyings, params: &RasterParams) {
    let lx = left.x;
    let rx = right.x;
    let x_start = ((lx - 0.5).ceil() as i32).max(0);
    let x_end = ((rx - 0.5).ceil() as i32).min(fb.width as i32);
    if x_end <= x_start || !(rx > lx) {
        return;
    }

    let step = (*right - *left) * (1.0 / (rx - lx));
    let mut cur = *left + step * (x_start as f32 + 0.5 - lx);

    for x in x_start as usize..x_end as usize {
        if fb.depth_test(x, y, cur.rhw) {
            let color = shade_pixel(&cur, params);
            fb.set_pixel(x, y, Color::from_normalized(color).to_argb());
        }
        cur = cur + step;
    }
}

fn shade_pixel(p: &Varyings, params: &RasterParams) -> Vec4 {
    let w = if params.perspective_correct && p.rhw != 0.0 {
        1.0 / p.rhw
    } else {
        1.0
    };
    let uv = p.uv * w;

    let mut color = match (params.shading_mode, params.light) {
        (ShadingMode::Phong, Some(light)) => {
            let mut normal = (p.normal * w).normalize();
            if let Some(bump) = params.bump_map {
                normal = perturb_normal(bump, uv, normal);
            }
            shade(light, params.material, p.view_pos * w, normal)
        }
        _ => p.color * w,
    };

    if let Some(tex) = params.texture {
        color = color.modulate(tex.get_data_uv(uv.x, uv.y));
    }
    color
}

/// Tilt a normal by the heightmap gradient (forward differences)
pub fn perturb_normal(bump: &Texture, uv: Vec2, n: Vec3) -> Vec3 {
    if bump.is_empty() {
        return n;
    }
    let du = 1.0 / bump.width() as f32;
    let dv = 1.0 / bump.height() as f32;
    let h = bump.height_at(uv.x, uv.y);
    let dh_u = bump.height_at(uv.x + du, uv.y) - h;
    let dh_v = bump.height_at(uv.x, uv.y + dv) - h;
    Vec3::new(n.x - dh_u * BUMP_STRENGTH, n.y - dh_v * BUMP_STRENGTH, n.z).normalize()
}

/// Wireframe edges of a screen-space triangle
pub fn draw_wireframe(fb: &mut Framebuffer, tri: &Triangle) {
    for i in 0..3 {
        draw_line(fb, &tri[i], &tri[(i + 1) % 3]);
    }
}

/// DDA line clipped to the framebuffer, interpolating vertex color. No depth.
pub fn draw_line(fb: &mut Framebuffer, a: &Vertex, b: &Vertex) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }
    let p0 = (a.position.x, a.position.y);
    let p1 = (b.position.x, b.position.y);
    let max = ((fb.width - 1) as f32, (fb.height - 1) as f32);
    let Some((t0, t1)) = clip_line_2d(p0, p1, (0.0, 0.0), max) else {
        return;
    };

    let dx = p1.0 - p0.0;
    let dy = p1.1 - p0.1;
    let x0 = p0.0 + dx * t0;
    let y0 = p0.1 + dy * t0;
    let len_x = dx * (t1 - t0);
    let len_y = dy * (t1 - t0);

    let steps = len_x.abs().max(len_y.abs()).ceil().max(1.0) as usize;
    let inv = 1.0 / steps as f32;
    for i in 0..=steps {
        let s = i as f32 * inv;
        let x = (x0 + len_x * s).round();
        let y = (y0 + len_y * s).round();
        let color = a.color.lerp(b.color, t0 + (t1 - t0) * s);
        fb.set_pixel(x as usize, y as usize, Color::from_normalized(color).to_argb());
    }
}
