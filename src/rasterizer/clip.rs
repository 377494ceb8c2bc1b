//! Frustum rejection, backface culling and near-plane clipping in camera
//! space, plus 2D line clipping against the screen for wireframe.

use bitflags::bitflags;

use super::camera::Camera;
use super::error::{RenderError, RenderResult};
use super::math::Vec3;
use super::types::{Triangle, Vertex};

/// Depth given to vertices created on the near plane. Vertices count as in
/// front when `z > 0`; clipped points land at this strictly positive depth so
/// the perspective divide never sees w = 0.
pub const NEAR_CLIP_Z: f32 = 0.01;

bitflags! {
    /// Which frustum half-spaces a vertex lies outside of
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutCode: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTTOM = 1 << 2;
        const TOP = 1 << 3;
        const FAR = 1 << 4;
    }
}

/// Frustum bounds derived from the camera. Side planes pass through the eye,
/// so their half-extents scale with depth.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Half-width at unit depth
    pub slope_x: f32,
    /// Half-height at unit depth
    pub slope_y: f32,
    pub far: Option<f32>,
}

impl Frustum {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            slope_x: camera.half_extent_x(),
            slope_y: camera.half_extent_y(),
            far: camera.far_clip(),
        }
    }

    pub fn classify(&self, p: Vec3) -> OutCode {
        let mut code = OutCode::empty();
        if p.x < -p.z * self.slope_x {
            code |= OutCode::LEFT;
        }
        if p.x > p.z * self.slope_x {
            code |= OutCode::RIGHT;
        }
        if p.y < -p.z * self.slope_y {
            code |= OutCode::BOTTOM;
        }
        if p.y > p.z * self.slope_y {
            code |= OutCode::TOP;
        }
        if let Some(far) = self.far {
            if p.z > far {
                code |= OutCode::FAR;
            }
        }
        code
    }

    /// True only when all three vertices are outside the same plane
    pub fn rejects(&self, tri: &[Vertex]) -> bool {
        let shared = tri
            .iter()
            .map(|v| self.classify(v.position.xyz()))
            .fold(OutCode::all(), |acc, c| acc & c);
        !shared.is_empty()
    }
}

/// Camera-space face normal (cross of two edges)
pub fn face_normal(tri: &[Vertex]) -> Vec3 {
    let a = tri[0].position.xyz();
    let b = tri[1].position.xyz();
    let c = tri[2].position.xyz();
    (b - a).cross(c - a)
}

/// Facing away from the camera (normal has positive z)
pub fn is_backface(tri: &[Vertex]) -> bool {
    face_normal(tri).z > 0.0
}

/// Point where edge `a -> b` crosses the near plane. Requires
/// `a.z <= 0 < b.z`; every attribute uses the same parameter. The parameter
/// never passes `b`, so an in-front vertex closer than `NEAR_CLIP_Z` is
/// reused with its depth pushed out to the plane.
pub fn clip_near_plane(a: &Vertex, b: &Vertex) -> RenderResult<Vertex> {
    let az = a.position.z;
    let bz = b.position.z;
    if !(az <= 0.0 && 0.0 < bz) {
        return Err(RenderError::DegenerateGeometry(format!(
            "edge z {} -> {} does not straddle the near plane",
            az, bz
        )));
    }
    let k = ((NEAR_CLIP_Z - az) / (bz - az)).min(1.0);
    let mut out = a.lerp(b, k);
    out.position.z = NEAR_CLIP_Z;
    Ok(out)
}

/// Clip one triangle against the near plane, appending 0, 1 or 2 triangles
/// to `out`. Winding order is preserved.
pub fn clip_triangle(tri: &[Vertex], out: &mut Vec<Triangle>) -> RenderResult<()> {
    let in_front = |v: &Vertex| v.position.z > 0.0;
    let count = tri.iter().filter(|v| in_front(*v)).count();

    match count {
        0 => {}
        3 => out.push([tri[0], tri[1], tri[2]]),
        1 => {
            // Rotate so the lone in-front vertex is v0
            let i = (0..3).find(|&i| in_front(&tri[i])).unwrap_or(0);
            let v0 = tri[i];
            let v1 = tri[(i + 1) % 3];
            let v2 = tri[(i + 2) % 3];
            let c1 = clip_near_plane(&v1, &v0)?;
            let c2 = clip_near_plane(&v2, &v0)?;
            out.push([v0, c1, c2]);
        }
        _ => {
            // Rotate so the lone behind vertex is v0
            let i = (0..3).find(|&i| !in_front(&tri[i])).unwrap_or(0);
            let v0 = tri[i];
            let v1 = tri[(i + 1) % 3];
            let v2 = tri[(i + 2) % 3];
            let m = clip_near_plane(&v0, &v1)?;
            let n = clip_near_plane(&v0, &v2)?;
            out.push([m, v1, v2]);
            out.push([m, v2, n]);
        }
    }
    Ok(())
}

/// Liang-Barsky clip of the segment `p0 -> p1` to the rectangle
/// `[min, max]`. Returns the entry/exit parameters along the segment.
pub fn clip_line_2d(p0: (f32, f32), p1: (f32, f32), min: (f32, f32), max: (f32, f32)) -> Option<(f32, f32)> {
    let dx = p1.0 - p0.0;
    let dy = p1.1 - p0.1;
    let p = [-dx, dx, -dy, dy];
    let q = [p0.0 - min.0, max.0 - p0.0, p0.1 - min.1, max.1 - p0.1];

    let mut t0: f32 = 0.0;
    let mut t1: f32 = 1.0;
    for (pi, qi) in p.iter().zip(q.iter()) {
        if *pi == 0.0 {
            // Parallel to this edge: either fully inside or fully outside
            if *qi < 0.0 {
                return None;
            }
            continue;
        }
        let r = qi / pi;
        if *pi < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
    }

    (t0 <= t1).then_some((t0, t1))
}
