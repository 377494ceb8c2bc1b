//! Built-in test primitives

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Primitive, Vec2, Vec3, Vec4};

/// Which built-in primitive the demo draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DemoPrimitive {
    /// Triangle with its apex leaning away from the camera
    TriangleOut,
    /// Triangle with its apex leaning toward (and behind) the camera
    TriangleIn,
    #[default]
    Pyramid,
    Cube,
}

impl DemoPrimitive {
    pub fn next(self) -> Self {
        match self {
            DemoPrimitive::TriangleOut => DemoPrimitive::TriangleIn,
            DemoPrimitive::TriangleIn => DemoPrimitive::Pyramid,
            DemoPrimitive::Pyramid => DemoPrimitive::Cube,
            DemoPrimitive::Cube => DemoPrimitive::TriangleOut,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DemoPrimitive::TriangleOut => "triangle out",
            DemoPrimitive::TriangleIn => "triangle in",
            DemoPrimitive::Pyramid => "pyramid",
            DemoPrimitive::Cube => "cube",
        }
    }

    pub fn build(self) -> Primitive {
        match self {
            DemoPrimitive::TriangleOut => rgb_triangle(1.0),
            DemoPrimitive::TriangleIn => rgb_triangle(-1.0),
            DemoPrimitive::Pyramid => pyramid(),
            DemoPrimitive::Cube => cube(),
        }
    }
}

/// Red/green/blue triangle whose apex sits at depth `apex_z`
fn rgb_triangle(apex_z: f32) -> Primitive {
    let mut p = Primitive::new(vec![
        Vec3::new(0.0, 0.01, apex_z),
        Vec3::new(0.25, 0.0, 0.0),
        Vec3::new(-0.25, 0.0, 0.0),
    ])
    .with_colors(vec![
        Vec4::new(1.0, 0.0, 0.0, 1.0),
        Vec4::new(0.0, 1.0, 0.0, 1.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    ]);
    p.generate_face_normals();
    p
}

/// Square-based pyramid, apex up, base diagonal along the axes
pub fn pyramid() -> Primitive {
    let apex = Vec3::new(0.0, 1.0, 0.0);
    let front = Vec3::new(0.0, 0.0, -1.0);
    let right = Vec3::new(1.0, 0.0, 0.0);
    let back = Vec3::new(0.0, 0.0, 1.0);
    let left = Vec3::new(-1.0, 0.0, 0.0);

    let positions = vec![
        front, apex, right, //
        right, apex, back, //
        back, apex, left, //
        left, apex, front, //
        front, right, back, //
        front, back, left,
    ];
    let count = positions.len();
    let mut p = Primitive::new(positions).with_colors(vec![Vec4::ONE; count]);
    p.generate_face_normals();
    p
}

/// Unit cube (side 2) with per-face normals and a full texture on each face
pub fn cube() -> Primitive {
    // Four corners per face, wound so cross(b - a, c - a) points outward
    let faces: [([Vec3; 4], Vec3); 6] = [
        (
            [
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(-1.0, 1.0, 1.0),
            ],
            Vec3::new(0.0, 0.0, 1.0),
        ),
        (
            [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(-1.0, 1.0, -1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
            ],
            Vec3::new(0.0, 0.0, -1.0),
        ),
        (
            [
                Vec3::new(-1.0, 1.0, -1.0),
                Vec3::new(-1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, -1.0),
            ],
            Vec3::new(0.0, 1.0, 0.0),
        ),
        (
            [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(-1.0, -1.0, 1.0),
            ],
            Vec3::new(0.0, -1.0, 0.0),
        ),
        (
            [
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, -1.0, 1.0),
            ],
            Vec3::new(1.0, 0.0, 0.0),
        ),
        (
            [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(-1.0, 1.0, 1.0),
                Vec3::new(-1.0, 1.0, -1.0),
            ],
            Vec3::new(-1.0, 0.0, 0.0),
        ),
    ];
    let corner_uvs = [
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ];

    let mut positions = Vec::with_capacity(36);
    let mut normals = Vec::with_capacity(36);
    let mut uvs = Vec::with_capacity(36);
    for (corners, normal) in faces.iter() {
        // Two triangles per face
        for &i in &[0, 1, 2, 0, 2, 3] {
            positions.push(corners[i]);
            normals.push(*normal);
            uvs.push(corner_uvs[i]);
        }
    }

    Primitive::new(positions)
        .with_normals(normals)
        .with_uvs(uvs)
        .with_colors(vec![Vec4::ONE; 36])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every face normal must point away from `inside`
    fn faces_point_outward(p: &Primitive, inside: Vec3) -> bool {
        p.positions.chunks_exact(3).all(|t| {
            let n = (t[1] - t[0]).cross(t[2] - t[0]);
            let centroid = (t[0] + t[1] + t[2]) * (1.0 / 3.0);
            n.dot(centroid - inside) > 0.0
        })
    }

    #[test]
    fn test_all_primitives_are_valid() {
        let mut kind = DemoPrimitive::TriangleOut;
        for _ in 0..4 {
            let p = kind.build();
            assert!(p.validate().is_ok(), "{}", kind.name());
            assert!(!p.is_empty());
            kind = kind.next();
        }
        assert_eq!(kind, DemoPrimitive::TriangleOut);
    }

    #[test]
    fn test_closed_shapes_wound_outward() {
        assert!(faces_point_outward(&pyramid(), Vec3::new(0.0, 0.25, 0.0)));
        assert!(faces_point_outward(&cube(), Vec3::ZERO));
    }

    #[test]
    fn test_cube_normals_match_winding() {
        let c = cube();
        assert_eq!(c.size(), 36);
        for (t, n) in c.positions.chunks_exact(3).zip(c.normals.chunks_exact(3)) {
            let face = (t[1] - t[0]).cross(t[2] - t[0]).normalize();
            assert!((face - n[0]).len() < 1e-6);
        }
    }

    #[test]
    fn test_triangle_in_apex_toward_camera() {
        let out = DemoPrimitive::TriangleOut.build();
        let inn = DemoPrimitive::TriangleIn.build();
        assert_eq!(out.positions[0].z, 1.0);
        assert_eq!(inn.positions[0].z, -1.0);
        assert_eq!(out.colors[1], Vec4::new(0.0, 1.0, 0.0, 1.0));
    }
}
