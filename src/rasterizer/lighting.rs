//! Camera-space transform and lighting stages

use super::math::{Mat3, Mat4, Vec3, Vec4};
use super::types::{Light, Material, ShadingMode, Vertex};

/// Normal matrix: inverse-transpose of the view's 3x3 part
pub fn normal_matrix(model_view: &Mat4) -> Mat3 {
    let upper = model_view.upper3();
    upper.inverse().map(|m| m.transpose()).unwrap_or(upper)
}

/// Move positions and normals into camera space; caches the camera-space
/// position on each vertex for per-pixel lighting.
pub fn model_view_transform(vertices: &mut [Vertex], model_view: &Mat4) {
    let normals = normal_matrix(model_view);
    for v in vertices.iter_mut() {
        v.position = model_view.transform(Vec4::new(v.position.x, v.position.y, v.position.z, 1.0));
        v.normal = normals.transform(v.normal).normalize();
        v.view_pos = v.position.xyz();
    }
}

/// Evaluate ambient + diffuse + Blinn specular for one point in camera space
pub fn shade(light: &Light, material: &Material, position: Vec3, normal: Vec3) -> Vec4 {
    let to_light = light.position - position;
    let dist = to_light.len();
    let light_vec = to_light.normalize();

    let [a0, a1, a2] = light.attenuation;
    let denom = a0 + a1 * dist + a2 * dist * dist;
    let atten = if denom > 0.0 { 1.0 / denom } else { 1.0 };

    let ambient = light.ambient.modulate(material.ambient) * atten;

    let ndotl = light_vec.dot(normal).max(0.0);
    let diffuse = light.diffuse.modulate(material.diffuse) * (ndotl * atten);

    let half = (light_vec + (-position).normalize()).normalize();
    let spec_pow = half.dot(normal).max(0.0).powf(material.power);
    let specular = light.specular.modulate(material.specular) * (spec_pow * atten);

    let rgb = material.emissive.xyz()
        + ambient.clamp01().xyz()
        + diffuse.clamp01().xyz()
        + specular.clamp01().xyz();
    Vec4::new(rgb.x, rgb.y, rgb.z, material.diffuse.w)
}

/// Per-vertex/per-face lighting. `light` must already be in camera space.
/// Frame and NoLighting leave colors untouched; Phong defers to the
/// rasterizer (positions were cached by `model_view_transform`).
pub fn apply_lighting(
    vertices: &mut [Vertex],
    mode: ShadingMode,
    light: Option<&Light>,
    material: &Material,
) {
    let Some(light) = light else {
        return;
    };

    match mode {
        ShadingMode::Frame | ShadingMode::NoLighting | ShadingMode::Phong => {}
        ShadingMode::Flat => {
            for tri in vertices.chunks_exact_mut(3) {
                let a = tri[0].position.xyz();
                let b = tri[1].position.xyz();
                let c = tri[2].position.xyz();
                let normal = (b - a).cross(c - a).normalize();
                let centroid = (a + b + c) * (1.0 / 3.0);
                let color = shade(light, material, centroid, normal);
                for v in tri.iter_mut() {
                    v.color = color;
                }
            }
        }
        ShadingMode::Gouraud => {
            for v in vertices.iter_mut() {
                v.color = shade(light, material, v.position.xyz(), v.normal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{Quat, Vec2};

    fn scenario_light() -> Light {
        Light {
            position: Vec3::new(0.0, 0.0, 1.0),
            ambient: Vec4::rgb(0.2, 0.2, 0.2),
            diffuse: Vec4::rgb(0.7, 0.7, 0.7),
            specular: Vec4::rgb(0.0, 0.0, 0.0),
            attenuation: [0.2, 0.1, 0.08],
        }
    }

    fn scenario_material() -> Material {
        Material {
            ambient: Vec4::new(0.3, 0.3, 0.3, 1.0),
            diffuse: Vec4::new(0.6, 0.8, 0.6, 1.0),
            specular: Vec4::new(0.6, 0.8, 0.6, 1.0),
            emissive: Vec4::ZERO,
            power: 1.0,
        }
    }

    #[test]
    fn test_normals_use_inverse_transpose() {
        // Non-uniform scale: a 45-degree normal must tilt toward the squashed axis
        let mut m = Mat4::IDENTITY;
        m.m[0][0] = 2.0;
        let mut v = [Vertex::new(
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec2::ZERO,
            Vec4::ONE,
        )];
        model_view_transform(&mut v, &m);
        let n = v[0].normal;
        assert!((n.len() - 1.0).abs() < 1e-5);
        assert!(n.y > n.x, "{:?}", n);
    }

    #[test]
    fn test_transform_caches_view_position() {
        let view = Mat4::translation(0.0, 0.0, 2.0) * Mat4::from_mat3(&Quat::IDENTITY.to_mat3());
        let mut v = [Vertex::from_pos(1.0, 0.0, 0.0)];
        model_view_transform(&mut v, &view);
        assert_eq!(v[0].view_pos, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(v[0].position.w, 1.0);
    }

    #[test]
    fn test_light_behind_surface_gives_ambient_only() {
        let light = scenario_light();
        let mat = scenario_material();
        // Normal faces away from the light
        let c = shade(&light, &mat, Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, 1.0));
        let dist: f32 = 1.0;
        let atten = 1.0 / (0.2 + 0.1 * dist + 0.08 * dist * dist);
        assert!((c.x - 0.2 * 0.3 * atten).abs() < 1e-5);
        assert_eq!(c.w, 1.0);
    }

    #[test]
    fn test_gouraud_scenario_between_ambient_and_saturation() {
        let light = scenario_light();
        let mat = scenario_material();
        let n = Vec3::new(0.0, 0.0, -1.0);
        let mut verts: Vec<Vertex> = [
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(-1.0, 0.0, 2.0),
        ]
        .iter()
        .map(|&p| Vertex::new(p, n, Vec2::ZERO, Vec4::ONE))
        .collect();
        apply_lighting(&mut verts, ShadingMode::Gouraud, Some(&light), &mat);

        for v in &verts {
            let dist = (light.position - v.position.xyz()).len();
            let atten = 1.0 / (0.2 + 0.1 * dist + 0.08 * dist * dist);
            let ambient_only = 0.2 * 0.3 * atten;
            for ch in [v.color.x, v.color.y, v.color.z] {
                assert!(ch > ambient_only && ch < 1.0, "{:?}", v.color);
            }
        }
    }

    #[test]
    fn test_vertex_nearest_light_is_brightest() {
        let mut light = scenario_light();
        light.position = Vec3::new(0.5, 0.0, 1.0);
        let mat = scenario_material();
        let n = Vec3::new(0.0, 0.0, -1.0);
        let mut verts: Vec<Vertex> = [
            Vec3::new(0.0, 1.0, 2.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(-1.0, 0.0, 2.0),
        ]
        .iter()
        .map(|&p| Vertex::new(p, n, Vec2::ZERO, Vec4::ONE))
        .collect();
        apply_lighting(&mut verts, ShadingMode::Gouraud, Some(&light), &mat);

        let brightness = |v: &Vertex| v.color.x + v.color.y + v.color.z;
        assert!(brightness(&verts[1]) > brightness(&verts[0]));
        assert!(brightness(&verts[0]) > brightness(&verts[2]));
    }

    #[test]
    fn test_flat_broadcasts_one_color() {
        let light = scenario_light();
        let mat = scenario_material();
        let mut verts = vec![
            Vertex::from_pos(0.0, 1.0, 2.0),
            Vertex::from_pos(1.0, 0.0, 2.0),
            Vertex::from_pos(-1.0, 0.0, 2.0),
        ];
        apply_lighting(&mut verts, ShadingMode::Flat, Some(&light), &mat);
        assert_eq!(verts[0].color, verts[1].color);
        assert_eq!(verts[1].color, verts[2].color);
        assert_ne!(verts[0].color, Vec4::ONE);
    }

    #[test]
    fn test_no_light_passes_colors_through() {
        let mut verts = vec![Vertex::from_pos(0.0, 0.0, 1.0); 3];
        verts[0].color = Vec4::new(0.1, 0.2, 0.3, 1.0);
        apply_lighting(&mut verts, ShadingMode::Gouraud, None, &Material::default());
        assert_eq!(verts[0].color, Vec4::new(0.1, 0.2, 0.3, 1.0));

        let light = scenario_light();
        apply_lighting(&mut verts, ShadingMode::NoLighting, Some(&light), &Material::default());
        assert_eq!(verts[0].color, Vec4::new(0.1, 0.2, 0.3, 1.0));
    }
}
