mod cube;
mod sphere;
mod triangle;

use crate::raytracer::ray::Ray;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

pub use triangle::Triangle;

/// Closest hit on one primitive before material lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub t: f32,
    pub normal: Vec3,
    pub uv: Vec2,
    pub outside: bool,
}

impl SurfaceHit {
    /// Flips `normal` so it faces against `direction`.
    fn facing(t: f32, normal: Vec3, uv: Vec2, outside: bool, direction: Vec3) -> Self {
        let normal = if normal.dot(direction) > 0.0 { -normal } else { normal };
        SurfaceHit { t, normal, uv, outside }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
    pub inverse: Mat4,
    pub inverse_transpose: Mat4,
}

impl Transform {
    pub fn from_matrix(matrix: Mat4) -> Self {
        let inverse = matrix.inverse();
        Transform {
            matrix,
            inverse,
            inverse_transpose: inverse.transpose(),
        }
    }

    /// Rotation is XYZ Euler angles in degrees.
    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rotation.x.to_radians(),
            rotation.y.to_radians(),
            rotation.z.to_radians(),
        );
        Self::from_matrix(Mat4::from_scale_rotation_translation(scale, rotation, translation))
    }

    fn to_object(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.inverse.transform_point3(ray.origin),
            self.inverse.transform_vector3(ray.direction).normalize(),
        )
    }

    /// Maps an object-space hit back to world space. Returns the world-space
    /// distance along `ray` and the outward world normal.
    fn to_world(&self, ray: &Ray, object_point: Vec3, object_normal: Vec3) -> (f32, Vec3) {
        let world_point = self.matrix.transform_point3(object_point);
        let normal = self.inverse_transpose.transform_vector3(object_normal).normalize();
        ((world_point - ray.origin).length(), normal)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geom {
    /// Unit-diameter sphere at the origin, placed by `transform`.
    Sphere { transform: Transform, material_id: u32 },
    /// Unit cube centered at the origin, placed by `transform`.
    Cube { transform: Transform, material_id: u32 },
    /// `count` world-space triangles starting at `first` in the scene's triangle array.
    Mesh { first: u32, count: u32, material_id: u32 },
}

impl Geom {
    pub fn sphere(transform: Transform, material_id: u32) -> Self {
        Geom::Sphere { transform, material_id }
    }

    pub fn cube(transform: Transform, material_id: u32) -> Self {
        Geom::Cube { transform, material_id }
    }

    pub fn mesh(first: u32, count: u32, material_id: u32) -> Self {
        Geom::Mesh { first, count, material_id }
    }

    pub fn material_id(&self) -> u32 {
        match *self {
            Geom::Sphere { material_id, .. }
            | Geom::Cube { material_id, .. }
            | Geom::Mesh { material_id, .. } => material_id,
        }
    }

    /// Nearest hit with `t > 0`. Ties inside a mesh keep the earlier triangle.
    pub fn hit(&self, ray: &Ray, triangles: &[Triangle]) -> Option<SurfaceHit> {
        match self {
            Geom::Sphere { transform, .. } => sphere::intersect(transform, ray),
            Geom::Cube { transform, .. } => cube::intersect(transform, ray),
            Geom::Mesh { first, count, .. } => {
                let start = *first as usize;
                let end = start + *count as usize;
                let mut closest: Option<SurfaceHit> = None;
                for tri in &triangles[start..end] {
                    if let Some(hit) = tri.intersect(ray)
                        && closest.is_none_or(|c| hit.t < c.t)
                    {
                        closest = Some(hit);
                    }
                }
                closest
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle facing +Z at depth `z`.
    fn facing_triangle(z: f32) -> Triangle {
        Triangle::flat(Vec3::new(-1.0, -1.0, z), Vec3::new(1.0, -1.0, z), Vec3::new(0.0, 1.0, z))
    }

    #[test]
    fn test_transform_inverse() {
        let rotation = Vec3::new(30.0, 45.0, 10.0);
        let xf = Transform::new(Vec3::new(1.0, 2.0, 3.0), rotation, Vec3::splat(2.0));
        let p = Vec3::new(0.3, -0.2, 0.9);
        let back = xf.inverse.transform_point3(xf.matrix.transform_point3(p));
        assert!((back - p).length() < 1e-5);
    }

    #[test]
    fn test_mesh_picks_nearest_triangle() {
        let triangles = [facing_triangle(-5.0), facing_triangle(-2.0)];
        let mesh = Geom::mesh(0, 2, 7);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = mesh.hit(&ray, &triangles).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert_eq!(mesh.material_id(), 7);
    }

    #[test]
    fn test_mesh_range_is_respected() {
        let triangles = [facing_triangle(-2.0); 2];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(Geom::mesh(1, 0, 0).hit(&ray, &triangles).is_none());
        assert!(Geom::mesh(1, 1, 0).hit(&ray, &triangles).is_some());
    }
}
