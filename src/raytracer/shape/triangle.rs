use super::SurfaceHit;
use crate::raytracer::ray::{RAY_EPSILON, Ray};
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub uvs: [Vec2; 3],
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], normals: [Vec3; 3], uvs: [Vec2; 3]) -> Self {
        Triangle { positions, normals, uvs }
    }

    /// Triangle with the face normal at every vertex and barycentric uvs.
    #[cfg(test)]
    pub fn flat(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let n = (v1 - v0).cross(v2 - v0).normalize();
        Triangle {
            positions: [v0, v1, v2],
            normals: [n; 3],
            uvs: [Vec2::ZERO, Vec2::X, Vec2::Y],
        }
    }

    #[inline]
    pub(super) fn intersect(&self, ray: &Ray) -> Option<SurfaceHit> {
        let [v0, v1, v2] = self.positions;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);

        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - v0;
        let u = f * s.dot(h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t < RAY_EPSILON {
            return None;
        }

        let w = 1.0 - u - v;
        let face_normal = edge1.cross(edge2).normalize();
        let interpolated = self.normals[0] * w + self.normals[1] * u + self.normals[2] * v;
        let normal = if interpolated.length_squared() > 1e-12 {
            interpolated.normalize()
        } else {
            face_normal
        };
        let uv = self.uvs[0] * w + self.uvs[1] * u + self.uvs[2] * v;
        let outside = face_normal.dot(ray.direction) < 0.0;

        Some(SurfaceHit::facing(t, normal, uv, outside, ray.direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::flat(
            Vec3::new(-1.0, -1.0, -3.0),
            Vec3::new(1.0, -1.0, -3.0),
            Vec3::new(0.0, 1.0, -3.0),
        )
    }

    #[test]
    fn test_front_hit() {
        let hit = unit_triangle().intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert!(hit.outside);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_back_hit_faces_ray() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -6.0), Vec3::Z);
        let hit = unit_triangle().intersect(&ray).unwrap();
        assert!(!hit.outside);
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_parallel_and_outside_rays_miss() {
        let tri = unit_triangle();
        assert!(tri.intersect(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
        assert!(tri.intersect(&Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z)).is_none());
        assert!(tri.intersect(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
    }

    #[test]
    fn test_uv_interpolation() {
        let tri = Triangle::flat(Vec3::new(0.0, 0.0, -1.0), Vec3::X - Vec3::Z, Vec3::Y - Vec3::Z);
        let ray = Ray::new(Vec3::new(0.25, 0.5, 0.0), Vec3::NEG_Z);
        let hit = tri.intersect(&ray).unwrap();
        assert!((hit.uv - Vec2::new(0.25, 0.5)).length() < 1e-5);
    }
}
