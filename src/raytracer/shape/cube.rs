use super::{SurfaceHit, Transform};
use crate::raytracer::ray::Ray;
use glam::{Vec2, Vec3};

const HALF: f32 = 0.5;

pub(super) fn intersect(transform: &Transform, ray: &Ray) -> Option<SurfaceHit> {
    let local = transform.to_object(ray);

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut n_min = Vec3::ZERO;
    let mut n_max = Vec3::ZERO;

    for axis in 0..3 {
        let o = local.origin[axis];
        let d = local.direction[axis];

        if d == 0.0 {
            if o < -HALF || o > HALF {
                return None;
            }
            continue;
        }

        let t1 = (-HALF - o) / d;
        let t2 = (HALF - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        let mut n = Vec3::ZERO;
        n[axis] = if d > 0.0 { -1.0 } else { 1.0 };

        if near > t_min {
            t_min = near;
            n_min = n;
        }
        if far < t_max {
            t_max = far;
            n_max = -n;
        }
    }

    if t_max < t_min || t_max <= 0.0 {
        return None;
    }

    let (t, normal, outside) = if t_min > 0.0 {
        (t_min, n_min, true)
    } else {
        (t_max, n_max, false)
    };

    let object_point = local.at(t);
    let uv = face_uv(object_point, normal);
    let (t, normal) = transform.to_world(ray, object_point, normal);
    Some(SurfaceHit::facing(t, normal, uv, outside, ray.direction))
}

fn face_uv(p: Vec3, n: Vec3) -> Vec2 {
    let uv = if n.x != 0.0 {
        Vec2::new(p.z, p.y)
    } else if n.y != 0.0 {
        Vec2::new(p.x, p.z)
    } else {
        Vec2::new(p.x, p.y)
    };
    uv + Vec2::splat(HALF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_front_face() {
        let xf = Transform::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::splat(2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = intersect(&xf, &ray).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!(hit.outside);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_hit_from_inside() {
        let xf = Transform::new(Vec3::ZERO, Vec3::ZERO, Vec3::splat(10.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = intersect(&xf, &ray).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-4);
        assert!(!hit.outside);
        assert!((hit.normal - Vec3::NEG_Y).length() < 1e-4);
    }

    #[test]
    fn test_axis_parallel_miss() {
        let xf = Transform::default();
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(intersect(&xf, &ray).is_none());
    }

    #[test]
    fn test_rotated_cube() {
        let xf = Transform::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 45.0, 0.0), Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = intersect(&xf, &ray).unwrap();
        let expected = 5.0 - 0.5 * 2f32.sqrt();
        assert!((hit.t - expected).abs() < 1e-3);
    }
}
