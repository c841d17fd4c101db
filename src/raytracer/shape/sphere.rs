use super::{SurfaceHit, Transform};
use crate::raytracer::ray::Ray;
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

const RADIUS: f32 = 0.5;

pub(super) fn intersect(transform: &Transform, ray: &Ray) -> Option<SurfaceHit> {
    let local = transform.to_object(ray);

    let v_dot_dir = local.origin.dot(local.direction);
    let radicand = v_dot_dir * v_dot_dir - (local.origin.length_squared() - RADIUS * RADIUS);
    if radicand < 0.0 {
        return None;
    }

    let root = radicand.sqrt();
    let t1 = -v_dot_dir - root;
    let t2 = -v_dot_dir + root;

    let (t, outside) = if t1 > 0.0 {
        (t1, true)
    } else if t2 > 0.0 {
        (t2, false)
    } else {
        return None;
    };

    let object_point = local.at(t);
    let (t, normal) = transform.to_world(ray, object_point, object_point);
    Some(SurfaceHit::facing(t, normal, spherical_uv(object_point / RADIUS), outside, ray.direction))
}

fn spherical_uv(p: Vec3) -> Vec2 {
    let u = 0.5 + p.z.atan2(p.x) / (2.0 * PI);
    let v = 0.5 - p.y.clamp(-1.0, 1.0).asin() / PI;
    Vec2::new(u, v)
}
