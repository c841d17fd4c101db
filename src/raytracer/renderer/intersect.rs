use crate::raytracer::ray::{Intersection, Ray};
use crate::raytracer::scene::Scene;

/// Brute-force nearest hit over every primitive. Equal distances keep the
/// primitive that comes first in `scene.geoms`.
pub fn compute_intersection(ray: &Ray, scene: &Scene) -> Intersection {
    let mut closest = Intersection::MISS;
    let mut t_min = f32::INFINITY;

    for geom in &scene.geoms {
        let Some(hit) = geom.hit(ray, &scene.triangles) else {
            continue;
        };
        if hit.t > 0.0 && hit.t < t_min {
            t_min = hit.t;
            closest = Intersection {
                t: hit.t,
                material_id: geom.material_id(),
                normal: hit.normal,
                uv: hit.uv,
                outside: hit.outside,
            };
        }
    }

    closest
}
