use super::brdf::{dielectric_reflectance, reflect, refract};
use super::rng::Rng;
use super::sampling::cosine_direction;
use crate::raytracer::material::{Lobe, Material};
use crate::raytracer::ray::{Intersection, PathSegment, RAY_EPSILON, Ray};
use crate::raytracer::scene::Scene;
use glam::Vec3;

/// How a shaded path left the bounce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadeOutcome {
    Skipped,
    Missed,
    Emitted,
    Scattered,
    Exhausted,
}

/// Shades one path against its intersection. Terminal cases write the path's
/// final color before zeroing its bounce counter.
pub fn shade_path(
    path: &mut PathSegment,
    isect: &Intersection,
    scene: &Scene,
    iteration: u32,
    depth: u32,
) -> ShadeOutcome {
    if !path.is_alive() {
        return ShadeOutcome::Skipped;
    }

    if !isect.is_hit() {
        path.color = Vec3::ZERO;
        path.terminate();
        return ShadeOutcome::Missed;
    }

    let material = scene.material(isect.material_id);
    if material.is_emissive() {
        path.color *= material.color * material.emittance;
        path.terminate();
        return ShadeOutcome::Emitted;
    }

    let mut rng = Rng::for_path(iteration, path.pixel_index, depth);
    let hit_point = path.ray.at(isect.t);
    scatter_ray(path, hit_point, isect, material, scene, &mut rng);

    path.remaining_bounces -= 1;
    if path.remaining_bounces == 0 {
        path.color = Vec3::ZERO;
        return ShadeOutcome::Exhausted;
    }
    ShadeOutcome::Scattered
}

/// Samples the next direction from `material` and attenuates the throughput.
/// Lobes are picked in proportion to their weights, so the weight and the
/// selection probability cancel.
fn scatter_ray(
    path: &mut PathSegment,
    hit_point: Vec3,
    isect: &Intersection,
    material: &Material,
    scene: &Scene,
    rng: &mut Rng,
) {
    let n = isect.normal;
    let incident = path.ray.direction;

    match material.choose_lobe(rng.next()) {
        Lobe::Diffuse => {
            let albedo = match material.texture {
                Some(tex) => material.color * scene.textures.sample(tex, isect.uv),
                None => material.color,
            };
            let dir = cosine_direction(n, rng.next(), rng.next());
            path.color *= albedo;
            path.ray = Ray::new(hit_point + n * RAY_EPSILON, dir);
        }
        Lobe::Specular => {
            let mirror = reflect(incident, n);
            let dir = if material.roughness > 0.0 {
                let diffuse = cosine_direction(n, rng.next(), rng.next());
                let glossy = mirror.lerp(diffuse, material.roughness.min(1.0));
                if glossy.dot(n) > 0.0 { glossy.normalize() } else { mirror }
            } else {
                mirror
            };
            path.color *= material.specular_color;
            path.ray = Ray::new(hit_point + n * RAY_EPSILON, dir);
        }
        Lobe::Refractive => {
            let eta = if isect.outside { 1.0 / material.ior } else { material.ior };
            let cos_theta = (-incident.dot(n)).clamp(0.0, 1.0);
            let reflectance = dielectric_reflectance(cos_theta, eta, material.ior);

            let refracted = refract(incident, n, eta).filter(|_| rng.next() >= reflectance);
            path.ray = match refracted {
                Some(dir) => Ray::new(hit_point - n * RAY_EPSILON, dir.normalize()),
                None => Ray::new(hit_point + n * RAY_EPSILON, reflect(incident, n)),
            };
            path.color *= material.specular_color;
        }
    }
}
