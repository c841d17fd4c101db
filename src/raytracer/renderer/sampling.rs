use glam::{Vec2, Vec3};
use std::f32::consts::PI;

pub fn sample_cosine_hemisphere(u1: f32, u2: f32) -> Vec3 {
    let r = u1.sqrt();
    let phi = 2.0 * PI * u2;
    Vec3::new(r * phi.cos(), r * phi.sin(), (1.0 - u1).max(0.0).sqrt())
}

pub fn build_basis(n: Vec3) -> (Vec3, Vec3, Vec3) {
    let up = if n.y.abs() < 0.999 { Vec3::Y } else { Vec3::X };
    let t = up.cross(n).normalize();
    let b = n.cross(t);
    (t, b, n)
}

pub fn to_world(local: Vec3, t: Vec3, b: Vec3, n: Vec3) -> Vec3 {
    t * local.x + b * local.y + n * local.z
}

/// Cosine-weighted direction around `normal`.
pub fn cosine_direction(normal: Vec3, u1: f32, u2: f32) -> Vec3 {
    let (t, b, n) = build_basis(normal);
    to_world(sample_cosine_hemisphere(u1, u2), t, b, n).normalize()
}

/// Sub-pixel offset in [-0.5, 0.5)^2.
#[inline]
pub fn pixel_jitter(u1: f32, u2: f32) -> Vec2 {
    Vec2::new(u1 - 0.5, u2 - 0.5)
}
