use glam::Vec3;

pub fn fresnel_dielectric(cos_theta: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).clamp(0.0, 1.0).powi(5)
}

/// Schlick reflectance at an interface with relative index `eta` (incident
/// over transmitted). From the denser side the transmitted cosine is used,
/// and total internal reflection reflects everything.
pub fn dielectric_reflectance(cos_i: f32, eta: f32, ior: f32) -> f32 {
    if eta <= 1.0 {
        return fresnel_dielectric(cos_i, ior);
    }
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t >= 1.0 {
        return 1.0;
    }
    fresnel_dielectric((1.0 - sin2_t).sqrt(), ior)
}

pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -incident.dot(normal);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);

    if sin2_t > 1.0 {
        return None;
    }

    let cos_t = (1.0 - sin2_t).sqrt();
    Some(eta * incident + (eta * cos_i - cos_t) * normal)
}

pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    (incident - 2.0 * incident.dot(normal) * normal).normalize()
}
