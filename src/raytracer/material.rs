use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub specular_color: Vec3,
    /// Values above zero mark a light source.
    pub emittance: f32,
    pub diffuse: f32,
    pub reflective: f32,
    pub refractive: f32,
    pub ior: f32,
    pub roughness: f32,
    pub texture: Option<u32>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::splat(0.8),
            specular_color: Vec3::ONE,
            emittance: 0.0,
            diffuse: 1.0,
            reflective: 0.0,
            refractive: 0.0,
            ior: 1.5,
            roughness: 0.0,
            texture: None,
        }
    }
}

/// Scattering lobe picked for one bounce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lobe {
    Diffuse,
    Specular,
    Refractive,
}

impl Material {
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn emissive(color: Vec3, emittance: f32) -> Self {
        Self {
            color,
            emittance,
            diffuse: 0.0,
            ..Default::default()
        }
    }

    pub fn mirror(specular_color: Vec3, roughness: f32) -> Self {
        Self {
            specular_color,
            diffuse: 0.0,
            reflective: 1.0,
            roughness,
            ..Default::default()
        }
    }

    pub fn glass(specular_color: Vec3, ior: f32) -> Self {
        Self {
            specular_color,
            diffuse: 0.0,
            refractive: 1.0,
            ior,
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: u32) -> Self {
        self.texture = Some(texture);
        self
    }

    #[inline]
    pub fn is_emissive(&self) -> bool {
        self.emittance > 0.0
    }

    /// Picks a lobe with probability proportional to its weight. A material
    /// with no positive weight falls back to diffuse.
    pub fn choose_lobe(&self, u: f32) -> Lobe {
        let diffuse = self.diffuse.max(0.0);
        let reflective = self.reflective.max(0.0);
        let refractive = self.refractive.max(0.0);
        let total = diffuse + reflective + refractive;
        if total <= 0.0 {
            return Lobe::Diffuse;
        }

        let u = u * total;
        if u < diffuse {
            Lobe::Diffuse
        } else if u < diffuse + reflective {
            Lobe::Specular
        } else if refractive > 0.0 {
            Lobe::Refractive
        } else {
            Lobe::Specular
        }
    }
}
