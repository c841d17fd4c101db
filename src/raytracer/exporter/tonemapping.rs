use crate::raytracer::error::RenderError;
use glam::{Mat3, Vec3};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToneMap {
    #[default]
    None,
    Aces,
    Reinhard,
    Agx,
}

impl FromStr for ToneMap {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "linear" => Ok(ToneMap::None),
            "aces" => Ok(ToneMap::Aces),
            "reinhard" => Ok(ToneMap::Reinhard),
            "agx" => Ok(ToneMap::Agx),
            other => Err(RenderError::InvalidConfig(format!("unknown tone map '{other}'"))),
        }
    }
}

impl ToneMap {
    pub fn apply(self, color: Vec3) -> Vec3 {
        // NaN radiance from a degenerate sample must not poison the encoder.
        let color = if color.is_finite() { color.max(Vec3::ZERO) } else { Vec3::ZERO };
        match self {
            ToneMap::None => color,
            ToneMap::Aces => aces(color),
            ToneMap::Reinhard => color / (color + Vec3::ONE),
            ToneMap::Agx => agx_eotf(agx(color)),
        }
    }

    pub fn apply_with_exposure(self, color: Vec3, exposure: f32) -> Vec3 {
        self.apply(color * exposure)
    }
}

const ACES_INPUT: Mat3 = Mat3::from_cols(
    Vec3::new(0.59719, 0.07600, 0.02840),
    Vec3::new(0.35458, 0.90834, 0.13383),
    Vec3::new(0.04823, 0.01566, 0.83777),
);

const ACES_OUTPUT: Mat3 = Mat3::from_cols(
    Vec3::new(1.60475, -0.10208, -0.00327),
    Vec3::new(-0.53108, 1.10813, -0.07276),
    Vec3::new(-0.07367, -0.00605, 1.07602),
);

fn aces(color: Vec3) -> Vec3 {
    let v = ACES_INPUT * color;
    let a = v * (v + Vec3::splat(0.0245786)) - Vec3::splat(0.000090537);
    let b = v * (v * 0.983729 + Vec3::splat(0.432951)) + Vec3::splat(0.238081);
    (ACES_OUTPUT * (a / b)).clamp(Vec3::ZERO, Vec3::ONE)
}

const AGX_INSET: Mat3 = Mat3::from_cols(
    Vec3::new(0.842479062253094, 0.0784335999999992, 0.0792237451477643),
    Vec3::new(0.0423282422610123, 0.878468636469772, 0.0791661274605434),
    Vec3::new(0.0423756549057051, 0.0784336, 0.879142973793104),
);

const AGX_OUTSET: Mat3 = Mat3::from_cols(
    Vec3::new(1.19687900512017, -0.0980208811401368, -0.0990297440797205),
    Vec3::new(-0.0528968517574562, 1.15190312990417, -0.0989611768448433),
    Vec3::new(-0.0529716355144438, -0.0980434501171241, 1.15107367264116),
);

const AGX_MIN_EV: f32 = -12.47393;
const AGX_MAX_EV: f32 = 4.026069;

fn agx(color: Vec3) -> Vec3 {
    let v = (AGX_INSET * color).max(Vec3::splat(1e-10));
    let ev = Vec3::new(v.x.log2(), v.y.log2(), v.z.log2())
        .clamp(Vec3::splat(AGX_MIN_EV), Vec3::splat(AGX_MAX_EV));
    let x = (ev - Vec3::splat(AGX_MIN_EV)) / (AGX_MAX_EV - AGX_MIN_EV);

    // sigmoid contrast fit
    let x2 = x * x;
    let x4 = x2 * x2;
    x4 * x2 * 15.5 - x4 * x * 40.14 + x4 * 31.96 - x2 * x * 6.868 + x2 * 0.4298 + x * 0.1191
        - Vec3::splat(0.00232)
}

fn agx_eotf(v: Vec3) -> Vec3 {
    let v = (AGX_OUTSET * v).max(Vec3::ZERO);
    Vec3::new(v.x.powf(2.2), v.y.powf(2.2), v.z.powf(2.2))
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

pub fn linear_to_srgb_u8(color: Vec3) -> [u8; 3] {
    color
        .clamp(Vec3::ZERO, Vec3::ONE)
        .to_array()
        .map(|c| (linear_to_srgb(c) * 255.0).round() as u8)
}
