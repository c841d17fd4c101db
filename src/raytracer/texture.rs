use crate::raytracer::error::{RenderError, Result};
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureDesc {
    pub offset: usize,
    pub width: u32,
    pub height: u32,
}

/// All texture samples flattened into one linear array.
#[derive(Clone, Debug, Default)]
pub struct TextureAtlas {
    data: Vec<Vec3>,
    textures: Vec<TextureDesc>,
}

impl TextureAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a texture and returns its id. Empty textures and texel slices
    /// that disagree with the size are rejected.
    pub fn push(&mut self, width: u32, height: u32, texels: &[Vec3]) -> Result<u32> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidScene(format!(
                "texture {} has no texels ({width}x{height})",
                self.textures.len()
            )));
        }
        if texels.len() != width as usize * height as usize {
            return Err(RenderError::InvalidScene(format!(
                "texture {} is {width}x{height} but has {} texels",
                self.textures.len(),
                texels.len()
            )));
        }
        let id = self.textures.len() as u32;
        self.textures.push(TextureDesc {
            offset: self.data.len(),
            width,
            height,
        });
        self.data.extend_from_slice(texels);
        Ok(id)
    }

    pub fn checker(&mut self, size: u32, a: Vec3, b: Vec3) -> Result<u32> {
        let texels: Vec<Vec3> = (0..size * size)
            .map(|i| if ((i % size) + (i / size)) % 2 == 0 { a } else { b })
            .collect();
        self.push(size, size, &texels)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Bilinear lookup with repeat wrapping.
    pub fn sample(&self, texture_id: u32, uv: Vec2) -> Vec3 {
        let Some(desc) = self.textures.get(texture_id as usize) else {
            return Vec3::ONE;
        };
        let texels = &self.data[desc.offset..desc.offset + (desc.width * desc.height) as usize];

        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let px = u * desc.width as f32 - 0.5;
        let py = v * desc.height as f32 - 0.5;

        let x0 = px.floor() as i32;
        let y0 = py.floor() as i32;

        let w = desc.width as i32;
        let h = desc.height as i32;
        let x0w = x0.rem_euclid(w) as usize;
        let y0h = y0.rem_euclid(h) as usize;
        let x1w = (x0 + 1).rem_euclid(w) as usize;
        let y1h = (y0 + 1).rem_euclid(h) as usize;

        let fx = px - px.floor();
        let fy = py - py.floor();

        let row = desc.width as usize;
        let c00 = texels[y0h * row + x0w];
        let c10 = texels[y0h * row + x1w];
        let c01 = texels[y1h * row + x0w];
        let c11 = texels[y1h * row + x1w];

        let c0 = c00.lerp(c10, fx);
        let c1 = c01.lerp(c11, fx);
        c0.lerp(c1, fy)
    }
}
