use super::{Exporter, ToneMap, linear_to_srgb_u8};
use crate::raytracer::error::{RenderError, Result};
use glam::Vec3;
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

pub struct PngExporter {
    tonemap: ToneMap,
    exposure: f32,
}

impl PngExporter {
    pub fn srgb() -> Self {
        Self::with_tonemap(ToneMap::None)
    }

    pub fn with_tonemap(tonemap: ToneMap) -> Self {
        Self { tonemap, exposure: 1.0 }
    }

    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    fn vec3_to_rgb(&self, color: Vec3) -> Rgb<u8> {
        Rgb(linear_to_srgb_u8(self.tonemap.apply_with_exposure(color, self.exposure)))
    }

    pub fn encode(&self, colors: &[Vec3], width: usize, height: usize) -> Result<RgbImage> {
        if colors.len() != width * height {
            return Err(RenderError::InvalidConfig(format!(
                "buffer of {} pixels does not match {width}x{height}",
                colors.len()
            )));
        }
        Ok(ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
            self.vec3_to_rgb(colors[y as usize * width + x as usize])
        }))
    }
}

impl Exporter for PngExporter {
    fn export(&self, colors: &[Vec3], width: usize, height: usize, path: &Path) -> Result<()> {
        self.encode(colors, width, height)?.save(path)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let colors = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let img = PngExporter::srgb().encode(&colors, 2, 2).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 0), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_encode_rejects_size_mismatch() {
        assert!(PngExporter::srgb().encode(&[Vec3::ONE; 3], 2, 2).is_err());
    }

    #[test]
    fn test_exposure_applied() {
        let img = PngExporter::srgb().with_exposure(0.0).encode(&[Vec3::ONE], 1, 1).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_export_writes_file() {
        let path = std::env::temp_dir().join(format!("tracer-export-{}.png", std::process::id()));
        PngExporter::with_tonemap(ToneMap::Aces)
            .export(&[Vec3::splat(0.5); 4], 2, 2, &path)
            .unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (2, 2));
        std::fs::remove_file(&path).unwrap();
    }
}
