use crate::raytracer::error::{Result, alloc_buffer};
use crate::raytracer::ray::PathSegment;
use crate::raytracer::renderloop::Dispatch;
use glam::Vec3;

/// Running radiance sum across iterations. Division by the iteration count
/// happens only on read.
pub struct Framebuffer {
    pixels: Vec<Vec3>,
    width: usize,
    height: usize,
    sample_count: u32,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            pixels: alloc_buffer("image accumulator", width * height, Vec3::ZERO)?,
            width,
            height,
            sample_count: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn reset(&mut self) {
        self.pixels.fill(Vec3::ZERO);
        self.sample_count = 0;
    }

    /// Adds each path's final color at its pixel. `paths` must hold one path
    /// per pixel ordered by pixel index.
    pub fn accumulate_paths<D: Dispatch>(&mut self, dispatch: &D, paths: &[PathSegment]) {
        debug_assert_eq!(paths.len(), self.pixels.len());
        debug_assert!(paths.iter().enumerate().all(|(i, p)| p.pixel_index as usize == i));
        dispatch.for_each(&mut self.pixels, |i, acc| *acc += paths[i].color);
        self.sample_count += 1;
    }

    pub fn to_color_buffer<D: Dispatch>(&self, dispatch: &D) -> Vec<Vec3> {
        let mut out = vec![Vec3::ZERO; self.pixels.len()];
        if self.sample_count > 0 {
            let scale = 1.0 / self.sample_count as f32;
            dispatch.for_each(&mut out, |i, c| *c = self.pixels[i] * scale);
        }
        out
    }
}
