mod atrous;

pub use atrous::EdgeAvoidingDenoiser;

use crate::raytracer::camera::Camera;
use crate::raytracer::gbuffer::GBuffer;
use crate::raytracer::renderloop::Dispatch;
use glam::Vec3;

pub struct DenoiseInput<'a> {
    /// Display-space linear color, already divided by the iteration count.
    pub color: &'a [Vec3],
    pub gbuffer: &'a GBuffer,
    pub camera: &'a Camera,
}

impl DenoiseInput<'_> {
    pub fn width(&self) -> usize {
        self.gbuffer.width()
    }

    pub fn height(&self) -> usize {
        self.gbuffer.height()
    }
}

pub trait Denoiser {
    fn denoise<D: Dispatch>(&self, dispatch: &D, input: DenoiseInput) -> Vec<Vec3>;
}
