mod png;
mod tonemapping;

pub use png::PngExporter;
pub use tonemapping::{ToneMap, linear_to_srgb_u8};

use crate::raytracer::error::Result;
use glam::Vec3;
use std::path::Path;

pub trait Exporter {
    /// Writes a row-major linear color buffer, row 0 at the top.
    fn export(&self, colors: &[Vec3], width: usize, height: usize, path: &Path) -> Result<()>;
}
