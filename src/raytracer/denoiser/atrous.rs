use super::{DenoiseInput, Denoiser};
use crate::raytracer::config::DenoiseParams;
use crate::raytracer::renderloop::Dispatch;
use glam::Vec3;

const KERNEL: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Edge-avoiding à-trous wavelet filter guided by the G-buffer.
pub struct EdgeAvoidingDenoiser {
    params: DenoiseParams,
}

struct Guides<'a> {
    normals: &'a [Vec3],
    positions: &'a [Vec3],
    width: usize,
    height: usize,
}

impl EdgeAvoidingDenoiser {
    pub fn new(params: DenoiseParams) -> Self {
        Self { params }
    }

    #[inline]
    fn similarity(diff_sq: f32, phi: f32) -> f32 {
        let w = (-diff_sq / phi).exp();
        if w.is_nan() { 0.0 } else { w.min(1.0) }
    }

    fn filter_pixel(
        &self,
        src: &[Vec3],
        guides: &Guides,
        x: usize,
        y: usize,
        step: usize,
    ) -> Vec3 {
        let p = y * guides.width + x;
        let (cp, np, pp) = (src[p], guides.normals[p], guides.positions[p]);
        let params = &self.params;
        let tap = |center: usize, offset: usize, len: usize| {
            let q = center as isize + (offset as isize - 2) * step as isize;
            q.clamp(0, len as isize - 1) as usize
        };

        let mut sum = Vec3::ZERO;
        let mut weight_sum = 0.0f32;

        for (j, ky) in KERNEL.iter().enumerate() {
            let qy = tap(y, j, guides.height);
            for (i, kx) in KERNEL.iter().enumerate() {
                let qx = tap(x, i, guides.width);
                let q = qy * guides.width + qx;

                let cq = src[q];
                let dn = np - guides.normals[q];
                let dp = pp - guides.positions[q];
                let w_color = Self::similarity((cp - cq).length_squared(), params.color_phi);
                let w_normal = Self::similarity(dn.length_squared(), params.normal_phi);
                let w_position = Self::similarity(dp.length_squared(), params.position_phi);

                let weight = kx * ky * w_color * w_normal * w_position;
                sum += cq * weight;
                weight_sum += weight;
            }
        }

        // A non-positive or non-finite total (e.g. a zero sensitivity) keeps the input.
        if weight_sum > 0.0 && weight_sum.is_finite() {
            sum / weight_sum
        } else {
            cp
        }
    }
}

impl Denoiser for EdgeAvoidingDenoiser {
    fn denoise<D: Dispatch>(&self, dispatch: &D, input: DenoiseInput) -> Vec<Vec3> {
        let width = input.width();
        let height = input.height();
        debug_assert_eq!(input.color.len(), width * height);

        let steps = self.params.step_widths();
        if steps.is_empty() {
            log::warn!(
                "filter size {} is below the smallest 5x5 footprint, denoiser skipped",
                self.params.filter_size
            );
            return input.color.to_vec();
        }

        let mut normals = vec![Vec3::ZERO; width * height];
        let mut positions = vec![Vec3::ZERO; width * height];
        let gbuffer = input.gbuffer;
        dispatch.for_each(&mut normals, |i, n| *n = gbuffer.pixels()[i].normal());
        dispatch.for_each(&mut positions, |i, p| {
            *p = gbuffer.pixels()[i].position(input.camera, i % width, i / width);
        });
        let guides = Guides {
            normals: &normals,
            positions: &positions,
            width,
            height,
        };

        let mut current = input.color.to_vec();
        let mut scratch = vec![Vec3::ZERO; width * height];
        for &step in &steps {
            let src = &current;
            dispatch.for_each(&mut scratch, |i, out| {
                *out = self.filter_pixel(src, &guides, i % width, i / width, step as usize);
            });
            std::mem::swap(&mut current, &mut scratch);
        }

        log::debug!("denoised {width}x{height} with {} passes", steps.len());
        current
    }
}
