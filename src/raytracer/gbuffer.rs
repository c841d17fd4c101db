use crate::raytracer::camera::Camera;
use crate::raytracer::config::{NormalMode, PositionMode};
use crate::raytracer::error::{Result, alloc_buffer};
use crate::raytracer::ray::{Intersection, PathSegment};
use crate::raytracer::renderloop::Dispatch;
use glam::{Vec2, Vec3};

#[inline]
fn sign_not_zero(v: Vec2) -> Vec2 {
    Vec2::new(if v.x >= 0.0 { 1.0 } else { -1.0 }, if v.y >= 0.0 { 1.0 } else { -1.0 })
}

/// Octahedral projection of a unit normal onto [-1, 1]^2.
pub fn oct_encode(n: Vec3) -> Vec2 {
    let l1 = n.x.abs() + n.y.abs() + n.z.abs();
    if l1 == 0.0 {
        return Vec2::ZERO;
    }
    let p = Vec2::new(n.x, n.y) / l1;
    if n.z < 0.0 {
        (Vec2::ONE - Vec2::new(p.y.abs(), p.x.abs())) * sign_not_zero(p)
    } else {
        p
    }
}

pub fn oct_decode(e: Vec2) -> Vec3 {
    let z = 1.0 - e.x.abs() - e.y.abs();
    let xy = if z < 0.0 {
        (Vec2::ONE - Vec2::new(e.y.abs(), e.x.abs())) * sign_not_zero(e)
    } else {
        e
    };
    Vec3::new(xy.x, xy.y, z).normalize()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GPosition {
    Position(Vec3),
    Depth(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GNormal {
    Raw(Vec3),
    Octahedral(Vec2),
}

/// First-bounce snapshot for one pixel. `hit` marks whether the camera ray
/// found a surface; misses read back as a zero position, depth and normal in
/// every encoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GBufferPixel {
    pub hit: bool,
    pub position: GPosition,
    pub normal: GNormal,
}

impl GBufferPixel {
    pub const EMPTY: GBufferPixel = GBufferPixel {
        hit: false,
        position: GPosition::Position(Vec3::ZERO),
        normal: GNormal::Raw(Vec3::ZERO),
    };

    pub fn capture(
        path: &PathSegment,
        isect: &Intersection,
        position_mode: PositionMode,
        normal_mode: NormalMode,
    ) -> Self {
        let hit = isect.is_hit();
        let position = match position_mode {
            PositionMode::Position if hit => GPosition::Position(path.ray.at(isect.t)),
            PositionMode::Position => GPosition::Position(Vec3::ZERO),
            PositionMode::Depth if hit => GPosition::Depth(isect.t),
            PositionMode::Depth => GPosition::Depth(0.0),
        };
        let normal = if hit { isect.normal } else { Vec3::ZERO };
        let normal = match normal_mode {
            NormalMode::Raw => GNormal::Raw(normal),
            NormalMode::Octahedral => GNormal::Octahedral(oct_encode(normal)),
        };
        GBufferPixel {
            hit,
            position,
            normal,
        }
    }

    pub fn normal(&self) -> Vec3 {
        match self.normal {
            _ if !self.hit => Vec3::ZERO,
            GNormal::Raw(n) => n,
            GNormal::Octahedral(e) => oct_decode(e),
        }
    }

    pub fn depth(&self, camera: &Camera) -> f32 {
        match self.position {
            _ if !self.hit => 0.0,
            GPosition::Position(p) => (p - camera.position).length(),
            GPosition::Depth(t) => t,
        }
    }

    /// World position. In depth mode it is rebuilt along the unjittered
    /// pinhole ray through the pixel center, so pixel jitter shifts it by at
    /// most half a pixel footprint and a thin lens moves it off the true hit.
    pub fn position(&self, camera: &Camera, x: usize, y: usize) -> Vec3 {
        match self.position {
            _ if !self.hit => Vec3::ZERO,
            GPosition::Position(p) => p,
            GPosition::Depth(t) => camera.position + camera.pixel_direction(x, y, Vec2::ZERO) * t,
        }
    }
}

/// Channel shown by [`GBuffer::visualize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GBufferView {
    Normal,
    Position,
    Depth,
}

pub struct GBuffer {
    pixels: Vec<GBufferPixel>,
    width: usize,
    height: usize,
    position_mode: PositionMode,
    normal_mode: NormalMode,
}

impl GBuffer {
    pub fn new(
        width: usize,
        height: usize,
        position_mode: PositionMode,
        normal_mode: NormalMode,
    ) -> Result<Self> {
        Ok(Self {
            pixels: alloc_buffer("gbuffer", width * height, GBufferPixel::EMPTY)?,
            width,
            height,
            position_mode,
            normal_mode,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[GBufferPixel] {
        &self.pixels
    }

    /// Records slot `i` of the depth-0 arrays into pixel `i`. Only valid
    /// before any compaction or sorting has permuted the paths.
    pub fn capture<D: Dispatch>(
        &mut self,
        dispatch: &D,
        paths: &[PathSegment],
        intersections: &[Intersection],
    ) {
        debug_assert_eq!(paths.len(), self.pixels.len());
        let (position_mode, normal_mode) = (self.position_mode, self.normal_mode);
        dispatch.for_each(&mut self.pixels, |i, px| {
            *px = GBufferPixel::capture(&paths[i], &intersections[i], position_mode, normal_mode);
        });
    }

    /// Debug image of one channel. Normals map to `n * 0.5 + 0.5`, positions
    /// to `p / extent * 0.5 + 0.5`, depth is normalized by the farthest hit.
    pub fn visualize<D: Dispatch>(
        &self,
        dispatch: &D,
        view: GBufferView,
        camera: &Camera,
        extent: f32,
    ) -> Vec<Vec3> {
        let mut out = vec![Vec3::ZERO; self.pixels.len()];
        let width = self.width;

        let max_depth = match view {
            GBufferView::Depth => self
                .pixels
                .iter()
                .map(|p| p.depth(camera))
                .filter(|d| d.is_finite())
                .fold(0.0f32, f32::max),
            _ => 0.0,
        };

        dispatch.for_each(&mut out, |i, color| {
            let px = &self.pixels[i];
            *color = match view {
                GBufferView::Normal => px.normal() * 0.5 + Vec3::splat(0.5),
                GBufferView::Position => {
                    let p = px.position(camera, i % width, i / width);
                    (p / extent.max(1e-6) * 0.5 + Vec3::splat(0.5)).clamp(Vec3::ZERO, Vec3::ONE)
                }
                GBufferView::Depth if max_depth > 0.0 => Vec3::splat(px.depth(camera) / max_depth),
                GBufferView::Depth => Vec3::ZERO,
            };
        });
        out
    }
}
