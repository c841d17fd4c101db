use glam::{Vec2, Vec3};

pub const RAY_EPSILON: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Ray { origin, direction }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Per-pixel path state carried between bounces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSegment {
    pub ray: Ray,
    pub color: Vec3,
    pub pixel_index: u32,
    pub remaining_bounces: u32,
}

impl PathSegment {
    pub const DEAD: PathSegment = PathSegment {
        ray: Ray {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        },
        color: Vec3::ZERO,
        pixel_index: 0,
        remaining_bounces: 0,
    };

    pub fn new(ray: Ray, pixel_index: u32, max_depth: u32) -> Self {
        PathSegment {
            ray,
            color: Vec3::ONE,
            pixel_index,
            remaining_bounces: max_depth,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.remaining_bounces > 0
    }

    #[inline]
    pub fn terminate(&mut self) {
        self.remaining_bounces = 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Parametric hit distance, negative when nothing was hit.
    pub t: f32,
    pub material_id: u32,
    /// Faces against the incoming ray.
    pub normal: Vec3,
    pub uv: Vec2,
    pub outside: bool,
}

impl Intersection {
    pub const MISS: Intersection = Intersection {
        t: -1.0,
        material_id: u32::MAX,
        normal: Vec3::ZERO,
        uv: Vec2::ZERO,
        outside: true,
    };

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.t > 0.0
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Intersection::MISS
    }
}
