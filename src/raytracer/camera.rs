use crate::raytracer::ray::Ray;
use glam::{Vec2, Vec3};

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub view: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub width: usize,
    pub height: usize,
    /// World-space extent of one pixel on the image plane at unit distance.
    pub pixel_length: Vec2,
    pub aperture: f32,
    pub focal_distance: f32,
}

impl Camera {
    pub fn new(
        position: Vec3,
        look_at: Vec3,
        up: Vec3,
        fov_y: f32,
        width: usize,
        height: usize,
    ) -> Self {
        let view = (look_at - position).normalize();
        let right = view.cross(up).normalize();
        let up = right.cross(view);

        let y_scale = (fov_y.to_radians() * 0.5).tan();
        let x_scale = y_scale * width as f32 / height.max(1) as f32;
        let pixel_length = Vec2::new(
            2.0 * x_scale / width.max(1) as f32,
            2.0 * y_scale / height.max(1) as f32,
        );

        Camera {
            position,
            view,
            right,
            up,
            width,
            height,
            pixel_length,
            aperture: 0.0,
            focal_distance: 10.0,
        }
    }

    pub fn with_lens(mut self, aperture: f32, focal_distance: f32) -> Self {
        self.aperture = aperture.max(0.0);
        self.focal_distance = focal_distance;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn has_dof(&self) -> bool {
        self.aperture > 0.0
    }

    /// Direction through pixel `(x, y)` offset by `jitter` in pixel units,
    /// where a zero jitter hits the pixel center. Row 0 is the top of the image.
    pub fn pixel_direction(&self, x: usize, y: usize, jitter: Vec2) -> Vec3 {
        let px = x as f32 + 0.5 + jitter.x - self.width as f32 * 0.5;
        let py = y as f32 + 0.5 + jitter.y - self.height as f32 * 0.5;
        let offset = self.right * self.pixel_length.x * px - self.up * self.pixel_length.y * py;
        (self.view + offset).normalize()
    }

    /// `lens` is a uniform sample in [0, 1)^2, ignored without an aperture.
    pub fn generate_ray(&self, x: usize, y: usize, jitter: Vec2, lens: Vec2) -> Ray {
        let direction = self.pixel_direction(x, y, jitter);

        if !self.has_dof() {
            return Ray::new(self.position, direction);
        }

        let focus_point = self.position + direction * self.focal_distance;

        let r = lens.x.sqrt() * self.aperture;
        let theta = lens.y * std::f32::consts::TAU;
        let origin = self.position + self.right * (r * theta.cos()) + self.up * (r * theta.sin());

        Ray::new(origin, (focus_point - origin).normalize())
    }
}
