mod brdf;
mod intersect;
pub mod rng;
pub mod sampling;
mod shade;

pub use intersect::compute_intersection;
pub use rng::Rng;
pub use shade::shade_path;
