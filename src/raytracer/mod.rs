pub mod camera;
pub mod config;
pub mod denoiser;
pub mod error;
pub mod exporter;
pub mod framebuffer;
pub mod gbuffer;
pub mod material;
pub mod ray;
pub mod renderer;
pub mod renderloop;
pub mod scene;
pub mod session;
pub mod shape;
pub mod texture;

pub use session::RenderSession;
