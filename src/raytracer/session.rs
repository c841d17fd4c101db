use crate::raytracer::config::RenderConfig;
use crate::raytracer::denoiser::{DenoiseInput, Denoiser, EdgeAvoidingDenoiser};
use crate::raytracer::error::Result;
use crate::raytracer::framebuffer::Framebuffer;
use crate::raytracer::gbuffer::{GBuffer, GBufferView};
use crate::raytracer::renderloop::{
    Dispatch, IterationStats, ParallelDispatch, PathBuffers, trace_iteration,
};
use crate::raytracer::scene::Scene;
use glam::Vec3;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Totals reported when a session is torn down.
#[derive(Clone, Copy, Debug)]
pub struct SessionSummary {
    pub iterations: u32,
    pub elapsed: Duration,
}

/// Owns every per-session buffer. Stages borrow from it for the length of a
/// call and nothing outlives it.
pub struct RenderSession<D: Dispatch = ParallelDispatch> {
    scene: Arc<Scene>,
    config: RenderConfig,
    dispatch: D,
    buffers: PathBuffers,
    gbuffer: GBuffer,
    framebuffer: Framebuffer,
    denoiser: EdgeAvoidingDenoiser,
    started: Instant,
}

impl RenderSession<ParallelDispatch> {
    pub fn new(scene: impl Into<Arc<Scene>>, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let dispatch = ParallelDispatch::new(config.threads)?;
        Self::with_dispatch(scene, config, dispatch)
    }
}

impl<D: Dispatch> RenderSession<D> {
    pub fn with_dispatch(
        scene: impl Into<Arc<Scene>>,
        config: RenderConfig,
        dispatch: D,
    ) -> Result<Self> {
        let scene = scene.into();
        config.validate()?;
        scene.validate()?;

        let camera = &scene.camera;
        let pixel_count = camera.pixel_count();
        let buffers = PathBuffers::new(pixel_count, &config)?;
        let gbuffer = GBuffer::new(
            camera.width,
            camera.height,
            config.gbuffer_position,
            config.gbuffer_normal,
        )?;
        let framebuffer = Framebuffer::new(camera.width, camera.height)?;

        log::info!(
            "session {}x{}: {} geoms, {} triangles, {} materials, {} threads",
            camera.width,
            camera.height,
            scene.geoms.len(),
            scene.triangles.len(),
            scene.materials.len(),
            dispatch.threads()
        );

        Ok(Self {
            denoiser: EdgeAvoidingDenoiser::new(config.denoise),
            scene,
            config,
            dispatch,
            buffers,
            gbuffer,
            framebuffer,
            started: Instant::now(),
        })
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width()
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height()
    }

    pub fn iterations(&self) -> u32 {
        self.framebuffer.sample_count()
    }

    pub fn render_iteration(&mut self) -> IterationStats {
        let stats = trace_iteration(
            &self.dispatch,
            &self.scene,
            &self.config,
            self.iterations(),
            &mut self.buffers,
            &mut self.gbuffer,
            &mut self.framebuffer,
        );
        stats
    }

    /// Accumulated radiance averaged over the iterations so far.
    pub fn display_buffer(&self) -> Vec<Vec3> {
        self.framebuffer.to_color_buffer(&self.dispatch)
    }

    pub fn gbuffer_visualization(&self, view: GBufferView, extent: f32) -> Vec<Vec3> {
        self.gbuffer.visualize(&self.dispatch, view, &self.scene.camera, extent)
    }

    /// Filters the current display buffer. Accumulation is left untouched.
    pub fn denoise(&self) -> Vec<Vec3> {
        let start = Instant::now();
        let color = self.display_buffer();
        let out = self.denoiser.denoise(
            &self.dispatch,
            DenoiseInput {
                color: &color,
                gbuffer: &self.gbuffer,
                camera: &self.scene.camera,
            },
        );
        log::info!("denoised in {:.1}ms", start.elapsed().as_secs_f64() * 1e3);
        out
    }

    /// Starts a new accumulation on the same buffers.
    pub fn reset(&mut self) {
        self.framebuffer.reset();
        self.buffers.clear_cache();
        self.started = Instant::now();
    }

    pub fn teardown(self) -> SessionSummary {
        let summary = SessionSummary {
            iterations: self.iterations(),
            elapsed: self.started.elapsed(),
        };
        log::info!(
            "session closed after {} iterations in {:.2}s",
            summary.iterations,
            summary.elapsed.as_secs_f32()
        );
        summary
    }
}
