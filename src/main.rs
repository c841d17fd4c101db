use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

mod raytracer;

use raytracer::RenderSession;
use raytracer::config::LaunchOptions;
use raytracer::error::Result;
use raytracer::exporter::{Exporter, PngExporter};
use raytracer::gbuffer::GBufferView;
use raytracer::renderloop::{Dispatch, SequentialDispatch};
use raytracer::scene::Scene;

/// World-space half-size mapped onto the position preview.
const PREVIEW_EXTENT: f32 = 12.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        if e.is_fatal() {
            log::error!("aborting render: {e}");
        } else {
            log::error!("{e}");
        }
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let opts = LaunchOptions::from_args(args)?;

    let mut scene = Scene::cornell_box(opts.width, opts.height)?;
    if opts.aperture > 0.0 {
        scene.camera = scene.camera.with_lens(opts.aperture, opts.focal_distance);
    }
    let scene = Arc::new(scene);

    if opts.sequential {
        let session = RenderSession::with_dispatch(scene, opts.render.clone(), SequentialDispatch)?;
        render_frames(session, &opts)
    } else {
        render_frames(RenderSession::new(scene, opts.render.clone())?, &opts)
    }
}

fn render_frames<D: Dispatch>(mut session: RenderSession<D>, opts: &LaunchOptions) -> Result<()> {
    for frame in 0..opts.frames {
        render_frame(&mut session, opts);

        let base = match opts.frames {
            1 => opts.output.clone(),
            _ => format!("{}_{frame:03}", opts.output),
        };
        export_frame(&session, opts, &base)?;
        session.reset();
    }

    session.teardown();
    Ok(())
}

fn render_frame<D: Dispatch>(session: &mut RenderSession<D>, opts: &LaunchOptions) {
    log::info!("rendering {} iterations at depth {}", opts.iterations, opts.render.max_depth);
    let render_start = Instant::now();
    let report_every = (opts.iterations / 8).max(1);
    for i in 0..opts.iterations {
        session.render_iteration();

        if (i + 1) % report_every == 0 {
            let elapsed = render_start.elapsed().as_secs_f32();
            let rate = (i + 1) as f32 / elapsed;
            log::info!("  iteration {}/{}: {:.2} it/s", i + 1, opts.iterations, rate);
        }
    }

    let total_rays = (session.width() * session.height()) as f64 * opts.iterations as f64;
    let render_time = render_start.elapsed();
    log::info!(
        "rendered in {:.3}s ({:.2} Mprimary/s)",
        render_time.as_secs_f32(),
        total_rays / render_time.as_secs_f64().max(1e-9) / 1e6
    );
}

fn export_frame<D: Dispatch>(
    session: &RenderSession<D>,
    opts: &LaunchOptions,
    base: &str,
) -> Result<()> {
    let (width, height) = (session.width(), session.height());
    let exporter = PngExporter::with_tonemap(opts.tonemap).with_exposure(opts.exposure);
    let output = |suffix: &str| PathBuf::from(format!("{base}{suffix}.png"));

    exporter.export(&session.display_buffer(), width, height, &output(""))?;
    if opts.denoise {
        exporter.export(&session.denoise(), width, height, &output("_denoised"))?;
    }

    // G-buffer channels are already in display range.
    let debug = PngExporter::srgb();
    for (view, suffix) in [
        (GBufferView::Normal, "_normals"),
        (GBufferView::Position, "_positions"),
        (GBufferView::Depth, "_depth"),
    ] {
        let image = session.gbuffer_visualization(view, PREVIEW_EXTENT);
        debug.export(&image, width, height, &output(suffix))?;
    }
    Ok(())
}
