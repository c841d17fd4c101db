use crate::raytracer::error::{RenderError, Result};
use crate::raytracer::exporter::ToneMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionMode {
    #[default]
    Position,
    Depth,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalMode {
    #[default]
    Raw,
    Octahedral,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DenoiseParams {
    pub color_phi: f32,
    pub normal_phi: f32,
    pub position_phi: f32,
    /// Widest filter footprint in pixels.
    pub filter_size: u32,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            color_phi: 0.45,
            normal_phi: 0.35,
            position_phi: 0.2,
            filter_size: 80,
        }
    }
}

impl DenoiseParams {
    /// Step widths 1, 2, 4, ... while the 5x5 footprint `4 * step + 1` fits
    /// inside `filter_size`.
    pub fn step_widths(&self) -> Vec<u32> {
        let mut steps = Vec::new();
        let mut step = 1u32;
        while 4 * step + 1 <= self.filter_size {
            steps.push(step);
            step *= 2;
        }
        steps
    }
}

/// Options fixed for the lifetime of a render session.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub max_depth: u32,
    pub antialias: bool,
    pub cache_first_bounce: bool,
    pub stream_compaction: bool,
    pub sort_by_material: bool,
    pub gbuffer_position: PositionMode,
    pub gbuffer_normal: NormalMode,
    pub threads: Option<usize>,
    pub denoise: DenoiseParams,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            antialias: true,
            cache_first_bounce: false,
            stream_compaction: true,
            sort_by_material: false,
            gbuffer_position: PositionMode::Position,
            gbuffer_normal: NormalMode::Raw,
            threads: None,
            denoise: DenoiseParams::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig("max depth must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig("thread count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Options read from the command line by the binary.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchOptions {
    pub width: usize,
    pub height: usize,
    pub iterations: u32,
    /// Independent accumulations rendered back to back, each from a reset.
    pub frames: u32,
    pub aperture: f32,
    pub focal_distance: f32,
    pub sequential: bool,
    pub denoise: bool,
    pub output: String,
    pub tonemap: ToneMap,
    pub exposure: f32,
    pub render: RenderConfig,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            iterations: 64,
            frames: 1,
            aperture: 0.0,
            focal_distance: 10.0,
            sequential: false,
            denoise: false,
            output: "render".to_string(),
            tonemap: ToneMap::Aces,
            exposure: 1.0,
            render: RenderConfig::default(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T> {
    let value = value.ok_or_else(|| RenderError::InvalidConfig(format!("{flag} expects a value")))?;
    value
        .parse()
        .map_err(|_| RenderError::InvalidConfig(format!("{flag}: cannot parse '{value}'")))
}

impl LaunchOptions {
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut opts = LaunchOptions::default();
        let mut denoise = opts.render.denoise;
        let mut iter = args.iter().skip(1);

        while let Some(arg) = iter.next() {
            let flag = arg.as_str();
            match flag {
                "--width" => opts.width = parse_value(flag, iter.next())?,
                "--height" => opts.height = parse_value(flag, iter.next())?,
                "--iterations" | "-n" => opts.iterations = parse_value(flag, iter.next())?,
                "--frames" => opts.frames = parse_value(flag, iter.next())?,
                "--aperture" => opts.aperture = parse_value(flag, iter.next())?,
                "--focal-distance" => opts.focal_distance = parse_value(flag, iter.next())?,
                "--sequential" => opts.sequential = true,
                "--depth" => opts.render.max_depth = parse_value(flag, iter.next())?,
                "--threads" => opts.render.threads = Some(parse_value(flag, iter.next())?),
                "--out" | "-o" => opts.output = parse_value(flag, iter.next())?,
                "--tonemap" => opts.tonemap = parse_value(flag, iter.next())?,
                "--exposure" => opts.exposure = parse_value(flag, iter.next())?,
                "--no-aa" => opts.render.antialias = false,
                "--cache-rays" => opts.render.cache_first_bounce = true,
                "--no-compaction" => opts.render.stream_compaction = false,
                "--sort-materials" => opts.render.sort_by_material = true,
                "--depth-gbuffer" => opts.render.gbuffer_position = PositionMode::Depth,
                "--oct-normals" => opts.render.gbuffer_normal = NormalMode::Octahedral,
                "--denoise" | "-d" => opts.denoise = true,
                "--filter-size" => denoise.filter_size = parse_value(flag, iter.next())?,
                "--color-phi" => denoise.color_phi = parse_value(flag, iter.next())?,
                "--normal-phi" => denoise.normal_phi = parse_value(flag, iter.next())?,
                "--position-phi" => denoise.position_phi = parse_value(flag, iter.next())?,
                other => {
                    return Err(RenderError::InvalidConfig(format!("unknown flag '{other}'")));
                }
            }
        }
        opts.render.denoise = denoise;

        opts.render.validate()?;
        opts.validate()?;
        Ok(opts)
    }

    fn validate(&self) -> Result<()> {
        if self.frames == 0 {
            return Err(RenderError::InvalidConfig("frame count must be at least 1".into()));
        }
        if !(self.aperture >= 0.0 && self.aperture.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "aperture must be a finite non-negative radius, got {}",
                self.aperture
            )));
        }
        if !(self.focal_distance > 0.0 && self.focal_distance.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "focal distance must be positive, got {}",
                self.focal_distance
            )));
        }
        Ok(())
    }
}
