use super::compact::{sort_by_material, stable_partition};
use super::Dispatch;
use crate::raytracer::camera::Camera;
use crate::raytracer::config::RenderConfig;
use crate::raytracer::error::{Result, alloc_buffer};
use crate::raytracer::framebuffer::Framebuffer;
use crate::raytracer::gbuffer::GBuffer;
use crate::raytracer::ray::{Intersection, PathSegment};
use crate::raytracer::renderer::sampling::pixel_jitter;
use crate::raytracer::renderer::{Rng, compute_intersection, shade_path};
use crate::raytracer::scene::Scene;
use glam::Vec2;

/// Per-session path state, sized to the pixel count at init.
pub struct PathBuffers {
    pub paths: Vec<PathSegment>,
    pub intersections: Vec<Intersection>,
    cached_paths: Option<Vec<PathSegment>>,
    partition_scratch: Vec<PathSegment>,
    sort_order: Vec<u32>,
    sort_paths: Vec<PathSegment>,
    sort_intersections: Vec<Intersection>,
}

impl PathBuffers {
    pub fn new(pixel_count: usize, config: &RenderConfig) -> Result<Self> {
        let mut buffers = Self {
            paths: alloc_buffer("path buffer", pixel_count, PathSegment::DEAD)?,
            intersections: alloc_buffer(
                "intersection buffer",
                pixel_count,
                Intersection::MISS,
            )?,
            cached_paths: None,
            partition_scratch: alloc_buffer(
                "compaction scratch",
                pixel_count,
                PathSegment::DEAD,
            )?,
            sort_order: Vec::new(),
            sort_paths: Vec::new(),
            sort_intersections: Vec::new(),
        };
        buffers.partition_scratch.clear();

        if config.sort_by_material {
            buffers.sort_order = alloc_buffer("material sort order", pixel_count, 0u32)?;
            buffers.sort_paths =
                alloc_buffer("material sort paths", pixel_count, PathSegment::DEAD)?;
            buffers.sort_intersections =
                alloc_buffer("material sort hits", pixel_count, Intersection::MISS)?;
        }
        Ok(buffers)
    }

    pub fn clear_cache(&mut self) {
        self.cached_paths = None;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IterationStats {
    pub iteration: u32,
    /// Paths still being traced when each bounce started.
    pub active_per_depth: Vec<usize>,
    /// Number of intersect/shade passes that ran.
    pub depth_reached: u32,
}

/// Fills slot `i` with a fresh path for pixel `i`.
pub fn generate_camera_rays<D: Dispatch>(
    dispatch: &D,
    camera: &Camera,
    config: &RenderConfig,
    iteration: u32,
    paths: &mut [PathSegment],
) {
    let width = camera.width;
    let max_depth = config.max_depth;
    let antialias = config.antialias;

    dispatch.for_each(paths, |i, path| {
        let (x, y) = (i % width, i / width);
        let mut rng = Rng::for_camera(iteration, i as u32);
        let jitter = if antialias {
            pixel_jitter(rng.next(), rng.next())
        } else {
            Vec2::ZERO
        };
        let lens = if camera.has_dof() {
            Vec2::new(rng.next(), rng.next())
        } else {
            Vec2::ZERO
        };
        *path = PathSegment::new(camera.generate_ray(x, y, jitter, lens), i as u32, max_depth);
    });
}

/// Nearest hit for every path in `paths`. Dead paths record a miss.
pub fn compute_intersections<D: Dispatch>(
    dispatch: &D,
    scene: &Scene,
    paths: &[PathSegment],
    intersections: &mut [Intersection],
) {
    dispatch.for_each(intersections, |i, isect| {
        let path = &paths[i];
        *isect = if path.is_alive() {
            compute_intersection(&path.ray, scene)
        } else {
            Intersection::MISS
        };
    });
}

pub fn shade_materials<D: Dispatch>(
    dispatch: &D,
    scene: &Scene,
    paths: &mut [PathSegment],
    intersections: &[Intersection],
    iteration: u32,
    depth: u32,
) {
    dispatch.for_each(paths, |i, path| {
        shade_path(path, &intersections[i], scene, iteration, depth);
    });
}

/// Runs one full iteration: camera rays, the bounce loop, and accumulation.
pub fn trace_iteration<D: Dispatch>(
    dispatch: &D,
    scene: &Scene,
    config: &RenderConfig,
    iteration: u32,
    buffers: &mut PathBuffers,
    gbuffer: &mut GBuffer,
    framebuffer: &mut Framebuffer,
) -> IterationStats {
    let pixel_count = buffers.paths.len();

    if let Some(cached) = buffers.cached_paths.as_ref().filter(|_| config.cache_first_bounce) {
        buffers.paths.copy_from_slice(cached);
    } else {
        generate_camera_rays(dispatch, &scene.camera, config, iteration, &mut buffers.paths);
        if config.cache_first_bounce {
            buffers.cached_paths = Some(buffers.paths.clone());
        }
    }

    let mut stats = IterationStats {
        iteration,
        ..Default::default()
    };
    let mut active = pixel_count;
    let mut depth = 0u32;

    while active > 0 && depth < config.max_depth {
        stats.active_per_depth.push(active);

        let span = if config.stream_compaction { active } else { pixel_count };
        let paths = &mut buffers.paths[..span];
        let intersections = &mut buffers.intersections[..span];

        compute_intersections(dispatch, scene, paths, intersections);

        if depth == 0 {
            gbuffer.capture(dispatch, paths, intersections);
        }

        if config.sort_by_material {
            sort_by_material(
                paths,
                intersections,
                &mut buffers.sort_order,
                &mut buffers.sort_paths,
                &mut buffers.sort_intersections,
            );
        }

        shade_materials(dispatch, scene, paths, intersections, iteration, depth);
        depth += 1;

        active = if config.stream_compaction {
            stable_partition(paths, &mut buffers.partition_scratch, PathSegment::is_alive)
        } else {
            paths.iter().filter(|p| p.is_alive()).count()
        };
    }

    stats.depth_reached = depth;
    log::debug!("iteration {iteration}: active paths per depth {:?}", stats.active_per_depth);

    buffers.paths.sort_unstable_by_key(|p| p.pixel_index);
    framebuffer.accumulate_paths(dispatch, &buffers.paths);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::config::{NormalMode, PositionMode};
    use crate::raytracer::material::Material;
    use crate::raytracer::ray::Ray;
    use crate::raytracer::renderloop::{ParallelDispatch, SequentialDispatch};
    use crate::raytracer::shape::{Geom, Transform};
    use glam::Vec3;

    struct Harness {
        scene: Scene,
        config: RenderConfig,
        buffers: PathBuffers,
        gbuffer: GBuffer,
        framebuffer: Framebuffer,
    }

    impl Harness {
        fn new(scene: Scene, config: RenderConfig) -> Self {
            let (w, h) = (scene.camera.width, scene.camera.height);
            Self {
                buffers: PathBuffers::new(w * h, &config).unwrap(),
                gbuffer: GBuffer::new(w, h, config.gbuffer_position, config.gbuffer_normal)
                    .unwrap(),
                framebuffer: Framebuffer::new(w, h).unwrap(),
                scene,
                config,
            }
        }

        fn run<D: Dispatch>(&mut self, dispatch: &D, iteration: u32) -> IterationStats {
            trace_iteration(
                dispatch,
                &self.scene,
                &self.config,
                iteration,
                &mut self.buffers,
                &mut self.gbuffer,
                &mut self.framebuffer,
            )
        }

        fn image(&self) -> Vec<Vec3> {
            self.framebuffer.to_color_buffer(&SequentialDispatch)
        }
    }

    fn camera(size: usize) -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 40.0, size, size)
    }

    fn light_scene(size: usize) -> Scene {
        let mut scene = Scene::empty(camera(size));
        let light = scene.add_material(Material::emissive(Vec3::new(1.0, 0.8, 0.6), 3.0));
        let transform = Transform::new(Vec3::ZERO, Vec3::ZERO, Vec3::splat(40.0));
        scene.geoms.push(Geom::sphere(transform, light));
        scene
    }

    fn mixed_scene(size: usize) -> Scene {
        let mut scene = Scene::empty(camera(size));
        let light = scene.add_material(Material::emissive(Vec3::ONE, 4.0));
        let white = scene.add_material(Material::diffuse(Vec3::splat(0.7)));
        let mirror = scene.add_material(Material::mirror(Vec3::splat(0.9), 0.1));
        let ball = |x: f32| Transform::new(Vec3::new(x, 0.0, 0.0), Vec3::ZERO, Vec3::splat(1.2));
        let panel = Transform::new(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, Vec3::new(3.0, 0.2, 3.0));
        scene.geoms.extend([
            Geom::sphere(ball(-0.8), white),
            Geom::sphere(ball(0.8), mirror),
            Geom::cube(panel, light),
        ]);
        scene
    }

    #[test]
    fn test_light_filling_frame() {
        let config = RenderConfig {
            max_depth: 1,
            ..Default::default()
        };
        let mut h = Harness::new(light_scene(8), config);
        let expected = Vec3::new(1.0, 0.8, 0.6) * 3.0;

        let stats = h.run(&SequentialDispatch, 0);
        assert_eq!(stats.active_per_depth, vec![64]);
        assert!(h.image().iter().all(|&c| c == expected));

        for i in 1..5 {
            h.run(&SequentialDispatch, i);
        }
        assert_eq!(h.framebuffer.sample_count(), 5);
        assert!(h.image().iter().all(|&c| (c - expected).length() < 1e-5));
    }

    #[test]
    fn test_empty_scene_is_black() {
        let mut h = Harness::new(Scene::empty(camera(6)), RenderConfig::default());
        for i in 0..3 {
            let stats = h.run(&SequentialDispatch, i);
            assert_eq!(stats.depth_reached, 1);
        }
        assert!(h.image().iter().all(|&c| c == Vec3::ZERO));
    }

    #[test]
    fn test_single_bounce_on_diffuse() {
        let mut scene = Scene::empty(camera(4));
        let white = scene.add_material(Material::diffuse(Vec3::ONE));
        let room = Transform::new(Vec3::ZERO, Vec3::ZERO, Vec3::splat(50.0));
        scene.geoms.push(Geom::cube(room, white));
        let config = RenderConfig {
            max_depth: 1,
            ..Default::default()
        };
        let mut h = Harness::new(scene, config);
        let stats = h.run(&SequentialDispatch, 0);
        assert_eq!(stats.depth_reached, 1);
        assert_eq!(stats.active_per_depth, vec![16]);
        assert!(h.buffers.paths.iter().all(|p| p.remaining_bounces == 0));
        assert!(h.image().iter().all(|&c| c == Vec3::ZERO));
    }

    #[test]
    fn test_active_count_monotonic() {
        let mut h = Harness::new(mixed_scene(16), RenderConfig::default());
        for i in 0..4 {
            let stats = h.run(&SequentialDispatch, i);
            assert!(stats.depth_reached <= h.config.max_depth);
            assert!(stats.active_per_depth.windows(2).all(|w| w[1] <= w[0]));
            assert_eq!(stats.active_per_depth[0], 256);
        }
    }

    #[test]
    fn test_options_do_not_change_image() {
        let reference = {
            let mut h = Harness::new(mixed_scene(12), RenderConfig::default());
            for i in 0..3 {
                h.run(&SequentialDispatch, i);
            }
            h.image()
        };

        let variants = [
            RenderConfig {
                stream_compaction: false,
                ..Default::default()
            },
            RenderConfig {
                sort_by_material: true,
                ..Default::default()
            },
            RenderConfig {
                sort_by_material: true,
                stream_compaction: false,
                ..Default::default()
            },
        ];
        let parallel = ParallelDispatch::new(Some(3)).unwrap();
        for config in variants {
            let mut h = Harness::new(mixed_scene(12), config.clone());
            for i in 0..3 {
                h.run(&parallel, i);
            }
            assert_eq!(h.image(), reference, "{config:?}");
        }
    }

    #[test]
    fn test_cached_rays_replay() {
        let config = RenderConfig {
            cache_first_bounce: true,
            max_depth: 1,
            ..Default::default()
        };
        let mut h = Harness::new(mixed_scene(8), config);
        h.run(&SequentialDispatch, 0);
        assert!(h.buffers.cached_paths.is_some());
        let first_gbuffer = h.gbuffer.pixels().to_vec();
        h.run(&SequentialDispatch, 1);
        assert_eq!(h.gbuffer.pixels(), &first_gbuffer[..]);

        let mut fresh = Harness::new(
            mixed_scene(8),
            RenderConfig {
                max_depth: 1,
                ..Default::default()
            },
        );
        fresh.run(&SequentialDispatch, 0);
        fresh.run(&SequentialDispatch, 1);
        assert_ne!(fresh.gbuffer.pixels(), &first_gbuffer[..]);
    }

    #[test]
    fn test_gbuffer_captured_in_pixel_order() {
        let config = RenderConfig {
            antialias: false,
            sort_by_material: true,
            gbuffer_position: PositionMode::Depth,
            gbuffer_normal: NormalMode::Octahedral,
            ..Default::default()
        };
        let mut h = Harness::new(mixed_scene(8), config);
        h.run(&SequentialDispatch, 0);

        let cam = &h.scene.camera;
        for y in 0..8 {
            for x in 0..8 {
                let ray = Ray::new(cam.position, cam.pixel_direction(x, y, Vec2::ZERO));
                let isect = compute_intersection(&ray, &h.scene);
                let px = &h.gbuffer.pixels()[y * 8 + x];
                if isect.is_hit() {
                    assert!((px.depth(cam) - isect.t).abs() < 1e-4);
                    assert!((px.normal() - isect.normal).length() < 1e-3);
                } else {
                    assert_eq!(px.depth(cam), 0.0);
                }
            }
        }
    }
}
