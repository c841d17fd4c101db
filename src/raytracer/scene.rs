use crate::raytracer::camera::Camera;
use crate::raytracer::error::{RenderError, Result};
use crate::raytracer::material::Material;
use crate::raytracer::shape::{Geom, Transform, Triangle};
use crate::raytracer::texture::TextureAtlas;
use glam::{Vec2, Vec3};

/// Immutable scene resources shared by every stage of a render.
#[derive(Clone, Debug)]
pub struct Scene {
    pub geoms: Vec<Geom>,
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
    pub textures: TextureAtlas,
    pub camera: Camera,
}

impl Scene {
    pub fn new(
        geoms: Vec<Geom>,
        triangles: Vec<Triangle>,
        materials: Vec<Material>,
        textures: TextureAtlas,
        camera: Camera,
    ) -> Self {
        Scene {
            geoms,
            triangles,
            materials,
            textures,
            camera,
        }
    }

    pub fn empty(camera: Camera) -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), TextureAtlas::new(), camera)
    }

    #[inline]
    pub fn material(&self, material_id: u32) -> &Material {
        &self.materials[material_id as usize]
    }

    pub fn add_material(&mut self, material: Material) -> u32 {
        self.materials.push(material);
        (self.materials.len() - 1) as u32
    }

    /// Appends `triangles` and a mesh primitive covering them.
    pub fn add_mesh(&mut self, triangles: &[Triangle], material_id: u32) {
        let first = self.triangles.len() as u32;
        self.triangles.extend_from_slice(triangles);
        self.geoms.push(Geom::mesh(first, triangles.len() as u32, material_id));
    }

    pub fn validate(&self) -> Result<()> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(RenderError::InvalidScene(format!(
                "camera resolution {}x{} has no pixels",
                self.camera.width, self.camera.height
            )));
        }

        for (i, geom) in self.geoms.iter().enumerate() {
            let material_id = geom.material_id();
            if material_id as usize >= self.materials.len() {
                return Err(RenderError::InvalidScene(format!(
                    "geom {i} references material {material_id} but only {} exist",
                    self.materials.len()
                )));
            }
            if let Geom::Mesh { first, count, .. } = *geom {
                let end = first as usize + count as usize;
                if end > self.triangles.len() {
                    return Err(RenderError::InvalidScene(format!(
                        "mesh {i} covers triangles {first}..{end} but only {} exist",
                        self.triangles.len()
                    )));
                }
            }
        }

        for (i, material) in self.materials.iter().enumerate() {
            if let Some(texture) = material.texture
                && texture as usize >= self.textures.texture_count()
            {
                return Err(RenderError::InvalidScene(format!(
                    "material {i} references texture {texture} but only {} exist",
                    self.textures.texture_count()
                )));
            }
        }

        Ok(())
    }

    /// Closed Cornell box with a ceiling light, three spheres and a small
    /// textured two-triangle mesh.
    pub fn cornell_box(width: usize, height: usize) -> Result<Self> {
        let eye = Vec3::new(0.0, 5.0, 10.5);
        let camera = Camera::new(eye, Vec3::new(0.0, 5.0, 0.0), Vec3::Y, 45.0, width, height);
        let mut scene = Scene::empty(camera);

        let light = scene.add_material(Material::emissive(Vec3::ONE, 5.0));
        let white = scene.add_material(Material::diffuse(Vec3::splat(0.85)));
        let red = scene.add_material(Material::diffuse(Vec3::new(0.85, 0.35, 0.35)));
        let green = scene.add_material(Material::diffuse(Vec3::new(0.35, 0.85, 0.35)));
        let mirror = scene.add_material(Material::mirror(Vec3::splat(0.98), 0.0));
        let glass = scene.add_material(Material::glass(Vec3::splat(0.98), 1.5));

        let checker = scene.textures.checker(8, Vec3::splat(0.9), Vec3::new(0.2, 0.2, 0.6))?;
        let tiles = scene.add_material(Material::diffuse(Vec3::ONE).with_texture(checker));

        let wall = |t: Vec3, s: Vec3| Transform::new(t, Vec3::ZERO, s);
        let ball = |t: Vec3, d: f32| Transform::new(t, Vec3::ZERO, Vec3::splat(d));
        scene.geoms.extend([
            Geom::cube(wall(Vec3::new(0.0, 10.0, 0.0), Vec3::new(3.0, 0.3, 3.0)), light),
            Geom::cube(wall(Vec3::ZERO, Vec3::new(10.0, 0.01, 10.0)), white),
            Geom::cube(wall(Vec3::new(0.0, 10.0, 0.0), Vec3::new(10.0, 0.01, 10.0)), white),
            Geom::cube(wall(Vec3::new(0.0, 5.0, -5.0), Vec3::new(10.0, 10.0, 0.01)), white),
            Geom::cube(wall(Vec3::new(0.0, 5.0, 11.0), Vec3::new(10.0, 10.0, 0.01)), white),
            Geom::cube(wall(Vec3::new(-5.0, 5.0, 0.0), Vec3::new(0.01, 10.0, 10.0)), red),
            Geom::cube(wall(Vec3::new(5.0, 5.0, 0.0), Vec3::new(0.01, 10.0, 10.0)), green),
            Geom::sphere(ball(Vec3::new(-2.2, 1.5, -1.5), 3.0), white),
            Geom::sphere(ball(Vec3::new(2.2, 1.5, -1.0), 3.0), mirror),
            Geom::sphere(ball(Vec3::new(0.0, 1.2, 2.0), 2.4), glass),
        ]);

        let n = Vec3::Z;
        let quad = [
            Vec3::new(-1.5, 4.0, -4.9),
            Vec3::new(1.5, 4.0, -4.9),
            Vec3::new(1.5, 7.0, -4.9),
            Vec3::new(-1.5, 7.0, -4.9),
        ];
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        scene.add_mesh(
            &[
                Triangle::new([quad[0], quad[1], quad[2]], [n; 3], [uvs[0], uvs[1], uvs[2]]),
                Triangle::new([quad[0], quad[2], quad[3]], [n; 3], [uvs[0], uvs[2], uvs[3]]),
            ],
            tiles,
        );

        Ok(scene)
    }
}
