//! # Model
//!
//! The single object the studio displays: its mesh, model transform,
//! material, texture selection and GPU buffers.
//!
//! Meshes are swapped with [`Model::change_object`]. A failed load leaves the
//! current mesh, transform and buffers in place.

use std::path::{Path, PathBuf};

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::gfx::resources::material::{Material, ModelUniform};

use super::mesh_loader::{MeshData, MeshLoadError};

/// Object translated by the I/J/K/L keys, in model units.
pub const TRANSLATE_STEP: f32 = 0.5;
/// Object rotation per arrow key press, in degrees.
pub const ROTATE_STEP: f32 = 10.0;
/// Spin applied every frame to the textured earth, in degrees.
pub const EARTH_SPIN: f32 = 0.4;

const EARTH_OBJECT: &str = "sphere_large.obj";
const EARTH_TEXTURE: &str = "erf.jpg";

/// Which image is mapped onto the model and whether it is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSelection {
    pub directory: PathBuf,
    pub file_name: String,
    pub show: bool,
    /// Set once the selected image has actually been uploaded.
    pub loaded: bool,
}

impl TextureSelection {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>, show: bool) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
            show,
            loaded: false,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Points the selection at `path`, keeping the current directory when
    /// `path` has no parent.
    pub fn set_path(&mut self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.directory = parent.to_path_buf();
        }
        if let Some(name) = path.file_name() {
            self.file_name = name.to_string_lossy().into_owned();
        }
    }
}

/// Vertex and index buffers of the uploaded mesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

pub struct Model {
    pub directory: PathBuf,
    pub file_name: String,
    /// File shown before the most recent successful object change.
    pub previous: Option<String>,
    pub transform: Matrix4<f32>,
    pub material: Material,
    pub texture: TextureSelection,
    mesh: MeshData,
    gpu: Option<GpuMesh>,
}

impl Model {
    /// Creates a model with no geometry; call [`Model::change_object`] to load one.
    pub fn new(directory: impl Into<PathBuf>, texture: TextureSelection) -> Self {
        Self {
            directory: directory.into(),
            file_name: String::new(),
            previous: None,
            transform: Matrix4::identity(),
            material: Material::default(),
            texture,
            mesh: MeshData::default(),
            gpu: None,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Loads `directory/file_name` and makes it the current mesh.
    ///
    /// The file is parsed completely before anything is replaced. On success
    /// the transform is reset to the mesh's normalisation scale and the GPU
    /// buffers are dropped so the next [`Model::upload`] rebuilds them.
    pub fn change_object(
        &mut self,
        directory: impl Into<PathBuf>,
        file_name: &str,
    ) -> Result<(), MeshLoadError> {
        let directory = directory.into();
        let mesh = MeshData::load(directory.join(file_name))?;

        log::info!(
            "Loaded {} ({} vertices, {} triangles)",
            file_name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        if !self.file_name.is_empty() {
            self.previous = Some(std::mem::take(&mut self.file_name));
        }
        self.directory = directory;
        self.file_name = file_name.to_string();
        self.transform = Matrix4::from_scale(mesh.scale);
        self.mesh = mesh;
        self.gpu = None;

        Ok(())
    }

    /// Re-reads the current file from disk.
    pub fn reload(&mut self) -> Result<(), MeshLoadError> {
        let (directory, file_name) = (self.directory.clone(), self.file_name.clone());
        let previous = self.previous.clone();
        self.change_object(directory, &file_name)?;
        self.previous = previous;
        Ok(())
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.transform = self.transform * Matrix4::from_translation(offset);
    }

    pub fn rotate(&mut self, axis: Vector3<f32>, degrees: f32) {
        self.transform = self.transform * Matrix4::from_axis_angle(axis, Deg(degrees));
    }

    /// True for the textured earth, which spins on its own.
    pub fn is_spinning_earth(&self) -> bool {
        self.file_name == EARTH_OBJECT
            && self.texture.show
            && self.texture.loaded
            && self.texture.file_name == EARTH_TEXTURE
    }

    pub fn uniform(&self) -> ModelUniform {
        ModelUniform::new(self.transform, &self.material, self.texture.show)
    }

    pub fn gpu_mesh(&self) -> Option<&GpuMesh> {
        self.gpu.as_ref()
    }

    /// Creates the vertex and index buffers if they are missing.
    pub fn upload(&mut self, device: &wgpu::Device) {
        if self.gpu.is_some() || self.mesh.is_empty() {
            return;
        }

        let vertices = self.mesh.vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Index Buffer"),
            contents: bytemuck::cast_slice(&self.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("Uploaded {} to the GPU", self.file_name);

        self.gpu = Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: self.mesh.indices.len() as u32,
        });
    }
}

pub trait DrawObject<'a> {
    fn draw_model(&mut self, model: &'a Model);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_model(&mut self, model: &'b Model) {
        // Skip drawing if not uploaded
        let Some(gpu) = model.gpu_mesh() else {
            return;
        };

        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..gpu.index_count, 0, 0..1);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gfx::scene::mesh_loader::tests::CUBE_OBJ;

    /// Writes `files` into a fresh directory under the system temp dir.
    pub(crate) fn fixture_dir(tag: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("obj_studio_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            std::fs::write(dir.join(name), contents).unwrap();
        }
        dir
    }

    fn texture() -> TextureSelection {
        TextureSelection {
            loaded: true,
            ..TextureSelection::new("textures", "erf.jpg", true)
        }
    }

    #[test]
    fn test_change_object_resets_transform_to_scale() {
        let dir = fixture_dir("model_scale", &[("cube.obj", CUBE_OBJ)]);
        let mut model = Model::new(&dir, texture());
        model.translate(Vector3::new(1.0, 2.0, 3.0));

        model.change_object(&dir, "cube.obj").unwrap();

        assert_eq!(model.transform, Matrix4::from_scale(0.5));
        assert_eq!(model.mesh().vertex_count(), 8);
        assert_eq!(model.previous, None);
    }

    #[test]
    fn test_failed_load_keeps_previous_mesh() {
        let dir = fixture_dir(
            "model_fallback",
            &[("cube.obj", CUBE_OBJ), ("broken.obj", "# no geometry\n")],
        );
        let mut model = Model::new(&dir, texture());
        model.change_object(&dir, "cube.obj").unwrap();
        model.rotate(Vector3::unit_x(), ROTATE_STEP);
        let transform = model.transform;

        assert!(model.change_object(&dir, "broken.obj").is_err());
        assert!(model.change_object(&dir, "missing.obj").is_err());

        assert_eq!(model.file_name, "cube.obj");
        assert_eq!(model.mesh().vertex_count(), 8);
        assert_eq!(model.mesh().triangle_count(), 12);
        assert_eq!(model.transform, transform);
    }

    #[test]
    fn test_previous_tracks_last_loaded_file() {
        let dir = fixture_dir(
            "model_previous",
            &[("cube.obj", CUBE_OBJ), ("box.obj", CUBE_OBJ)],
        );
        let mut model = Model::new(&dir, texture());
        model.change_object(&dir, "cube.obj").unwrap();
        model.change_object(&dir, "box.obj").unwrap();
        assert_eq!(model.previous.as_deref(), Some("cube.obj"));

        model.reload().unwrap();
        assert_eq!(model.file_name, "box.obj");
        assert_eq!(model.previous.as_deref(), Some("cube.obj"));
    }

    #[test]
    fn test_transforms_are_post_multiplied() {
        let mut model = Model::new(".", texture());
        model.transform = Matrix4::from_scale(2.0);

        model.translate(Vector3::new(TRANSLATE_STEP, 0.0, 0.0));

        // Translation happens in model space, so the scale applies to it.
        assert_eq!(model.transform[3][0], 1.0);
    }

    #[test]
    fn test_spinning_earth_needs_all_conditions() {
        let mut model = Model::new(".", texture());
        model.file_name = "sphere_large.obj".to_string();
        assert!(model.is_spinning_earth());

        model.texture.show = false;
        assert!(!model.is_spinning_earth());

        model.texture.show = true;
        model.texture.loaded = false;
        assert!(!model.is_spinning_earth());

        model.texture.loaded = true;
        model.file_name = "sphere.obj".to_string();
        assert!(!model.is_spinning_earth());
    }

    #[test]
    fn test_texture_selection_set_path() {
        let mut selection = texture();
        selection.set_path(Path::new("other/moon.png"));
        assert_eq!(selection.path(), PathBuf::from("other/moon.png"));

        selection.set_path(Path::new("mars.png"));
        assert_eq!(selection.path(), PathBuf::from("other/mars.png"));
    }
}
