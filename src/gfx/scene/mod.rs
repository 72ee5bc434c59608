//! # Scene
//!
//! - [`MeshData`] - geometry read from an OBJ file, normalized and with derived normals
//! - [`Model`] - the displayed object: its file, transform, material, texture and GPU buffers
//! - [`Scene`] - the point light
//! - [`Vertex3D`] - interleaved vertex layout fed to the pipeline

pub mod mesh_loader;
pub mod object;
pub mod scene;
pub mod vertex;

pub use mesh_loader::{MeshData, MeshLoadError};
pub use object::{DrawObject, Model, TextureSelection};
pub use scene::{Lighting, Scene};
pub use vertex::Vertex3D;
