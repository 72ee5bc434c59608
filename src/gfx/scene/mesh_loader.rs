//! # OBJ Mesh Loading
//!
//! Turns a Wavefront OBJ file into the CPU-side geometry the viewer uploads:
//! positions, triangle indices, per-vertex normals, texture coordinates and a
//! uniform normalisation scale.
//!
//! Only the first shape of the file is used. Faces are triangulated by `tobj`
//! and materials are ignored; lighting parameters come from the GUI instead.

use std::{
    f32::consts::PI,
    path::{Path, PathBuf},
};

use cgmath::{InnerSpace, Vector2, Vector3, Zero};
use thiserror::Error;

use super::vertex::Vertex3D;

/// File names that get an analytic spherical UV mapping.
pub const SPHERE_ASSETS: [&str; 2] = ["sphere.obj", "sphere_large.obj"];

/// Reasons a mesh could not be loaded.
///
/// All of these are recoverable: the caller keeps its previous mesh.
#[derive(Error, Debug)]
pub enum MeshLoadError {
    #[error("could not read OBJ file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse OBJ {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("no vertices could be read from {0}")]
    NoVertices(String),

    #[error("no faces could be read from {0}")]
    NoFaces(String),

    #[error("face index {index} in {name} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        name: String,
        index: u32,
        vertex_count: usize,
    },
}

/// CPU-side geometry of a loaded mesh.
///
/// `normals` and `tex_coords` are parallel to `positions`; `indices` holds
/// three entries per triangle, each a valid offset into `positions`.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vector3<f32>>,
    pub tex_coords: Vec<Vector2<f32>>,
    /// Uniform scale that fits the bounding box into a unit cube.
    pub scale: f32,
}

impl MeshData {
    /// Loads and processes the OBJ file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MeshLoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| MeshLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_obj_source(&name, &source)
    }

    /// Processes OBJ text already in memory.
    ///
    /// `name` is the file name; it selects the texture mapping (see
    /// [`SPHERE_ASSETS`]) and is used in error messages.
    pub fn from_obj_source(name: &str, source: &str) -> Result<Self, MeshLoadError> {
        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        };

        let (models, _materials) =
            tobj::load_obj_buf(&mut source.as_bytes(), &load_options, |_| {
                Ok((Vec::new(), Default::default()))
            })
            .map_err(|source| MeshLoadError::Parse {
                name: name.to_string(),
                source,
            })?;

        let Some(first) = models.first().filter(|m| !m.mesh.positions.is_empty()) else {
            // tobj drops vertices that no face references, so look at the raw text
            // to tell an empty file from one that only lacks faces.
            return Err(if has_vertex_lines(source) {
                MeshLoadError::NoFaces(name.to_string())
            } else {
                MeshLoadError::NoVertices(name.to_string())
            });
        };

        let positions: Vec<Vector3<f32>> = first
            .mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();

        if first.mesh.indices.len() < 3 {
            return Err(MeshLoadError::NoFaces(name.to_string()));
        }

        let triangle_len = first.mesh.indices.len() - first.mesh.indices.len() % 3;
        let indices = first.mesh.indices[..triangle_len].to_vec();

        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshLoadError::IndexOutOfRange {
                name: name.to_string(),
                index,
                vertex_count: positions.len(),
            });
        }

        // Only the first shape is drawn, but the whole file sets the scale.
        let file_positions: Vec<Vector3<f32>> = models
            .iter()
            .flat_map(|m| m.mesh.positions.chunks_exact(3))
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        let scale = normalization_scale(&file_positions);
        let normals = vertex_normals(&positions, &indices);
        let tex_coords = texture_coordinates(name, &positions);

        log::debug!(
            "Parsed {}: {} vertices, {} triangles, scale {:.4}",
            name,
            positions.len(),
            indices.len() / 3,
            scale
        );

        Ok(Self {
            name: name.to_string(),
            positions,
            indices,
            normals,
            tex_coords,
            scale,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Interleaves positions, normals and texture coordinates for upload.
    pub fn vertices(&self) -> Vec<Vertex3D> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.tex_coords)
            .map(|((p, n), t)| Vertex3D {
                position: (*p).into(),
                normal: (*n).into(),
                tex_coords: (*t).into(),
            })
            .collect()
    }
}

fn has_vertex_lines(source: &str) -> bool {
    source
        .lines()
        .any(|line| line.trim_start().starts_with("v ") || line.trim_start().starts_with("v\t"))
}

/// `1 / max(size_x, size_y, size_z)` over the axis-aligned bounding box.
///
/// Returns 1.0 for an empty or degenerate (single point) box.
pub fn normalization_scale(positions: &[Vector3<f32>]) -> f32 {
    let Some(first) = positions.first() else {
        return 1.0;
    };

    let (min, max) = positions.iter().fold((*first, *first), |(min, max), p| {
        (
            Vector3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
            Vector3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
        )
    });

    let size = max - min;
    let largest = size.x.max(size.y).max(size.z);
    if largest <= f32::EPSILON {
        log::warn!("Degenerate bounding box, using unit scale");
        return 1.0;
    }

    1.0 / largest
}

/// Area-weighted vertex normals.
///
/// Face normals are accumulated without normalising them first, so larger
/// triangles contribute more. Vertices that end up with a zero accumulator
/// get `+Y`.
pub fn vertex_normals(positions: &[Vector3<f32>], indices: &[u32]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zero(); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );

        let edge1 = positions[i1] - positions[i0];
        let edge2 = positions[i2] - positions[i0];
        let face_normal = edge1.cross(edge2);

        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    for normal in normals.iter_mut() {
        *normal = if normal.magnitude2() > f32::EPSILON * f32::EPSILON {
            normal.normalize()
        } else {
            Vector3::unit_y()
        };
    }

    normals
}

/// Texture coordinates for every position, already flipped horizontally.
pub fn texture_coordinates(name: &str, positions: &[Vector3<f32>]) -> Vec<Vector2<f32>> {
    let spherical = SPHERE_ASSETS.contains(&name);

    positions
        .iter()
        .map(|p| {
            if spherical {
                sphere_tex_coord(*p)
            } else {
                Vector2::new(p.x, p.y)
            }
        })
        .map(invert_horizontal)
        .collect()
}

/// Spherical mapping for a unit sphere centred at the origin.
pub fn sphere_tex_coord(p: Vector3<f32>) -> Vector2<f32> {
    let theta = p.z.atan2(p.x);
    let phi = p.y.clamp(-1.0, 1.0).asin();

    Vector2::new(0.5 + theta / (2.0 * PI), 0.5 - phi / PI)
}

/// Matches the image loader's orientation: `u' = 1 - u`.
pub fn invert_horizontal(uv: Vector2<f32>) -> Vector2<f32> {
    Vector2::new(1.0 - uv.x, uv.y)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    pub(crate) const CUBE_OBJ: &str = "\
o cube
v -1.0 -1.0  1.0
v  1.0 -1.0  1.0
v  1.0  1.0  1.0
v -1.0  1.0  1.0
v -1.0 -1.0 -1.0
v  1.0 -1.0 -1.0
v  1.0  1.0 -1.0
v -1.0  1.0 -1.0
f 1 2 3 4
f 6 5 8 7
f 5 1 4 8
f 2 6 7 3
f 4 3 7 8
f 5 6 2 1
";

    /// UV sphere of radius 1 as OBJ text.
    pub(crate) fn uv_sphere_obj(stacks: u32, slices: u32) -> String {
        let mut obj = String::from("o sphere\n");
        for i in 0..=stacks {
            let phi = PI * i as f32 / stacks as f32;
            for j in 0..slices {
                let theta = 2.0 * PI * j as f32 / slices as f32;
                obj.push_str(&format!(
                    "v {} {} {}\n",
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin()
                ));
            }
        }
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * slices + j + 1;
                let b = i * slices + (j + 1) % slices + 1;
                let c = a + slices;
                let d = b + slices;
                obj.push_str(&format!("f {} {} {}\nf {} {} {}\n", a, c, b, b, c, d));
            }
        }
        obj
    }

    #[test]
    fn test_cube_counts_and_scale() {
        let mesh = MeshData::from_obj_source("cube.obj", CUBE_OBJ).unwrap();

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.tex_coords.len(), mesh.positions.len());
        assert!((mesh.scale - 0.5).abs() < EPS);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = MeshData::from_obj_source("cube.obj", CUBE_OBJ).unwrap();
        for normal in &mesh.normals {
            assert!((normal.magnitude() - 1.0).abs() < EPS, "{:?}", normal);
        }

        // Corner normals of a cube point away from the centre.
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(p.dot(*n) > 0.0);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = MeshData::from_obj_source("sphere.obj", &uv_sphere_obj(8, 12)).unwrap();
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.positions.len()));
    }

    #[test]
    fn test_scale_times_largest_dimension_is_one() {
        let obj = "v 0 0 0\nv 4 0 0\nv 0 2 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\n";
        let mesh = MeshData::from_obj_source("wedge.obj", obj).unwrap();

        assert!((mesh.scale * 4.0 - 1.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_box_uses_unit_scale() {
        let positions = vec![Vector3::new(3.0, 3.0, 3.0); 4];
        assert_eq!(normalization_scale(&positions), 1.0);
        assert_eq!(normalization_scale(&[]), 1.0);
    }

    #[test]
    fn test_degenerate_triangle_gets_fallback_normal() {
        let positions = vec![Vector3::new(1.0, 1.0, 1.0); 3];
        let normals = vertex_normals(&positions, &[0, 1, 2]);
        assert!(normals.iter().all(|n| *n == Vector3::unit_y()));
    }

    #[test]
    fn test_normals_are_area_weighted() {
        // A small and a large triangle sharing vertex 0, facing +Z and +X.
        let positions = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
        ];
        let normals = vertex_normals(&positions, &[0, 1, 2, 0, 3, 4]);

        assert!(normals[0].x > normals[0].z * 10.0);
    }

    #[test]
    fn test_sphere_scale_and_uv_range() {
        let mesh = MeshData::from_obj_source("sphere_large.obj", &uv_sphere_obj(16, 24)).unwrap();

        // Radius 1 sphere has a 2-unit bounding box.
        assert!((mesh.scale - 0.5).abs() < EPS);

        for uv in &mesh.tex_coords {
            assert!((-EPS..=1.0 + EPS).contains(&uv.x), "u out of range: {}", uv.x);
            assert!((-EPS..=1.0 + EPS).contains(&uv.y), "v out of range: {}", uv.y);
        }
    }

    #[test]
    fn test_spherical_uv_is_inverted_once() {
        let mesh = MeshData::from_obj_source("sphere.obj", &uv_sphere_obj(6, 8)).unwrap();

        for (p, uv) in mesh.positions.iter().zip(&mesh.tex_coords) {
            let raw = sphere_tex_coord(*p);
            assert!((uv.x - (1.0 - raw.x)).abs() < EPS);
            assert!((uv.y - raw.y).abs() < EPS);
        }
    }

    #[test]
    fn test_planar_fallback_uv_is_inverted_once() {
        let mesh = MeshData::from_obj_source("cube.obj", CUBE_OBJ).unwrap();

        for (p, uv) in mesh.positions.iter().zip(&mesh.tex_coords) {
            assert!((uv.x - (1.0 - p.x)).abs() < EPS);
            assert!((uv.y - p.y).abs() < EPS);
        }
    }

    #[test]
    fn test_sphere_tex_coord_poles_and_equator() {
        let north = sphere_tex_coord(Vector3::new(0.0, 1.0, 0.0));
        assert!((north.y - 0.0).abs() < EPS);

        let south = sphere_tex_coord(Vector3::new(0.0, -1.0, 0.0));
        assert!((south.y - 1.0).abs() < EPS);

        let front = sphere_tex_coord(Vector3::new(1.0, 0.0, 0.0));
        assert!((front.x - 0.5).abs() < EPS);
        assert!((front.y - 0.5).abs() < EPS);
    }

    #[test]
    fn test_no_vertices_error() {
        let err = MeshData::from_obj_source("empty.obj", "# nothing here\n").unwrap_err();
        assert!(matches!(err, MeshLoadError::NoVertices(_)));
    }

    #[test]
    fn test_no_faces_error() {
        let err = MeshData::from_obj_source("points.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\n")
            .unwrap_err();
        assert!(matches!(err, MeshLoadError::NoFaces(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MeshData::load("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshLoadError::Io { .. }));
    }

    #[test]
    fn test_vertices_interleave_attributes() {
        let mesh = MeshData::from_obj_source("cube.obj", CUBE_OBJ).unwrap();
        let vertices = mesh.vertices();

        assert_eq!(vertices.len(), 8);
        let position: [f32; 3] = mesh.positions[0].into();
        let tex_coords: [f32; 2] = mesh.tex_coords[0].into();
        assert_eq!(vertices[0].position, position);
        assert_eq!(vertices[0].tex_coords, tex_coords);
    }

    #[test]
    fn test_scale_covers_every_object_in_file() {
        let source = "\
o small
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o big
v 0 0 0
v 10 0 0
v 0 10 0
f 4 5 6
";
        let mesh = MeshData::from_obj_source("two.obj", source).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!((mesh.scale - 0.1).abs() < 1e-6);
    }
}
