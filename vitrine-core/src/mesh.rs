/// Drawable mesh instances
use std::ops::Range;

use nalgebra::Matrix4;

use crate::geometry::GeometryData;
use crate::render::RenderBackend;
use crate::transform::Transform;

/// Identifies a texture registered with a backend.
pub type TextureId = u32;

/// Specular exponent used when a material does not set its own.
pub const DEFAULT_SHININESS: f32 = 64.0;

/// Surface parameters uploaded before a draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA. Alpha also weights the specular and rim terms.
    pub base_color: [f32; 4],
    pub use_texture: bool,
    pub texture: Option<TextureId>,
    pub shininess: Option<f32>,
}

impl Material {
    pub const fn solid(base_color: [f32; 4]) -> Self {
        Self {
            base_color,
            use_texture: false,
            texture: None,
            shininess: None,
        }
    }

    pub const fn textured(texture: TextureId) -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            use_texture: true,
            texture: Some(texture),
            shininess: None,
        }
    }

    pub const fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = Some(shininess);
        self
    }

    pub fn shininess_or_default(&self) -> f32 {
        self.shininess.unwrap_or(DEFAULT_SHININESS)
    }
}

/// A run of indices drawn with one material.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    pub range: Range<usize>,
    pub material: Material,
}

/// Anything that can issue its own draw calls against a backend.
pub trait Drawable {
    fn render<B: RenderBackend>(&self, buffers: &B::Buffers, backend: &mut B);
}

/// Generated geometry, its placement, and the materials it is drawn with.
///
/// The geometry is fixed at construction; only the transform changes.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub transform: Transform,
    geometry: GeometryData,
    submeshes: Vec<Submesh>,
}

impl Mesh {
    /// A mesh drawn with a single material over all of its indices.
    pub fn new(name: impl Into<String>, geometry: GeometryData, material: Material) -> Self {
        let range = 0..geometry.index_count();
        Self::with_submeshes(name, geometry, vec![Submesh { range, material }])
    }

    /// A mesh drawn in several material runs.
    ///
    /// # Panics
    ///
    /// Panics if a range runs past the index buffer or splits a triangle.
    pub fn with_submeshes(
        name: impl Into<String>,
        geometry: GeometryData,
        submeshes: Vec<Submesh>,
    ) -> Self {
        for submesh in &submeshes {
            assert!(
                submesh.range.end <= geometry.index_count(),
                "submesh range exceeds index buffer"
            );
            assert!(
                submesh.range.start % 3 == 0 && submesh.range.end % 3 == 0,
                "submesh range splits a triangle"
            );
        }

        Self {
            name: name.into(),
            transform: Transform::identity(),
            geometry,
            submeshes,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.transform.model_matrix()
    }
}

impl Drawable for Mesh {
    fn render<B: RenderBackend>(&self, buffers: &B::Buffers, backend: &mut B) {
        backend.set_model_matrix(&self.model_matrix());
        backend.bind_buffers(buffers);

        for submesh in &self.submeshes {
            backend.set_material(&submesh.material);
            backend.draw_indexed(submesh.range.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{build, GeometryDescriptor};
    use nalgebra::Vector3;

    fn cube() -> GeometryData {
        build(&GeometryDescriptor::Box {
            extents: Vector3::new(1.0, 1.0, 1.0),
        })
    }

    #[test]
    fn test_single_material_covers_all_indices() {
        let mesh = Mesh::new("cube", cube(), Material::solid([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(mesh.submeshes().len(), 1);
        assert_eq!(mesh.submeshes()[0].range, 0..36);
        assert_eq!(mesh.transform, Transform::identity());
    }

    #[test]
    fn test_material_defaults() {
        let material = Material::solid([0.4, 0.2, 0.1, 1.0]);
        assert!(!material.use_texture);
        assert_eq!(material.shininess_or_default(), DEFAULT_SHININESS);
        assert_eq!(material.with_shininess(128.0).shininess_or_default(), 128.0);

        let textured = Material::textured(3);
        assert!(textured.use_texture);
        assert_eq!(textured.texture, Some(3));
    }

    #[test]
    #[should_panic(expected = "splits a triangle")]
    fn test_submesh_must_align_to_triangles() {
        let material = Material::solid([1.0; 4]);
        Mesh::with_submeshes(
            "bad",
            cube(),
            vec![Submesh {
                range: 0..10,
                material,
            }],
        );
    }

    #[test]
    #[should_panic(expected = "exceeds index buffer")]
    fn test_submesh_must_fit() {
        let material = Material::solid([1.0; 4]);
        Mesh::with_submeshes(
            "bad",
            cube(),
            vec![Submesh {
                range: 0..39,
                material,
            }],
        );
    }
}
