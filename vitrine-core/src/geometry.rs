/// Geometry primitives and the procedural builders for boxes, box assemblies and quads
use nalgebra::{Point3, Vector3};

use crate::revolution::RevolutionProfile;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Unnormalized face normal; its length is twice the triangle's area.
    pub fn cross(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        (v1 - v0).cross(&(v2 - v0))
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        self.cross().normalize()
    }

    /// True when the three positions are collinear or coincide.
    pub fn is_degenerate(&self) -> bool {
        self.cross().norm_squared() < 1e-12
    }
}

/// Indexed triangle-list geometry with per-vertex normals.
///
/// Positions and normals are flat `x, y, z` triplets so they can be uploaded
/// to vertex buffers as they are. Indices are 16-bit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u16>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index.
    ///
    /// # Panics
    ///
    /// Panics if the geometry outgrows the 16-bit index range.
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u16 {
        let index = self.vertex_count();
        assert!(
            index <= u16::MAX as usize,
            "geometry exceeds the 16-bit index range"
        );
        self.positions.extend_from_slice(&position);
        self.normals.extend_from_slice(&normal);
        index as u16
    }

    pub fn push_triangle(&mut self, a: u16, b: u16, c: u16) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn vertex(&self, index: usize) -> Vertex {
        let p = &self.positions[index * 3..index * 3 + 3];
        let n = &self.normals[index * 3..index * 3 + 3];
        Vertex::new(p[0], p[1], p[2], n[0], n[1], n[2])
    }

    /// The `n`th triangle of the index list.
    pub fn triangle(&self, n: usize) -> Triangle {
        let i = &self.indices[n * 3..n * 3 + 3];
        Triangle::new(
            self.vertex(i[0] as usize),
            self.vertex(i[1] as usize),
            self.vertex(i[2] as usize),
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |n| self.triangle(n))
    }
}

/// An axis-aligned box placed inside an assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBox {
    /// Offset of the box's center from the assembly origin.
    pub center: Vector3<f32>,
    /// Full width, height and depth.
    pub extents: Vector3<f32>,
}

impl PlacedBox {
    pub fn new(center: Vector3<f32>, extents: Vector3<f32>) -> Self {
        Self { center, extents }
    }
}

/// Shape to generate.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDescriptor {
    /// A single box centered at the origin.
    Box { extents: Vector3<f32> },
    /// Several boxes concatenated into one buffer.
    BoxAssembly(Vec<PlacedBox>),
    /// A profile swept around the vertical axis.
    Revolution(RevolutionProfile),
    /// A horizontal rectangle at y = 0 facing up.
    Quad { half_width: f32, half_depth: f32 },
}

/// Generate the geometry for a descriptor.
pub fn build(descriptor: &GeometryDescriptor) -> GeometryData {
    match descriptor {
        GeometryDescriptor::Box { extents } => {
            let mut data = GeometryData::with_capacity(24, 36);
            push_box(&mut data, &PlacedBox::new(Vector3::zeros(), *extents));
            data
        }
        GeometryDescriptor::BoxAssembly(boxes) => {
            let mut data = GeometryData::with_capacity(boxes.len() * 24, boxes.len() * 36);
            for placed in boxes {
                push_box(&mut data, placed);
            }
            data
        }
        GeometryDescriptor::Revolution(profile) => profile.sweep(),
        GeometryDescriptor::Quad {
            half_width,
            half_depth,
        } => quad(*half_width, *half_depth),
    }
}

/// Face normals and corner sign templates, in emission order.
/// Corners run counter-clockwise as seen from outside the face.
const BOX_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    // Front
    (
        [0.0, 0.0, 1.0],
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    ),
    // Back
    (
        [0.0, 0.0, -1.0],
        [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
    ),
    // Top
    (
        [0.0, 1.0, 0.0],
        [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]],
    ),
    // Bottom
    (
        [0.0, -1.0, 0.0],
        [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    ),
    // Right
    (
        [1.0, 0.0, 0.0],
        [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
    ),
    // Left
    (
        [-1.0, 0.0, 0.0],
        [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    ),
];

/// Append 24 vertices and 36 indices for one box, based at the current
/// vertex count.
fn push_box(data: &mut GeometryData, placed: &PlacedBox) {
    let half = placed.extents / 2.0;

    for (normal, corners) in &BOX_FACES {
        let base = data.vertex_count() as u16;
        for sign in corners {
            let position = [
                placed.center.x + sign[0] * half.x,
                placed.center.y + sign[1] * half.y,
                placed.center.z + sign[2] * half.z,
            ];
            data.push_vertex(position, *normal);
        }
        data.push_triangle(base, base + 1, base + 2);
        data.push_triangle(base, base + 2, base + 3);
    }
}

fn quad(half_width: f32, half_depth: f32) -> GeometryData {
    let mut data = GeometryData::with_capacity(4, 6);
    let up = [0.0, 1.0, 0.0];

    data.push_vertex([-half_width, 0.0, -half_depth], up);
    data.push_vertex([-half_width, 0.0, half_depth], up);
    data.push_vertex([half_width, 0.0, half_depth], up);
    data.push_vertex([half_width, 0.0, -half_depth], up);
    data.push_triangle(0, 1, 2);
    data.push_triangle(0, 2, 3);

    data
}

/// Cabinet-style furniture: back panel, evenly spaced shelves, two sides,
/// bottom and top, all of the same panel thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfLayout {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub thickness: f32,
    pub shelf_count: usize,
}

impl ShelfLayout {
    /// Vertical distance between consecutive shelves.
    pub fn spacing(&self) -> f32 {
        (self.height - self.thickness) / (self.shelf_count + 1) as f32
    }

    /// Center heights of the interior shelves, bottom to top.
    pub fn shelf_offsets(&self) -> Vec<f32> {
        let spacing = self.spacing();
        (0..self.shelf_count)
            .map(|i| -self.height / 2.0 + (i + 1) as f32 * spacing)
            .collect()
    }

    /// Every panel of the assembly, in emission order.
    pub fn panels(&self) -> Vec<PlacedBox> {
        let (w, h, d, t) = (self.width, self.height, self.depth, self.thickness);
        let horizontal = Vector3::new(w, t, d);
        let vertical = Vector3::new(t, h, d);

        let mut panels = Vec::with_capacity(self.shelf_count + 5);
        panels.push(PlacedBox::new(
            Vector3::new(0.0, 0.0, -d / 2.0),
            Vector3::new(w, h, t),
        ));
        for y in self.shelf_offsets() {
            panels.push(PlacedBox::new(Vector3::new(0.0, y, 0.0), horizontal));
        }
        panels.push(PlacedBox::new(Vector3::new(-w / 2.0, 0.0, 0.0), vertical));
        panels.push(PlacedBox::new(Vector3::new(w / 2.0, 0.0, 0.0), vertical));
        panels.push(PlacedBox::new(Vector3::new(0.0, -h / 2.0, 0.0), horizontal));
        panels.push(PlacedBox::new(Vector3::new(0.0, h / 2.0, 0.0), horizontal));

        panels
    }

    pub fn descriptor(&self) -> GeometryDescriptor {
        GeometryDescriptor::BoxAssembly(self.panels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> GeometryData {
        build(&GeometryDescriptor::Box {
            extents: Vector3::new(2.0, 1.0, 0.5),
        })
    }

    #[test]
    fn test_box_counts() {
        let data = unit_box();
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.normals.len(), data.positions.len());
        assert_eq!(data.index_count(), 36);
        assert!(data.indices.iter().all(|&i| i < 24));
    }

    #[test]
    fn test_box_normals_axis_aligned() {
        let data = unit_box();
        let axes = [
            Vector3::z(),
            -Vector3::z(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::x(),
            -Vector3::x(),
        ];

        for (face, axis) in axes.iter().enumerate() {
            for corner in 0..4 {
                let normal = data.vertex(face * 4 + corner).normal;
                assert_relative_eq!(normal.norm(), 1.0);
                assert_eq!(normal, *axis);
            }
        }
    }

    #[test]
    fn test_box_winding_faces_outward() {
        let data = unit_box();
        for triangle in data.triangles() {
            let stored = triangle.vertices[0].normal;
            assert_relative_eq!(triangle.calculate_normal(), stored, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_box_extents() {
        let data = unit_box();
        let xs = data.positions.iter().step_by(3);
        let max_x = xs.fold(f32::MIN, |m, &x| m.max(x));
        assert_relative_eq!(max_x, 1.0);
        let max_z = data.positions[2..].iter().step_by(3).fold(f32::MIN, |m, &z| m.max(z));
        assert_relative_eq!(max_z, 0.25);
    }

    #[test]
    fn test_assembly_index_base_advances() {
        let boxes = vec![
            PlacedBox::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)),
            PlacedBox::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)),
        ];
        let data = build(&GeometryDescriptor::BoxAssembly(boxes));

        assert_eq!(data.vertex_count(), 48);
        assert_eq!(data.index_count(), 72);
        assert!(data.indices[..36].iter().all(|&i| i < 24));
        assert!(data.indices[36..].iter().all(|&i| (24..48).contains(&i)));
        // Second box is translated by its placement offset
        assert_relative_eq!(data.vertex(24).position.x, 0.5);
    }

    #[test]
    fn test_shelf_offsets() {
        let layout = ShelfLayout {
            width: 1.0,
            height: 1.0,
            depth: 0.4,
            thickness: 0.05,
            shelf_count: 3,
        };
        let offsets = layout.shelf_offsets();
        assert_eq!(offsets.len(), 3);
        for (i, y) in offsets.iter().enumerate() {
            let expected = -0.5 + (i + 1) as f32 * (1.0 - 0.05) / 4.0;
            assert_relative_eq!(*y, expected);
        }

        let panels = layout.panels();
        assert_eq!(panels.len(), 8);
        for (panel, y) in panels[1..4].iter().zip(&offsets) {
            assert_eq!(panel.center.y, *y);
        }
    }

    #[test]
    fn test_shelf_assembly_geometry() {
        let layout = ShelfLayout {
            width: 2.0,
            height: 3.0,
            depth: 1.0,
            thickness: 0.1,
            shelf_count: 5,
        };
        let data = build(&layout.descriptor());
        assert_eq!(data.vertex_count(), 10 * 24);
        assert_eq!(data.index_count(), 10 * 36);
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.vertex_count()));
    }

    #[test]
    fn test_quad() {
        let data = build(&GeometryDescriptor::Quad {
            half_width: 1.0,
            half_depth: 2.0,
        });
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.indices, vec![0, 1, 2, 0, 2, 3]);
        for triangle in data.triangles() {
            assert_relative_eq!(triangle.calculate_normal(), Vector3::y(), epsilon = 1e-6);
        }
        assert!(data.positions.iter().skip(1).step_by(3).all(|&y| y == 0.0));
    }

    #[test]
    fn test_build_is_deterministic() {
        let descriptor = ShelfLayout {
            width: 1.0,
            height: 1.0,
            depth: 0.4,
            thickness: 0.05,
            shelf_count: 3,
        }
        .descriptor();
        let a = build(&descriptor);
        let b = build(&descriptor);
        assert_eq!(a, b);
        let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.positions), bits(&b.positions));
        assert_eq!(bits(&a.normals), bits(&b.normals));
    }

    #[test]
    fn test_degenerate_triangle() {
        let v = Vertex::new(1.0, 1.0, 1.0, 0.0, 1.0, 0.0);
        assert!(Triangle::new(v, v, v).is_degenerate());
    }
}
