/// The contract between the scene and a device-backed renderer
use std::ops::Range;

use nalgebra::{Matrix4, Point3};

use crate::error::RenderError;
use crate::geometry::GeometryData;
use crate::mesh::Material;

/// Uniforms shared by every draw in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub light_position: Point3<f32>,
    pub eye_position: Point3<f32>,
}

/// A bound shader program plus the attribute and uniform slots it exposes.
///
/// Calls mutate global binding state: after `bind_buffers` the slots refer to
/// that mesh's buffers until the next call, and nothing else may be assumed
/// to survive between two meshes.
pub trait RenderBackend {
    /// Device-side copy of one geometry.
    type Buffers;

    /// Copy geometry to the device. Called once per mesh.
    fn upload(&mut self, geometry: &GeometryData) -> Result<Self::Buffers, RenderError>;

    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clear color and depth.
    fn clear(&mut self);

    fn set_frame_uniforms(&mut self, frame: &FrameUniforms);

    fn set_model_matrix(&mut self, model: &Matrix4<f32>);

    fn set_material(&mut self, material: &Material);

    fn bind_buffers(&mut self, buffers: &Self::Buffers);

    /// Draw the bound index buffer's `range` as a triangle list.
    fn draw_indexed(&mut self, range: Range<usize>);
}
