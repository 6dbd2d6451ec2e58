/// Per-instance placement and the matrix helpers built on it
use nalgebra::{Matrix4, Vector3};

/// Position, yaw and non-uniform scale of one mesh instance.
///
/// Transforms are never nested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Yaw around the vertical axis, in radians.
    pub rotation: f32,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(position: Vector3<f32>, rotation: f32, scale: Vector3<f32>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), 0.0, Vector3::repeat(1.0))
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    pub fn with_scale(mut self, sx: f32, sy: f32, sz: f32) -> Self {
        self.scale = Vector3::new(sx, sy, sz);
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// `Translate(position) * RotateY(rotation) * Scale(scale)`
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Self::translation_matrix(&self.position)
            * Self::rotation_y_matrix(self.rotation)
            * Self::scale_matrix(&self.scale)
    }

    /// Create a rotation matrix around +Y
    pub fn rotation_y_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::y_axis(), angle)
    }

    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a scale matrix
    pub fn scale_matrix(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(scale)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_model_matrix() {
        let matrix = Transform::identity().model_matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let transform = Transform::at(1.0, 2.0, 3.0)
            .with_rotation(FRAC_PI_2)
            .with_scale(2.0, 1.0, 1.0);
        let point = transform
            .model_matrix()
            .transform_point(&Point3::new(1.0, 0.0, 0.0));

        // (1,0,0) -> scaled (2,0,0) -> yawed 90 degrees to (0,0,-2) -> translated
        assert_relative_eq!(point, Point3::new(1.0, 2.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_mvp_order() {
        let model = Transform::translation_matrix(&Vector3::new(1.0, 0.0, 0.0));
        let view = Transform::translation_matrix(&Vector3::new(0.0, 1.0, 0.0));
        let projection = Transform::scale_matrix(&Vector3::new(2.0, 2.0, 2.0));
        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        let point = mvp.transform_point(&Point3::origin());
        assert_relative_eq!(point, Point3::new(2.0, 2.0, 0.0));
    }
}
