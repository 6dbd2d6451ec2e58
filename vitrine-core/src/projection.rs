/// Orbit camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::config::CameraConfig;

/// Camera orbiting a fixed target.
///
/// Only the spherical offset (yaw, pitch, radius) is stored. The eye position
/// is derived on every query so repeated drags and zooms cannot drift it off
/// the orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    yaw: f32,
    pitch: f32,
    radius: f32,
    drag_sensitivity: f32,
    zoom_sensitivity: f32,
    min_radius: f32,
    max_radius: f32,
    pitch_limit: f32,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        let target = Point3::from(config.target);
        let mut camera = Self {
            target,
            up: Vector3::y(),
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            yaw: 0.0,
            pitch: 0.0,
            radius: 0.0,
            drag_sensitivity: config.drag_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            pitch_limit: config.pitch_limit_degrees.to_radians(),
        };
        camera.look_from(&Point3::from(config.eye));
        camera
    }

    /// Place the eye at `eye`, deriving yaw, pitch and radius from its offset
    /// to the target.
    ///
    /// The radius is clamped into `[min_radius, max_radius]`.
    pub fn look_from(&mut self, eye: &Point3<f32>) {
        let offset = *eye - self.target;
        let distance = offset.norm();
        self.radius = distance.clamp(self.min_radius, self.max_radius);

        if distance <= f32::EPSILON {
            self.yaw = 0.0;
            self.pitch = 0.0;
            return;
        }

        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / distance)
            .asin()
            .clamp(-self.pitch_limit, self.pitch_limit);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Rotate around the target by a pointer-drag delta in pixels.
    pub fn apply_drag(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.drag_sensitivity;
        self.pitch = (self.pitch + delta_y * self.drag_sensitivity)
            .clamp(-self.pitch_limit, self.pitch_limit);
    }

    /// Scale the orbit radius by a wheel delta.
    ///
    /// A zoom that would leave the open `(min_radius, max_radius)` interval is
    /// rejected and the radius is kept exactly. Returns whether the zoom was
    /// applied.
    pub fn apply_zoom(&mut self, wheel_delta_y: f32) -> bool {
        let radius = self.radius * (1.0 + wheel_delta_y * self.zoom_sensitivity);
        if radius > self.min_radius && radius < self.max_radius {
            self.radius = radius;
            true
        } else {
            false
        }
    }

    pub fn eye_position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        self.target
            + self.radius * Vector3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch)
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye_position(), &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

/// Project a model-space point to screen space through a full
/// model-view-projection matrix.
///
/// Returns `(x, y, depth)` with `y` growing downwards and depth in NDC, or
/// `None` for points behind the eye or outside the depth range. Points off
/// the sides of the screen are still returned; the rasterizer clips them.
pub fn project_to_screen(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Prevent division by near-zero or negative w
    if clip.w < 1e-6 {
        return None;
    }
    if clip.z < -clip.w || clip.z > clip.w {
        return None;
    }

    Some(clip_to_screen(&clip, width, height))
}

/// Perspective-divide a clip-space point inside the view volume and map it
/// to screen space.
pub fn clip_to_screen(clip: &Vector4<f32>, width: u32, height: u32) -> (f32, f32, f32) {
    let ndc = clip.xyz() / clip.w;
    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

    (screen_x, screen_y, ndc.z)
}

/// Clip a clip-space polygon against the near and far planes.
///
/// The result keeps the input's winding and has every vertex within
/// `-w <= z <= w`. A triangle crossing one plane comes back as a triangle
/// or a quad; one entirely outside comes back empty.
pub fn clip_to_depth_range(polygon: &[Vector4<f32>]) -> Vec<Vector4<f32>> {
    let near = clip_against(polygon, |v| v.z + v.w);
    clip_against(&near, |v| v.w - v.z)
}

/// One Sutherland-Hodgman pass; `distance` is non-negative on the kept side.
fn clip_against(
    polygon: &[Vector4<f32>],
    distance: impl Fn(&Vector4<f32>) -> f32,
) -> Vec<Vector4<f32>> {
    let mut clipped = Vec::with_capacity(polygon.len() + 1);

    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let (d_current, d_next) = (distance(current), distance(next));

        if d_current >= 0.0 {
            clipped.push(*current);
        }
        if (d_current >= 0.0) != (d_next >= 0.0) {
            let t = d_current / (d_current - d_next);
            clipped.push(current + (next - current) * t);
        }
    }

    clipped
}
