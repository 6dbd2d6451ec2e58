/// Flat scene: camera, meshes in draw order, and the backend they share
use nalgebra::Point3;

use crate::animation::{AnimationController, AnimationPhase};
use crate::config::SceneConfig;
use crate::error::RenderError;
use crate::input::{DragTracker, InputEvent};
use crate::mesh::{Drawable, Mesh};
use crate::projection::OrbitCamera;
use crate::render::{FrameUniforms, RenderBackend};

/// Position of a mesh in a scene's draw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

impl MeshId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Meshes are drawn in insertion order and rely on the depth test, not on
/// sorting.
pub struct Scene<B: RenderBackend> {
    backend: B,
    camera: OrbitCamera,
    meshes: Vec<Mesh>,
    buffers: Vec<B::Buffers>,
    drag: DragTracker,
    viewport: (u32, u32),
    light_position: Point3<f32>,
}

impl<B: RenderBackend> Scene<B> {
    pub fn new(mut backend: B, config: &SceneConfig, width: u32, height: u32) -> Self {
        backend.set_viewport(width, height);

        Self {
            backend,
            camera: OrbitCamera::new(&config.camera),
            meshes: Vec::new(),
            buffers: Vec::new(),
            drag: DragTracker::default(),
            viewport: (width, height),
            light_position: Point3::from(config.lighting.light_position),
        }
    }

    /// Upload the mesh's geometry once and append it to the draw list.
    pub fn add_mesh(&mut self, mesh: Mesh) -> Result<MeshId, RenderError> {
        let buffers = self.backend.upload(mesh.geometry())?;
        let id = MeshId(self.meshes.len());

        log::debug!(
            "Added mesh '{}' as #{}: {} vertices, {} indices",
            mesh.name,
            id.0,
            mesh.geometry().vertex_count(),
            mesh.geometry().index_count()
        );

        self.meshes.push(mesh);
        self.buffers.push(buffers);
        Ok(id)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.viewport;
        if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        }
    }

    /// Apply a new viewport size. Zero-sized and repeated sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.viewport {
            return;
        }
        self.viewport = (width, height);
        self.backend.set_viewport(width, height);
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.drag.press(x, y),
            InputEvent::PointerUp => self.drag.release(),
            InputEvent::PointerMove { x, y } => {
                if let Some((dx, dy)) = self.drag.moved(x, y) {
                    self.camera.apply_drag(dx, dy);
                }
            }
            InputEvent::Wheel { delta_y } => {
                self.camera.apply_zoom(delta_y);
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(self.aspect_ratio()),
            light_position: self.light_position,
            eye_position: self.camera.eye_position(),
        }
    }

    /// Clear, upload the frame uniforms once, then draw every mesh in order.
    pub fn render_frame(&mut self) {
        let frame = self.frame_uniforms();

        self.backend.clear();
        self.backend.set_frame_uniforms(&frame);

        for (mesh, buffers) in self.meshes.iter().zip(&self.buffers) {
            mesh.render(buffers, &mut self.backend);
        }
    }

    /// Advance `controller` on the mesh it targets.
    pub fn tick_animation(
        &mut self,
        controller: &mut AnimationController,
        now: f64,
    ) -> AnimationPhase {
        match self.meshes.get_mut(controller.target().0) {
            Some(mesh) => controller.tick(now, &mut mesh.transform),
            None => {
                log::warn!("Animation targets missing mesh #{}", controller.target().0);
                controller.phase()
            }
        }
    }
}
