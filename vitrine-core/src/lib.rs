/// Vitrine Core Library - Scene model shared by every host
///
/// Geometry generation, transforms, the orbit camera, meshes and materials,
/// animation and the backend contract hosts implement to draw a scene.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod mesh;
pub mod projection;
pub mod props;
pub mod render;
pub mod revolution;
pub mod scene;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationController, AnimationPhase, Keyframe};
pub use config::SceneConfig;
pub use error::{ConfigError, RenderError};
pub use geometry::{GeometryData, GeometryDescriptor};
pub use input::InputEvent;
pub use mesh::{Drawable, Material, Mesh, Submesh};
pub use projection::OrbitCamera;
pub use render::{FrameUniforms, RenderBackend};
pub use scene::{MeshId, Scene};
pub use transform::Transform;
