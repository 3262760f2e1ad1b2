/// Wire3D Core Library - Shared scene model and transformation logic
///
/// This library provides the stateless core for wireframe rendering:
/// hand-coded primitive geometry, the primitive/face scene model, and the
/// transform constructors and draw flattening the renderers build on.

pub mod draw;
pub mod geometry;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use draw::{face_draws, FaceDraw};
pub use scene::{BufferId, Face, Primitive, Scene, SceneError, SPIN_STEP};
pub use transform::Transform;
