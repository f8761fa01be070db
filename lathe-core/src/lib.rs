/// Lathe Core Library - software rendering of solids of revolution
///
/// This library provides the stateless pipeline for rendering a revolved
/// profile curve: mesh generation, the model/view/projection chain, Phong
/// lighting, back-face culling and scanline rasterization with Gouraud
/// shading. Pixels go to an injected [`Framebuffer`].

pub mod error;
pub mod geometry;
pub mod input;
pub mod lighting;
pub mod math;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use error::{GeometryError, MathError, TransformError};
pub use geometry::{cylinder_profile, sphere_profile, Mesh};
pub use input::{InputCommand, InputSource, OrbitLimits, OrbitState, QueuedInput};
pub use lighting::LightingConfig;
pub use projection::{Camera, ProjectionMode, ScreenVertex};
pub use raster::{draw_line, Framebuffer, GrayFramebuffer};
pub use scene::{build_scene, draw_axes, render_frame, FrameSnapshot, FrameStats, Orchestrator, RenderSettings};
