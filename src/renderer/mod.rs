//! WebGPU rendering module
//!
//! Flat-colored triangle lists: walls as rectangles, ball and coin as fans.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, viewport_to_ndc};
pub use shapes::scene_vertices;
pub use vertex::Vertex;
