//! WebGPU rendering module
//!
//! `scene` turns simulation state into a triangle list in surface pixels;
//! `pipeline` uploads and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::Scene;
pub use vertex::Vertex;
