//! WebGPU rendering module
//!
//! Everything is flat colored triangles built on the CPU each frame from the
//! latest published snapshot.

pub mod hud;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use hud::hud_entries;
pub use pipeline::{RenderState, table_to_ndc};
pub use scene::build_frame;
pub use vertex::Vertex;
