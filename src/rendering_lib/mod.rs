// src/rendering_lib/mod.rs

pub mod renderer;
pub mod shader;
pub mod vertex;
pub mod viewport;

pub use renderer::{FrameContent, OutlineRenderer};
pub use shader::WGSL_SHADER_SOURCE;
pub use vertex::OutlineVertex;
pub use viewport::{PanelViewport, PixelRect};
