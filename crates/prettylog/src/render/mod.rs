//! Render module: turns parsed events into styled terminal lines.

pub mod style;
pub mod options;
pub mod renderer;

pub use options::RenderOptions;
pub use renderer::{Renderer, RendererState};
pub use style::{ColorMode, Palette, Style};
