// Module structure for prettylog.

// Core pipeline
pub mod parser;
pub mod render;
pub mod scanner;
pub mod error;

// Process surface
pub mod conf;
pub mod cli;
pub mod runtime;

pub use error::{Error, Result};
pub use render::RenderOptions;
pub use scanner::process;
