//! Conf module: configuration model and loading.

pub mod model;
pub mod load;

pub use model::{Config, PaletteConfig};
pub use load::ConfigSource;
