//! Page rendering.

mod render;

pub use render::render;
