pub mod image;
pub mod text;

pub use image::*;
pub use text::*;
