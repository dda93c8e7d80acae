//! Document processing pipeline pieces: rasterize a PDF into per-page
//! JPEGs, then encode pages for the LLM transport.

pub mod encode;
pub mod render;

pub use encode::encode_image;
pub use render::render_to_jpegs;
