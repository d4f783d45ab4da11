//! Rendering module for serializing filled documents.

mod json;
mod text;

pub use json::{from_json, to_json, to_json_bytes, JsonFormat};
pub use text::to_text;
