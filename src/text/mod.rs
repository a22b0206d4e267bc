//! Plain-text processing for article bodies.

pub mod chunks;
pub mod sections;

pub use chunks::{split_into_chunks, DEFAULT_CHUNK_SIZE};
pub use sections::{split_sections, Section};
