pub mod chunk_buffer;
pub mod filter_pipeline;
pub mod photo_encoding;
