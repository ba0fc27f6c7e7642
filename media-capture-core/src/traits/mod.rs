pub mod capture_host;
pub mod durable_store;
pub mod media_encoder;
pub mod media_stream;
pub mod surface_delegate;
