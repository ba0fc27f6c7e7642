pub mod adjustment;
pub mod capture_result;
pub mod config;
pub mod device;
pub mod error;
pub mod media_record;
pub mod state;
