pub mod capture_engine;
pub mod device_registry;
pub mod stream;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_support;
