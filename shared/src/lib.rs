pub mod email;
pub mod geo;
pub mod limiter;
pub mod models;
pub mod sinks;
pub mod validation;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
