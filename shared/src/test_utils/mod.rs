pub mod http_test_utils;
pub mod mock_sinks;
pub mod test_logging;
