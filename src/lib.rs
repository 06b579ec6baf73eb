pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod nc_utils;
pub mod partition;
pub mod records;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod test_utils;
