pub mod error;
pub mod log;
pub mod utils;

#[cfg(test)]
pub mod testing;
