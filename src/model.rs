mod app_config;
mod entry;

pub use app_config::*;
pub use entry::*;
