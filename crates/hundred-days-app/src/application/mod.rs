pub mod commands;
pub mod dtos;
pub mod event_handlers;
pub mod queries;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use utils::ResultExt;
