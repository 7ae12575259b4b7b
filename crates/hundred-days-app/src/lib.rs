pub mod application;
pub mod context;
