// Library exports for logkeep

pub mod cli;
pub mod config;
pub mod error;
pub mod store;
