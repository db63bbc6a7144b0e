pub mod config;
pub mod merger;
