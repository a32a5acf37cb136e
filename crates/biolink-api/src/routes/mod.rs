pub mod config;
pub mod views;
