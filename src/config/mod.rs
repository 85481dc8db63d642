//! Configuration types and environment-driven constructors.

pub mod assist_config;
pub mod default_config;
