//! CLI command implementations

pub mod features;
pub mod predict;
pub mod service;
pub mod settings;
