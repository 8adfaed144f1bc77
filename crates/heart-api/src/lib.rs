//! HTTP front end for the heart disease prediction service
//!
//! Exposes the router and configuration so the binary and the
//! integration tests build the same application.

pub mod api;
pub mod config;
pub mod startup;
