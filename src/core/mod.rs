//! Core types: errors, configuration, the vehicle catalog.

pub mod catalog;
pub mod config;
pub mod errors;
