//! OCM CLI library exports for integration testing.
//!
//! This module exposes configuration loading and command implementations.

pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;
