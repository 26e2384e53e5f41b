//! Command modules for the OCM CLI.
//!
//! - `config_cmd`: inspection of the effective configuration

pub mod config_cmd;
