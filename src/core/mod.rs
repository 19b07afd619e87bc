//! Core infrastructure shared by the resolver and the fetchers
//!
//! Errors, configuration, and log output.

pub mod config;
pub mod error;
pub mod output;
