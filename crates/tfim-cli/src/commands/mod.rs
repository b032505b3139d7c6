//! CLI command implementations.

pub mod common;
pub mod config;
pub mod energy;
pub mod reference;
pub mod scan;
