//! Test utilities and fixtures for packimport
//!
//! Shared by the integration tests of the core and CLI crates.

pub mod fixtures;
pub mod mocks;
