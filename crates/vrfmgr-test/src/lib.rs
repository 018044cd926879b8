//! Test infrastructure for SONiC VRF resolution
//!
//! Provides:
//! - Temporary network class trees with VRF master devices
//! - Temporary route domain mapping files
//! - Canned VRF layouts shared by unit and integration tests
//! - Verification helpers for resolved mappings

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;
