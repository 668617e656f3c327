//! test data shared between the sfnt crates.

pub mod bebuffer;
pub mod cff;
pub mod coverage;
pub mod layout;
