//! Command execution functions for packager operations.

mod build;
mod icon;

pub use build::build;
pub use icon::icon;
