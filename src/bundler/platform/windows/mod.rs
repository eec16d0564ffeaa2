//! Windows targets: PE subsystem patching and the release zip.
//!
//! The executable's icon ships as a data file next to it; rewriting PE
//! resources is not done.

pub mod pe;
pub mod release;
