//! Generated bundle resources.

pub mod icons;
