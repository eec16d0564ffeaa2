//! Linux targets: the release tarball.

pub mod release;
