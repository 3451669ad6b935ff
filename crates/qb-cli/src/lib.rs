//! Library components of the `qbload` binary.

pub mod logging;
pub mod pipeline;
