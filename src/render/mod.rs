//! Wheel rasterization.

/// Frame type and renderer contract.
pub mod backend;
/// CPU renderer powered by `vello_cpu`.
pub mod cpu;
pub(crate) mod text;
