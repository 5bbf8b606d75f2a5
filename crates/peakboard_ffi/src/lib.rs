//! Flutter-facing bindings for PeakBoard core.

pub mod api;
