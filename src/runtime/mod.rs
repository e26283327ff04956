//! Multi-station batch detection.

/// Batch coordinator and handle.
pub mod batch;
/// Progress events.
pub mod events;
