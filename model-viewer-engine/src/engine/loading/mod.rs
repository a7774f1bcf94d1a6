//! Model resolution: from an asset reference to a loaded scene or the
//! procedural placeholder.
//!
//! Candidate paths are tried one at a time in a fixed order. Every request
//! carries a generation so late results from superseded requests are dropped.

/// Asset references, local overrides and the candidate path policy.
pub mod candidates;

/// Per-frame polling of the in-flight attempt.
///
/// Feeds finished attempts back to the resolver and starts the next one.
pub mod driver;

/// Resolution error kinds.
pub mod error;

/// The load-attempt seam and its asset server implementation.
pub mod loader;

/// Generation-tagged resolution state machine.
///
/// Pure logic: hands out attempts, consumes their results, never performs IO.
pub mod resolver;
