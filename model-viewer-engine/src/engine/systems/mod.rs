//! Per-frame runtime systems that are not part of resolution itself.

/// Rotor spin, the hover bob and rotor tagging for authored models.
pub mod animation;

/// On-screen status text for native builds.
///
/// Mirrors the status pushed to the host page over RPC.
pub mod status_overlay;
