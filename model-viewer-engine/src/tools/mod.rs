//! Ways for the user to put their own file in front of the viewer.
//!
//! ### Native Builds
//! - Dropping a `.glb` or `.gltf` onto the window sets the local override
//! - `Backspace` returns to the catalog model
//!
//! ### WASM Builds
//! - The host page sends `set_local_override` over RPC

/// Drag-and-drop local override for native windows.
pub mod local_override;
