//! JSON-RPC 2.0 communication layer for the host page.
//!
//! When the viewer runs inside an iframe, the host drives it over
//! `postMessage`. Native builds register the same systems without a
//! transport, so nothing arrives and nothing is sent.
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Queue ViewerCommand
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <──── viewer_status notification ──────┤
//! ```
//!
//! ## Methods
//!
//! - `open_viewer { name, model_url? }`: open a product, with or without a model reference
//! - `close_viewer`: release the viewer
//! - `set_local_override { path }`: show a user-supplied file; `-32602` when no viewer is open
//! - `clear_local_override`: return to the product's own model
//! - `get_viewer_status`: current `ViewerStatus`
//!
//! ## Error Handling
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// JSON-RPC 2.0 request handling, status notifications and WASM message listeners.
pub mod web_rpc;
