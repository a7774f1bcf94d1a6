//! Product catalog: plain data the viewer is opened from.
//!
//! Only the display name and the optional model reference of an entry ever
//! reach the viewer.

/// Catalog loading, auto-open and keyboard shortcuts.
pub mod catalog_loader;

/// The catalog JSON asset.
pub mod product_catalog;
