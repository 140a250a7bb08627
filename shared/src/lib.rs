//! Shared types and logic for the Bodega admin console
//!
//! This crate contains the pure, synchronous side of sub-location browsing:
//! the data model, path resolution, the per-warehouse tree, stock grouping and
//! the breadcrumb state. It is used by the async client and, via WASM, by the
//! browser pages.

pub mod error;
pub mod format;
pub mod grouping;
pub mod models;
pub mod navigation;
pub mod path;
pub mod selector;
pub mod tree;
pub mod types;
pub mod validation;

pub use error::*;
pub use format::*;
pub use grouping::*;
pub use models::*;
pub use navigation::*;
pub use path::*;
pub use selector::*;
pub use tree::*;
pub use types::*;
pub use validation::*;
