//! Bodega admin client
//!
//! Async side of the warehouse console: the inventory REST collaborator, the
//! sub-location navigator, configuration and error reporting for the views.

pub mod auth;
pub mod config;
pub mod error;
pub mod external;
pub mod services;
pub mod telemetry;

pub use auth::{StaticToken, TokenSource};
pub use crate::config::Config;
pub use error::{ClientError, ClientResult, ErrorDetail, MutationKind, ViewError};
pub use external::{HttpInventoryApi, InventoryApi, SubLocationQuery};
pub use services::Navigator;
