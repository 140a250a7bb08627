//! Domain models for the Bodega admin console

mod stock;
mod sub_location;
mod warehouse;

pub use stock::*;
pub use sub_location::*;
pub use warehouse::*;

/// Records missing the `activo` flag are treated as active
fn default_active() -> bool {
    true
}
