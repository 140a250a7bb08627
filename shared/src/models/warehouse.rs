//! Warehouse models

use serde::{Deserialize, Serialize};

use crate::types::WarehouseId;

/// A warehouse (bodega), the top-level owner of a sub-location hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Free-text address or area
    #[serde(rename = "ubicacion", default)]
    pub location: String,
    #[serde(rename = "activo", default = "super::default_active")]
    pub active: bool,
    /// Number of distinct materials held, when the server includes it
    #[serde(
        rename = "materiales_count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub material_count: Option<u32>,
}
