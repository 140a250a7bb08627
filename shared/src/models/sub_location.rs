//! Sub-location (subbodega) models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{SubLocationId, WarehouseId};

/// Separator between names in a rendered sub-location path
pub const PATH_SEPARATOR: &str = " > ";

/// Maximum length of a sub-location name
pub const MAX_SUB_LOCATION_NAME_LEN: usize = 100;

/// A named node (aisle, shelf, bin) inside one warehouse's hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubLocation {
    pub id: SubLocationId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "bodega")]
    pub warehouse_id: WarehouseId,
    /// `None` for top-level nodes
    #[serde(default)]
    pub parent: Option<SubLocationId>,
    #[serde(rename = "activo", default = "super::default_active")]
    pub active: bool,
    /// Root-to-node names joined by [`PATH_SEPARATOR`], when the server computed it
    #[serde(
        default,
        alias = "ruta_completa",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_path: Option<String>,
}

impl SubLocation {
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// The server-computed path, ignoring blank values
    pub fn precomputed_path(&self) -> Option<&str> {
        self.full_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Request body for creating a sub-location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct NewSubLocation {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[serde(rename = "bodega")]
    pub warehouse_id: WarehouseId,
    pub parent: Option<SubLocationId>,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl NewSubLocation {
    /// New active sub-location under `parent` (or top-level), with a trimmed name
    pub fn new(warehouse_id: WarehouseId, parent: Option<SubLocationId>, name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            warehouse_id,
            parent,
            active: true,
        }
    }
}

/// Request body for renaming a sub-location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct RenameSubLocation {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
}

impl RenameSubLocation {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }
}
