//! Validation utilities for the Bodega admin console
//!
//! Checks run before a request leaves the browser; the server remains the
//! authority on every rule.

use crate::models::MAX_SUB_LOCATION_NAME_LEN;
use crate::types::{SubLocationId, WarehouseId};

// ============================================================================
// Sub-location Validations
// ============================================================================

/// Trim a sub-location name and check it is usable
pub fn normalize_sub_location_name(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Sub-location name cannot be empty");
    }
    if trimmed.chars().count() > MAX_SUB_LOCATION_NAME_LEN {
        return Err("Sub-location name must be at most 100 characters");
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Transfer Validations
// ============================================================================

/// One end of a stock transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLocation {
    pub warehouse_id: WarehouseId,
    /// `None` for stock held at the warehouse root
    pub sub_location_id: Option<SubLocationId>,
}

impl StockLocation {
    pub fn new(warehouse_id: WarehouseId, sub_location_id: Option<SubLocationId>) -> Self {
        Self {
            warehouse_id,
            sub_location_id,
        }
    }
}

/// Validate that a transfer actually moves stock somewhere else
pub fn validate_transfer_route(
    origin: &StockLocation,
    destination: &StockLocation,
) -> Result<(), &'static str> {
    if origin == destination {
        return Err("Origin and destination must be different locations");
    }
    Ok(())
}

/// Sub-locations that cannot be picked as destination for `origin`.
///
/// Only the origin itself, and only when the destination warehouse is the
/// origin warehouse.
pub fn disabled_destinations(
    origin: &StockLocation,
    destination_warehouse: WarehouseId,
) -> Vec<SubLocationId> {
    match origin.sub_location_id {
        Some(id) if origin.warehouse_id == destination_warehouse => vec![id],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_location_name() {
        assert_eq!(normalize_sub_location_name("  Pasillo 3 "), Ok("Pasillo 3".to_string()));
        assert!(normalize_sub_location_name("   ").is_err());
        assert!(normalize_sub_location_name(&"a".repeat(101)).is_err());
        assert!(normalize_sub_location_name(&"ñ".repeat(100)).is_ok());
    }

    #[test]
    fn test_transfer_route() {
        let shelf = StockLocation::new(WarehouseId(1), Some(SubLocationId(3)));
        let root = StockLocation::new(WarehouseId(1), None);
        let other = StockLocation::new(WarehouseId(2), Some(SubLocationId(3)));

        assert!(validate_transfer_route(&shelf, &shelf).is_err());
        assert!(validate_transfer_route(&root, &root).is_err());
        assert!(validate_transfer_route(&shelf, &root).is_ok());
        assert!(validate_transfer_route(&shelf, &other).is_ok());
    }

    #[test]
    fn test_disabled_destinations() {
        let shelf = StockLocation::new(WarehouseId(1), Some(SubLocationId(3)));
        assert_eq!(disabled_destinations(&shelf, WarehouseId(1)), vec![SubLocationId(3)]);
        assert!(disabled_destinations(&shelf, WarehouseId(2)).is_empty());
        assert!(disabled_destinations(&StockLocation::new(WarehouseId(1), None), WarehouseId(1)).is_empty());
    }
}
