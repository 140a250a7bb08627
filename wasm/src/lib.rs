//! WebAssembly module for the Bodega admin console
//!
//! Provides client-side computation for:
//! - Sub-location paths and breadcrumbs
//! - Level listings and cascading selectors
//! - Stock grouping by location
//! - Quantity formatting and transfer checks

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use shared::*;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

fn parse_id(value: f64) -> Result<i64, JsValue> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(js_error(format!("Invalid identifier: {}", value)));
    }
    Ok(value as i64)
}

fn parse_sub_location(value: Option<f64>) -> Result<Option<SubLocationId>, JsValue> {
    value.map(|v| parse_id(v).map(SubLocationId)).transpose()
}

fn parse_nodes(nodes_json: &str) -> Result<Vec<SubLocation>, JsValue> {
    serde_json::from_str(nodes_json).map_err(|e| js_error(format!("Invalid sub-locations JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

fn build_tree(nodes_json: &str, warehouse_id: f64) -> Result<SubLocationTree, JsValue> {
    let warehouse_id = WarehouseId(parse_id(warehouse_id)?);
    Ok(SubLocationTree::from_nodes(warehouse_id, parse_nodes(nodes_json)?))
}

/// Ids from the top-level ancestor down to `target`, as a JSON array
#[wasm_bindgen]
pub fn resolve_sub_location_path(nodes_json: &str, target: Option<f64>) -> Result<String, JsValue> {
    let nodes = parse_nodes(nodes_json)?;
    let target = parse_sub_location(target)?;

    match resolve_path_in(target, &nodes) {
        Ok(path) => to_json(&path),
        Err(err) => {
            // Treat the node as top-level rather than failing the page
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
            to_json(&Vec::<SubLocationId>::new())
        }
    }
}

/// Human-readable path of one sub-location, e.g. "Planta 1 > Pasillo 3"
#[wasm_bindgen]
pub fn sub_location_display_path(
    nodes_json: &str,
    warehouse_id: f64,
    node_id: f64,
) -> Result<Option<String>, JsValue> {
    let tree = build_tree(nodes_json, warehouse_id)?;
    Ok(tree.display_path_of(SubLocationId(parse_id(node_id)?)))
}

/// Children of a level (root when `parent` is absent) as JSON
#[wasm_bindgen]
pub fn sub_location_children(
    nodes_json: &str,
    warehouse_id: f64,
    parent: Option<f64>,
    include_inactive: bool,
) -> Result<String, JsValue> {
    let tree = build_tree(nodes_json, warehouse_id)?;
    let parent = NodeRef::from(parse_sub_location(parent)?);
    let filter = ChildFilter {
        include_inactive,
        ..ChildFilter::default()
    };
    to_json(&tree.children_with(parent, filter))
}

/// Drop-down levels of the cascading selector as JSON
#[wasm_bindgen]
pub fn sub_location_selector_levels(
    nodes_json: &str,
    warehouse_id: f64,
    selected: Option<f64>,
    disabled_json: &str,
) -> Result<String, JsValue> {
    let tree = build_tree(nodes_json, warehouse_id)?;
    let disabled: HashSet<SubLocationId> = if disabled_json.trim().is_empty() {
        HashSet::new()
    } else {
        serde_json::from_str(disabled_json)
            .map_err(|e| js_error(format!("Invalid disabled ids JSON: {}", e)))?
    };

    let selection = CascadingSelection::from_selected(&tree, parse_sub_location(selected)?);
    to_json(&selection.levels(&tree, &disabled))
}

/// Group a stock response for the viewed level.
///
/// `nodes_json` is optional and only used to label records without a path.
#[wasm_bindgen]
pub fn group_stock(
    records_json: &str,
    viewed: Option<f64>,
    warehouse_id: f64,
    nodes_json: Option<String>,
) -> Result<String, JsValue> {
    let records: Vec<RawStockRecord> = serde_json::from_str(records_json)
        .map_err(|e| js_error(format!("Invalid stock JSON: {}", e)))?;
    let viewed = NodeRef::from(parse_sub_location(viewed)?);
    let tree = nodes_json
        .as_deref()
        .map(|json| build_tree(json, warehouse_id))
        .transpose()?;

    let grouping = StockGrouping::from_raw(records, viewed, tree.as_ref()).map_err(js_error)?;
    to_json(&grouping)
}

/// Format a quantity (`1'000,000.50`); non-numeric input is returned unchanged
#[wasm_bindgen]
pub fn format_stock_quantity(value: &str) -> String {
    match Decimal::from_str(value.trim()) {
        Ok(quantity) => format_quantity(quantity),
        Err(_) => value.to_string(),
    }
}

/// Split a location label into its segments, as JSON
#[wasm_bindgen]
pub fn location_label_segments(label: &str) -> String {
    serde_json::to_string(&label_segments(label)).unwrap_or_else(|_| "[]".to_string())
}

/// Check a transfer route; returns the error message or `None` when valid
#[wasm_bindgen]
pub fn check_transfer_route(
    origin_warehouse: i32,
    origin_sub_location: Option<i32>,
    destination_warehouse: i32,
    destination_sub_location: Option<i32>,
) -> Option<String> {
    let origin = StockLocation::new(
        WarehouseId(origin_warehouse.into()),
        origin_sub_location.map(|id| SubLocationId(id.into())),
    );
    let destination = StockLocation::new(
        WarehouseId(destination_warehouse.into()),
        destination_sub_location.map(|id| SubLocationId(id.into())),
    );
    validate_transfer_route(&origin, &destination)
        .err()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODES: &str = r#"[
        {"id": 1, "nombre": "Planta 1", "bodega": 1, "parent": null, "activo": true},
        {"id": 2, "nombre": "Pasillo 3", "bodega": 1, "parent": 1, "activo": true},
        {"id": 3, "nombre": "Bodega vieja", "bodega": 1, "parent": null, "activo": false}
    ]"#;

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_sub_location_path(NODES, Some(2.0)).unwrap(), "[1,2]");
        assert_eq!(resolve_sub_location_path(NODES, None).unwrap(), "[]");
    }

    #[test]
    fn test_display_path() {
        assert_eq!(
            sub_location_display_path(NODES, 1.0, 2.0).unwrap().as_deref(),
            Some("Planta 1 > Pasillo 3")
        );
    }

    #[test]
    fn test_children_respect_inactive_flag() {
        let active: Vec<SubLocation> =
            serde_json::from_str(&sub_location_children(NODES, 1.0, None, false).unwrap()).unwrap();
        let all: Vec<SubLocation> =
            serde_json::from_str(&sub_location_children(NODES, 1.0, None, true).unwrap()).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_group_stock() {
        let records = r#"[
            {"id_material": 1, "codigo": "M1", "nombre": "Tornillo", "cantidad": "3", "unidad": "und",
             "id_subbodega": 2, "subbodega_nombre": "Planta 1 > Pasillo 3"},
            {"id_material": 2, "codigo": "M2", "nombre": "Tuerca", "cantidad": 4.5, "unidad": "und"}
        ]"#;
        let json = group_stock(records, None, 1.0, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["groups"].as_array().unwrap().len(), 2);
        assert_eq!(value["direct_items"].as_array().unwrap().len(), 1);
        assert_eq!(value["includes_descendants"], serde_json::json!(true));
    }

    #[test]
    fn test_format_stock_quantity() {
        assert_eq!(format_stock_quantity("1000000"), "1'000,000");
        assert_eq!(format_stock_quantity("12.5"), "12.50");
        assert_eq!(format_stock_quantity("abc"), "abc");
    }

    #[test]
    fn test_check_transfer_route() {
        assert!(check_transfer_route(1, Some(2), 1, Some(2)).is_some());
        assert!(check_transfer_route(1, Some(2), 1, None).is_none());
    }
}
