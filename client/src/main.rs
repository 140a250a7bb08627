//! Bodega admin console
//!
//! Browse a warehouse's sub-locations and stock from the terminal.
//!
//! ```text
//! bodega-console                         # list warehouses
//! bodega-console <warehouse> [<sub>...]  # open a warehouse, drilling into sub-locations
//! ```

use std::sync::Arc;

use anyhow::Context;
use bodega_admin_client::{
    telemetry, Config, HttpInventoryApi, InventoryApi, Navigator, StaticToken,
};
use shared::{format_quantity, label_segments, SubLocationId, WarehouseId, PATH_SEPARATOR};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing(std::env::var("BODEGA_LOG_JSON").is_ok());

    let config = Config::load()?;
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Inventory API: {}", config.api.base_url);

    let token = Arc::new(StaticToken::from(config.api.token.clone()));
    let api = Arc::new(HttpInventoryApi::new(&config.api, token)?);
    let include_inactive = config.navigation.include_inactive;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((warehouse, path)) = args.split_first() else {
        return list_warehouses(api.as_ref(), include_inactive).await;
    };

    let warehouse_id = WarehouseId(
        warehouse
            .parse()
            .with_context(|| format!("Invalid warehouse id {:?}", warehouse))?,
    );
    let mut navigator = Navigator::new(api, warehouse_id).with_include_inactive(include_inactive);
    navigator.mount().await?;

    for segment in path {
        let id = SubLocationId(
            segment
                .parse()
                .with_context(|| format!("Invalid sub-location id {:?}", segment))?,
        );
        navigator.go_to(id).await?;
    }

    print_level(&navigator);
    Ok(())
}

async fn list_warehouses(api: &HttpInventoryApi, include_inactive: bool) -> anyhow::Result<()> {
    let warehouses = api.list_warehouses(include_inactive).await?;
    if warehouses.is_empty() {
        println!("No warehouses");
        return Ok(());
    }

    for warehouse in warehouses {
        let status = if warehouse.active { "" } else { " (inactiva)" };
        let materials = warehouse
            .material_count
            .map(|n| format!(", {} materiales", n))
            .unwrap_or_default();
        println!(
            "[{}] {}{} - {}{}",
            warehouse.id, warehouse.name, status, warehouse.location, materials
        );
    }
    Ok(())
}

fn print_level<A: InventoryApi + ?Sized>(navigator: &Navigator<A>) {
    let location = navigator
        .current_label()
        .unwrap_or_else(|| "(raíz)".to_string());
    println!("Bodega {} / {}", navigator.warehouse_id(), location);

    println!();
    println!("Sub-locations:");
    if navigator.children().is_empty() {
        println!("  (none)");
    }
    for child in navigator.children() {
        let status = if child.active { "" } else { " (inactiva)" };
        println!("  [{}] {}{}", child.id, child.name, status);
    }

    let stock = navigator.stock();
    println!();
    println!("Stock:");
    if stock.is_empty() {
        println!("  (none)");
    }
    for group in &stock.groups {
        let label: Vec<String> = label_segments(&group.label)
            .into_iter()
            .map(|s| if s.current { format!("[{}]", s.text) } else { s.text })
            .collect();
        println!(
            "  {} - {} items, total {}",
            label.join(PATH_SEPARATOR),
            group.item_count,
            format_quantity(group.total_quantity)
        );
        for item in &group.items {
            println!(
                "    {} {}: {} {}",
                item.code,
                item.name,
                format_quantity(item.quantity),
                item.unit
            );
        }
    }

    if stock.includes_descendants {
        println!();
        println!(
            "Includes nested locations ({} here, {} total)",
            format_quantity(stock.direct_quantity()),
            format_quantity(stock.total_quantity())
        );
    }
}
