//! Inventory REST API collaborator

use async_trait::async_trait;
use shared::{
    NewSubLocation, NodeRef, RawStockRecord, RenameSubLocation, SubLocation, SubLocationId,
    Warehouse, WarehouseId,
};

use crate::error::ClientResult;

pub mod inventory_api;

pub use inventory_api::HttpInventoryApi;

/// Which sub-locations to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubLocationQuery {
    pub warehouse_id: WarehouseId,
    /// One hierarchy level, or `None` for every node of the warehouse
    pub level: Option<NodeRef>,
    pub include_inactive: bool,
}

impl SubLocationQuery {
    /// Direct children of `parent`
    pub fn level(warehouse_id: WarehouseId, parent: NodeRef, include_inactive: bool) -> Self {
        Self {
            warehouse_id,
            level: Some(parent),
            include_inactive,
        }
    }

    /// The whole hierarchy of a warehouse, inactive nodes included
    pub fn hierarchy(warehouse_id: WarehouseId) -> Self {
        Self {
            warehouse_id,
            level: None,
            include_inactive: true,
        }
    }
}

/// Calls the navigator makes against the inventory service
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn list_warehouses(&self, include_inactive: bool) -> ClientResult<Vec<Warehouse>>;

    async fn warehouse(&self, id: WarehouseId) -> ClientResult<Warehouse>;

    /// Every page of the matching sub-locations
    async fn list_sub_locations(&self, query: &SubLocationQuery) -> ClientResult<Vec<SubLocation>>;

    /// Stock at `scope` and everything below it, as transported
    async fn warehouse_stock(
        &self,
        warehouse_id: WarehouseId,
        scope: NodeRef,
    ) -> ClientResult<Vec<RawStockRecord>>;

    async fn create_sub_location(&self, body: &NewSubLocation) -> ClientResult<SubLocation>;

    async fn rename_sub_location(
        &self,
        id: SubLocationId,
        body: &RenameSubLocation,
    ) -> ClientResult<SubLocation>;

    /// Flip the active flag; the server decides whether descendants follow
    async fn toggle_sub_location(&self, id: SubLocationId) -> ClientResult<SubLocation>;
}
