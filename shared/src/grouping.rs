//! Grouping of flat stock records into per-location sections
//!
//! Groups are keyed by sub-location id; the denormalized path text is only the
//! label, so two locations that render the same path stay separate. Groups are
//! ordered by label (case-insensitive), ties broken by key; items keep their
//! input order.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{InvalidQuantity, InvalidStockRecordError};
use crate::models::{parse_stock_records, RawStockRecord, StockRecord};
use crate::tree::SubLocationTree;
use crate::types::{NodeRef, SubLocationId};

/// Label for stock not assigned to any sub-location
pub const UNASSIGNED_LABEL: &str = "General";

/// Identity of a stock group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum GroupKey {
    Unassigned,
    SubLocation(SubLocationId),
}

impl From<Option<SubLocationId>> for GroupKey {
    fn from(id: Option<SubLocationId>) -> Self {
        id.map_or(GroupKey::Unassigned, GroupKey::SubLocation)
    }
}

/// Stock held at one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockGroup {
    pub key: GroupKey,
    pub label: String,
    pub items: Vec<StockRecord>,
    pub item_count: usize,
    pub total_quantity: Decimal,
}

/// Presentation-ready view of the stock fetched for one navigation level
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StockGrouping {
    pub viewed: NodeRef,
    pub groups: Vec<StockGroup>,
    /// Records located exactly at the viewed level
    pub direct_items: Vec<StockRecord>,
    /// Records located anywhere below the viewed level
    pub descendant_items: Vec<StockRecord>,
    /// Whether the figures include nested locations
    pub includes_descendants: bool,
    /// Sum of every record at this level and below
    pub total: Decimal,
    /// Sum of the records located exactly at the viewed level
    pub direct_total: Decimal,
}

impl StockGrouping {
    /// Parse transported records and group them.
    ///
    /// A record whose quantity cannot be read fails the whole batch instead of
    /// being counted as zero.
    pub fn from_raw(
        raw: impl IntoIterator<Item = RawStockRecord>,
        viewed: NodeRef,
        tree: Option<&SubLocationTree>,
    ) -> Result<Self, InvalidStockRecordError> {
        Self::group(parse_stock_records(raw)?, viewed, tree)
    }

    /// Group validated records for the level `viewed`.
    ///
    /// `tree` supplies labels for records that arrive without a path. Fails on
    /// the record whose quantity pushes a total past the decimal range.
    pub fn group(
        records: Vec<StockRecord>,
        viewed: NodeRef,
        tree: Option<&SubLocationTree>,
    ) -> Result<Self, InvalidStockRecordError> {
        let mut groups: Vec<StockGroup> = Vec::new();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut total = Decimal::ZERO;
        let mut direct_total = Decimal::ZERO;

        for record in &records {
            total = accumulate(total, record)?;
            if record.sub_location_id == viewed.id() {
                direct_total = accumulate(direct_total, record)?;
            }

            let key = GroupKey::from(record.sub_location_id);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(StockGroup {
                    key,
                    label: String::new(),
                    items: Vec::new(),
                    item_count: 0,
                    total_quantity: Decimal::ZERO,
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            if group.label.is_empty() {
                if let Some(path) = &record.sub_location_path {
                    group.label = path.clone();
                }
            }
            group.total_quantity = accumulate(group.total_quantity, record)?;
            group.item_count += 1;
            group.items.push(record.clone());
        }

        for group in &mut groups {
            if group.label.is_empty() {
                group.label = fallback_label(group.key, tree);
            }
        }
        groups.sort_by_cached_key(|g| (g.label.to_lowercase(), g.key));

        let (direct_items, descendant_items): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.sub_location_id == viewed.id());

        Ok(Self {
            viewed,
            groups,
            includes_descendants: !descendant_items.is_empty(),
            direct_items,
            descendant_items,
            total,
            direct_total,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_for(&self, key: GroupKey) -> Option<&StockGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Sum of every fetched quantity at this level and below
    pub fn total_quantity(&self) -> Decimal {
        self.total
    }

    pub fn direct_quantity(&self) -> Decimal {
        self.direct_total
    }
}

fn accumulate(sum: Decimal, record: &StockRecord) -> Result<Decimal, InvalidStockRecordError> {
    sum.checked_add(record.quantity)
        .ok_or(InvalidStockRecordError {
            material_id: record.material_id,
            reason: InvalidQuantity::Overflow(record.quantity),
        })
}

fn fallback_label(key: GroupKey, tree: Option<&SubLocationTree>) -> String {
    match key {
        GroupKey::Unassigned => UNASSIGNED_LABEL.to_string(),
        GroupKey::SubLocation(id) => tree
            .and_then(|t| t.display_path_of(id))
            .unwrap_or_else(|| format!("Ubicación #{}", id)),
    }
}
