//! Errors raised by the pure hierarchy and stock computations

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{MaterialId, SubLocationId};

/// A parent chain that loops back on itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cyclic sub-location hierarchy detected at node {node}")]
pub struct CyclicHierarchyError {
    /// First node visited twice while walking parent links
    pub node: SubLocationId,
}

/// A stock record whose quantity cannot be used for totals
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid stock record for material {material_id}: {reason}")]
pub struct InvalidStockRecordError {
    pub material_id: MaterialId,
    pub reason: InvalidQuantity,
}

/// Why a transported quantity was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidQuantity {
    #[error("quantity is missing")]
    Missing,

    #[error("quantity {0:?} is not numeric")]
    NotNumeric(String),

    #[error("quantity {0} is negative")]
    Negative(Decimal),

    /// Adding this quantity to the running total exceeds the decimal range
    #[error("quantity {0} overflows the stock total")]
    Overflow(Decimal),
}
