//! Stock models
//!
//! The transport layer hands over [`RawStockRecord`] values whose quantity may be
//! a JSON number or a numeric string. They are parsed into [`StockRecord`] before
//! any totals are computed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{InvalidQuantity, InvalidStockRecordError};
use crate::types::{MaterialId, SubLocationId};

/// Quantity exactly as transported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(serde_json::Number),
    Text(String),
    /// Booleans, arrays or objects; rejected when parsed
    Other(serde_json::Value),
}

impl RawQuantity {
    /// Parse into a non-negative decimal
    pub fn to_decimal(&self) -> Result<Decimal, InvalidQuantity> {
        let text = match self {
            RawQuantity::Number(n) => n.to_string(),
            RawQuantity::Text(s) => s.trim().to_string(),
            RawQuantity::Other(value) => return Err(InvalidQuantity::NotNumeric(value.to_string())),
        };

        let value = parse_decimal(&text).ok_or(InvalidQuantity::NotNumeric(text))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(InvalidQuantity::Negative(value));
        }
        Ok(value)
    }
}

impl From<Decimal> for RawQuantity {
    fn from(value: Decimal) -> Self {
        RawQuantity::Text(value.to_string())
    }
}

impl From<&str> for RawQuantity {
    fn from(value: &str) -> Self {
        RawQuantity::Text(value.to_string())
    }
}

impl From<i64> for RawQuantity {
    fn from(value: i64) -> Self {
        RawQuantity::Number(value.into())
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Stock row as returned by the warehouse stock endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStockRecord {
    #[serde(rename = "id_material")]
    pub material_id: MaterialId,
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "referencia", default)]
    pub reference: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "cantidad", default)]
    pub quantity: Option<RawQuantity>,
    #[serde(rename = "unidad", default)]
    pub unit: String,
    #[serde(rename = "id_subbodega", default)]
    pub sub_location_id: Option<SubLocationId>,
    /// Denormalized path of the sub-location at fetch time
    #[serde(rename = "subbodega_nombre", default)]
    pub sub_location_path: Option<String>,
}

/// A validated quantity of one material at one (warehouse, sub-location) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockRecord {
    pub material_id: MaterialId,
    pub code: String,
    pub reference: Option<String>,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    /// `None` means stock held directly at the warehouse root
    pub sub_location_id: Option<SubLocationId>,
    pub sub_location_path: Option<String>,
}

impl TryFrom<RawStockRecord> for StockRecord {
    type Error = InvalidStockRecordError;

    fn try_from(raw: RawStockRecord) -> Result<Self, Self::Error> {
        let quantity = raw
            .quantity
            .as_ref()
            .ok_or(InvalidQuantity::Missing)
            .and_then(RawQuantity::to_decimal)
            .map_err(|reason| InvalidStockRecordError {
                material_id: raw.material_id,
                reason,
            })?;

        Ok(StockRecord {
            material_id: raw.material_id,
            code: raw.code,
            reference: raw.reference.filter(|r| !r.trim().is_empty()),
            name: raw.name,
            quantity,
            unit: raw.unit,
            sub_location_id: raw.sub_location_id,
            sub_location_path: raw
                .sub_location_path
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        })
    }
}

/// Parse a whole batch, failing on the first bad record
pub fn parse_stock_records(
    raw: impl IntoIterator<Item = RawStockRecord>,
) -> Result<Vec<StockRecord>, InvalidStockRecordError> {
    raw.into_iter().map(StockRecord::try_from).collect()
}
