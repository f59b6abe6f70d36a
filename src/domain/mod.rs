//! Typed shipment records produced at the ingestion boundary.
//!
//! Once a sheet has been normalized and validated, every row is converted into a
//! [`ShipmentRecord`] exactly once. The rest of the pipeline reads the named fields
//! instead of looking columns up by label.

use serde::Serialize;

use crate::types::CellValue;

/// One shipment row. Blank cells are `None`; the full original row is kept in
/// `cells` so the filtered sheet can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRecord {
    pub num_stops: Option<i64>,
    pub milestone_status: Option<String>,
    pub out_of_order: Option<String>,
    pub origin_name: Option<String>,
    pub carrier: Option<String>,
    #[serde(skip)]
    pub cells: Vec<CellValue>,
}

/// An ordered set of shipment records sharing one column layout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShipmentTable {
    pub columns: Vec<String>,
    pub records: Vec<ShipmentRecord>,
}

impl ShipmentTable {
    pub fn new(columns: Vec<String>, records: Vec<ShipmentRecord>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// New table with the same columns holding only the records accepted by `keep`
    pub fn retain_cloned<F>(&self, mut keep: F) -> ShipmentTable
    where
        F: FnMut(&ShipmentRecord) -> bool,
    {
        ShipmentTable {
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
