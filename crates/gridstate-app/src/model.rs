// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use time::Date;

use crate::ids::RecordId;

static NULL_FIELD: FieldValue = FieldValue::Null;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    Date(Date),
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) => value.to_string(),
            Self::Text(value) => value.clone(),
            Self::Date(value) => value.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Only text and integer fields take part in free-text search.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        let haystack = match self {
            Self::Text(value) => value.to_ascii_lowercase(),
            Self::Integer(value) => value.to_string(),
            _ => return false,
        };
        haystack.contains(&needle.to_ascii_lowercase())
    }

    /// Ordering native to the field's type. Nulls sort before any value.
    pub fn cmp_native(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Bool(left), Self::Bool(right)) => left.cmp(right),
            (Self::Integer(left), Self::Integer(right)) => left.cmp(right),
            (Self::Decimal(left), Self::Decimal(right)) => left.total_cmp(right),
            (Self::Integer(left), Self::Decimal(right)) => (*left as f64).total_cmp(right),
            (Self::Decimal(left), Self::Integer(right)) => left.total_cmp(&(*right as f64)),
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            (Self::Text(left), Self::Text(right)) => {
                left.to_ascii_lowercase().cmp(&right.to_ascii_lowercase())
            }
            _ => self
                .display()
                .to_ascii_lowercase()
                .cmp(&other.display().to_ascii_lowercase()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Date> for FieldValue {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

/// A snapshot of one record read from the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Self {
            id: RecordId::new(id),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_owned(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> &FieldValue {
        self.fields.get(key).unwrap_or(&NULL_FIELD)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).as_text()
    }

    pub fn is_true(&self, key: &str) -> bool {
        matches!(self.field(key), FieldValue::Bool(true))
    }
}

/// A program indicator attached to a requisition. Its rows and columns are
/// attribute records carrying `code` and `description`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub code: String,
    pub rows: Vec<Record>,
    pub columns: Vec<Record>,
}

impl Indicator {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_owned(),
            rows: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Record) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_column(mut self, column: Record) -> Self {
        self.columns.push(column);
        self
    }

    /// Column codes in display order, after the fixed description and code
    /// columns.
    pub fn column_codes(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter_map(|column| column.text("code"))
            .map(str::to_owned)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageId {
    CustomerInvoice,
    CustomerInvoices,
    SupplierInvoice,
    SupplierInvoices,
    SupplierRequisitions,
    SupplierRequisition,
    CustomerRequisitions,
    CustomerRequisition,
    Stocktakes,
    StocktakeManager,
    StocktakeEditor,
    StocktakeBatchEditModal,
    RegimenDataModal,
    Stock,
    CashRegister,
    PatientSelect,
    PrescriberSelect,
}

impl PageId {
    pub const ALL: [Self; 17] = [
        Self::CustomerInvoice,
        Self::CustomerInvoices,
        Self::SupplierInvoice,
        Self::SupplierInvoices,
        Self::SupplierRequisitions,
        Self::SupplierRequisition,
        Self::CustomerRequisitions,
        Self::CustomerRequisition,
        Self::Stocktakes,
        Self::StocktakeManager,
        Self::StocktakeEditor,
        Self::StocktakeBatchEditModal,
        Self::RegimenDataModal,
        Self::Stock,
        Self::CashRegister,
        Self::PatientSelect,
        Self::PrescriberSelect,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerInvoice => "customerInvoice",
            Self::CustomerInvoices => "customerInvoices",
            Self::SupplierInvoice => "supplierInvoice",
            Self::SupplierInvoices => "supplierInvoices",
            Self::SupplierRequisitions => "supplierRequisitions",
            Self::SupplierRequisition => "supplierRequisition",
            Self::CustomerRequisitions => "customerRequisitions",
            Self::CustomerRequisition => "customerRequisition",
            Self::Stocktakes => "stocktakes",
            Self::StocktakeManager => "stocktakeManager",
            Self::StocktakeEditor => "stocktakeEditor",
            Self::StocktakeBatchEditModal => "stocktakeBatchEditModal",
            Self::RegimenDataModal => "regimenDataModal",
            Self::Stock => "stock",
            Self::CashRegister => "cashRegister",
            Self::PatientSelect => "patientSelect",
            Self::PrescriberSelect => "prescriberSelect",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.as_str() == value)
    }

    /// List pages that hide finalised records unless toggled.
    pub const fn filters_finalised(self) -> bool {
        matches!(
            self,
            Self::CustomerInvoices
                | Self::SupplierInvoices
                | Self::SupplierRequisitions
                | Self::CustomerRequisitions
                | Self::Stocktakes
        )
    }

    /// Requisition pages that can switch to a program indicator view.
    pub const fn has_indicators(self) -> bool {
        matches!(self, Self::SupplierRequisition | Self::CustomerRequisition)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    Text,
    Numeric,
    Date,
    EditableText,
    EditableNumeric,
    EditableDate,
    Checkable,
    Icon,
    Dropdown,
}

impl ColumnKind {
    pub const fn is_editable(self) -> bool {
        matches!(
            self,
            Self::EditableText | Self::EditableNumeric | Self::EditableDate
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub key: &'static str,
    pub title: &'static str,
    pub width: f32,
    pub sortable: bool,
    pub align: Align,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalKey {
    ViewRegimenData,
    StocktakeNameEdit,
    EnforceStocktakeReason,
    EditStocktakeBatch,
    StocktakeReason,
    TransactionCommentEdit,
    RequisitionCommentEdit,
    StocktakeCommentEdit,
    StocktakeOutdatedItem,
    TheirRefEdit,
    SelectMonth,
    SelectMasterLists,
    AddItem,
    ConfirmFinalise,
    DeleteConfirm,
}

impl ModalKey {
    pub const fn requires_reasons(self) -> bool {
        matches!(self, Self::StocktakeReason | Self::EnforceStocktakeReason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionType {
    #[default]
    Payment,
    Receipt,
}

impl TransactionType {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Payment => Self::Receipt,
            Self::Receipt => Self::Payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, PageId, Record};
    use std::cmp::Ordering;
    use time::{Date, Month};

    #[test]
    fn page_ids_parse_their_own_names() {
        for page in PageId::ALL {
            assert_eq!(PageId::parse(page.as_str()), Some(page));
        }
        assert_eq!(PageId::parse("dashboard"), None);
    }

    #[test]
    fn text_ordering_ignores_case() {
        let left = FieldValue::from("amoxicillin");
        let right = FieldValue::from("Paracetamol");
        assert_eq!(left.cmp_native(&right), Ordering::Less);
    }

    #[test]
    fn nulls_sort_before_values() {
        assert_eq!(
            FieldValue::Null.cmp_native(&FieldValue::Integer(-5)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Integer(-5).cmp_native(&FieldValue::Null),
            Ordering::Greater
        );
    }

    #[test]
    fn mixed_numeric_fields_compare_by_value() {
        assert_eq!(
            FieldValue::Integer(3).cmp_native(&FieldValue::Decimal(2.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn dates_order_chronologically() {
        let earlier = Date::from_calendar_date(2025, Month::March, 1).expect("valid date");
        let later = Date::from_calendar_date(2025, Month::November, 1).expect("valid date");
        assert_eq!(
            FieldValue::from(earlier).cmp_native(&FieldValue::from(later)),
            Ordering::Less
        );
    }

    #[test]
    fn substring_match_is_case_insensitive_and_skips_non_text() {
        assert!(FieldValue::from("Paracetamol 500mg").contains_ignore_case("PAR"));
        assert!(FieldValue::from(10_452_i64).contains_ignore_case("45"));
        assert!(!FieldValue::from(true).contains_ignore_case("tr"));
    }

    #[test]
    fn missing_fields_read_as_null() {
        let record = Record::new(7).with("itemName", "Gauze");
        assert!(record.field("itemCode").is_null());
        assert_eq!(record.text("itemName"), Some("Gauze"));
        assert!(!record.is_true("hasStock"));
    }
}
