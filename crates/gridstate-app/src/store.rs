// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Read-only ports onto the authoritative record store.
//!
//! The engine never mutates backing records. Whatever process does mutate
//! them must follow up with `refreshData` or `deleteRecords` so the visible
//! window is reconciled.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::ids::RecordId;
use crate::model::{FieldValue, Indicator, Record};

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring over several fields, OR-combined. An empty
    /// needle matches everything.
    AnyContains { keys: Vec<String>, needle: String },
    IsTrue(String),
    Equals(String, FieldValue),
    NotEquals(String, FieldValue),
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::AnyContains { keys, needle } => {
                needle.is_empty()
                    || keys
                        .iter()
                        .any(|key| record.field(key).contains_ignore_case(needle))
            }
            Self::IsTrue(key) => record.is_true(key),
            Self::Equals(key, value) => record.field(key) == value,
            Self::NotEquals(key, value) => record.field(key) != value,
            Self::All(parts) => parts.iter().all(|part| part.matches(record)),
        }
    }
}

/// Stable sort by one field. Equal keys keep their relative order in both
/// directions.
pub fn sort_records(records: &mut [Record], key: &str, ascending: bool) {
    records.sort_by(|left, right| {
        let ordering = left.field(key).cmp_native(right.field(key));
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

pub trait BackingCollection {
    /// Every live record in backing order.
    fn records(&self) -> Vec<Record>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn filtered(&self, predicate: &Predicate) -> Vec<Record>;
    fn sorted(&self, key: &str, ascending: bool) -> Vec<Record>;
    /// False once the record has been removed by an outside mutation.
    fn is_valid(&self, record: &Record) -> bool;
    fn get(&self, id: RecordId) -> Option<Record>;
}

pub trait RecordStore {
    /// Whether stocktake adjustment reasons are configured.
    fn reasons_enabled(&self) -> bool;
    fn master_lists(&self) -> Vec<Record>;
    /// Program indicators of a requisition, in program order.
    fn indicators(&self, requisition: RecordId) -> Vec<Indicator>;
}

#[derive(Debug, Default)]
pub struct MemoryCollection {
    records: RefCell<Vec<Record>>,
}

impl MemoryCollection {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    pub fn push(&self, record: Record) {
        self.records.borrow_mut().push(record);
    }

    pub fn remove(&self, id: RecordId) -> bool {
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|record| record.id != id);
        records.len() != before
    }

    /// Replace the stored record with the same id. Returns false if absent.
    pub fn update(&self, record: Record) -> bool {
        let mut records = self.records.borrow_mut();
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }
}

impl BackingCollection for MemoryCollection {
    fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    fn len(&self) -> usize {
        self.records.borrow().len()
    }

    fn filtered(&self, predicate: &Predicate) -> Vec<Record> {
        self.records
            .borrow()
            .iter()
            .filter(|record| predicate.matches(record))
            .cloned()
            .collect()
    }

    fn sorted(&self, key: &str, ascending: bool) -> Vec<Record> {
        let mut records = self.records();
        sort_records(&mut records, key, ascending);
        records
    }

    fn is_valid(&self, record: &Record) -> bool {
        self.records
            .borrow()
            .iter()
            .any(|existing| existing.id == record.id)
    }

    fn get(&self, id: RecordId) -> Option<Record> {
        self.records
            .borrow()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub reasons: bool,
    pub master_lists: Vec<Record>,
    pub indicators: BTreeMap<RecordId, Vec<Indicator>>,
}

impl MemoryStore {
    pub fn with_reasons(reasons: bool) -> Self {
        Self {
            reasons,
            ..Self::default()
        }
    }

    pub fn with_indicators(mut self, requisition: RecordId, indicators: Vec<Indicator>) -> Self {
        self.indicators.insert(requisition, indicators);
        self
    }
}

impl RecordStore for MemoryStore {
    fn reasons_enabled(&self) -> bool {
        self.reasons
    }

    fn master_lists(&self) -> Vec<Record> {
        self.master_lists.clone()
    }

    fn indicators(&self, requisition: RecordId) -> Vec<Indicator> {
        self.indicators.get(&requisition).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{BackingCollection, MemoryCollection, Predicate, sort_records};
    use crate::ids::RecordId;
    use crate::model::{FieldValue, Record};

    fn items() -> Vec<Record> {
        vec![
            Record::new(1).with("itemName", "Paracetamol").with("qty", 10_i64),
            Record::new(2).with("itemName", "amoxicillin").with("qty", 10_i64),
            Record::new(3).with("itemName", "Bandage").with("qty", 4_i64),
        ]
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records.iter().map(|record| record.id.get()).collect()
    }

    #[test]
    fn any_contains_ors_across_keys() {
        let predicate = Predicate::AnyContains {
            keys: vec!["itemCode".to_owned(), "itemName".to_owned()],
            needle: "AMOX".to_owned(),
        };
        let matched: Vec<_> = items().into_iter().filter(|r| predicate.matches(r)).collect();
        assert_eq!(ids(&matched), vec![2]);
    }

    #[test]
    fn empty_needle_matches_records_without_the_field() {
        let predicate = Predicate::AnyContains {
            keys: vec!["missing".to_owned()],
            needle: String::new(),
        };
        assert!(predicate.matches(&Record::new(9)));
    }

    #[test]
    fn not_equals_treats_missing_fields_as_null() {
        let predicate = Predicate::NotEquals("status".to_owned(), FieldValue::from("finalised"));
        assert!(predicate.matches(&Record::new(1)));
        assert!(!predicate.matches(&Record::new(2).with("status", "finalised")));
    }

    #[test]
    fn descending_sort_keeps_ties_in_original_order() {
        let mut records = items();
        sort_records(&mut records, "qty", false);
        assert_eq!(ids(&records), vec![1, 2, 3]);
        sort_records(&mut records, "itemName", true);
        assert_eq!(ids(&records), vec![2, 3, 1]);
    }

    #[test]
    fn removed_records_stop_being_valid() {
        let collection = MemoryCollection::new(items());
        let record = collection.get(RecordId::new(2));
        assert!(record.is_some());
        assert!(collection.remove(RecordId::new(2)));
        assert!(!collection.remove(RecordId::new(2)));
        if let Some(record) = record {
            assert!(!collection.is_valid(&record));
        }
        assert_eq!(collection.len(), 2);
    }
}
