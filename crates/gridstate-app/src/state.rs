// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::action::PageEvent;
use crate::ids::{RecordId, RowKey};
use crate::model::{ColumnDescriptor, Indicator, ModalKey, PageId, Record, TransactionType};
use crate::store::{BackingCollection, RecordStore};

pub type KeyExtractor = fn(&Record) -> RowKey;

/// Default key extractor: the record id rendered as text.
pub fn record_key(record: &Record) -> RowKey {
    RowKey::from(record.id)
}

/// Per-row UI overlay. A missing entry reads as the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowState {
    pub is_selected: bool,
    pub focused_column: Option<String>,
    /// Bumped by `refreshRow` so renderers can tell the row changed.
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ModalValue {
    Record(Record),
    Records(Vec<Record>),
    Text(String),
    Integer(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modal {
    pub key: ModalKey,
    pub value: Option<ModalValue>,
}

/// Construction-time inputs that stay fixed for the life of a page.
#[derive(Debug, Clone)]
pub struct PageSeed {
    pub filter_data_keys: Vec<String>,
    pub sort_by: Option<String>,
    pub is_ascending: bool,
    pub page_object: Option<Record>,
    pub key_extractor: KeyExtractor,
}

impl Default for PageSeed {
    fn default() -> Self {
        Self {
            filter_data_keys: Vec::new(),
            sort_by: None,
            is_ascending: true,
            page_object: None,
            key_extractor: record_key,
        }
    }
}

impl PageSeed {
    pub fn filter_keys(mut self, keys: &[&str]) -> Self {
        self.filter_data_keys = keys.iter().map(|key| (*key).to_owned()).collect();
        self
    }

    pub fn sorted_by(mut self, key: &str, ascending: bool) -> Self {
        self.sort_by = Some(key.to_owned());
        self.is_ascending = ascending;
        self
    }

    pub fn page_object(mut self, record: Record) -> Self {
        self.page_object = Some(record);
        self
    }

    pub fn key_extractor(mut self, extractor: KeyExtractor) -> Self {
        self.key_extractor = extractor;
        self
    }
}

/// View-state of one mounted page. Only transitions mutate it.
pub struct PageViewState {
    pub(crate) page: PageId,
    pub(crate) backing: Rc<dyn BackingCollection>,
    pub(crate) store: Rc<dyn RecordStore>,
    pub(crate) data: Vec<Record>,
    pub(crate) columns: Vec<ColumnDescriptor>,
    pub(crate) sort_by: Option<String>,
    pub(crate) is_ascending: bool,
    pub(crate) search_term: String,
    pub(crate) filter_data_keys: Vec<String>,
    pub(crate) data_state: BTreeMap<RowKey, RowState>,
    pub(crate) current_focused_row: Option<RowKey>,
    pub(crate) has_selection: bool,
    pub(crate) all_selected: bool,
    pub(crate) selected_row: Option<Record>,
    pub(crate) modal: Option<Modal>,
    pub(crate) page_object: Option<Record>,
    /// Flag field every visible row must carry while not showing all.
    pub(crate) stock_flag: Option<&'static str>,
    pub(crate) show_finalised: Option<bool>,
    pub(crate) indicators: Vec<Indicator>,
    pub(crate) current_indicator: Option<usize>,
    pub(crate) show_indicators: bool,
    pub(crate) name: String,
    pub(crate) date_picker_open: bool,
    pub(crate) payment_type: Option<String>,
    pub(crate) transaction_type: TransactionType,
    pub(crate) key_extractor: KeyExtractor,
}

impl PageViewState {
    pub fn new(
        page: PageId,
        backing: Rc<dyn BackingCollection>,
        store: Rc<dyn RecordStore>,
        columns: Vec<ColumnDescriptor>,
        seed: PageSeed,
    ) -> Self {
        let name = seed
            .page_object
            .as_ref()
            .and_then(|object| object.text("name"))
            .unwrap_or_default()
            .to_owned();
        let indicators = match &seed.page_object {
            Some(object) if page.has_indicators() => store.indicators(object.id),
            _ => Vec::new(),
        };
        let mut state = Self {
            page,
            backing,
            store,
            data: Vec::new(),
            columns,
            sort_by: seed.sort_by,
            is_ascending: seed.is_ascending,
            search_term: String::new(),
            filter_data_keys: seed.filter_data_keys,
            data_state: BTreeMap::new(),
            current_focused_row: None,
            has_selection: false,
            all_selected: false,
            selected_row: None,
            modal: None,
            page_object: seed.page_object,
            stock_flag: None,
            show_finalised: page.filters_finalised().then_some(false),
            current_indicator: (!indicators.is_empty()).then_some(0),
            indicators,
            show_indicators: false,
            name,
            date_picker_open: false,
            payment_type: None,
            transaction_type: TransactionType::default(),
            key_extractor: seed.key_extractor,
        };
        state.data = crate::table::visible_from_backing(&state, "");
        state
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn backing(&self) -> &dyn BackingCollection {
        self.backing.as_ref()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn is_ascending(&self) -> bool {
        self.is_ascending
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filter_data_keys(&self) -> &[String] {
        &self.filter_data_keys
    }

    pub fn data_state(&self) -> &BTreeMap<RowKey, RowState> {
        &self.data_state
    }

    pub fn row_state(&self, key: &RowKey) -> RowState {
        self.data_state.get(key).cloned().unwrap_or_default()
    }

    pub fn focused_row(&self) -> Option<&RowKey> {
        self.current_focused_row.as_ref()
    }

    pub fn has_selection(&self) -> bool {
        self.has_selection
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn selected_row(&self) -> Option<&Record> {
        self.selected_row.as_ref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn page_object(&self) -> Option<&Record> {
        self.page_object.as_ref()
    }

    pub fn show_all(&self) -> bool {
        self.stock_flag.is_none()
    }

    pub fn show_finalised(&self) -> Option<bool> {
        self.show_finalised
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn using_indicators(&self) -> bool {
        !self.indicators.is_empty()
    }

    pub fn show_indicators(&self) -> bool {
        self.show_indicators
    }

    pub fn current_indicator(&self) -> Option<&Indicator> {
        self.current_indicator
            .and_then(|index| self.indicators.get(index))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date_picker_open(&self) -> bool {
        self.date_picker_open
    }

    pub fn payment_type(&self) -> Option<&str> {
        self.payment_type.as_deref()
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn key_of(&self, record: &Record) -> RowKey {
        (self.key_extractor)(record)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let selected = self
            .data_state
            .iter()
            .filter(|(_, row)| row.is_selected)
            .map(|(key, _)| key.clone())
            .collect();
        let focus = self.current_focused_row.as_ref().and_then(|key| {
            self.data_state
                .get(key)
                .and_then(|row| row.focused_column.clone())
                .map(|column| FocusSnapshot {
                    row_key: key.clone(),
                    column_key: column,
                })
        });
        ViewSnapshot {
            page: self.page.as_str(),
            rows: self.data.iter().map(|record| record.id).collect(),
            sort_by: self.sort_by.clone(),
            is_ascending: self.is_ascending,
            search_term: self.search_term.clone(),
            selected,
            has_selection: self.has_selection,
            all_selected: self.all_selected,
            focus,
            modal: self.modal.as_ref().map(|modal| modal.key),
            show_all: self.show_all(),
            show_finalised: self.show_finalised,
            show_indicators: self.show_indicators,
            current_indicator: self.current_indicator().map(|indicator| indicator.code.clone()),
        }
    }

    /// Searches that only record the term and leave `data` to the renderer:
    /// pages without searchable fields, and the indicator view.
    pub(crate) fn defers_filtering(&self) -> bool {
        self.filter_data_keys.is_empty() || (self.using_indicators() && self.show_indicators)
    }

    pub(crate) fn position_in_data(&self, key: &RowKey) -> Option<usize> {
        self.data
            .iter()
            .position(|record| &(self.key_extractor)(record) == key)
    }

    pub(crate) fn find_in_data(&self, key: &RowKey) -> Option<&Record> {
        self.position_in_data(key).map(|index| &self.data[index])
    }

    /// A key is known if some displayed or backing record produces it.
    pub(crate) fn knows_row(&self, key: &RowKey) -> bool {
        self.position_in_data(key).is_some()
            || self
                .backing
                .records()
                .iter()
                .any(|record| &(self.key_extractor)(record) == key)
    }

    pub(crate) fn row_mut(&mut self, key: &RowKey) -> &mut RowState {
        self.data_state.entry(key.clone()).or_default()
    }

    /// Recompute the derived selection flags from `data_state`.
    pub(crate) fn sync_selection_flags(&mut self) -> PageEvent {
        self.has_selection = self.data_state.values().any(|row| row.is_selected);
        self.all_selected = !self.data.is_empty()
            && self.data.iter().all(|record| {
                self.data_state
                    .get(&(self.key_extractor)(record))
                    .is_some_and(|row| row.is_selected)
            });
        self.selection_event()
    }

    pub(crate) fn selection_event(&self) -> PageEvent {
        PageEvent::SelectionChanged {
            has_selection: self.has_selection,
            all_selected: self.all_selected,
        }
    }

    pub(crate) fn focus_event(&self) -> PageEvent {
        let column_key = self
            .current_focused_row
            .as_ref()
            .and_then(|key| self.data_state.get(key))
            .and_then(|row| row.focused_column.clone());
        PageEvent::FocusChanged {
            row_key: self.current_focused_row.clone(),
            column_key,
        }
    }

    pub(crate) fn data_event(&self) -> PageEvent {
        PageEvent::DataChanged {
            rows: self.data.len(),
        }
    }

    pub(crate) fn sort_event(&self) -> PageEvent {
        PageEvent::SortChanged {
            sort_by: self.sort_by.clone(),
            is_ascending: self.is_ascending,
        }
    }

    pub(crate) fn search_event(&self) -> PageEvent {
        PageEvent::SearchChanged {
            search_term: self.search_term.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSnapshot {
    pub row_key: RowKey,
    pub column_key: String,
}

/// Serializable summary of a page's view-state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub page: &'static str,
    pub rows: Vec<RecordId>,
    pub sort_by: Option<String>,
    pub is_ascending: bool,
    pub search_term: String,
    pub selected: Vec<RowKey>,
    pub has_selection: bool,
    pub all_selected: bool,
    pub focus: Option<FocusSnapshot>,
    pub modal: Option<ModalKey>,
    pub show_all: bool,
    pub show_finalised: Option<bool>,
    pub show_indicators: bool,
    pub current_indicator: Option<String>,
}
