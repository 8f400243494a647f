// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Per-page composition of transition families.
//!
//! Each page accepts the union of a few named families. Anything outside
//! that union, including [`Action::Unsupported`], is ignored and leaves the
//! state untouched.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::action::{Action, ActionKind, PageEvent};
use crate::columns::resolve_columns;
use crate::model::{ColumnDescriptor, PageId, Record};
use crate::state::{PageSeed, PageViewState};
use crate::store::{BackingCollection, RecordStore};
use crate::{cells, page, rows, table};

pub const BASE_TABLE: &[ActionKind] = &[
    ActionKind::SortData,
    ActionKind::FilterData,
    ActionKind::RefreshData,
    ActionKind::AddRecord,
    ActionKind::RefreshRow,
    ActionKind::OpenModal,
    ActionKind::CloseModal,
];

pub const MULTI_SELECT: &[ActionKind] = &[
    ActionKind::SelectRow,
    ActionKind::DeselectRow,
    ActionKind::SelectAll,
    ActionKind::DeselectAll,
    ActionKind::SelectRows,
    ActionKind::ToggleSelectAll,
    ActionKind::DeleteRecords,
];

pub const SINGLE_SELECT: &[ActionKind] = &[ActionKind::SelectOneRow, ActionKind::DeselectOneRow];

pub const CELL_FOCUS: &[ActionKind] = &[
    ActionKind::FocusCell,
    ActionKind::FocusNextCell,
    ActionKind::ClearFocus,
];

pub const STOCK_TOGGLES: &[ActionKind] = &[
    ActionKind::HideOverStocked,
    ActionKind::HideStockOut,
    ActionKind::ShowAll,
];

pub const FINALISED: &[ActionKind] = &[ActionKind::ToggleShowFinalised];

pub const INDICATORS: &[ActionKind] = &[
    ActionKind::ToggleIndicators,
    ActionKind::SelectIndicator,
];

pub const PAGE_FIELDS: &[ActionKind] = &[
    ActionKind::EditName,
    ActionKind::OpenDatePicker,
    ActionKind::CloseDatePicker,
];

pub const CASH: &[ActionKind] = &[
    ActionKind::UpdatePaymentType,
    ActionKind::ToggleTransactionType,
];

pub const REASONS: &[ActionKind] = &[ActionKind::OpenReasonModal];

fn families(page: PageId, reasons_enabled: bool) -> Vec<&'static [ActionKind]> {
    let mut families = vec![BASE_TABLE];
    match page {
        PageId::CustomerInvoice | PageId::SupplierInvoice => {
            families.extend([MULTI_SELECT, CELL_FOCUS]);
        }
        PageId::CustomerInvoices
        | PageId::SupplierInvoices
        | PageId::SupplierRequisitions
        | PageId::CustomerRequisitions
        | PageId::Stocktakes => families.extend([MULTI_SELECT, FINALISED]),
        PageId::SupplierRequisition => {
            families.extend([MULTI_SELECT, CELL_FOCUS, STOCK_TOGGLES, INDICATORS]);
        }
        PageId::CustomerRequisition => families.extend([CELL_FOCUS, INDICATORS]),
        PageId::RegimenDataModal => families.push(CELL_FOCUS),
        PageId::StocktakeManager => families.extend([MULTI_SELECT, STOCK_TOGGLES, PAGE_FIELDS]),
        PageId::StocktakeEditor | PageId::StocktakeBatchEditModal => {
            families.extend([CELL_FOCUS, PAGE_FIELDS]);
            if reasons_enabled {
                families.push(REASONS);
            }
        }
        PageId::CashRegister => families.extend([CASH, PAGE_FIELDS]),
        PageId::Stock | PageId::PatientSelect | PageId::PrescriberSelect => {
            families.push(SINGLE_SELECT);
        }
    }
    families
}

/// The set of action kinds a page responds to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet(BTreeSet<ActionKind>);

impl ActionSet {
    pub fn from_families(families: &[&[ActionKind]]) -> Self {
        Self(families.iter().flat_map(|family| family.iter().copied()).collect())
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.0.iter().copied()
    }
}

/// Composed transition function for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReducer {
    page: Option<PageId>,
    accepted: ActionSet,
}

impl PageReducer {
    /// Reducer for a page that does not exist. Every action is a no-op.
    pub fn ignore_all() -> Self {
        Self {
            page: None,
            accepted: ActionSet::default(),
        }
    }

    pub fn page(&self) -> Option<PageId> {
        self.page
    }

    pub fn accepted(&self) -> &ActionSet {
        &self.accepted
    }

    pub fn accepts(&self, kind: ActionKind) -> bool {
        kind != ActionKind::Unsupported && self.accepted.contains(kind)
    }

    pub fn dispatch(&self, state: &mut PageViewState, action: &Action) -> Vec<PageEvent> {
        let kind = action.kind();
        let page = self.page.map_or("unknown", PageId::as_str);
        if !self.accepts(kind) {
            tracing::debug!(page, action = kind.as_str(), "ignored action");
            return Vec::new();
        }
        let events = apply(state, action);
        tracing::debug!(
            page,
            action = kind.as_str(),
            events = events.len(),
            "applied action"
        );
        events
    }
}

fn apply(state: &mut PageViewState, action: &Action) -> Vec<PageEvent> {
    match action {
        Action::RefreshRow { row_key } => cells::refresh_row(state, row_key),
        Action::FocusCell {
            row_key,
            column_key,
        } => rows::focus_cell(state, row_key, column_key),
        Action::FocusNextCell {
            row_key,
            column_key,
        } => rows::focus_next_cell(state, row_key, column_key),
        Action::ClearFocus => rows::clear_focus(state),
        Action::SelectRow { row_key } => rows::select_row(state, row_key),
        Action::DeselectRow { row_key } => rows::deselect_row(state, row_key),
        Action::SelectAll => rows::select_all(state),
        Action::DeselectAll => rows::deselect_all(state),
        Action::SelectRows { items } => rows::select_rows(state, items),
        Action::ToggleSelectAll => rows::toggle_select_all(state),
        Action::SelectOneRow { row_key } => rows::select_one_row(state, row_key),
        Action::DeselectOneRow => rows::deselect_one_row(state),
        Action::DeleteRecords => rows::delete_records(state),
        Action::SortData { sort_by } => table::sort_data(state, sort_by),
        Action::FilterData { search_term } => table::filter_data(state, search_term),
        Action::RefreshData | Action::ShowAll => table::refresh_data(state),
        Action::HideOverStocked => table::hide_over_stocked(state),
        Action::HideStockOut => table::hide_stock_out(state),
        Action::ToggleShowFinalised => table::toggle_show_finalised(state),
        Action::ToggleIndicators => table::toggle_indicators(state),
        Action::SelectIndicator { indicator_code } => {
            table::select_indicator(state, indicator_code)
        }
        Action::AddRecord { record } => table::add_record(state, record),
        Action::OpenModal { modal_key, row_key } => {
            page::open_modal(state, *modal_key, row_key.as_ref())
        }
        Action::CloseModal => page::close_modal(state),
        Action::EditName { value } => page::edit_name(state, value),
        Action::OpenDatePicker => page::set_date_picker(state, true),
        Action::CloseDatePicker => page::set_date_picker(state, false),
        Action::UpdatePaymentType { payment_type } => page::update_payment_type(state, payment_type),
        Action::ToggleTransactionType => page::toggle_transaction_type(state),
        Action::Unsupported => Vec::new(),
    }
}

pub fn compose(page: PageId, reasons_enabled: bool) -> PageReducer {
    PageReducer {
        page: Some(page),
        accepted: ActionSet::from_families(&families(page, reasons_enabled)),
    }
}

pub fn compose_named(page: &str, reasons_enabled: bool) -> PageReducer {
    PageId::parse(page).map_or_else(PageReducer::ignore_all, |page| {
        compose(page, reasons_enabled)
    })
}

/// Initial sort and searchable fields for each page.
pub fn default_seed(page: PageId) -> PageSeed {
    let seed = PageSeed::default();
    match page {
        PageId::CustomerInvoice
        | PageId::CustomerRequisition
        | PageId::SupplierRequisition
        | PageId::StocktakeEditor => seed
            .filter_keys(&["itemName", "itemCode"])
            .sorted_by("itemName", true),
        PageId::SupplierInvoice => seed.filter_keys(&["itemName"]).sorted_by("itemName", true),
        PageId::CustomerInvoices => seed
            .filter_keys(&["otherPartyName"])
            .sorted_by("serialNumber", false),
        PageId::SupplierInvoices | PageId::SupplierRequisitions | PageId::CustomerRequisitions => {
            seed.filter_keys(&["serialNumber"])
                .sorted_by("serialNumber", false)
        }
        PageId::Stocktakes => seed
            .filter_keys(&["name", "serialNumber"])
            .sorted_by("createdDate", false),
        PageId::StocktakeManager | PageId::Stock => {
            seed.filter_keys(&["name", "code"]).sorted_by("name", true)
        }
        PageId::StocktakeBatchEditModal => seed.sorted_by("itemName", true),
        PageId::RegimenDataModal => seed,
        PageId::CashRegister => seed.sorted_by("serialNumber", false),
        PageId::PatientSelect => seed
            .filter_keys(&["firstName", "lastName", "code"])
            .sorted_by("lastName", true),
        PageId::PrescriberSelect => seed
            .filter_keys(&["firstName", "lastName"])
            .sorted_by("lastName", true),
    }
}

/// Columns and reducer for one page, both derived from a single read of the
/// reasons flag.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub page: PageId,
    pub reasons_enabled: bool,
    pub columns: Vec<ColumnDescriptor>,
    pub reducer: PageReducer,
    pub seed: PageSeed,
}

impl PageConfig {
    pub fn resolve(page: PageId, store: &dyn RecordStore) -> Self {
        Self::with_reasons(page, store.reasons_enabled())
    }

    pub fn with_reasons(page: PageId, reasons_enabled: bool) -> Self {
        Self {
            page,
            reasons_enabled,
            columns: resolve_columns(page, reasons_enabled),
            reducer: compose(page, reasons_enabled),
            seed: default_seed(page),
        }
    }

    /// Build the view-state for a freshly mounted page.
    pub fn mount(
        &self,
        backing: Rc<dyn BackingCollection>,
        store: Rc<dyn RecordStore>,
        page_object: Option<Record>,
    ) -> PageViewState {
        let mut seed = self.seed.clone();
        seed.page_object = page_object;
        PageViewState::new(self.page, backing, store, self.columns.clone(), seed)
    }
}
