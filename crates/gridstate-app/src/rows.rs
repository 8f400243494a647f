// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Focus and selection over rows.
//!
//! At most one row holds a focused column. `has_selection` and
//! `all_selected` are recomputed after every selection change rather than
//! being set directly.

use std::rc::Rc;

use crate::action::PageEvent;
use crate::ids::RowKey;
use crate::model::Record;
use crate::state::PageViewState;

pub(crate) fn focus_cell(
    state: &mut PageViewState,
    row_key: &RowKey,
    column_key: &str,
) -> Vec<PageEvent> {
    if !state.knows_row(row_key) {
        return Vec::new();
    }
    if let Some(previous) = state.current_focused_row.take()
        && let Some(row) = state.data_state.get_mut(&previous)
    {
        row.focused_column = None;
    }
    state.row_mut(row_key).focused_column = Some(column_key.to_owned());
    state.current_focused_row = Some(row_key.clone());
    vec![state.focus_event()]
}

/// Tab order: the next editable column in this row, then the first
/// editable column of the following row. Past the last row focus is
/// cleared instead of wrapping.
pub(crate) fn focus_next_cell(
    state: &mut PageViewState,
    row_key: &RowKey,
    column_key: &str,
) -> Vec<PageEvent> {
    let Some(row_index) = state.position_in_data(row_key) else {
        return clear_focus(state);
    };

    let start = state
        .columns
        .iter()
        .position(|column| column.key == column_key)
        .map_or(0, |index| index + 1);
    let next_in_row = state.columns[start..]
        .iter()
        .find(|column| column.kind.is_editable())
        .map(|column| column.key);
    if let Some(next_column) = next_in_row {
        return focus_cell(state, row_key, next_column);
    }

    let first_editable = state
        .columns
        .iter()
        .find(|column| column.kind.is_editable())
        .map(|column| column.key);
    let next_row = state
        .data
        .get(row_index + 1)
        .map(|record| state.key_of(record));
    match (next_row, first_editable) {
        (Some(next_row), Some(column)) => focus_cell(state, &next_row, column),
        _ => clear_focus(state),
    }
}

pub(crate) fn clear_focus(state: &mut PageViewState) -> Vec<PageEvent> {
    let Some(focused) = state.current_focused_row.take() else {
        return Vec::new();
    };
    if let Some(row) = state.data_state.get_mut(&focused) {
        row.focused_column = None;
    }
    vec![state.focus_event()]
}

pub(crate) fn select_row(state: &mut PageViewState, row_key: &RowKey) -> Vec<PageEvent> {
    if !state.knows_row(row_key) {
        return Vec::new();
    }
    state.row_mut(row_key).is_selected = true;
    vec![state.sync_selection_flags()]
}

pub(crate) fn deselect_row(state: &mut PageViewState, row_key: &RowKey) -> Vec<PageEvent> {
    if !state.knows_row(row_key) {
        return Vec::new();
    }
    state.row_mut(row_key).is_selected = false;
    state.sync_selection_flags();
    state.all_selected = false;
    vec![state.selection_event()]
}

pub(crate) fn select_all(state: &mut PageViewState) -> Vec<PageEvent> {
    let keys: Vec<RowKey> = state.data.iter().map(|record| state.key_of(record)).collect();
    for key in &keys {
        state.row_mut(key).is_selected = true;
    }
    vec![state.sync_selection_flags()]
}

pub(crate) fn deselect_all(state: &mut PageViewState) -> Vec<PageEvent> {
    for row in state.data_state.values_mut() {
        row.is_selected = false;
    }
    vec![state.sync_selection_flags()]
}

pub(crate) fn select_rows(state: &mut PageViewState, items: &[Record]) -> Vec<PageEvent> {
    let keys: Vec<RowKey> = items
        .iter()
        .map(|record| state.key_of(record))
        .filter(|key| state.knows_row(key))
        .collect();
    for key in &keys {
        state.row_mut(key).is_selected = true;
    }
    vec![state.sync_selection_flags()]
}

/// Flip the select-all toggle, applying it to every backing record.
pub(crate) fn toggle_select_all(state: &mut PageViewState) -> Vec<PageEvent> {
    let selected = !state.all_selected;
    let backing = Rc::clone(&state.backing);
    for record in backing.records() {
        let key = state.key_of(&record);
        state.row_mut(&key).is_selected = selected;
    }
    vec![state.sync_selection_flags()]
}

/// Exclusive selection. The previously selected record is deselected first.
pub(crate) fn select_one_row(state: &mut PageViewState, row_key: &RowKey) -> Vec<PageEvent> {
    let record = match state.find_in_data(row_key) {
        Some(record) => Some(record.clone()),
        None => state
            .backing
            .records()
            .into_iter()
            .find(|record| &state.key_of(record) == row_key),
    };
    let Some(record) = record else {
        return Vec::new();
    };

    if let Some(previous) = state.selected_row.take() {
        let previous_key = state.key_of(&previous);
        if let Some(row) = state.data_state.get_mut(&previous_key) {
            row.is_selected = false;
        }
    }
    state.row_mut(row_key).is_selected = true;
    state.selected_row = Some(record);
    vec![state.sync_selection_flags()]
}

pub(crate) fn deselect_one_row(state: &mut PageViewState) -> Vec<PageEvent> {
    let Some(previous) = state.selected_row.take() else {
        return Vec::new();
    };
    let previous_key = state.key_of(&previous);
    if let Some(row) = state.data_state.get_mut(&previous_key) {
        row.is_selected = false;
    }
    vec![state.sync_selection_flags()]
}

/// Drop displayed records the backing store no longer considers valid and
/// reset all row overlay state.
pub(crate) fn delete_records(state: &mut PageViewState) -> Vec<PageEvent> {
    let backing = Rc::clone(&state.backing);
    state.data.retain(|record| backing.is_valid(record));
    state.data_state.clear();
    state.current_focused_row = None;
    state.selected_row = None;
    state.modal = None;
    let selection = state.sync_selection_flags();
    vec![
        state.data_event(),
        selection,
        state.focus_event(),
        PageEvent::ModalChanged { modal_key: None },
    ]
}
