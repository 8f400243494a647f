// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Recomputing the visible window from the backing collection.

use crate::action::{PageEvent, PageField};
use crate::model::{FieldValue, Record};
use crate::state::PageViewState;
use crate::store::{Predicate, sort_records};

const FINALISED_FIELD: &str = "status";
const FINALISED_STATUS: &str = "finalised";

fn finalised_predicate(state: &PageViewState) -> Option<Predicate> {
    let value = FieldValue::from(FINALISED_STATUS);
    match state.show_finalised? {
        true => Some(Predicate::Equals(FINALISED_FIELD.to_owned(), value)),
        false => Some(Predicate::NotEquals(FINALISED_FIELD.to_owned(), value)),
    }
}

/// Backing records matching `search_term`, the finalised toggle and the
/// stock toggle, in the current sort order (or backing order when unsorted).
pub(crate) fn visible_from_backing(state: &PageViewState, search_term: &str) -> Vec<Record> {
    let needle = search_term.trim();
    let mut parts = Vec::new();
    if !needle.is_empty() {
        parts.push(Predicate::AnyContains {
            keys: state.filter_data_keys.clone(),
            needle: needle.to_owned(),
        });
    }
    parts.extend(finalised_predicate(state));
    if let Some(flag) = state.stock_flag {
        parts.push(Predicate::IsTrue(flag.to_owned()));
    }

    if parts.is_empty() {
        return match state.sort_by.as_deref() {
            Some(key) => state.backing.sorted(key, state.is_ascending),
            None => state.backing.records(),
        };
    }

    let predicate = if parts.len() == 1 {
        parts.remove(0)
    } else {
        Predicate::All(parts)
    };
    let mut records = state.backing.filtered(&predicate);
    if let Some(key) = state.sort_by.as_deref() {
        sort_records(&mut records, key, state.is_ascending);
    }
    records
}

/// Same key flips direction, a new key starts ascending. Sorts the visible
/// window in place.
pub(crate) fn sort_data(state: &mut PageViewState, sort_by: &str) -> Vec<PageEvent> {
    if state.sort_by.as_deref() == Some(sort_by) {
        state.is_ascending = !state.is_ascending;
    } else {
        state.sort_by = Some(sort_by.to_owned());
        state.is_ascending = true;
    }
    sort_records(&mut state.data, sort_by, state.is_ascending);
    vec![state.sort_event(), state.data_event()]
}

/// Pages that defer filtering only record the term.
pub(crate) fn filter_data(state: &mut PageViewState, search_term: &str) -> Vec<PageEvent> {
    let search_term = search_term.trim();
    state.search_term = search_term.to_owned();
    if state.defers_filtering() {
        return vec![state.search_event()];
    }
    state.data = visible_from_backing(state, search_term);
    vec![state.search_event(), state.data_event()]
}

pub(crate) fn refresh_data(state: &mut PageViewState) -> Vec<PageEvent> {
    state.stock_flag = None;
    state.data = visible_from_backing(state, "");
    state.search_term.clear();
    vec![
        state.search_event(),
        state.data_event(),
        PageEvent::PageFieldChanged {
            field: PageField::ShowAll(true),
        },
    ]
}

/// Backing rows carrying `flag`, unsorted. Later searches keep the
/// restriction until `showAll`.
fn show_only(state: &mut PageViewState, flag: &'static str) -> Vec<PageEvent> {
    state.stock_flag = Some(flag);
    state.data = state.backing.filtered(&Predicate::IsTrue(flag.to_owned()));
    vec![
        state.data_event(),
        PageEvent::PageFieldChanged {
            field: PageField::ShowAll(false),
        },
    ]
}

pub(crate) fn hide_over_stocked(state: &mut PageViewState) -> Vec<PageEvent> {
    show_only(state, "isLessThanThresholdMOS")
}

pub(crate) fn hide_stock_out(state: &mut PageViewState) -> Vec<PageEvent> {
    state.search_term.clear();
    let mut events = show_only(state, "hasStock");
    events.push(state.search_event());
    events
}

pub(crate) fn toggle_show_finalised(state: &mut PageViewState) -> Vec<PageEvent> {
    let Some(show_finalised) = state.show_finalised else {
        return Vec::new();
    };
    state.show_finalised = Some(!show_finalised);
    state.search_term.clear();
    state.data = visible_from_backing(state, "");
    vec![
        PageEvent::PageFieldChanged {
            field: PageField::ShowFinalised(!show_finalised),
        },
        state.data_event(),
        state.search_event(),
    ]
}

/// Switch between the item rows and the current indicator. Ignored when the
/// requisition has no indicators.
pub(crate) fn toggle_indicators(state: &mut PageViewState) -> Vec<PageEvent> {
    if !state.using_indicators() {
        return Vec::new();
    }
    state.show_indicators = !state.show_indicators;
    state.search_term.clear();
    state.data = visible_from_backing(state, "");
    vec![
        PageEvent::PageFieldChanged {
            field: PageField::ShowIndicators(state.show_indicators),
        },
        state.search_event(),
        state.data_event(),
    ]
}

pub(crate) fn select_indicator(
    state: &mut PageViewState,
    indicator_code: &str,
) -> Vec<PageEvent> {
    let Some(index) = state
        .indicators
        .iter()
        .position(|indicator| indicator.code == indicator_code)
    else {
        return Vec::new();
    };
    state.current_indicator = Some(index);
    vec![PageEvent::PageFieldChanged {
        field: PageField::CurrentIndicator(Some(indicator_code.to_owned())),
    }]
}

/// Show a just-created record at the top before the backing collection's
/// own change is reconciled. The record is not duplicated if the backing
/// collection already holds it.
pub(crate) fn add_record(state: &mut PageViewState, record: &Record) -> Vec<PageEvent> {
    state.modal = None;
    state.sort_by = None;
    state.search_term.clear();

    let key = state.key_of(record);
    let rest: Vec<Record> = visible_from_backing(state, "")
        .into_iter()
        .filter(|existing| state.key_of(existing) != key)
        .collect();
    state.data = std::iter::once(record.clone()).chain(rest).collect();

    vec![
        state.data_event(),
        PageEvent::ModalChanged { modal_key: None },
        state.sort_event(),
        state.search_event(),
    ]
}
