// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::action::{PageEvent, PageField};
use crate::ids::RowKey;
use crate::model::{ModalKey, Record};
use crate::state::{Modal, ModalValue, PageViewState};
use crate::store::Predicate;

const MAX_LISTED_ITEMS: usize = 4;
const MAX_ITEM_LINE_CHARS: usize = 40;

fn truncate_label(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{truncated}…")
    } else {
        truncated
    }
}

/// One `\n<code> - <name>` line per item, at most four, then a count of the
/// rest.
pub fn format_item_names(items: &[Record]) -> String {
    let mut message: String = items
        .iter()
        .take(MAX_LISTED_ITEMS)
        .map(|item| {
            let line = format!(
                "\n{} - {}",
                item.field("itemCode").display(),
                item.field("itemName").display()
            );
            truncate_label(&line, MAX_ITEM_LINE_CHARS)
        })
        .collect();
    if items.len() > MAX_LISTED_ITEMS {
        message.push_str(&format!("\nand {} more.", items.len() - MAX_LISTED_ITEMS));
    }
    message
}

fn page_text(state: &PageViewState, field: &str) -> Option<ModalValue> {
    state
        .page_object
        .as_ref()
        .and_then(|object| object.text(field))
        .map(|value| ModalValue::Text(value.to_owned()))
}

fn resolve_modal_value(
    state: &PageViewState,
    modal_key: ModalKey,
    row_key: Option<&RowKey>,
) -> Option<ModalValue> {
    match modal_key {
        ModalKey::ViewRegimenData => state.page_object.clone().map(ModalValue::Record),
        ModalKey::StocktakeNameEdit => page_text(state, "name"),
        ModalKey::EnforceStocktakeReason
        | ModalKey::EditStocktakeBatch
        | ModalKey::StocktakeReason => row_key
            .and_then(|key| state.find_in_data(key))
            .cloned()
            .map(ModalValue::Record),
        ModalKey::TransactionCommentEdit
        | ModalKey::RequisitionCommentEdit
        | ModalKey::StocktakeCommentEdit => page_text(state, "comment"),
        ModalKey::StocktakeOutdatedItem => {
            let outdated = state
                .backing
                .filtered(&Predicate::IsTrue("isOutdated".to_owned()));
            Some(ModalValue::Text(format_item_names(&outdated)))
        }
        ModalKey::TheirRefEdit => page_text(state, "theirRef"),
        ModalKey::SelectMonth => state
            .page_object
            .as_ref()
            .and_then(|object| object.field("monthsToSupply").as_integer())
            .map(ModalValue::Integer),
        ModalKey::SelectMasterLists => Some(ModalValue::Records(state.store.master_lists())),
        ModalKey::AddItem | ModalKey::ConfirmFinalise | ModalKey::DeleteConfirm => None,
    }
}

pub(crate) fn open_modal(
    state: &mut PageViewState,
    modal_key: ModalKey,
    row_key: Option<&RowKey>,
) -> Vec<PageEvent> {
    let value = resolve_modal_value(state, modal_key, row_key);
    state.modal = Some(Modal {
        key: modal_key,
        value,
    });
    vec![PageEvent::ModalChanged {
        modal_key: Some(modal_key),
    }]
}

pub(crate) fn close_modal(state: &mut PageViewState) -> Vec<PageEvent> {
    state.modal = None;
    vec![PageEvent::ModalChanged { modal_key: None }]
}

pub(crate) fn edit_name(state: &mut PageViewState, value: &str) -> Vec<PageEvent> {
    state.name = value.to_owned();
    vec![PageEvent::PageFieldChanged {
        field: PageField::Name(state.name.clone()),
    }]
}

pub(crate) fn set_date_picker(state: &mut PageViewState, open: bool) -> Vec<PageEvent> {
    state.date_picker_open = open;
    vec![PageEvent::PageFieldChanged {
        field: PageField::DatePicker(open),
    }]
}

pub(crate) fn update_payment_type(state: &mut PageViewState, payment_type: &str) -> Vec<PageEvent> {
    state.payment_type = Some(payment_type.to_owned());
    vec![PageEvent::PageFieldChanged {
        field: PageField::PaymentType(payment_type.to_owned()),
    }]
}

pub(crate) fn toggle_transaction_type(state: &mut PageViewState) -> Vec<PageEvent> {
    state.transaction_type = state.transaction_type.toggled();
    vec![PageEvent::PageFieldChanged {
        field: PageField::TransactionType(state.transaction_type),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::resolve_columns;
    use crate::model::{PageId, TransactionType};
    use crate::state::PageSeed;
    use crate::state::tests::{invoice_lines, mount};
    use crate::store::{MemoryCollection, MemoryStore};
    use std::rc::Rc;

    fn stocktake() -> Record {
        Record::new(50)
            .with("name", "Quarterly count")
            .with("comment", "Shelves B and C")
            .with("monthsToSupply", 3_i64)
    }

    fn editor() -> PageViewState {
        mount(
            PageId::StocktakeEditor,
            invoice_lines(),
            PageSeed::default().page_object(stocktake()),
        )
    }

    fn modal_value(state: &PageViewState) -> Option<&ModalValue> {
        state.modal().and_then(|modal| modal.value.as_ref())
    }

    #[test]
    fn page_object_fields_seed_edit_modals() {
        let mut state = editor();

        open_modal(&mut state, ModalKey::StocktakeNameEdit, None);
        assert_eq!(
            modal_value(&state),
            Some(&ModalValue::Text("Quarterly count".to_owned()))
        );

        open_modal(&mut state, ModalKey::StocktakeCommentEdit, None);
        assert_eq!(
            modal_value(&state),
            Some(&ModalValue::Text("Shelves B and C".to_owned()))
        );

        open_modal(&mut state, ModalKey::SelectMonth, None);
        assert_eq!(modal_value(&state), Some(&ModalValue::Integer(3)));
    }

    #[test]
    fn row_modals_resolve_the_displayed_record() {
        let mut state = editor();
        open_modal(&mut state, ModalKey::EditStocktakeBatch, Some(&RowKey::from("2")));
        let record = match modal_value(&state) {
            Some(ModalValue::Record(record)) => Some(record.id.get()),
            _ => None,
        };
        assert_eq!(record, Some(2));
    }

    #[test]
    fn key_only_modals_carry_no_value_and_close_clears() {
        let mut state = editor();
        open_modal(&mut state, ModalKey::AddItem, None);
        assert_eq!(state.modal().map(|modal| modal.key), Some(ModalKey::AddItem));
        assert!(modal_value(&state).is_none());

        let events = close_modal(&mut state);
        assert_eq!(events, vec![PageEvent::ModalChanged { modal_key: None }]);
        assert!(state.modal().is_none());
    }

    #[test]
    fn master_lists_come_from_the_store() {
        let store = MemoryStore {
            reasons: false,
            master_lists: vec![Record::new(70).with("name", "Essential medicines")],
            ..MemoryStore::default()
        };
        let mut state = PageViewState::new(
            PageId::StocktakeManager,
            Rc::new(MemoryCollection::default()),
            Rc::new(store),
            resolve_columns(PageId::StocktakeManager, false),
            PageSeed::default(),
        );
        open_modal(&mut state, ModalKey::SelectMasterLists, None);
        let names: Vec<String> = match modal_value(&state) {
            Some(ModalValue::Records(lists)) => {
                lists.iter().map(|list| list.field("name").display()).collect()
            }
            _ => Vec::new(),
        };
        assert_eq!(names, vec!["Essential medicines".to_owned()]);
    }

    #[test]
    fn outdated_items_are_listed_with_overflow_count() {
        let items: Vec<Record> = (1..=6)
            .map(|id| {
                Record::new(id)
                    .with("itemCode", format!("C{id}"))
                    .with("itemName", format!("Item {id}"))
                    .with("isOutdated", id != 2)
            })
            .collect();
        let mut state = mount(PageId::StocktakeEditor, items, PageSeed::default());

        open_modal(&mut state, ModalKey::StocktakeOutdatedItem, None);

        assert_eq!(
            modal_value(&state),
            Some(&ModalValue::Text(
                "\nC1 - Item 1\nC3 - Item 3\nC4 - Item 4\nC5 - Item 5\nand 1 more.".to_owned()
            ))
        );
    }

    #[test]
    fn long_item_lines_are_truncated() {
        let item = Record::new(1)
            .with("itemCode", "LONG")
            .with("itemName", "Amoxicillin trihydrate oral suspension 250mg/5ml");
        let message = format_item_names(&[item]);
        assert_eq!(message.chars().count(), MAX_ITEM_LINE_CHARS + 1);
        assert!(message.ends_with('…'));
    }

    #[test]
    fn scalar_page_fields_update() {
        let mut state = mount(PageId::CashRegister, Vec::new(), PageSeed::default());
        edit_name(&mut state, "Till 2");
        set_date_picker(&mut state, true);
        update_payment_type(&mut state, "cash");
        toggle_transaction_type(&mut state);

        assert_eq!(state.name(), "Till 2");
        assert!(state.date_picker_open());
        assert_eq!(state.payment_type(), Some("cash"));
        assert_eq!(state.transaction_type(), TransactionType::Receipt);

        set_date_picker(&mut state, false);
        assert!(!state.date_picker_open());
    }
}
