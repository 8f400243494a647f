// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::action::PageEvent;
use crate::ids::RowKey;
use crate::state::PageViewState;

/// Mark one row as changed without touching its selection or focus. The
/// displayed record is re-read so in-place edits made elsewhere show up.
pub(crate) fn refresh_row(state: &mut PageViewState, row_key: &RowKey) -> Vec<PageEvent> {
    if !state.knows_row(row_key) {
        return Vec::new();
    }
    state.row_mut(row_key).revision += 1;

    if let Some(index) = state.position_in_data(row_key)
        && let Some(fresh) = state.backing.get(state.data[index].id)
    {
        state.data[index] = fresh;
    }

    vec![PageEvent::RowRefreshed {
        row_key: row_key.clone(),
    }]
}

#[cfg(test)]
mod tests {
    use super::refresh_row;
    use crate::action::PageEvent;
    use crate::ids::RowKey;
    use crate::model::{FieldValue, PageId, Record};
    use crate::rows::{focus_cell, select_row};
    use crate::state::PageSeed;
    use crate::state::tests::{invoice_lines, mount_with};
    use crate::store::MemoryCollection;
    use std::rc::Rc;

    #[test]
    fn refresh_keeps_selection_and_focus() {
        let backing = Rc::new(MemoryCollection::new(invoice_lines()));
        let mut state = mount_with(PageId::CustomerInvoice, backing, PageSeed::default());
        let key = RowKey::from("1");
        select_row(&mut state, &key);
        focus_cell(&mut state, &key, "totalQuantity");

        let events = refresh_row(&mut state, &key);

        assert_eq!(events, vec![PageEvent::RowRefreshed { row_key: key.clone() }]);
        let row = state.row_state(&key);
        assert!(row.is_selected);
        assert_eq!(row.focused_column.as_deref(), Some("totalQuantity"));
        assert_eq!(row.revision, 1);
    }

    #[test]
    fn refresh_picks_up_in_place_edits() {
        let backing = Rc::new(MemoryCollection::new(invoice_lines()));
        let mut state = mount_with(
            PageId::CustomerInvoice,
            Rc::clone(&backing),
            PageSeed::default(),
        );
        backing.update(Record::new(2).with("itemName", "Amoxicillin").with("totalQuantity", 6_i64));

        refresh_row(&mut state, &RowKey::from("2"));

        let shown = state.data().iter().find(|record| record.id.get() == 2);
        assert_eq!(
            shown.map(|record| record.field("totalQuantity").clone()),
            Some(FieldValue::Integer(6))
        );
    }

    #[test]
    fn unknown_rows_are_ignored() {
        let mut state = mount_with(
            PageId::CustomerInvoice,
            Rc::new(MemoryCollection::new(invoice_lines())),
            PageSeed::default(),
        );
        assert!(refresh_row(&mut state, &RowKey::from("99")).is_empty());
        assert!(state.data_state().is_empty());
    }
}
