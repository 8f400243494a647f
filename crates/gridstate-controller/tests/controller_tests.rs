// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use gridstate_app::{
    Action, MemoryCollection, MemoryStore, ModalKey, PageEvent, PageId, Record, RecordId, RowKey,
};
use gridstate_controller::{Channel, Clock, Debounce, ManualClock, PageController};
use gridstate_testkit::invoice_lines;
use std::rc::Rc;
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn invoice(clock: &ManualClock) -> PageController<ManualClock> {
    PageController::mount_with_clock(
        PageId::CustomerInvoice,
        Rc::new(MemoryCollection::new(invoice_lines())),
        Rc::new(MemoryStore::default()),
        Some(Record::new(301).with("name", "INV-1041")),
        clock.clone(),
    )
}

fn filter(term: &str) -> Action {
    Action::FilterData {
        search_term: term.to_owned(),
    }
}

fn ids(controller: &PageController<ManualClock>) -> Vec<i64> {
    controller
        .state()
        .data()
        .iter()
        .map(|record| record.id.get())
        .collect()
}

#[test]
fn mount_seeds_columns_sort_and_page_name() {
    let clock = ManualClock::new();
    let controller = invoice(&clock);
    let state = controller.state();
    assert!(!state.columns().is_empty());
    assert_eq!(state.sort_by(), Some("itemName"));
    assert_eq!(state.name(), "INV-1041");
    assert_eq!(ids(&controller), vec![202, 203, 201]);
}

#[test]
fn immediate_submissions_apply_in_order() {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock);
    let events = controller.submit(&Action::SortData {
        sort_by: "itemCode".to_owned(),
    });
    assert!(!events.is_empty());
    controller.submit(&Action::SortData {
        sort_by: "itemCode".to_owned(),
    });
    assert!(!controller.state().is_ascending());
    assert_eq!(ids(&controller), vec![201, 203, 202]);
}

#[test]
fn trailing_burst_applies_only_the_last_action() {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock);

    for term in ["p", "pa", "par"] {
        assert!(controller.submit_trailing(filter(term)).is_empty());
        clock.advance(ms(100));
    }
    assert!(controller.has_pending());
    assert_eq!(controller.state().search_term(), "");

    clock.advance(ms(100));
    assert!(controller.poll().is_empty(), "quiet period restarted by each call");

    clock.advance(ms(50));
    let events = controller.poll();
    assert!(
        events
            .iter()
            .any(|event| matches!(event, PageEvent::DataChanged { rows: 1 }))
    );
    assert_eq!(controller.state().search_term(), "par");
    assert_eq!(ids(&controller), vec![201]);
    assert!(!controller.has_pending());
}

#[test]
fn next_submission_fires_a_due_trailing_action_first() {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock);

    controller.submit_trailing(filter("amox"));
    clock.advance(ms(300));
    controller.submit(&Action::SelectRow {
        row_key: RowKey::from(RecordId::new(202)),
    });

    assert_eq!(controller.state().search_term(), "amox");
    assert!(controller.state().has_selection());
}

#[test]
fn flush_and_cancel_drain_the_trailing_slot() {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock);

    controller.submit_trailing(filter("band"));
    controller.flush();
    assert_eq!(controller.state().search_term(), "band");
    assert!(controller.flush().is_empty());

    controller.submit_trailing(filter("zzz"));
    assert_eq!(controller.cancel_pending(), Some(filter("zzz")));
    clock.advance(ms(1_000));
    assert!(controller.poll().is_empty());
    assert_eq!(controller.state().search_term(), "band");
}

#[test]
fn leading_channel_drops_repeats_until_quiet() {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock);
    let open = Action::OpenModal {
        modal_key: ModalKey::AddItem,
        row_key: None,
    };

    assert!(!controller.submit_leading(&open).is_empty());
    controller.submit(&Action::CloseModal);

    clock.advance(ms(200));
    assert!(controller.submit_leading(&open).is_empty());
    clock.advance(ms(200));
    assert!(
        controller.submit_leading(&open).is_empty(),
        "dropped taps extend the window"
    );
    assert!(controller.state().modal().is_none());

    clock.advance(ms(250));
    assert!(!controller.submit_leading(&open).is_empty());
    assert!(controller.state().modal().is_some());
}

#[test]
fn custom_quiet_periods_are_respected() {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock).with_debounce(Debounce {
        trailing: ms(40),
        leading: ms(10),
    });

    controller.submit_trailing(filter("par"));
    assert_eq!(controller.next_deadline(), Some(clock.now() + ms(40)));
    clock.advance(ms(40));
    controller.poll();
    assert_eq!(controller.state().search_term(), "par");

    let select_all = Action::SelectAll;
    assert!(!controller.submit_leading(&select_all).is_empty());
    clock.advance(ms(10));
    assert!(!controller.submit_on(Channel::Leading, Action::DeselectAll).is_empty());
}

#[test]
fn unsupported_actions_are_ignored_on_every_channel() -> Result<()> {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock);
    let before = controller.snapshot();
    let action: Action = serde_json::from_str(r#"{"type":"launchRocket"}"#)?;

    for channel in Channel::ALL {
        controller.submit_on(channel, action.clone());
        clock.advance(ms(300));
        controller.poll();
    }
    assert_eq!(controller.snapshot(), before);
    Ok(())
}

#[test]
fn actions_outside_the_page_families_are_ignored() {
    let clock = ManualClock::new();
    let mut controller = invoice(&clock);
    let before = controller.snapshot();
    assert!(controller.submit(&Action::HideStockOut).is_empty());
    assert!(controller.submit(&Action::ToggleTransactionType).is_empty());
    assert_eq!(controller.snapshot(), before);
}
