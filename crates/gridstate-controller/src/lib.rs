// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Page controller: owns one mounted page and feeds actions to its reducer
//! through three channels.
//!
//! - immediate: applied on submission.
//! - trailing: one pending slot. Each submission replaces the pending action
//!   and restarts the quiet period; the last one is applied once the period
//!   passes without another submission.
//! - leading: the first submission of a burst is applied, the rest are
//!   dropped. Every submission, applied or dropped, restarts the quiet
//!   period.
//!
//! Time is read from an injected [`Clock`]. Nothing runs in the background:
//! due trailing actions are applied by [`PageController::poll`], which every
//! submission calls first.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use gridstate_app::{
    Action, BackingCollection, PageConfig, PageEvent, PageId, PageViewState, Record, RecordStore,
    ViewSnapshot,
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    #[default]
    Immediate,
    Trailing,
    Leading,
}

impl Channel {
    pub const ALL: [Self; 3] = [Self::Immediate, Self::Trailing, Self::Leading];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Trailing => "trailing",
            Self::Leading => "leading",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.as_str() == value)
    }
}

/// Quiet periods for the two coalescing channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    pub trailing: Duration,
    pub leading: Duration,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            trailing: DEFAULT_DEBOUNCE,
            leading: DEFAULT_DEBOUNCE,
        }
    }
}

struct Pending {
    action: Action,
    due: Instant,
}

pub struct PageController<C: Clock = SystemClock> {
    config: PageConfig,
    state: PageViewState,
    clock: C,
    debounce: Debounce,
    pending: Option<Pending>,
    leading_quiet_until: Option<Instant>,
}

impl PageController<SystemClock> {
    pub fn mount(
        page: PageId,
        backing: Rc<dyn BackingCollection>,
        store: Rc<dyn RecordStore>,
        page_object: Option<Record>,
    ) -> Self {
        Self::mount_with_clock(page, backing, store, page_object, SystemClock)
    }
}

impl<C: Clock> PageController<C> {
    /// Resolve the page configuration from one read of the store's flag and
    /// build the initial view-state.
    pub fn mount_with_clock(
        page: PageId,
        backing: Rc<dyn BackingCollection>,
        store: Rc<dyn RecordStore>,
        page_object: Option<Record>,
        clock: C,
    ) -> Self {
        let config = PageConfig::resolve(page, store.as_ref());
        let state = config.mount(backing, store, page_object);
        tracing::debug!(
            page = page.as_str(),
            reasons = config.reasons_enabled,
            rows = state.data().len(),
            "mounted page"
        );
        Self {
            config,
            state,
            clock,
            debounce: Debounce::default(),
            pending: None,
            leading_quiet_until: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Debounce) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn state(&self) -> &PageViewState {
        &self.state
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state.snapshot()
    }

    pub fn debounce(&self) -> Debounce {
        self.debounce
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending trailing action becomes due, if there is one.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    pub fn submit_on(&mut self, channel: Channel, action: Action) -> Vec<PageEvent> {
        match channel {
            Channel::Immediate => self.submit(&action),
            Channel::Trailing => self.submit_trailing(action),
            Channel::Leading => self.submit_leading(&action),
        }
    }

    pub fn submit(&mut self, action: &Action) -> Vec<PageEvent> {
        let mut events = self.poll();
        events.extend(self.apply(action));
        events
    }

    /// Schedule `action` for the end of the quiet period, replacing any
    /// action already waiting.
    pub fn submit_trailing(&mut self, action: Action) -> Vec<PageEvent> {
        let events = self.poll();
        let due = self.clock.now() + self.debounce.trailing;
        if let Some(replaced) = self.pending.replace(Pending { action, due }) {
            tracing::trace!(
                page = self.page_name(),
                replaced = replaced.action.kind().as_str(),
                "trailing action superseded"
            );
        }
        events
    }

    /// Apply `action` unless another leading submission landed within the
    /// quiet period.
    pub fn submit_leading(&mut self, action: &Action) -> Vec<PageEvent> {
        let mut events = self.poll();
        let now = self.clock.now();
        let quiet = self
            .leading_quiet_until
            .is_none_or(|until| now >= until);
        self.leading_quiet_until = Some(now + self.debounce.leading);
        if quiet {
            events.extend(self.apply(action));
        } else {
            tracing::trace!(
                page = self.page_name(),
                action = action.kind().as_str(),
                "leading action dropped"
            );
        }
        events
    }

    /// Apply the pending trailing action if its quiet period has passed.
    pub fn poll(&mut self) -> Vec<PageEvent> {
        let now = self.clock.now();
        if let Some(pending) = self.pending.take_if(|pending| pending.due <= now) {
            tracing::trace!(
                page = self.page_name(),
                action = pending.action.kind().as_str(),
                "trailing action due"
            );
            return self.apply(&pending.action);
        }
        Vec::new()
    }

    /// Apply the pending trailing action now, without waiting.
    pub fn flush(&mut self) -> Vec<PageEvent> {
        match self.pending.take() {
            Some(pending) => self.apply(&pending.action),
            None => Vec::new(),
        }
    }

    pub fn cancel_pending(&mut self) -> Option<Action> {
        self.pending.take().map(|pending| pending.action)
    }

    fn apply(&mut self, action: &Action) -> Vec<PageEvent> {
        self.config.reducer.dispatch(&mut self.state, action)
    }

    fn page_name(&self) -> &'static str {
        self.config.page.as_str()
    }
}
