// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod action;
mod cells;
pub mod columns;
pub mod compose;
pub mod ids;
pub mod model;
pub mod page;
mod rows;
pub mod state;
pub mod store;
mod table;

pub use action::{Action, ActionKind, PageEvent, PageField};
pub use columns::{build_columns, resolve_columns, resolve_columns_named};
pub use compose::{ActionSet, PageConfig, PageReducer, compose, compose_named, default_seed};
pub use ids::{RecordId, RowKey};
pub use model::{
    Align, ColumnDescriptor, ColumnKind, FieldValue, Indicator, ModalKey, PageId, Record,
    TransactionType,
};
pub use page::format_item_names;
pub use state::{
    FocusSnapshot, KeyExtractor, Modal, ModalValue, PageSeed, PageViewState, RowState,
    ViewSnapshot, record_key,
};
pub use store::{
    BackingCollection, MemoryCollection, MemoryStore, Predicate, RecordStore, sort_records,
};
