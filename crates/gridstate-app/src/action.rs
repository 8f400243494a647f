// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::RowKey;
use crate::model::{ModalKey, Record, TransactionType};

/// Everything a page can be asked to do. Decodes from
/// `{"type": "sortData", "payload": {"sortBy": "itemCode"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    RefreshRow {
        row_key: RowKey,
    },
    FocusCell {
        row_key: RowKey,
        column_key: String,
    },
    FocusNextCell {
        row_key: RowKey,
        column_key: String,
    },
    ClearFocus,
    SelectRow {
        row_key: RowKey,
    },
    DeselectRow {
        row_key: RowKey,
    },
    SelectAll,
    DeselectAll,
    SelectRows {
        items: Vec<Record>,
    },
    ToggleSelectAll,
    SelectOneRow {
        row_key: RowKey,
    },
    DeselectOneRow,
    DeleteRecords,
    SortData {
        sort_by: String,
    },
    FilterData {
        search_term: String,
    },
    RefreshData,
    HideOverStocked,
    HideStockOut,
    ShowAll,
    ToggleShowFinalised,
    ToggleIndicators,
    SelectIndicator {
        indicator_code: String,
    },
    AddRecord {
        record: Record,
    },
    OpenModal {
        modal_key: ModalKey,
        #[serde(default)]
        row_key: Option<RowKey>,
    },
    CloseModal,
    EditName {
        value: String,
    },
    OpenDatePicker,
    CloseDatePicker,
    UpdatePaymentType {
        payment_type: String,
    },
    ToggleTransactionType,
    #[serde(other)]
    Unsupported,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::RefreshRow { .. } => ActionKind::RefreshRow,
            Self::FocusCell { .. } => ActionKind::FocusCell,
            Self::FocusNextCell { .. } => ActionKind::FocusNextCell,
            Self::ClearFocus => ActionKind::ClearFocus,
            Self::SelectRow { .. } => ActionKind::SelectRow,
            Self::DeselectRow { .. } => ActionKind::DeselectRow,
            Self::SelectAll => ActionKind::SelectAll,
            Self::DeselectAll => ActionKind::DeselectAll,
            Self::SelectRows { .. } => ActionKind::SelectRows,
            Self::ToggleSelectAll => ActionKind::ToggleSelectAll,
            Self::SelectOneRow { .. } => ActionKind::SelectOneRow,
            Self::DeselectOneRow => ActionKind::DeselectOneRow,
            Self::DeleteRecords => ActionKind::DeleteRecords,
            Self::SortData { .. } => ActionKind::SortData,
            Self::FilterData { .. } => ActionKind::FilterData,
            Self::RefreshData => ActionKind::RefreshData,
            Self::HideOverStocked => ActionKind::HideOverStocked,
            Self::HideStockOut => ActionKind::HideStockOut,
            Self::ShowAll => ActionKind::ShowAll,
            Self::ToggleShowFinalised => ActionKind::ToggleShowFinalised,
            Self::ToggleIndicators => ActionKind::ToggleIndicators,
            Self::SelectIndicator { .. } => ActionKind::SelectIndicator,
            Self::AddRecord { .. } => ActionKind::AddRecord,
            Self::OpenModal { modal_key, .. } if modal_key.requires_reasons() => {
                ActionKind::OpenReasonModal
            }
            Self::OpenModal { .. } => ActionKind::OpenModal,
            Self::CloseModal => ActionKind::CloseModal,
            Self::EditName { .. } => ActionKind::EditName,
            Self::OpenDatePicker => ActionKind::OpenDatePicker,
            Self::CloseDatePicker => ActionKind::CloseDatePicker,
            Self::UpdatePaymentType { .. } => ActionKind::UpdatePaymentType,
            Self::ToggleTransactionType => ActionKind::ToggleTransactionType,
            Self::Unsupported => ActionKind::Unsupported,
        }
    }
}

/// Payload-free action discriminant, used to describe what a page accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    RefreshRow,
    FocusCell,
    FocusNextCell,
    ClearFocus,
    SelectRow,
    DeselectRow,
    SelectAll,
    DeselectAll,
    SelectRows,
    ToggleSelectAll,
    SelectOneRow,
    DeselectOneRow,
    DeleteRecords,
    SortData,
    FilterData,
    RefreshData,
    HideOverStocked,
    HideStockOut,
    ShowAll,
    ToggleShowFinalised,
    ToggleIndicators,
    SelectIndicator,
    AddRecord,
    OpenModal,
    OpenReasonModal,
    CloseModal,
    EditName,
    OpenDatePicker,
    CloseDatePicker,
    UpdatePaymentType,
    ToggleTransactionType,
    Unsupported,
}

impl ActionKind {
    pub const ALL: [Self; 32] = [
        Self::RefreshRow,
        Self::FocusCell,
        Self::FocusNextCell,
        Self::ClearFocus,
        Self::SelectRow,
        Self::DeselectRow,
        Self::SelectAll,
        Self::DeselectAll,
        Self::SelectRows,
        Self::ToggleSelectAll,
        Self::SelectOneRow,
        Self::DeselectOneRow,
        Self::DeleteRecords,
        Self::SortData,
        Self::FilterData,
        Self::RefreshData,
        Self::HideOverStocked,
        Self::HideStockOut,
        Self::ShowAll,
        Self::ToggleShowFinalised,
        Self::ToggleIndicators,
        Self::SelectIndicator,
        Self::AddRecord,
        Self::OpenModal,
        Self::OpenReasonModal,
        Self::CloseModal,
        Self::EditName,
        Self::OpenDatePicker,
        Self::CloseDatePicker,
        Self::UpdatePaymentType,
        Self::ToggleTransactionType,
        Self::Unsupported,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RefreshRow => "refreshRow",
            Self::FocusCell => "focusCell",
            Self::FocusNextCell => "focusNextCell",
            Self::ClearFocus => "clearFocus",
            Self::SelectRow => "selectRow",
            Self::DeselectRow => "deselectRow",
            Self::SelectAll => "selectAll",
            Self::DeselectAll => "deselectAll",
            Self::SelectRows => "selectRows",
            Self::ToggleSelectAll => "toggleSelectAll",
            Self::SelectOneRow => "selectOneRow",
            Self::DeselectOneRow => "deselectOneRow",
            Self::DeleteRecords => "deleteRecords",
            Self::SortData => "sortData",
            Self::FilterData => "filterData",
            Self::RefreshData => "refreshData",
            Self::HideOverStocked => "hideOverStocked",
            Self::HideStockOut => "hideStockOut",
            Self::ShowAll => "showAll",
            Self::ToggleShowFinalised => "toggleShowFinalised",
            Self::ToggleIndicators => "toggleIndicators",
            Self::SelectIndicator => "selectIndicator",
            Self::AddRecord => "addRecord",
            Self::OpenModal => "openModal",
            Self::OpenReasonModal => "openReasonModal",
            Self::CloseModal => "closeModal",
            Self::EditName => "editName",
            Self::OpenDatePicker => "openDatePicker",
            Self::CloseDatePicker => "closeDatePicker",
            Self::UpdatePaymentType => "updatePaymentType",
            Self::ToggleTransactionType => "toggleTransactionType",
            Self::Unsupported => "unsupported",
        }
    }

    /// Resolve a wire `type` string. Reason modals arrive as `openModal`, so
    /// `openReasonModal` is never accepted from the wire.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|kind| !matches!(kind, Self::OpenReasonModal | Self::Unsupported))
            .find(|kind| kind.as_str() == value)
    }
}

/// What a dispatch changed. An ignored action yields no events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PageEvent {
    DataChanged {
        rows: usize,
    },
    SortChanged {
        sort_by: Option<String>,
        is_ascending: bool,
    },
    SearchChanged {
        search_term: String,
    },
    SelectionChanged {
        has_selection: bool,
        all_selected: bool,
    },
    FocusChanged {
        row_key: Option<RowKey>,
        column_key: Option<String>,
    },
    RowRefreshed {
        row_key: RowKey,
    },
    ModalChanged {
        modal_key: Option<ModalKey>,
    },
    PageFieldChanged {
        field: PageField,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", content = "value", rename_all = "camelCase")]
pub enum PageField {
    Name(String),
    DatePicker(bool),
    PaymentType(String),
    TransactionType(TransactionType),
    ShowAll(bool),
    ShowFinalised(bool),
    ShowIndicators(bool),
    CurrentIndicator(Option<String>),
}

#[cfg(test)]
mod tests {
    use super::{Action, ActionKind};
    use crate::ids::RowKey;
    use crate::model::ModalKey;

    #[test]
    fn decodes_payload_fields_in_camel_case() -> anyhow::Result<()> {
        let action: Action =
            serde_json::from_str(r#"{"type":"sortData","payload":{"sortBy":"itemCode"}}"#)?;
        assert_eq!(
            action,
            Action::SortData {
                sort_by: "itemCode".to_owned()
            }
        );
        Ok(())
    }

    #[test]
    fn unit_actions_need_no_payload() -> anyhow::Result<()> {
        let action: Action = serde_json::from_str(r#"{"type":"clearFocus"}"#)?;
        assert_eq!(action, Action::ClearFocus);
        Ok(())
    }

    #[test]
    fn open_modal_row_key_is_optional() -> anyhow::Result<()> {
        let bare: Action =
            serde_json::from_str(r#"{"type":"openModal","payload":{"modalKey":"addItem"}}"#)?;
        assert_eq!(
            bare,
            Action::OpenModal {
                modal_key: ModalKey::AddItem,
                row_key: None
            }
        );

        let with_row: Action = serde_json::from_str(
            r#"{"type":"openModal","payload":{"modalKey":"stocktakeReason","rowKey":"12"}}"#,
        )?;
        assert_eq!(with_row.kind(), ActionKind::OpenReasonModal);
        assert_eq!(
            with_row,
            Action::OpenModal {
                modal_key: ModalKey::StocktakeReason,
                row_key: Some(RowKey::from("12"))
            }
        );
        Ok(())
    }

    #[test]
    fn select_indicator_reads_the_indicator_code() -> anyhow::Result<()> {
        let action: Action = serde_json::from_str(
            r#"{"type":"selectIndicator","payload":{"indicatorCode":"ART"}}"#,
        )?;
        assert_eq!(
            action,
            Action::SelectIndicator {
                indicator_code: "ART".to_owned()
            }
        );
        assert_eq!(action.kind(), ActionKind::SelectIndicator);
        Ok(())
    }

    #[test]
    fn unknown_types_decode_as_unsupported() -> anyhow::Result<()> {
        let action: Action = serde_json::from_str(r#"{"type":"launchRocket"}"#)?;
        assert_eq!(action, Action::Unsupported);
        Ok(())
    }

    #[test]
    fn kinds_round_trip_through_wire_names() {
        for kind in ActionKind::ALL {
            match kind {
                ActionKind::OpenReasonModal | ActionKind::Unsupported => {
                    assert_eq!(ActionKind::parse(kind.as_str()), None);
                }
                _ => assert_eq!(ActionKind::parse(kind.as_str()), Some(kind)),
            }
        }
    }
}
