// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{Align, ColumnDescriptor, ColumnKind, PageId};

const fn def(
    key: &'static str,
    title: &'static str,
    sortable: bool,
    align: Align,
    kind: ColumnKind,
) -> ColumnDescriptor {
    ColumnDescriptor {
        key,
        title,
        width: 0.0,
        sortable,
        align,
        kind,
    }
}

/// Named column definitions. Several names can share one record field.
fn definition(name: &str) -> Option<ColumnDescriptor> {
    use Align::{Center, Left, Right};
    use ColumnKind::*;

    let column = match name {
        "invoiceNumber" => def("serialNumber", "Invoice number", true, Left, Text),
        "requisitionNumber" => def("serialNumber", "Requisition number", true, Left, Text),
        "itemCode" => def("itemCode", "Item code", true, Left, Text),
        "code" => def("code", "Code", true, Left, Text),
        "itemName" => def("itemName", "Item name", true, Left, Text),
        "name" => def("name", "Name", true, Left, Text),
        "firstName" => def("firstName", "First name", true, Left, Text),
        "lastName" => def("lastName", "Last name", true, Left, Text),
        "registrationCode" => def("registrationCode", "Registration", true, Left, Text),
        "supplier" => def("otherPartyName", "Supplier", true, Left, Text),
        "customer" => def("otherPartyName", "Customer", true, Left, Text),
        "comment" => def("comment", "Comment", false, Left, Text),
        "unit" => def("unit", "Unit", false, Center, Text),
        "status" => def("status", "Status", true, Left, Text),
        "question" => def("name", "Question", false, Left, Text),

        "batchName" => def("batch", "Batch", false, Center, EditableText),
        "editableComment" => def("comment", "Comment", false, Right, EditableText),
        "editableValue" => def("value", "Value", false, Right, EditableText),

        "availableQuantity" => def("availableQuantity", "Available stock", true, Right, Numeric),
        "numberOfItems" => def("numberOfItems", "Items", true, Right, Numeric),
        "ourStockOnHand" => def("ourStockOnHand", "Current stock", true, Right, Numeric),
        "theirStockOnHand" => def("stockOnHand", "Their stock", true, Right, Numeric),
        "suggestedQuantity" => {
            def("suggestedQuantity", "Suggested quantity", true, Right, Numeric)
        }
        "requiredQuantity" => def("requiredQuantity", "Required quantity", true, Right, Numeric),
        "difference" => def("difference", "Difference", true, Right, Numeric),
        "snapshotTotalQuantity" => {
            def("snapshotTotalQuantity", "Snapshot quantity", true, Right, Numeric)
        }
        "price" => def("price", "Price", true, Center, Numeric),
        "monthlyUsage" => def("monthlyUsage", "Monthly usage", true, Right, Numeric),
        "total" => def("total", "Total", true, Right, Numeric),

        "editableRequiredQuantity" => def(
            "requiredQuantity",
            "Required quantity",
            true,
            Right,
            EditableNumeric,
        ),
        "countedTotalQuantity" => def(
            "countedTotalQuantity",
            "Actual quantity",
            true,
            Right,
            EditableNumeric,
        ),
        "totalQuantity" => def("totalQuantity", "Quantity", true, Right, EditableNumeric),
        "suppliedQuantity" => {
            def("suppliedQuantity", "Supply quantity", true, Right, EditableNumeric)
        }

        "createdDate" => def("createdDate", "Created", true, Left, Date),
        "entryDate" => def("entryDate", "Entered", true, Left, Date),
        "dateOfBirth" => def("dateOfBirth", "Date of birth", true, Left, Date),
        "expiryDate" => def("expiryDate", "Batch expiry", false, Center, EditableDate),

        "remove" => def("remove", "Remove", false, Center, Checkable),
        "selected" => def("selected", "Selected", false, Center, Checkable),
        "batches" => def("batch", "Batches", false, Center, Icon),
        "reason" => def("reasonTitle", "Reason", false, Center, Dropdown),
        _ => return None,
    };
    Some(column)
}

type Layout = (&'static [&'static str], &'static [f32]);

fn layout(page: PageId, reasons_enabled: bool) -> Layout {
    match page {
        PageId::CustomerInvoice => (
            &["itemCode", "itemName", "availableQuantity", "totalQuantity", "remove"],
            &[2.0, 4.0, 2.0, 2.0, 1.0],
        ),
        PageId::SupplierInvoice => (
            &["itemCode", "itemName", "totalQuantity", "expiryDate", "remove"],
            &[2.0, 4.0, 2.0, 2.0, 1.0],
        ),
        PageId::CustomerInvoices => (
            &["invoiceNumber", "customer", "status", "entryDate", "comment", "remove"],
            &[1.5, 2.5, 2.0, 1.5, 3.0, 1.0],
        ),
        PageId::SupplierInvoices => (
            &["invoiceNumber", "supplier", "status", "entryDate", "comment", "remove"],
            &[1.5, 2.5, 2.0, 1.5, 3.0, 1.0],
        ),
        PageId::SupplierRequisitions => (
            &[
                "requisitionNumber",
                "supplier",
                "numberOfItems",
                "entryDate",
                "status",
                "remove",
            ],
            &[1.5, 2.0, 1.0, 1.0, 1.0, 1.0],
        ),
        PageId::SupplierRequisition => (
            &[
                "itemCode",
                "itemName",
                "ourStockOnHand",
                "monthlyUsage",
                "suggestedQuantity",
                "editableRequiredQuantity",
                "remove",
            ],
            &[1.4, 3.5, 2.0, 1.5, 2.0, 2.0, 1.0],
        ),
        PageId::CustomerRequisitions => (
            &[
                "requisitionNumber",
                "customer",
                "numberOfItems",
                "entryDate",
                "status",
            ],
            &[1.5, 2.0, 1.0, 1.0, 1.0],
        ),
        PageId::CustomerRequisition => (
            &[
                "itemCode",
                "itemName",
                "ourStockOnHand",
                "theirStockOnHand",
                "monthlyUsage",
                "suggestedQuantity",
                "requiredQuantity",
                "suppliedQuantity",
            ],
            &[2.0, 4.0, 1.5, 1.5, 2.0, 2.0, 2.0, 2.0],
        ),
        PageId::Stocktakes => (
            &["name", "createdDate", "status", "remove"],
            &[6.0, 2.0, 2.0, 1.0],
        ),
        PageId::StocktakeManager => (&["code", "name", "selected"], &[2.0, 6.0, 1.0]),
        PageId::StocktakeEditor if reasons_enabled => (
            &[
                "itemCode",
                "itemName",
                "snapshotTotalQuantity",
                "countedTotalQuantity",
                "difference",
                "reason",
                "batches",
            ],
            &[1.0, 2.8, 1.2, 1.2, 1.0, 1.0, 0.8],
        ),
        PageId::StocktakeEditor => (
            &[
                "itemCode",
                "itemName",
                "snapshotTotalQuantity",
                "countedTotalQuantity",
                "difference",
                "batches",
            ],
            &[1.0, 2.8, 1.2, 1.2, 1.0, 0.8],
        ),
        PageId::StocktakeBatchEditModal if reasons_enabled => (
            &[
                "batchName",
                "expiryDate",
                "snapshotTotalQuantity",
                "countedTotalQuantity",
                "difference",
                "reason",
            ],
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        ),
        PageId::StocktakeBatchEditModal => (
            &[
                "batchName",
                "expiryDate",
                "snapshotTotalQuantity",
                "countedTotalQuantity",
                "difference",
            ],
            &[1.0, 1.0, 1.0, 1.0, 1.0],
        ),
        PageId::RegimenDataModal => (
            &["question", "editableValue", "editableComment"],
            &[4.0, 1.0, 5.0],
        ),
        PageId::Stock => (&["code", "name", "availableQuantity"], &[1.0, 4.0, 1.5]),
        PageId::CashRegister => (
            &["invoiceNumber", "customer", "total", "entryDate", "comment"],
            &[1.5, 2.5, 1.5, 2.0, 3.0],
        ),
        PageId::PatientSelect => (
            &["code", "firstName", "lastName", "dateOfBirth"],
            &[1.0, 2.0, 2.0, 1.5],
        ),
        PageId::PrescriberSelect => (
            &["firstName", "lastName", "registrationCode"],
            &[2.0, 2.0, 1.5],
        ),
    }
}

/// Pair column names with widths. A length mismatch or an unknown name
/// yields no columns at all.
pub fn build_columns(page: &str, names: &[&str], widths: &[f32]) -> Vec<ColumnDescriptor> {
    if names.len() != widths.len() {
        tracing::warn!(
            page,
            columns = names.len(),
            widths = widths.len(),
            "column and width lists disagree"
        );
        return Vec::new();
    }

    let mut columns = Vec::with_capacity(names.len());
    for (name, width) in names.iter().zip(widths) {
        let Some(mut column) = definition(name) else {
            tracing::warn!(page, column = *name, "unknown column definition");
            return Vec::new();
        };
        column.width = *width;
        columns.push(column);
    }
    columns
}

pub fn resolve_columns(page: PageId, reasons_enabled: bool) -> Vec<ColumnDescriptor> {
    let (names, widths) = layout(page, reasons_enabled);
    build_columns(page.as_str(), names, widths)
}

/// Resolve by wire name. Unknown pages have no columns.
pub fn resolve_columns_named(page: &str, reasons_enabled: bool) -> Vec<ColumnDescriptor> {
    PageId::parse(page)
        .map(|page| resolve_columns(page, reasons_enabled))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{build_columns, resolve_columns, resolve_columns_named};
    use crate::model::{ColumnKind, PageId};

    fn keys(page: PageId, reasons: bool) -> Vec<&'static str> {
        resolve_columns(page, reasons)
            .into_iter()
            .map(|column| column.key)
            .collect()
    }

    #[test]
    fn every_page_resolves_columns() {
        for page in PageId::ALL {
            assert!(!resolve_columns(page, false).is_empty(), "{}", page.as_str());
            assert!(!resolve_columns(page, true).is_empty(), "{}", page.as_str());
        }
    }

    #[test]
    fn customer_invoice_columns_in_order_with_widths() {
        let columns = resolve_columns(PageId::CustomerInvoice, false);
        let shape: Vec<(&str, f32)> = columns
            .iter()
            .map(|column| (column.key, column.width))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("itemCode", 2.0),
                ("itemName", 4.0),
                ("availableQuantity", 2.0),
                ("totalQuantity", 2.0),
                ("remove", 1.0),
            ]
        );
        assert_eq!(columns[3].kind, ColumnKind::EditableNumeric);
    }

    #[test]
    fn stocktake_editor_gains_reason_column_when_reasons_exist() {
        assert!(!keys(PageId::StocktakeEditor, false).contains(&"reasonTitle"));
        assert!(keys(PageId::StocktakeEditor, true).contains(&"reasonTitle"));
        assert!(keys(PageId::StocktakeBatchEditModal, true).contains(&"reasonTitle"));
        assert_eq!(
            keys(PageId::CustomerInvoice, true),
            keys(PageId::CustomerInvoice, false)
        );
    }

    #[test]
    fn mismatched_widths_yield_no_columns() {
        assert!(build_columns("broken", &["itemCode", "itemName"], &[1.0]).is_empty());
        assert!(build_columns("broken", &["itemCode", "nope"], &[1.0, 1.0]).is_empty());
    }

    #[test]
    fn unknown_page_names_have_no_columns() {
        assert!(resolve_columns_named("dashboard", false).is_empty());
        assert_eq!(resolve_columns_named("stocktakes", false).len(), 4);
    }
}
