// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use gridstate_app::{
    BackingCollection, FieldValue, Indicator, PageId, Predicate, Record, RecordId, RecordStore,
};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub const APP_NAME: &str = "gridstate";
pub const REASON_KIND: &str = "reason";
pub const MASTER_LIST_KIND: &str = "masterList";
pub const INDICATOR_KIND: &str = "indicator";
pub const INDICATOR_ATTRIBUTE_KIND: &str = "indicatorAttribute";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "records",
        &[
            "id",
            "kind",
            "parent_id",
            "created_at",
            "updated_at",
            "deleted_at",
        ],
    ),
    (
        "record_fields",
        &["record_id", "key", "kind", "value", "number_value"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[
    RequiredIndex {
        name: "idx_records_kind_parent",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_records_kind_parent ON records (kind, parent_id, deleted_at)",
    },
    RequiredIndex {
        name: "idx_record_fields_key",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_record_fields_key ON record_fields (key, record_id)",
    },
];

/// Which stored records back a page. Scoped pages list the children of one
/// parent record, which is also the page object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSource {
    pub kind: &'static str,
    pub scoped: bool,
}

pub fn page_source(page: PageId) -> PageSource {
    let (kind, scoped) = match page {
        PageId::CustomerInvoice => ("transactionItem", true),
        PageId::SupplierInvoice => ("transactionBatch", true),
        PageId::CustomerInvoices => ("customerInvoice", false),
        PageId::SupplierInvoices => ("supplierInvoice", false),
        PageId::SupplierRequisitions => ("requestRequisition", false),
        PageId::CustomerRequisitions => ("responseRequisition", false),
        PageId::SupplierRequisition | PageId::CustomerRequisition => ("requisitionItem", true),
        PageId::Stocktakes => ("stocktake", false),
        PageId::StocktakeManager | PageId::Stock => ("item", false),
        PageId::StocktakeEditor => ("stocktakeItem", true),
        PageId::StocktakeBatchEditModal => ("stocktakeBatch", true),
        PageId::RegimenDataModal => ("regimenColumn", true),
        PageId::CashRegister => ("cashTransaction", false),
        PageId::PatientSelect => ("patient", false),
        PageId::PrescriberSelect => ("prescriber", false),
    };
    PageSource { kind, scoped }
}

/// Live records of one kind, optionally restricted to one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: String,
    pub parent: Option<RecordId>,
}

impl Scope {
    pub fn new(kind: &str, parent: Option<RecordId>) -> Self {
        Self {
            kind: kind.to_owned(),
            parent,
        }
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        ensure_required_indexes(&self.conn)
    }

    /// Insert a record under `kind`. A positive `record.id` is kept, otherwise
    /// sqlite assigns one.
    pub fn insert_record(
        &self,
        kind: &str,
        parent: Option<RecordId>,
        record: &Record,
    ) -> Result<RecordId> {
        let now = now_rfc3339()?;
        let explicit_id = (record.id.get() > 0).then_some(record.id.get());
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin record insert")?;
        tx.execute(
            "INSERT INTO records (id, kind, parent_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![explicit_id, kind, parent.map(RecordId::get), now, now],
        )
        .with_context(|| format!("insert {kind} record"))?;
        let id = RecordId::new(tx.last_insert_rowid());
        for (key, value) in &record.fields {
            write_field(&tx, id, key, value)?;
        }
        tx.commit()
            .with_context(|| format!("commit {kind} record {id}"))?;
        Ok(id)
    }

    pub fn insert_records(
        &self,
        kind: &str,
        parent: Option<RecordId>,
        records: &[Record],
    ) -> Result<Vec<RecordId>> {
        records
            .iter()
            .map(|record| self.insert_record(kind, parent, record))
            .collect()
    }

    /// Set one field on a live record. Writing `Null` removes the field.
    pub fn update_field(&self, id: RecordId, key: &str, value: &FieldValue) -> Result<()> {
        let now = now_rfc3339()?;
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin field update")?;
        let rows_affected = tx
            .execute(
                "UPDATE records SET updated_at = ? WHERE id = ? AND deleted_at IS NULL",
                params![now, id.get()],
            )
            .with_context(|| format!("touch record {id}"))?;
        if rows_affected == 0 {
            bail!("record {id} not found or deleted");
        }
        write_field(&tx, id, key, value)?;
        tx.commit()
            .with_context(|| format!("commit update of record {id}"))
    }

    pub fn soft_delete(&self, id: RecordId) -> Result<()> {
        let now = now_rfc3339()?;
        let rows_affected = self
            .conn
            .execute(
                "UPDATE records SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
                params![now, now, id.get()],
            )
            .with_context(|| format!("soft delete record {id}"))?;
        if rows_affected == 0 {
            bail!("record {id} not found or already deleted");
        }
        Ok(())
    }

    pub fn restore(&self, id: RecordId) -> Result<()> {
        let now = now_rfc3339()?;
        let rows_affected = self
            .conn
            .execute(
                "UPDATE records SET deleted_at = NULL, updated_at = ? WHERE id = ? AND deleted_at IS NOT NULL",
                params![now, id.get()],
            )
            .with_context(|| format!("restore record {id}"))?;
        if rows_affected == 0 {
            bail!("record {id} not found or not deleted");
        }
        Ok(())
    }

    /// A live record of any kind.
    pub fn get_record(&self, id: RecordId) -> Result<Option<Record>> {
        let live: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM records WHERE id = ? AND deleted_at IS NULL",
                params![id.get()],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("look up record {id}"))?;
        match live {
            Some(_) => Ok(Some(Record {
                id,
                fields: self.load_fields(id)?,
            })),
            None => Ok(None),
        }
    }

    pub fn list_records(&self, scope: &Scope) -> Result<Vec<Record>> {
        self.query_records(scope, None, None)
    }

    pub fn count_records(&self, scope: &Scope) -> Result<usize> {
        let mut params = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM records r WHERE {}",
            scope_sql(scope, &mut params)
        );
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .with_context(|| format!("count {} records", scope.kind))?;
        usize::try_from(count).with_context(|| format!("invalid record count {count}"))
    }

    pub fn is_live(&self, scope: &Scope, id: RecordId) -> Result<bool> {
        let mut params = Vec::new();
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM records r WHERE {} AND r.id = ?)",
            scope_sql(scope, &mut params)
        );
        params.push(Value::Integer(id.get()));
        let exists: i64 = self
            .conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
            .with_context(|| format!("check record {id}"))?;
        Ok(exists == 1)
    }

    /// Records in scope, optionally filtered, ordered by a field or by id.
    /// Sorting is stable: equal values keep id order in both directions.
    pub fn query_records(
        &self,
        scope: &Scope,
        predicate: Option<&Predicate>,
        order: Option<(&str, bool)>,
    ) -> Result<Vec<Record>> {
        let mut params = Vec::new();
        let mut sql = String::from("SELECT r.id FROM records r");
        if let Some((key, _)) = order {
            sql.push_str(" LEFT JOIN record_fields s ON s.record_id = r.id AND s.key = ?");
            params.push(Value::Text(key.to_owned()));
        }
        sql.push_str(" WHERE ");
        sql.push_str(&scope_sql(scope, &mut params));
        if let Some(predicate) = predicate {
            sql.push_str(" AND ");
            sql.push_str(&predicate_sql(predicate, &mut params));
        }
        sql.push_str(match order {
            Some((_, true)) => {
                " ORDER BY s.number_value ASC, s.value COLLATE NOCASE ASC, r.id ASC"
            }
            Some((_, false)) => {
                " ORDER BY s.number_value DESC, s.value COLLATE NOCASE DESC, r.id ASC"
            }
            None => " ORDER BY r.id ASC",
        });

        let ids = {
            let mut stmt = self
                .conn
                .prepare(&sql)
                .with_context(|| format!("prepare {} query", scope.kind))?;
            let rows = stmt
                .query_map(params_from_iter(params.iter()), |row| row.get::<_, i64>(0))
                .with_context(|| format!("query {} records", scope.kind))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .with_context(|| format!("collect {} records", scope.kind))?
        };

        ids.into_iter()
            .map(|raw| {
                let id = RecordId::new(raw);
                Ok(Record {
                    id,
                    fields: self.load_fields(id)?,
                })
            })
            .collect()
    }

    fn load_fields(&self, id: RecordId) -> Result<BTreeMap<String, FieldValue>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT key, kind, value FROM record_fields WHERE record_id = ?")
            .context("prepare field query")?;
        let rows = stmt
            .query_map(params![id.get()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .with_context(|| format!("query fields of record {id}"))?;

        let mut fields = BTreeMap::new();
        for row in rows {
            let (key, kind, raw) = row.with_context(|| format!("read field of record {id}"))?;
            let value = decode_field(&kind, &raw)
                .with_context(|| format!("decode field {key} of record {id}"))?;
            fields.insert(key, value);
        }
        Ok(fields)
    }
}

impl Store {
    /// Indicators stored under a requisition. Each indicator's attributes
    /// are split into rows and columns by their `isRow`/`isColumn` flags.
    pub fn load_indicators(&self, requisition: RecordId) -> Result<Vec<Indicator>> {
        let mut indicators = Vec::new();
        for record in self.list_records(&Scope::new(INDICATOR_KIND, Some(requisition)))? {
            let Some(code) = record.text("code") else {
                bail!("indicator {} has no code", record.id);
            };
            let mut indicator = Indicator::new(code);
            for attribute in
                self.list_records(&Scope::new(INDICATOR_ATTRIBUTE_KIND, Some(record.id)))?
            {
                if attribute.is_true("isRow") {
                    indicator.rows.push(attribute.clone());
                }
                if attribute.is_true("isColumn") {
                    indicator.columns.push(attribute);
                }
            }
            indicators.push(indicator);
        }
        Ok(indicators)
    }
}

impl RecordStore for Store {
    fn reasons_enabled(&self) -> bool {
        match self.count_records(&Scope::new(REASON_KIND, None)) {
            Ok(count) => count > 0,
            Err(error) => {
                tracing::warn!("reading reasons flag failed: {error:#}");
                false
            }
        }
    }

    fn master_lists(&self) -> Vec<Record> {
        self.query_records(
            &Scope::new(MASTER_LIST_KIND, None),
            None,
            Some(("name", true)),
        )
        .unwrap_or_else(|error| {
            tracing::warn!("loading master lists failed: {error:#}");
            Vec::new()
        })
    }

    fn indicators(&self, requisition: RecordId) -> Vec<Indicator> {
        self.load_indicators(requisition).unwrap_or_else(|error| {
            tracing::warn!(%requisition, "loading indicators failed: {error:#}");
            Vec::new()
        })
    }
}

/// Backing collection over one scope of the sqlite store. Query failures
/// are logged and read as empty.
pub struct SqliteCollection {
    store: Rc<Store>,
    scope: Scope,
}

impl SqliteCollection {
    pub fn new(store: Rc<Store>, scope: Scope) -> Self {
        Self { store, scope }
    }

    pub fn for_page(store: Rc<Store>, page: PageId, parent: Option<RecordId>) -> Result<Self> {
        let source = page_source(page);
        if source.scoped && parent.is_none() {
            bail!(
                "page {} lists the contents of one record; pass a scope id",
                page.as_str()
            );
        }
        let parent = if source.scoped { parent } else { None };
        Ok(Self::new(store, Scope::new(source.kind, parent)))
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    fn soft<T>(&self, operation: &str, result: Result<T>, fallback: T) -> T {
        result.unwrap_or_else(|error| {
            tracing::warn!(
                kind = self.scope.kind.as_str(),
                operation,
                "record query failed: {error:#}"
            );
            fallback
        })
    }
}

impl BackingCollection for SqliteCollection {
    fn records(&self) -> Vec<Record> {
        self.soft("records", self.store.list_records(&self.scope), Vec::new())
    }

    fn len(&self) -> usize {
        self.soft("len", self.store.count_records(&self.scope), 0)
    }

    fn filtered(&self, predicate: &Predicate) -> Vec<Record> {
        self.soft(
            "filtered",
            self.store.query_records(&self.scope, Some(predicate), None),
            Vec::new(),
        )
    }

    fn sorted(&self, key: &str, ascending: bool) -> Vec<Record> {
        self.soft(
            "sorted",
            self.store
                .query_records(&self.scope, None, Some((key, ascending))),
            Vec::new(),
        )
    }

    fn is_valid(&self, record: &Record) -> bool {
        self.soft(
            "is_valid",
            self.store.is_live(&self.scope, record.id),
            false,
        )
    }

    fn get(&self, id: RecordId) -> Option<Record> {
        let lookup = self.store.is_live(&self.scope, id).and_then(|live| {
            if live {
                self.store.get_record(id)
            } else {
                Ok(None)
            }
        });
        self.soft("get", lookup, None)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("GRIDSTATE_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set GRIDSTATE_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("gridstate.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn scope_sql(scope: &Scope, params: &mut Vec<Value>) -> String {
    params.push(Value::Text(scope.kind.clone()));
    let mut sql = String::from("r.kind = ? AND r.deleted_at IS NULL");
    if let Some(parent) = scope.parent {
        sql.push_str(" AND r.parent_id = ?");
        params.push(Value::Integer(parent.get()));
    }
    sql
}

fn predicate_sql(predicate: &Predicate, params: &mut Vec<Value>) -> String {
    match predicate {
        Predicate::AnyContains { keys, needle } => {
            if needle.is_empty() {
                return "1".to_owned();
            }
            if keys.is_empty() {
                return "0".to_owned();
            }
            let placeholders = vec!["?"; keys.len()].join(", ");
            params.extend(keys.iter().map(|key| Value::Text(key.clone())));
            params.push(Value::Text(needle.clone()));
            format!(
                "EXISTS (SELECT 1 FROM record_fields f WHERE f.record_id = r.id AND f.key IN ({placeholders}) AND f.kind IN ('text', 'integer') AND instr(lower(f.value), lower(?)) > 0)"
            )
        }
        Predicate::IsTrue(key) => {
            params.push(Value::Text(key.clone()));
            "EXISTS (SELECT 1 FROM record_fields f WHERE f.record_id = r.id AND f.key = ? AND f.kind = 'bool' AND f.value = '1')".to_owned()
        }
        Predicate::Equals(key, value) => equals_sql(key, value, params),
        Predicate::NotEquals(key, value) => format!("NOT {}", equals_sql(key, value, params)),
        Predicate::All(parts) => {
            if parts.is_empty() {
                return "1".to_owned();
            }
            let clauses: Vec<String> = parts
                .iter()
                .map(|part| format!("({})", predicate_sql(part, params)))
                .collect();
            clauses.join(" AND ")
        }
    }
}

fn equals_sql(key: &str, value: &FieldValue, params: &mut Vec<Value>) -> String {
    params.push(Value::Text(key.to_owned()));
    match encode_field(value) {
        None => "NOT EXISTS (SELECT 1 FROM record_fields f WHERE f.record_id = r.id AND f.key = ?)"
            .to_owned(),
        Some((kind, text, _)) => {
            params.push(Value::Text(kind.to_owned()));
            params.push(Value::Text(text));
            "EXISTS (SELECT 1 FROM record_fields f WHERE f.record_id = r.id AND f.key = ? AND f.kind = ? AND f.value = ?)".to_owned()
        }
    }
}

fn write_field(conn: &Connection, id: RecordId, key: &str, value: &FieldValue) -> Result<()> {
    match encode_field(value) {
        None => conn.execute(
            "DELETE FROM record_fields WHERE record_id = ? AND key = ?",
            params![id.get(), key],
        ),
        Some((kind, text, number)) => conn.execute(
            "
            INSERT INTO record_fields (record_id, key, kind, value, number_value)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (record_id, key) DO UPDATE SET
              kind = excluded.kind,
              value = excluded.value,
              number_value = excluded.number_value
            ",
            params![id.get(), key, kind, text, number],
        ),
    }
    .with_context(|| format!("write field {key} of record {id}"))?;
    Ok(())
}

/// Storage form of a field: kind tag, text value, numeric sort value.
fn encode_field(value: &FieldValue) -> Option<(&'static str, String, Option<f64>)> {
    match value {
        FieldValue::Null => None,
        FieldValue::Text(value) => Some(("text", value.clone(), None)),
        FieldValue::Integer(value) => Some(("integer", value.to_string(), Some(*value as f64))),
        FieldValue::Decimal(value) => Some(("decimal", value.to_string(), Some(*value))),
        FieldValue::Bool(value) => Some((
            "bool",
            if *value { "1" } else { "0" }.to_owned(),
            Some(f64::from(u8::from(*value))),
        )),
        FieldValue::Date(value) => Some(("date", format_date(*value), None)),
    }
}

fn decode_field(kind: &str, raw: &str) -> Result<FieldValue> {
    let value = match kind {
        "text" => FieldValue::Text(raw.to_owned()),
        "integer" => FieldValue::Integer(raw.parse().with_context(|| format!("parse {raw:?}"))?),
        "decimal" => FieldValue::Decimal(raw.parse().with_context(|| format!("parse {raw:?}"))?),
        "bool" => FieldValue::Bool(raw == "1"),
        "date" => FieldValue::Date(parse_date(raw)?),
        other => bail!("unknown field kind {other:?}"),
    };
    Ok(value)
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        let columns = table_columns(conn, table)?;
        if columns.is_empty() {
            bail!(
                "database is missing required table `{table}`; use a gridstate database or start from an empty file"
            );
        }

        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}",
                missing.join(", ")
            );
        }
    }
    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

fn format_date(value: Date) -> String {
    value
        .format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "1970-01-01".to_owned())
}

fn parse_date(raw: &str) -> Result<Date> {
    Date::parse(raw, &format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("parse date {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::{decode_field, encode_field, predicate_sql};
    use gridstate_app::{FieldValue, Predicate};
    use time::{Date, Month};

    #[test]
    fn stored_fields_decode_to_the_same_value() -> anyhow::Result<()> {
        let date = Date::from_calendar_date(2026, Month::February, 14)?;
        for value in [
            FieldValue::from("Paracetamol"),
            FieldValue::from(-12_i64),
            FieldValue::from(2.5),
            FieldValue::from(true),
            FieldValue::from(date),
        ] {
            let Some((kind, raw, _)) = encode_field(&value) else {
                anyhow::bail!("{value:?} should be stored");
            };
            assert_eq!(decode_field(kind, &raw)?, value);
        }
        assert!(encode_field(&FieldValue::Null).is_none());
        Ok(())
    }

    #[test]
    fn unknown_field_kinds_are_rejected() {
        assert!(decode_field("blob", "x").is_err());
    }

    #[test]
    fn compound_predicates_bind_params_in_order() {
        let mut params = Vec::new();
        let sql = predicate_sql(
            &Predicate::All(vec![
                Predicate::AnyContains {
                    keys: vec!["itemName".to_owned(), "itemCode".to_owned()],
                    needle: "par".to_owned(),
                },
                Predicate::IsTrue("hasStock".to_owned()),
            ]),
            &mut params,
        );
        assert_eq!(sql.matches('?').count(), params.len());
        assert_eq!(params.len(), 4);
    }
}
