// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use gridstate_app::Record;
use std::path::PathBuf;
use time::macros::date;
use time::{Date, Duration};

pub const DEMO_SEED: u64 = 7;

const ITEMS: [(&str, &str); 10] = [
    ("PAR500", "Paracetamol 500mg"),
    ("AMX250", "Amoxicillin 250mg"),
    ("BND010", "Bandage 10cm"),
    ("IBU200", "Ibuprofen 200mg"),
    ("ORS001", "Oral rehydration salts"),
    ("MTF500", "Metformin 500mg"),
    ("CTM004", "Chlorphenamine 4mg"),
    ("ZNC020", "Zinc sulfate 20mg"),
    ("GLV100", "Gloves, latex"),
    ("SYR005", "Syringe 5ml"),
];

const FACILITIES: [&str; 8] = [
    "Central Clinic",
    "Riverside Health Post",
    "Hillview Hospital",
    "Northgate Pharmacy",
    "Lakeshore Dispensary",
    "Valley Medical Store",
    "Eastside Health Centre",
    "Mission Clinic",
];

const FIRST_NAMES: [&str; 12] = [
    "Amara", "Tevita", "Leilani", "Sione", "Mere", "Kofi", "Ana", "Rangi", "Hana", "Tomasi",
    "Nia", "Ioane",
];
const LAST_NAMES: [&str; 12] = [
    "Fifita", "Mensah", "Tupou", "Ngata", "Okafor", "Vea", "Moala", "Parata", "Asante", "Lolo",
    "Kaufana", "Rewi",
];

const REASONS: [&str; 4] = ["Damaged", "Expired", "Found", "Miscounted"];
const MASTER_LISTS: [&str; 3] = ["Essential medicines", "Hospital list", "Outreach kit"];
const STATUSES: [&str; 3] = ["new", "confirmed", "finalised"];

const REFERENCE_DATE: Date = date!(2026 - 03 - 01);

/// One stored record plus the records scoped under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub kind: &'static str,
    pub record: Record,
    pub children: Vec<Fixture>,
}

impl Fixture {
    pub fn new(kind: &'static str, record: Record) -> Self {
        Self {
            kind,
            record,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Fixture>) -> Self {
        self.children = children;
        self
    }

    /// Number of records in this tree, including the root.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Fixture::size).sum::<usize>()
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for pharmacy-shaped records. The same seed always yields
/// the same records.
#[derive(Debug, Clone)]
pub struct PharmacyFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl PharmacyFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn item(&mut self, id: i64, index: usize) -> Record {
        let (code, name) = ITEMS[index % ITEMS.len()];
        let available = if index % 4 == 2 {
            0
        } else {
            self.int_range(5, 400)
        };
        Record::new(id)
            .with("code", code)
            .with("name", name)
            .with("availableQuantity", available)
            .with("hasStock", available > 0)
            .with("isLessThanThresholdMOS", available < 50)
    }

    pub fn invoice_line(&mut self, id: i64, index: usize) -> Record {
        let (code, name) = ITEMS[index % ITEMS.len()];
        Record::new(id)
            .with("itemCode", code)
            .with("itemName", name)
            .with("availableQuantity", self.int_range(0, 300))
            .with("totalQuantity", self.int_range(1, 60))
    }

    pub fn supplier_batch(&mut self, id: i64, index: usize) -> Record {
        let (code, name) = ITEMS[index % ITEMS.len()];
        Record::new(id)
            .with("itemCode", code)
            .with("itemName", name)
            .with("totalQuantity", self.int_range(10, 500))
            .with("expiryDate", self.date_after(180, 900))
    }

    pub fn transaction(&mut self, id: i64, serial: i64) -> Record {
        let status = STATUSES[self.rng.int_n(STATUSES.len())];
        Record::new(id)
            .with("serialNumber", serial)
            .with("otherPartyName", self.pick(&FACILITIES))
            .with("status", status)
            .with("entryDate", self.date_before(1, 90))
            .with("comment", "")
    }

    pub fn requisition_line(&mut self, id: i64, index: usize) -> Record {
        let (code, name) = ITEMS[index % ITEMS.len()];
        let stock = self.int_range(0, 200);
        let usage = self.int_range(10, 80);
        let suggested = (usage * 3 - stock).max(0);
        Record::new(id)
            .with("itemCode", code)
            .with("itemName", name)
            .with("ourStockOnHand", stock)
            .with("stockOnHand", self.int_range(0, 200))
            .with("monthlyUsage", usage)
            .with("suggestedQuantity", suggested)
            .with("requiredQuantity", suggested)
            .with("suppliedQuantity", 0_i64)
    }

    pub fn stocktake_line(&mut self, id: i64, index: usize) -> Record {
        let (code, name) = ITEMS[index % ITEMS.len()];
        let snapshot = self.int_range(0, 150);
        let counted = snapshot + self.int_range(-5, 5);
        Record::new(id)
            .with("itemCode", code)
            .with("itemName", name)
            .with("snapshotTotalQuantity", snapshot)
            .with("countedTotalQuantity", counted)
            .with("difference", counted - snapshot)
            .with("isOutdated", index % 3 == 1)
    }

    pub fn stocktake_batch(&mut self, id: i64, line: &Record, index: usize) -> Record {
        let snapshot = self.int_range(0, 80);
        let counted = snapshot + self.int_range(-3, 3);
        let mut record = Record::new(id)
            .with("batch", format!("B{:04}", 1000 + index))
            .with("expiryDate", self.date_after(60, 720))
            .with("snapshotTotalQuantity", snapshot)
            .with("countedTotalQuantity", counted)
            .with("difference", counted - snapshot);
        if let Some(name) = line.text("itemName") {
            record = record.with("itemName", name);
        }
        record
    }

    pub fn patient(&mut self, id: i64, index: usize) -> Record {
        Record::new(id)
            .with("code", format!("P{:05}", 100 + index))
            .with("firstName", self.pick(&FIRST_NAMES))
            .with("lastName", self.pick(&LAST_NAMES))
            .with("dateOfBirth", self.date_before(365 * 5, 365 * 70))
    }

    pub fn prescriber(&mut self, id: i64) -> Record {
        Record::new(id)
            .with("firstName", self.pick(&FIRST_NAMES))
            .with("lastName", self.pick(&LAST_NAMES))
            .with("registrationCode", format!("MC-{}", self.int_range(1000, 9999)))
    }

    pub fn cash_transaction(&mut self, id: i64, serial: i64) -> Record {
        let cents = self.int_range(150, 25_000);
        Record::new(id)
            .with("serialNumber", serial)
            .with("otherPartyName", self.pick(&FACILITIES))
            .with("total", cents as f64 / 100.0)
            .with("entryDate", self.date_before(0, 30))
            .with("comment", "")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn date_before(&mut self, min_days: i64, max_days: i64) -> Date {
        REFERENCE_DATE.saturating_sub(Duration::days(self.int_range(min_days, max_days)))
    }

    fn date_after(&mut self, min_days: i64, max_days: i64) -> Date {
        REFERENCE_DATE.saturating_add(Duration::days(self.int_range(min_days, max_days)))
    }
}

/// The three lines most engine tests start from: Paracetamol, Amoxicillin
/// and an out-of-stock Bandage, in id order.
pub fn invoice_lines() -> Vec<Record> {
    vec![
        Record::new(201)
            .with("itemCode", "PAR500")
            .with("itemName", "Paracetamol")
            .with("availableQuantity", 120_i64)
            .with("totalQuantity", 0_i64),
        Record::new(202)
            .with("itemCode", "AMX250")
            .with("itemName", "Amoxicillin")
            .with("availableQuantity", 40_i64)
            .with("totalQuantity", 0_i64),
        Record::new(203)
            .with("itemCode", "BND010")
            .with("itemName", "Bandage")
            .with("availableQuantity", 0_i64)
            .with("totalQuantity", 0_i64),
    ]
}

fn indicator_attribute(id: i64, code: &str, description: &str, is_row: bool) -> Fixture {
    Fixture::new(
        "indicatorAttribute",
        Record::new(id)
            .with("code", code)
            .with("description", description)
            .with("isRow", is_row)
            .with("isColumn", !is_row),
    )
}

/// Two program indicators, as stored under a requisition.
pub fn program_indicators() -> Vec<Fixture> {
    vec![
        Fixture::new("indicator", Record::new(361).with("code", "ART")).with_children(vec![
            indicator_attribute(362, "adult", "Adults on treatment", true),
            indicator_attribute(363, "child", "Children on treatment", true),
            indicator_attribute(364, "new", "New this month", false),
            indicator_attribute(365, "total", "Total", false),
        ]),
        Fixture::new("indicator", Record::new(366).with("code", "TB")).with_children(vec![
            indicator_attribute(367, "cases", "Notified cases", true),
            indicator_attribute(368, "cured", "Cured", false),
        ]),
    ]
}

/// A small pharmacy: stock, transactions with their lines, one stocktake,
/// and the lookup lists behind the select pages.
pub fn demo_fixtures() -> Vec<Fixture> {
    let mut faker = PharmacyFaker::new(DEMO_SEED);
    let mut fixtures = Vec::new();

    for index in 0..ITEMS.len() {
        fixtures.push(Fixture::new("item", faker.item(101 + index as i64, index)));
    }

    let lines = invoice_lines()
        .into_iter()
        .map(|record| Fixture::new("transactionItem", record))
        .collect();
    fixtures.push(Fixture::new("customerInvoice", faker.transaction(301, 1041)).with_children(lines));
    for offset in 1..4_i64 {
        fixtures.push(Fixture::new(
            "customerInvoice",
            faker.transaction(301 + offset, 1041 + offset),
        ));
    }

    let batches = (0..4)
        .map(|index| Fixture::new("transactionBatch", faker.supplier_batch(221 + index as i64, index)))
        .collect();
    fixtures.push(Fixture::new("supplierInvoice", faker.transaction(311, 2050)).with_children(batches));
    fixtures.push(Fixture::new("supplierInvoice", faker.transaction(312, 2051)));

    let mut request_lines: Vec<Fixture> = (0..5)
        .map(|index| Fixture::new("requisitionItem", faker.requisition_line(241 + index as i64, index)))
        .collect();
    request_lines.extend(program_indicators());
    let mut request = faker.transaction(341, 310);
    request = request.with("numberOfItems", 5_i64);
    fixtures.push(Fixture::new("requestRequisition", request).with_children(request_lines));

    let response_lines = (0..3)
        .map(|index| {
            Fixture::new("requisitionItem", faker.requisition_line(251 + index as i64, index + 3))
        })
        .collect();
    let mut response = faker.transaction(351, 88);
    response = response.with("numberOfItems", 3_i64);
    fixtures.push(Fixture::new("responseRequisition", response).with_children(response_lines));

    let mut stocktake_lines = Vec::new();
    for index in 0..5 {
        let line = faker.stocktake_line(411 + index as i64, index);
        let batches = (0..2)
            .map(|batch| {
                let id = 431 + (index * 2 + batch) as i64;
                Fixture::new("stocktakeBatch", faker.stocktake_batch(id, &line, index * 2 + batch))
            })
            .collect();
        stocktake_lines.push(Fixture::new("stocktakeItem", line).with_children(batches));
    }
    let stocktake = Record::new(401)
        .with("name", "March count")
        .with("serialNumber", 12_i64)
        .with("createdDate", REFERENCE_DATE)
        .with("status", "new")
        .with("comment", "Quarterly full count");
    fixtures.push(Fixture::new("stocktake", stocktake).with_children(stocktake_lines));
    fixtures.push(Fixture::new(
        "stocktake",
        Record::new(402)
            .with("name", "December count")
            .with("serialNumber", 11_i64)
            .with("createdDate", date!(2025 - 12 - 01))
            .with("status", "finalised"),
    ));

    for (index, title) in REASONS.iter().enumerate() {
        fixtures.push(Fixture::new(
            "reason",
            Record::new(501 + index as i64).with("title", *title),
        ));
    }
    for (index, name) in MASTER_LISTS.iter().enumerate() {
        fixtures.push(Fixture::new(
            "masterList",
            Record::new(601 + index as i64).with("name", *name),
        ));
    }
    for index in 0..6 {
        fixtures.push(Fixture::new("patient", faker.patient(701 + index as i64, index)));
    }
    for index in 0..4_i64 {
        fixtures.push(Fixture::new("prescriber", faker.prescriber(801 + index)));
    }
    for index in 0..5_i64 {
        fixtures.push(Fixture::new(
            "cashTransaction",
            faker.cash_transaction(901 + index, 5000 + index),
        ));
    }

    fixtures
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("gridstate.db");
    Ok((dir, db_path))
}

#[cfg(test)]
mod tests {
    use super::{Fixture, PharmacyFaker, demo_fixtures, invoice_lines, program_indicators};
    use std::collections::BTreeSet;

    fn walk<'a>(fixtures: &'a [Fixture], out: &mut Vec<&'a Fixture>) {
        for fixture in fixtures {
            out.push(fixture);
            walk(&fixture.children, out);
        }
    }

    #[test]
    fn new_deterministic_seed() {
        let mut left = PharmacyFaker::new(42);
        let mut right = PharmacyFaker::new(42);
        assert_eq!(left.item(1, 0), right.item(1, 0));
        assert_eq!(left.patient(2, 0), right.patient(2, 0));
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(PharmacyFaker::new(0).seed(), 1);
    }

    #[test]
    fn stock_flags_follow_available_quantity() {
        let mut faker = PharmacyFaker::new(3);
        for index in 0..20 {
            let item = faker.item(index as i64 + 1, index);
            let available = item.field("availableQuantity").as_integer().unwrap_or(-1);
            assert_eq!(item.is_true("hasStock"), available > 0);
            assert_eq!(item.is_true("isLessThanThresholdMOS"), available < 50);
        }
    }

    #[test]
    fn demo_fixture_ids_are_unique() {
        let fixtures = demo_fixtures();
        let mut all = Vec::new();
        walk(&fixtures, &mut all);
        let ids: BTreeSet<i64> = all.iter().map(|fixture| fixture.record.id.get()).collect();
        assert_eq!(ids.len(), all.len());
        assert_eq!(
            fixtures.iter().map(Fixture::size).sum::<usize>(),
            all.len()
        );
    }

    #[test]
    fn demo_request_requisition_carries_indicators() {
        let fixtures = demo_fixtures();
        let indicators: Vec<i64> = fixtures
            .iter()
            .find(|fixture| fixture.record.id.get() == 341)
            .map(|fixture| {
                fixture
                    .children
                    .iter()
                    .filter(|child| child.kind == "indicator")
                    .map(|child| child.record.id.get())
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(indicators, vec![361, 366]);
        assert_eq!(
            program_indicators().iter().map(Fixture::size).sum::<usize>(),
            8
        );
    }

    #[test]
    fn demo_invoice_carries_the_standard_lines() {
        let fixtures = demo_fixtures();
        let invoice = fixtures
            .iter()
            .find(|fixture| fixture.record.id.get() == 301);
        let lines: Vec<_> = invoice
            .map(|fixture| fixture.children.iter().map(|c| c.record.clone()).collect())
            .unwrap_or_default();
        assert_eq!(lines, invoice_lines());
    }
}
