//! Upgrades of older persisted ledger layouts.
//!
//! The first layout stored months at the top level (`{ "March": { ... } }`).
//! The current one nests them under a year key.

use serde_json::{Map, Value};

use crate::ledger::Month;

/// Result of inspecting a stored ledger document.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    pub document: Map<String, Value>,
    /// Human-readable description of each applied migration.
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

impl Upgrade {
    pub fn migrated(&self) -> bool {
        !self.migrations.is_empty()
    }
}

fn is_year_key(key: &str) -> bool {
    key.trim().parse::<i32>().is_ok()
}

/// Month keys present, year keys absent.
pub fn is_month_keyed(document: &Map<String, Value>) -> bool {
    let has_month = document.keys().any(|key| Month::from_name(key).is_some());
    has_month && !document.keys().any(|key| is_year_key(key))
}

/// Brings `document` to the year-keyed layout. Top-level month keys are
/// moved under `target_year`, merging into that year's months when the
/// document already has some. Months missing from the old data stay missing.
pub fn upgrade(document: Map<String, Value>, target_year: i32) -> Upgrade {
    if !document.keys().any(|key| Month::from_name(key).is_some()) {
        return Upgrade {
            document,
            migrations: Vec::new(),
            warnings: Vec::new(),
        };
    }

    let legacy = is_month_keyed(&document);
    let year_key = target_year.to_string();
    let mut upgraded = Map::new();
    let mut months = Vec::new();
    let mut warnings = Vec::new();
    for (key, value) in document {
        match Month::from_name(&key) {
            Some(month) => months.push((month, value)),
            None if is_year_key(&key) => {
                upgraded.insert(key, value);
            }
            None => warnings.push(format!("dropped unrecognized key `{key}` during migration")),
        }
    }

    let carried = months.len();
    let year = upgraded
        .entry(year_key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !year.is_object() {
        warnings.push(format!("year {target_year} is not an object; replaced during migration"));
        *year = Value::Object(Map::new());
    }
    if let Value::Object(year) = year {
        for (month, value) in months {
            merge_month(year, month, value, &mut warnings);
        }
    }

    let migration = if legacy {
        format!("wrapped {carried} month(s) of month-keyed data under {target_year}")
    } else {
        format!("merged {carried} stray top-level month(s) into {target_year}")
    };
    tracing::info!(target_year, months = carried, legacy, "migrated month-keyed ledger data");
    Upgrade {
        document: upgraded,
        migrations: vec![migration],
        warnings,
    }
}

/// Appends each kind list of `incoming` to the same list already stored for
/// `month`, or inserts the month when it is not there yet.
fn merge_month(
    year: &mut Map<String, Value>,
    month: Month,
    incoming: Value,
    warnings: &mut Vec<String>,
) {
    if !year.contains_key(month.name()) {
        year.insert(month.name().to_string(), incoming);
        return;
    }
    let (Some(Value::Object(existing)), Value::Object(incoming)) =
        (year.get_mut(month.name()), incoming)
    else {
        warnings.push(format!("could not merge stray {month} data; kept the year-keyed copy"));
        return;
    };
    for (kind, entries) in incoming {
        if !existing.contains_key(&kind) {
            existing.insert(kind, entries);
            continue;
        }
        match (existing.get_mut(&kind), entries) {
            (Some(Value::Array(stored)), Value::Array(entries)) => stored.extend(entries),
            _ => warnings.push(format!(
                "could not merge stray `{kind}` of {month}; kept the year-keyed copy"
            )),
        }
    }
}
