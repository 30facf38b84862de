use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::Config,
    core::time::Clock,
    ledger::{CategoryType, Entry, Ledger, Month, MonthBook, ViewContext, YearBook},
};

use super::{
    migration, Result, StorageBackend, CORRUPT_LEDGER_KEY, LEDGER_KEY, THEME_KEY, VIEW_MONTH_KEY,
    VIEW_YEAR_KEY,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// Outcome of loading the ledger record.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
    pub migrations: Vec<String>,
}

/// Typed access to the persisted records on top of a [`StorageBackend`].
pub struct LedgerStore {
    backend: Box<dyn StorageBackend>,
}

impl LedgerStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Loads the ledger record. Month-keyed legacy data is wrapped under
    /// `target_year` and written back in the new layout before returning.
    ///
    /// A record that is not valid JSON is copied aside and treated as empty.
    /// Failing to write either the copy or the migrated layout is reported
    /// as a warning; the decoded ledger is still returned.
    pub fn load(&self, target_year: i32) -> Result<LoadReport> {
        let Some(raw) = self.backend.read(LEDGER_KEY)? else {
            tracing::debug!("no stored ledger, starting empty");
            return Ok(LoadReport::default());
        };

        let mut report = LoadReport::default();
        let document = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                report.warnings.push(format!(
                    "ledger record is a {} instead of an object; starting empty",
                    json_kind(&other)
                ));
                self.set_aside(&raw, &mut report.warnings);
                Map::new()
            }
            Err(err) => {
                tracing::error!(error = %err, "stored ledger is not valid JSON");
                report
                    .warnings
                    .push(format!("ledger record could not be parsed ({err}); starting empty"));
                self.set_aside(&raw, &mut report.warnings);
                Map::new()
            }
        };

        let upgrade = migration::upgrade(document, target_year);
        report.warnings.extend(upgrade.warnings.iter().cloned());
        let (ledger, warnings) = decode(&upgrade.document);
        report.warnings.extend(warnings);

        if upgrade.migrated() {
            if let Err(err) = self.persist_all(&ledger) {
                report.warnings.push(format!(
                    "migrated ledger could not be saved ({err}); it will be migrated again next time"
                ));
            }
            report.migrations = upgrade.migrations;
        }
        for warning in &report.warnings {
            tracing::warn!(%warning, "ledger load");
        }
        report.ledger = ledger;
        Ok(report)
    }

    /// Serializes the whole multi-year ledger into its record.
    pub fn persist_all(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        self.backend.write(LEDGER_KEY, &json)?;
        tracing::debug!(entries = ledger.entry_count(), "ledger persisted");
        Ok(())
    }

    /// Restores the viewed month and year, falling back to January of the
    /// current year for missing or invalid records.
    pub fn load_view(&self, config: &Config, clock: &dyn Clock) -> ViewContext {
        let month = self
            .read_parsed::<usize>(VIEW_MONTH_KEY)
            .and_then(Month::from_index)
            .unwrap_or(Month::January);
        let year = self
            .read_parsed::<i32>(VIEW_YEAR_KEY)
            .filter(|year| (config.min_year..=config.max_year).contains(year))
            .unwrap_or_else(|| config.clamp_year(clock.current_year()));
        ViewContext::new(year, month)
    }

    pub fn save_view(&self, view: ViewContext) -> Result<()> {
        self.backend
            .write(VIEW_MONTH_KEY, &view.month.index().to_string())?;
        self.backend.write(VIEW_YEAR_KEY, &view.year.to_string())
    }

    pub fn load_theme(&self) -> Theme {
        self.backend
            .read(THEME_KEY)
            .ok()
            .flatten()
            .and_then(|raw| match raw.trim().trim_matches('"') {
                "dark" => Some(Theme::Dark),
                "light" => Some(Theme::Light),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.backend.write(THEME_KEY, &theme.to_string())
    }

    fn set_aside(&self, raw: &str, warnings: &mut Vec<String>) {
        if let Err(err) = self.backend.write(CORRUPT_LEDGER_KEY, raw) {
            warnings.push(format!("unreadable ledger record could not be copied aside ({err})"));
        }
    }

    fn read_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        match self.backend.read(key) {
            Ok(Some(raw)) => raw.trim().trim_matches('"').parse().ok(),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "could not read record");
                None
            }
        }
    }
}

/// Builds a ledger from a year-keyed document, skipping anything it does
/// not recognize instead of failing the whole load.
fn decode(document: &Map<String, Value>) -> (Ledger, Vec<String>) {
    let mut warnings = Vec::new();
    let mut years = std::collections::BTreeMap::new();

    for (year_key, months) in document {
        let Ok(year) = year_key.trim().parse::<i32>() else {
            warnings.push(format!("dropped unrecognized key `{year_key}`"));
            continue;
        };
        let Some(months) = months.as_object() else {
            warnings.push(format!("year {year} is not an object"));
            continue;
        };
        let mut book = YearBook::new();
        for (month_key, kinds) in months {
            let Some(month) = Month::from_name(month_key) else {
                warnings.push(format!("dropped unrecognized month `{month_key}` in {year}"));
                continue;
            };
            let Some(kinds) = kinds.as_object() else {
                warnings.push(format!("{month_key} {year} is not an object"));
                continue;
            };
            let mut month_book = MonthBook::new();
            for (kind_key, entries) in kinds {
                let Some(kind) = CategoryType::from_storage_key(kind_key) else {
                    warnings.push(format!(
                        "dropped unrecognized category type `{kind_key}` in {month_key} {year}"
                    ));
                    continue;
                };
                month_book.insert(kind, decode_entries(entries, kind, month, year, &mut warnings));
            }
            book.insert(month, month_book);
        }
        years.insert(year, book);
    }

    (Ledger::from_years(years), warnings)
}

fn decode_entries(
    value: &Value,
    kind: CategoryType,
    month: Month,
    year: i32,
    warnings: &mut Vec<String>,
) -> Vec<Entry> {
    let Some(items) = value.as_array() else {
        warnings.push(format!("{kind} in {month} {year} is not a list"));
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<Entry>(item.clone()) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warnings.push(format!(
                    "dropped invalid {kind} entry #{idx} in {month} {year}: {err}"
                ));
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
