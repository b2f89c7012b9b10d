//! Normalized financial statements as handed over by the extraction stage.
//!
//! A statement is an ordered list of periods; each period maps free-form
//! lower_snake_case line items to an optional value. A `null` line item is
//! kept as `None` and is never read back as zero.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::AnalysisError;

/// One reporting period of a single statement ("2023", "Q3 2025", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub label: String,
    pub items: BTreeMap<String, Option<f64>>,
}

impl StatementPeriod {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            items: BTreeMap::new(),
        }
    }

    pub fn with_item(mut self, name: &str, value: f64) -> Self {
        self.items.insert(name.to_string(), Some(value));
        self
    }

    pub fn with_null(mut self, name: &str) -> Self {
        self.items.insert(name.to_string(), None);
        self
    }

    pub fn insert(&mut self, name: &str, value: Option<f64>) {
        self.items.insert(name.to_string(), value);
    }

    /// Value of a line item. `None` for both an absent key and an explicit null;
    /// use [`StatementPeriod::contains`] to tell the two apart.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.items.get(name).copied().flatten()
    }

    /// Whether the line item key exists, even if its value is null.
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Line items holding NaN or an infinity.
    pub fn non_finite_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(_, v)| v.map_or(false, |x| !x.is_finite()))
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

/// A single statement: periods in the order the extraction stage produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    periods: Vec<StatementPeriod>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a period. A period with an existing label replaces it in place.
    pub fn push(&mut self, period: StatementPeriod) {
        match self.periods.iter_mut().find(|p| p.label == period.label) {
            Some(existing) => *existing = period,
            None => self.periods.push(period),
        }
    }

    pub fn with_period(mut self, period: StatementPeriod) -> Self {
        self.push(period);
        self
    }

    pub fn period(&self, label: &str) -> Option<&StatementPeriod> {
        self.periods.iter().find(|p| p.label == label)
    }

    /// Periods in insertion order.
    pub fn periods(&self) -> impl Iterator<Item = &StatementPeriod> {
        self.periods.iter()
    }

    /// Period labels sorted lexicographically. This is the only notion of
    /// "chronological" the engine has: "Q10 2024" sorts before "Q2 2024".
    pub fn sorted_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.periods.iter().map(|p| p.label.as_str()).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.periods.len()))?;
        for period in &self.periods {
            map.serialize_entry(&period.label, &period.items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Statement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatementVisitor;

        impl<'de> Visitor<'de> for StatementVisitor {
            type Value = Statement;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of period label to line items")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Statement, A::Error> {
                let mut statement = Statement::new();
                while let Some((label, items)) =
                    access.next_entry::<String, BTreeMap<String, Option<f64>>>()?
                {
                    statement.push(StatementPeriod { label, items });
                }
                Ok(statement)
            }
        }

        deserializer.deserialize_map(StatementVisitor)
    }
}

/// The three core statements, keyed by period label. Periods are matched
/// across statements by identical label only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementSet {
    #[serde(default)]
    pub income_statement: Statement,
    #[serde(default)]
    pub balance_sheet: Statement,
    #[serde(default)]
    pub cash_flow: Statement,
}

impl StatementSet {
    /// Parses the nested `statement -> period -> line item -> number | null`
    /// mapping. Anything else is a contract violation by the caller.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, AnalysisError> {
        if !value.is_object() {
            return Err(AnalysisError::InputShape(format!(
                "statement set must be an object, got {}",
                json_kind(value)
            )));
        }
        Self::deserialize(value).map_err(|e| AnalysisError::InputShape(e.to_string()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(raw).map_err(|e| AnalysisError::InputShape(e.to_string()))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
