use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Field names under which the data layer has been seen to send a date.
/// Looked up in order; the first present field wins.
pub const DATE_FIELDS: [&str; 3] = ["date", "createdAt", "timestamp"];

/// Field names under which the data layer has been seen to send an amount.
pub const AMOUNT_FIELDS: [&str; 2] = ["amount", "value"];

/// A single loosely-typed field value of an incoming record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A date value the caller already holds in native form.
    DateTime(NaiveDateTime),
    /// Arrays and objects, kept so a record never fails to decode as a whole.
    Other(serde_json::Value),
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => RawValue::Number(f),
                None => RawValue::Other(serde_json::Value::Number(n)),
            },
            serde_json::Value::String(s) => RawValue::Text(s),
            other => RawValue::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(RawValue::from)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(dt: NaiveDateTime) -> Self {
        RawValue::DateTime(dt)
    }
}

/// A transaction-like record exactly as the data layer delivered it.
///
/// No schema is enforced: the record is a bag of named fields, and the
/// normalizer decides what it can make of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Shorthand for the common `{ date, amount }` shape.
    pub fn dated(date: impl Into<RawValue>, amount: impl Into<RawValue>) -> Self {
        Self::new().with("date", date).with("amount", amount)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(field.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    /// The first non-null date-like field, if any.
    #[must_use]
    pub fn date_value(&self) -> Option<&RawValue> {
        self.first_present(&DATE_FIELDS)
    }

    /// The first non-null amount-like field, if any.
    #[must_use]
    pub fn amount_value(&self) -> Option<&RawValue> {
        self.first_present(&AMOUNT_FIELDS)
    }

    fn first_present(&self, names: &[&str]) -> Option<&RawValue> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find(|v| !matches!(v, RawValue::Null))
    }
}

/// A record the normalizer accepted.
///
/// `amount >= 0` is income, `amount < 0` is an expense of `|amount|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub timestamp: NaiveDateTime,
    pub amount: f64,
}

impl NormalizedRecord {
    pub fn new(timestamp: NaiveDateTime, amount: f64) -> Self {
        Self { timestamp, amount }
    }

    #[must_use]
    pub fn is_income(&self) -> bool {
        self.amount >= 0.0
    }
}

impl From<NormalizedRecord> for RawRecord {
    fn from(record: NormalizedRecord) -> Self {
        RawRecord::new()
            .with("date", record.timestamp)
            .with("amount", record.amount)
    }
}
