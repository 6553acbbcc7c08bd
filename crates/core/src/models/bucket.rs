use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Width of one chart period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Granularity {
    /// One calendar day
    Daily,
    /// One ISO-8601 week (Monday start, week 1 holds the first Thursday)
    Weekly,
    /// One calendar month
    Monthly,
    /// No bucketing: one point per distinct timestamp, no gap filling
    None,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::None,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::None => "none",
        }
    }

    /// Whether the granularity has a calendar step, i.e. gets gap-filled.
    #[must_use]
    pub fn is_calendar(&self) -> bool {
        !matches!(self, Granularity::None)
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            "none" => Ok(Granularity::None),
            _ => Err(CoreError::InvalidGranularity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Granularity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which aggregate of a bucket becomes the plotted scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ValueSelector {
    Income,
    Expenses,
    Net,
}

impl ValueSelector {
    pub const ALL: [ValueSelector; 3] =
        [ValueSelector::Income, ValueSelector::Expenses, ValueSelector::Net];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSelector::Income => "income",
            ValueSelector::Expenses => "expenses",
            ValueSelector::Net => "net",
        }
    }
}

impl std::fmt::Display for ValueSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueSelector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(ValueSelector::Income),
            "expenses" | "expense" => Ok(ValueSelector::Expenses),
            "net" => Ok(ValueSelector::Net),
            _ => Err(CoreError::InvalidValueSelector(s.to_string())),
        }
    }
}

impl TryFrom<String> for ValueSelector {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Options for one bucketing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketOptions {
    /// When false the expense aggregate is zeroed and net equals income.
    pub include_expenses: bool,
    /// The aggregate exposed as `PeriodBucket::value`.
    pub value_selector: ValueSelector,
}

impl Default for BucketOptions {
    fn default() -> Self {
        Self {
            include_expenses: true,
            value_selector: ValueSelector::Net,
        }
    }
}

/// Deterministic, zero-padded identifier of a period.
///
/// Within one granularity, lexical order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregates of one period, ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Period identifier, also used as the x-axis label
    pub key: PeriodKey,

    /// First calendar day of the period
    pub start: NaiveDate,

    /// Sum of inflows, rounded to cents
    pub income: f64,

    /// Sum of outflow magnitudes, rounded to cents (zero when expenses are excluded)
    pub expenses: f64,

    /// `income - expenses`, rounded to cents
    pub net: f64,

    /// The aggregate picked by the value selector
    pub value: f64,
}

impl PeriodBucket {
    /// Read one aggregate by selector.
    #[must_use]
    pub fn select(&self, selector: ValueSelector) -> f64 {
        match selector {
            ValueSelector::Income => self.income,
            ValueSelector::Expenses => self.expenses,
            ValueSelector::Net => self.net,
        }
    }

    /// True for synthetic gap-filling buckets and periods that cancelled out to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.income == 0.0 && self.expenses == 0.0
    }
}
