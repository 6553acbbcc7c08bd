use serde::{Deserialize, Serialize};

use super::bucket::{BucketOptions, Granularity, ValueSelector};
use crate::errors::CoreError;

/// How textual amounts resolve `,` versus `.`.
///
/// Both conventions occur in real inputs, so the choice is explicit
/// configuration rather than guessed per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountConvention {
    /// The separator appearing last is the decimal separator; the other one
    /// groups thousands. `"1.234,56"` and `"1,234.56"` are both 1234.56.
    #[default]
    LastSeparatorDecimal,
    /// Commas are always thousands separators and dropped; dots are decimal.
    DropCommas,
}

/// Locale and ISO-4217 currency used for every displayed amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDisplay {
    /// BCP-47 style tag, e.g. "pt-PT", "en-US"
    pub locale: String,
    /// Three-letter currency code, e.g. "EUR"
    pub currency: String,
}

impl CurrencyDisplay {
    pub fn new(locale: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            currency: currency.into(),
        }
    }

    /// Currency code must be a 3-letter alphabetic string; returns it uppercased.
    pub fn validated_currency(&self) -> Result<String, CoreError> {
        let trimmed = self.currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{}': must be exactly 3 ASCII letters (e.g., USD, EUR, PLN)",
                self.currency
            )));
        }
        Ok(trimmed)
    }
}

impl Default for CurrencyDisplay {
    fn default() -> Self {
        Self::new("pt-PT", "EUR")
    }
}

/// Everything a host can configure about the income/expense chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Period width used for bucketing.
    pub granularity: Granularity,

    /// Whether outflows count towards the aggregates.
    pub include_expenses: bool,

    /// Aggregate plotted as the primary series.
    pub value_selector: ValueSelector,

    /// Height of the chart viewport in pixels.
    pub viewport_height: f64,

    /// Locale and currency of displayed amounts.
    pub currency_display: CurrencyDisplay,

    /// Separator convention for textual amounts.
    pub amount_convention: AmountConvention,

    /// Minimum horizontal room per x-axis label, in pixels.
    pub min_label_spacing: f64,
}

impl ChartSettings {
    /// Parse settings from JSON. Missing fields take their defaults; an
    /// unknown granularity or selector is an error.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: ChartSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.currency_display.validated_currency()?;
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            return Err(CoreError::InvalidViewport(format!(
                "viewport height must be positive, got {}",
                self.viewport_height
            )));
        }
        if !self.min_label_spacing.is_finite() || self.min_label_spacing <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "label spacing must be positive, got {}",
                self.min_label_spacing
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn bucket_options(&self) -> BucketOptions {
        BucketOptions {
            include_expenses: self.include_expenses,
            value_selector: self.value_selector,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            granularity: Granularity::Monthly,
            include_expenses: true,
            value_selector: ValueSelector::Net,
            viewport_height: 260.0,
            currency_display: CurrencyDisplay::default(),
            amount_convention: AmountConvention::default(),
            min_label_spacing: 48.0,
        }
    }
}
