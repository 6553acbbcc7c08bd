use tracing::warn;

use crate::errors::CoreError;
use crate::models::settings::CurrencyDisplay;

const NBSP: &str = "\u{a0}";

/// How integer digits are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567 (lakh / crore)
    Indian,
}

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Number formatting conventions of one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleRules {
    pub tag: &'static str,
    pub group_separator: &'static str,
    pub decimal_separator: char,
    pub grouping: Grouping,
    pub symbol_position: SymbolPosition,
}

const fn rules(
    tag: &'static str,
    group_separator: &'static str,
    decimal_separator: char,
    grouping: Grouping,
    symbol_position: SymbolPosition,
) -> LocaleRules {
    LocaleRules {
        tag,
        group_separator,
        decimal_separator,
        grouping,
        symbol_position,
    }
}

/// Supported locales. The first entry of a language is its fallback.
const LOCALES: [LocaleRules; 9] = [
    rules("en-US", ",", '.', Grouping::Thousands, SymbolPosition::Prefix),
    rules("en-GB", ",", '.', Grouping::Thousands, SymbolPosition::Prefix),
    rules("en-IN", ",", '.', Grouping::Indian, SymbolPosition::Prefix),
    rules("pt-PT", NBSP, ',', Grouping::Thousands, SymbolPosition::Suffix),
    rules("pt-BR", ".", ',', Grouping::Thousands, SymbolPosition::Prefix),
    rules("fr-FR", NBSP, ',', Grouping::Thousands, SymbolPosition::Suffix),
    rules("de-DE", ".", ',', Grouping::Thousands, SymbolPosition::Suffix),
    rules("es-ES", ".", ',', Grouping::Thousands, SymbolPosition::Suffix),
    rules("it-IT", ".", ',', Grouping::Thousands, SymbolPosition::Suffix),
];

/// Resolve a locale tag: exact match (case-insensitive, `_` or `-`), then
/// the language alone. `None` when the language is unknown.
#[must_use]
pub fn find_locale(tag: &str) -> Option<LocaleRules> {
    let wanted = tag.trim().replace('_', "-");
    if let Some(found) = LOCALES.iter().find(|l| l.tag.eq_ignore_ascii_case(&wanted)) {
        return Some(*found);
    }
    let language = wanted.split('-').next().unwrap_or_default();
    LOCALES
        .iter()
        .find(|l| {
            l.tag
                .split('-')
                .next()
                .is_some_and(|lang| lang.eq_ignore_ascii_case(language))
        })
        .copied()
}

/// Display symbol and minor-unit digits of a currency code.
#[must_use]
pub fn currency_symbol(code: &str) -> (String, usize) {
    match code {
        "EUR" => ("€".to_string(), 2),
        "USD" => ("$".to_string(), 2),
        "GBP" => ("£".to_string(), 2),
        "BRL" => ("R$".to_string(), 2),
        "INR" => ("₹".to_string(), 2),
        "JPY" => ("¥".to_string(), 0),
        "PLN" => ("zł".to_string(), 2),
        other => (other.to_string(), 2),
    }
}

/// Formats monetary values for display.
///
/// Locale and currency are explicit inputs; nothing is read from ambient
/// process state.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyService {
    rules: LocaleRules,
    currency: String,
    symbol: String,
    decimals: usize,
}

impl CurrencyService {
    /// Build a formatter. Unknown locales fall back to `en-US`; an invalid
    /// currency code is an error.
    pub fn new(display: &CurrencyDisplay) -> Result<Self, CoreError> {
        let currency = display.validated_currency()?;
        let locale = &display.locale;
        let rules = find_locale(locale).unwrap_or_else(|| {
            warn!(%locale, "unknown locale, formatting as en-US");
            LOCALES[0]
        });
        let (symbol, decimals) = currency_symbol(&currency);
        Ok(Self {
            rules,
            currency,
            symbol,
            decimals,
        })
    }

    #[must_use]
    pub fn locale(&self) -> &'static str {
        self.rules.tag
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Format with currency symbol, e.g. `1.234,56 €` (pt-PT) or `-$1,234.56` (en-US).
    /// Non-finite values show as `-`.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        let Some((negative, number)) = self.format_magnitude(value) else {
            return "-".to_string();
        };
        let sign = if negative { "-" } else { "" };
        match self.rules.symbol_position {
            SymbolPosition::Prefix => {
                // Letter symbols ("CHF", "zł") need a gap before the digits.
                let gap = if self.symbol.chars().last().is_some_and(char::is_alphabetic) {
                    NBSP
                } else {
                    ""
                };
                format!("{sign}{}{gap}{number}", self.symbol)
            }
            SymbolPosition::Suffix => format!("{sign}{number}{NBSP}{}", self.symbol),
        }
    }

    /// Format as a plain grouped number with the currency's decimals.
    #[must_use]
    pub fn format_number(&self, value: f64) -> String {
        match self.format_magnitude(value) {
            Some((true, number)) => format!("-{number}"),
            Some((false, number)) => number,
            None => "-".to_string(),
        }
    }

    fn format_magnitude(&self, value: f64) -> Option<(bool, String)> {
        if !value.is_finite() {
            return None;
        }
        let fixed = format!("{:.*}", self.decimals, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };
        // "-0.00" reads as zero.
        let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');

        let mut number = group_digits(int_part, self.rules.grouping, self.rules.group_separator);
        if let Some(frac) = frac_part {
            number.push(self.rules.decimal_separator);
            number.push_str(frac);
        }
        Some((negative, number))
    }
}

/// Insert `separator` between digit groups of an unsigned integer string.
#[must_use]
pub fn group_digits(digits: &str, grouping: Grouping, separator: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last_three) = digits.split_at(digits.len() - 3);
    let size = match grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(size);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(last_three);
    groups.join(separator)
}
