use crate::models::record::RawValue;
use crate::models::share::{ShareChart, ShareEntry, ShareSlice, DEFAULT_PALETTE};
use crate::services::record_normalizer::RecordNormalizer;

/// Degrees where the first slice starts (twelve o'clock).
const START_ANGLE: f64 = 90.0;
/// Degrees where the last slice ends, one clockwise turn later.
const END_ANGLE: f64 = -270.0;
/// Gap between neighbouring non-empty slices, in degrees.
const PADDING_ANGLE: f64 = 4.0;

/// Computes categorical share (donut) charts, e.g. balance / expenses / income.
pub struct ShareService {
    normalizer: RecordNormalizer,
}

impl ShareService {
    /// `normalizer` parses a caller-supplied display total with the same
    /// amount rules as records.
    pub fn new(normalizer: RecordNormalizer) -> Self {
        Self { normalizer }
    }

    /// Lay out `entries` as slices of one clockwise turn.
    ///
    /// Non-positive and non-finite amounts get an empty slice. The centre
    /// total is `total_override` when it parses to a finite number, the sum
    /// of positive amounts otherwise.
    #[must_use]
    pub fn compute(
        &self,
        entries: &[ShareEntry],
        total_override: Option<&RawValue>,
        palette: &[&str],
    ) -> ShareChart {
        let palette: &[&str] = if palette.is_empty() {
            &DEFAULT_PALETTE
        } else {
            palette
        };
        let weight = |e: &ShareEntry| {
            if e.amount.is_finite() && e.amount > 0.0 {
                e.amount
            } else {
                0.0
            }
        };

        let computed_total: f64 = entries.iter().map(weight).sum();
        let non_empty = entries.iter().filter(|e| weight(e) > 0.0).count();

        let full_turn = START_ANGLE - END_ANGLE;
        // A lone slice needs no gap.
        let padding = if non_empty > 1 { PADDING_ANGLE } else { 0.0 };
        let available = (full_turn - padding * non_empty as f64).max(0.0);

        let mut cursor = START_ANGLE;
        let slices = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let fraction = if computed_total > 0.0 {
                    weight(entry) / computed_total
                } else {
                    0.0
                };
                let start_angle = cursor;
                let end_angle = start_angle - fraction * available;
                if fraction > 0.0 {
                    cursor = end_angle - padding;
                }
                ShareSlice {
                    name: entry.name.clone(),
                    amount: entry.amount,
                    fraction,
                    start_angle,
                    end_angle,
                    color: palette[i % palette.len()].to_string(),
                }
            })
            .collect();

        let display_total = total_override
            .and_then(|v| self.normalizer.parse_amount(v))
            .unwrap_or(computed_total);

        ShareChart {
            slices,
            computed_total,
            display_total,
        }
    }
}

impl Default for ShareService {
    fn default() -> Self {
        Self::new(RecordNormalizer::default())
    }
}
