use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::models::bucket::{BucketOptions, Granularity, PeriodBucket, PeriodKey, ValueSelector};
use crate::models::record::NormalizedRecord;
use crate::services::calendar;

/// Daily fills longer than this many periods are logged; they are still produced.
const LARGE_FILL_PERIODS: usize = 3650;

/// Round to currency precision (cents). Magnitudes too large to scale
/// are returned unchanged.
#[must_use]
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Running sums of one period while records are being folded in.
#[derive(Debug, Clone, Copy)]
struct Totals {
    start: NaiveDate,
    income: f64,
    expenses: f64,
}

impl Totals {
    fn empty(start: NaiveDate) -> Self {
        Self {
            start,
            income: 0.0,
            expenses: 0.0,
        }
    }

    fn add(&mut self, amount: f64) {
        if amount >= 0.0 {
            self.income += amount;
        } else {
            self.expenses += amount.abs();
        }
    }
}

/// Sums over a whole bucketed series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesTotals {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Folds normalized records into a dense, ordered series of period buckets.
///
/// Pure business logic: no I/O, never mutates its input.
pub struct BucketingService;

impl BucketingService {
    pub fn new() -> Self {
        Self
    }

    /// Bucket `records` at `granularity`.
    ///
    /// 1. Sum inflows and outflow magnitudes per period key
    /// 2. Fill every period between the first and the last record with zero
    ///    buckets, so consecutive buckets are exactly one calendar step apart
    /// 3. Round to cents and derive `net` / `value`
    ///
    /// Empty input gives an empty series.
    pub fn bucket(
        &self,
        records: &[NormalizedRecord],
        granularity: Granularity,
        options: BucketOptions,
    ) -> Vec<PeriodBucket> {
        let Some(first) = records.first() else {
            return Vec::new();
        };

        let (mut min, mut max) = (first.timestamp, first.timestamp);
        let mut sums: BTreeMap<PeriodKey, Totals> = BTreeMap::new();
        for record in records {
            min = min.min(record.timestamp);
            max = max.max(record.timestamp);
            let key = calendar::period_key(record.timestamp, granularity);
            let start = calendar::period_start(record.timestamp.date(), granularity);
            sums.entry(key)
                .or_insert_with(|| Totals::empty(start))
                .add(record.amount);
        }

        let filled: Vec<(PeriodKey, Totals)> = if granularity.is_calendar() {
            let starts = calendar::period_starts(min.date(), max.date(), granularity);
            if granularity == Granularity::Daily && starts.len() > LARGE_FILL_PERIODS {
                warn!(periods = starts.len(), "daily series spans more than ten years");
            }
            starts
                .into_iter()
                .map(|start| {
                    let key = calendar::period_key(start.and_time(NaiveTime::MIN), granularity);
                    let totals = sums.remove(&key).unwrap_or_else(|| Totals::empty(start));
                    (key, totals)
                })
                .collect()
        } else {
            sums.into_iter().collect()
        };

        debug!(
            records = records.len(),
            periods = filled.len(),
            %granularity,
            "bucketed records"
        );

        filled
            .into_iter()
            .map(|(key, totals)| Self::finalize(key, totals, options))
            .collect()
    }

    /// The plotted scalar series for `selector`.
    #[must_use]
    pub fn values(&self, buckets: &[PeriodBucket], selector: ValueSelector) -> Vec<f64> {
        buckets.iter().map(|b| b.select(selector)).collect()
    }

    /// Income, expenses and net summed over the whole series.
    #[must_use]
    pub fn totals(&self, buckets: &[PeriodBucket]) -> SeriesTotals {
        let income = round2(buckets.iter().map(|b| b.income).sum());
        let expenses = round2(buckets.iter().map(|b| b.expenses).sum());
        SeriesTotals {
            income,
            expenses,
            net: round2(income - expenses),
        }
    }

    fn finalize(key: PeriodKey, totals: Totals, options: BucketOptions) -> PeriodBucket {
        let income = round2(totals.income);
        let expenses = if options.include_expenses {
            round2(totals.expenses)
        } else {
            0.0
        };
        let net = round2(income - expenses);
        let mut bucket = PeriodBucket {
            key,
            start: totals.start,
            income,
            expenses,
            net,
            value: 0.0,
        };
        bucket.value = bucket.select(options.value_selector);
        bucket
    }
}

impl Default for BucketingService {
    fn default() -> Self {
        Self::new()
    }
}
