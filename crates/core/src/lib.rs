pub mod errors;
pub mod models;
pub mod services;

use models::{
    bucket::{BucketOptions, Granularity, PeriodBucket, ValueSelector},
    geometry::{CurveGeometry, Insets, Viewport},
    record::{NormalizedRecord, RawRecord, RawValue},
    settings::{AmountConvention, ChartSettings, CurrencyDisplay},
    share::{ShareChart, ShareEntry},
};
use services::{
    bucketing_service::{BucketingService, SeriesTotals},
    chart_service::{ChartService, ChartSurface},
    currency_service::CurrencyService,
    geometry_service::GeometryService,
    record_normalizer::RecordNormalizer,
    share_service::ShareService,
};

use errors::CoreError;

/// Slice colours of the finance overview: balance, expenses, income.
const OVERVIEW_PALETTE: [&str; 3] = ["#59168B", "#a0090e", "#016630"];

/// Main entry point for the finance charts core library.
/// Holds the chart settings and all services needed to turn raw
/// transaction records into drawable charts.
#[must_use]
pub struct FinanceCharts {
    settings: ChartSettings,
    normalizer: RecordNormalizer,
    bucketing_service: BucketingService,
    geometry_service: GeometryService,
    currency_service: CurrencyService,
    share_service: ShareService,
}

impl std::fmt::Debug for FinanceCharts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceCharts")
            .field("settings", &self.settings)
            .field("locale", &self.currency_service.locale())
            .finish()
    }
}

impl FinanceCharts {
    /// Create the library with validated settings.
    pub fn new(settings: ChartSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        let currency_service = CurrencyService::new(&settings.currency_display)?;
        let normalizer = RecordNormalizer::new(settings.amount_convention);
        Ok(Self {
            normalizer,
            bucketing_service: BucketingService::new(),
            geometry_service: GeometryService::new(),
            currency_service,
            share_service: ShareService::new(normalizer),
            settings,
        })
    }

    /// Create the library from a JSON settings document.
    pub fn from_settings_json(json: &str) -> Result<Self, CoreError> {
        Self::new(ChartSettings::from_json(json)?)
    }

    // ── Records ─────────────────────────────────────────────────────

    /// Normalize one raw record, or reject it.
    #[must_use]
    pub fn normalize(&self, raw: &RawRecord) -> Option<NormalizedRecord> {
        self.normalizer.normalize(raw)
    }

    /// Normalize a batch, silently dropping records that cannot be parsed.
    #[must_use]
    pub fn normalize_batch(&self, raws: &[RawRecord]) -> Vec<NormalizedRecord> {
        self.normalizer.normalize_batch(raws)
    }

    // ── Bucketing ───────────────────────────────────────────────────

    /// Bucket raw records with the configured granularity and options.
    #[must_use]
    pub fn bucket(&self, raws: &[RawRecord]) -> Vec<PeriodBucket> {
        self.bucket_with(
            raws,
            self.settings.granularity,
            self.settings.bucket_options(),
        )
    }

    /// Bucket raw records with an explicit granularity and options.
    #[must_use]
    pub fn bucket_with(
        &self,
        raws: &[RawRecord],
        granularity: Granularity,
        options: BucketOptions,
    ) -> Vec<PeriodBucket> {
        let records = self.normalizer.normalize_batch(raws);
        self.bucketing_service.bucket(&records, granularity, options)
    }

    /// Decode a JSON array of records and bucket it with the configured settings.
    /// Individual records that cannot be parsed are dropped; a document that
    /// is not an array of objects is an error.
    pub fn bucket_json(&self, json: &str) -> Result<Vec<PeriodBucket>, CoreError> {
        let raws: Vec<RawRecord> = serde_json::from_str(json)?;
        Ok(self.bucket(&raws))
    }

    /// The plotted scalar series (configured value selector).
    #[must_use]
    pub fn series(&self, buckets: &[PeriodBucket]) -> Vec<f64> {
        self.bucketing_service
            .values(buckets, self.settings.value_selector)
    }

    /// Income, expenses and net over the whole series.
    #[must_use]
    pub fn totals(&self, buckets: &[PeriodBucket]) -> SeriesTotals {
        self.bucketing_service.totals(buckets)
    }

    // ── Geometry ────────────────────────────────────────────────────

    /// Smooth curve for `series` in a viewport of `width` × configured height.
    pub fn curve(&self, series: &[f64], width: f64) -> Result<CurveGeometry, CoreError> {
        let viewport = Viewport::new(width, self.settings.viewport_height, Insets::default())?;
        Ok(self.geometry_service.to_path(series, &viewport))
    }

    /// A fresh interactive chart surface using the current settings.
    pub fn surface(&self) -> Result<ChartSurface, CoreError> {
        let chart_service = ChartService::from_settings(&self.settings)?;
        Ok(ChartSurface::new(chart_service, &self.settings))
    }

    // ── Shares & Formatting ─────────────────────────────────────────

    /// Share chart of arbitrary named amounts.
    #[must_use]
    pub fn share_chart(&self, entries: &[ShareEntry], total_override: Option<&RawValue>) -> ShareChart {
        self.share_service.compute(entries, total_override, &[])
    }

    /// Balance / expenses / income overview of a bucketed series,
    /// with the balance as the centre total.
    #[must_use]
    pub fn finance_overview(&self, buckets: &[PeriodBucket]) -> ShareChart {
        let totals = self.totals(buckets);
        let entries = [
            ShareEntry::new("Total Balance", totals.net),
            ShareEntry::new("Total Expenses", totals.expenses),
            ShareEntry::new("Total Income", totals.income),
        ];
        let balance = RawValue::Number(totals.net);
        self.share_service
            .compute(&entries, Some(&balance), &OVERVIEW_PALETTE)
    }

    /// Format an amount in the configured locale and currency.
    #[must_use]
    pub fn format_amount(&self, value: f64) -> String {
        self.currency_service.format(value)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Set the granularity from its name; unknown names are an error.
    pub fn set_granularity(&mut self, granularity: &str) -> Result<(), CoreError> {
        self.settings.granularity = granularity.parse()?;
        Ok(())
    }

    /// Set the plotted aggregate from its name; unknown names are an error.
    pub fn set_value_selector(&mut self, selector: &str) -> Result<(), CoreError> {
        self.settings.value_selector = selector.parse::<ValueSelector>()?;
        Ok(())
    }

    pub fn set_include_expenses(&mut self, include: bool) {
        self.settings.include_expenses = include;
    }

    /// Change the display locale and currency.
    /// Currency code must be a 3-letter alphabetic string.
    pub fn set_currency_display(&mut self, display: CurrencyDisplay) -> Result<(), CoreError> {
        self.currency_service = CurrencyService::new(&display)?;
        self.settings.currency_display = display;
        Ok(())
    }

    /// Change how textual amounts resolve `,` and `.`.
    pub fn set_amount_convention(&mut self, convention: AmountConvention) {
        self.settings.amount_convention = convention;
        self.normalizer = RecordNormalizer::new(convention);
        self.share_service = ShareService::new(self.normalizer);
    }
}
