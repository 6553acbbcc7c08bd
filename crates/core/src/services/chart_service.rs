use tracing::debug;

use crate::errors::CoreError;
use crate::models::bucket::{PeriodBucket, ValueSelector};
use crate::models::chart::{
    AxisLabel, ChartFrame, ChartView, SeriesCurve, SeriesVisibility, Tooltip, TooltipLine,
};
use crate::models::geometry::{CurveGeometry, Insets, Point, Viewport};
use crate::models::settings::ChartSettings;
use crate::services::bucketing_service::BucketingService;
use crate::services::currency_service::CurrencyService;
use crate::services::geometry_service::GeometryService;

/// Shown instead of a chart when there is nothing to plot.
pub const NO_DATA_MESSAGE: &str = "No data to display";
/// Shown until the surface has received a usable width.
pub const NOT_MEASURED_MESSAGE: &str = "Waiting for chart size";

/// Composes bucketed series into drawable chart frames.
///
/// The core computes all the numbers; the rendering surface only draws.
/// Stateless: every frame is recomputed from its inputs.
pub struct ChartService {
    bucketing_service: BucketingService,
    geometry_service: GeometryService,
    currency_service: CurrencyService,
    min_label_spacing: f64,
}

impl ChartService {
    pub fn new(currency_service: CurrencyService, min_label_spacing: f64) -> Self {
        Self {
            bucketing_service: BucketingService::new(),
            geometry_service: GeometryService::new(),
            currency_service,
            min_label_spacing,
        }
    }

    /// Build the service from chart settings (validates the currency).
    pub fn from_settings(settings: &ChartSettings) -> Result<Self, CoreError> {
        let currency_service = CurrencyService::new(&settings.currency_display)?;
        Ok(Self::new(currency_service, settings.min_label_spacing))
    }

    #[must_use]
    pub fn currency_service(&self) -> &CurrencyService {
        &self.currency_service
    }

    /// Geometry of one series of `buckets`.
    #[must_use]
    pub fn curve(
        &self,
        buckets: &[PeriodBucket],
        series: ValueSelector,
        viewport: &Viewport,
    ) -> CurveGeometry {
        let values = self.bucketing_service.values(buckets, series);
        self.geometry_service.to_path(&values, viewport)
    }

    /// Index of the bucket nearest to pointer x, if there is any bucket.
    /// Needs only the bucket count; no geometry is built.
    #[must_use]
    pub fn hover_index(&self, count: usize, viewport: &Viewport, px: f64) -> Option<usize> {
        self.geometry_service.nearest_index(count, viewport, px)
    }

    /// Compose one complete frame.
    #[must_use]
    pub fn compose(
        &self,
        buckets: &[PeriodBucket],
        viewport: &Viewport,
        visibility: SeriesVisibility,
        primary: ValueSelector,
        hover: Option<usize>,
    ) -> ChartFrame {
        if buckets.is_empty() {
            return ChartFrame::Empty {
                message: NO_DATA_MESSAGE.to_string(),
            };
        }

        let curves: Vec<SeriesCurve> = visibility
            .visible()
            .into_iter()
            .map(|series| SeriesCurve {
                series,
                geometry: self.curve(buckets, series, viewport),
            })
            .collect();

        let step = self.geometry_service.step(buckets.len(), viewport);
        let labels = self
            .geometry_service
            .thin_labels(buckets.len(), viewport, self.min_label_spacing)
            .into_iter()
            .map(|index| AxisLabel {
                index,
                x: viewport.left() + index as f64 * step,
                text: buckets[index].key.to_string(),
            })
            .collect();

        let tooltip = hover.filter(|i| *i < buckets.len()).and_then(|index| {
            let anchor = match curves.iter().find(|c| c.series == primary) {
                Some(drawn) => drawn.geometry.path()?.points.get(index).copied(),
                // Hidden primary series: project it just for the anchor.
                None => self
                    .curve(buckets, primary, viewport)
                    .path()?
                    .points
                    .get(index)
                    .copied(),
            }?;
            Some(self.tooltip(&buckets[index], visibility, index, anchor))
        });

        ChartFrame::Chart(ChartView {
            viewport: *viewport,
            period_count: buckets.len(),
            primary,
            curves,
            labels,
            tooltip,
        })
    }

    fn tooltip(
        &self,
        bucket: &PeriodBucket,
        visibility: SeriesVisibility,
        index: usize,
        anchor: Point,
    ) -> Tooltip {
        let lines = visibility
            .visible()
            .into_iter()
            .map(|series| TooltipLine {
                series,
                text: self.currency_service.format(bucket.select(series)),
            })
            .collect();
        Tooltip {
            index,
            anchor,
            title: bucket.key.to_string(),
            lines,
        }
    }
}

/// Input events of the chart surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The observed width changed.
    Resized { width: f64 },
    /// The pointer moved to x (surface coordinates).
    PointerMoved { x: f64 },
    /// The pointer left the surface.
    PointerLeft,
    /// A freshly bucketed series replaces the current one.
    DataChanged(Vec<PeriodBucket>),
    /// Show or hide one series.
    ToggleSeries(ValueSelector),
    /// Show all series again.
    ResetSeries,
}

/// Owns the transient view state of one chart and turns it into frames.
///
/// Only the surface writes its width, hover index and visibility; all
/// computation is delegated to `ChartService`.
pub struct ChartSurface {
    chart_service: ChartService,
    height: f64,
    padding: Insets,
    primary: ValueSelector,
    width: Option<f64>,
    hover_index: Option<usize>,
    visibility: SeriesVisibility,
    buckets: Vec<PeriodBucket>,
}

impl ChartSurface {
    pub fn new(chart_service: ChartService, settings: &ChartSettings) -> Self {
        Self {
            chart_service,
            height: settings.viewport_height,
            padding: Insets::default(),
            primary: settings.value_selector,
            width: None,
            hover_index: None,
            visibility: SeriesVisibility::default(),
            buckets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: SeriesVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    #[must_use]
    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    #[must_use]
    pub fn visibility(&self) -> SeriesVisibility {
        self.visibility
    }

    #[must_use]
    pub fn buckets(&self) -> &[PeriodBucket] {
        &self.buckets
    }

    /// Current viewport, once a usable width has been observed.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        let width = self.width?;
        Viewport::new(width, self.height, self.padding).ok()
    }

    /// Apply one event. Returns whether the surface needs a redraw.
    pub fn handle(&mut self, event: SurfaceEvent) -> bool {
        match event {
            SurfaceEvent::Resized { width } => {
                if !width.is_finite() || width <= 0.0 {
                    debug!(width, "ignoring unusable surface width");
                    return false;
                }
                if self.width == Some(width) {
                    return false;
                }
                self.width = Some(width);
                true
            }
            SurfaceEvent::PointerMoved { x } => {
                let next = self.viewport().and_then(|viewport| {
                    self.chart_service
                        .hover_index(self.buckets.len(), &viewport, x)
                });
                self.set_hover(next)
            }
            SurfaceEvent::PointerLeft => self.set_hover(None),
            SurfaceEvent::DataChanged(buckets) => {
                self.buckets = buckets;
                self.hover_index = None;
                true
            }
            SurfaceEvent::ToggleSeries(series) => {
                self.visibility.toggle(series);
                true
            }
            SurfaceEvent::ResetSeries => {
                let changed = self.visibility != SeriesVisibility::default();
                self.visibility = SeriesVisibility::default();
                changed
            }
        }
    }

    /// Everything needed to draw the current state.
    #[must_use]
    pub fn frame(&self) -> ChartFrame {
        let Some(viewport) = self.viewport() else {
            return ChartFrame::Empty {
                message: NOT_MEASURED_MESSAGE.to_string(),
            };
        };
        self.chart_service.compose(
            &self.buckets,
            &viewport,
            self.visibility,
            self.primary,
            self.hover_index,
        )
    }

    fn set_hover(&mut self, next: Option<usize>) -> bool {
        let changed = self.hover_index != next;
        self.hover_index = next;
        changed
    }
}
