use serde::{Deserialize, Serialize};

use super::bucket::ValueSelector;
use super::geometry::{CurveGeometry, Point, Viewport};

/// Which of the income / expenses / net lines are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesVisibility {
    pub income: bool,
    pub expenses: bool,
    pub net: bool,
}

impl SeriesVisibility {
    /// Only one series shown.
    pub fn only(series: ValueSelector) -> Self {
        let mut v = Self {
            income: false,
            expenses: false,
            net: false,
        };
        v.set(series, true);
        v
    }

    #[must_use]
    pub fn is_visible(&self, series: ValueSelector) -> bool {
        match series {
            ValueSelector::Income => self.income,
            ValueSelector::Expenses => self.expenses,
            ValueSelector::Net => self.net,
        }
    }

    pub fn set(&mut self, series: ValueSelector, visible: bool) {
        match series {
            ValueSelector::Income => self.income = visible,
            ValueSelector::Expenses => self.expenses = visible,
            ValueSelector::Net => self.net = visible,
        }
    }

    pub fn toggle(&mut self, series: ValueSelector) {
        let current = self.is_visible(series);
        self.set(series, !current);
    }

    /// Visible series in drawing order.
    #[must_use]
    pub fn visible(&self) -> Vec<ValueSelector> {
        ValueSelector::ALL
            .into_iter()
            .filter(|s| self.is_visible(*s))
            .collect()
    }
}

impl Default for SeriesVisibility {
    fn default() -> Self {
        Self {
            income: true,
            expenses: true,
            net: true,
        }
    }
}

/// One drawn line of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesCurve {
    pub series: ValueSelector,
    pub geometry: CurveGeometry,
}

/// An x-axis tick label that survived thinning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub index: usize,
    pub x: f64,
    pub text: String,
}

/// One formatted row of the hover tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipLine {
    pub series: ValueSelector,
    pub text: String,
}

/// What the rendering surface shows next to the hovered period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub index: usize,
    /// Position of the hovered point on the primary series
    pub anchor: Point,
    /// Period label, e.g. "2024-03"
    pub title: String,
    pub lines: Vec<TooltipLine>,
}

/// Everything the rendering surface needs for one draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub viewport: Viewport,
    pub period_count: usize,
    /// The series the area fill and the hover anchor follow
    pub primary: ValueSelector,
    pub curves: Vec<SeriesCurve>,
    pub labels: Vec<AxisLabel>,
    pub tooltip: Option<Tooltip>,
}

impl ChartView {
    #[must_use]
    pub fn curve(&self, series: ValueSelector) -> Option<&SeriesCurve> {
        self.curves.iter().find(|c| c.series == series)
    }
}

/// Output of the chart surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartFrame {
    /// Nothing to draw yet: no data, or the surface was never measured.
    Empty { message: String },
    Chart(ChartView),
}

impl ChartFrame {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartFrame::Empty { .. })
    }

    #[must_use]
    pub fn view(&self) -> Option<&ChartView> {
        match self {
            ChartFrame::Empty { .. } => None,
            ChartFrame::Chart(view) => Some(view),
        }
    }
}
