use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Write;

use crate::errors::CoreError;

/// A pixel-space coordinate. y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Space reserved around the drawing area (axes, labels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl Default for Insets {
    /// Line chart margins: 8 / 20 / 6 / 0.
    fn default() -> Self {
        Self {
            top: 8.0,
            right: 20.0,
            bottom: 6.0,
            left: 0.0,
        }
    }
}

/// The rectangle a curve is drawn into.
///
/// Only constructible through `Viewport::new`, so sizes and padding are
/// always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    width: f64,
    height: f64,
    padding: Insets,
}

impl<'de> Deserialize<'de> for Viewport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Fields {
            width: f64,
            height: f64,
            #[serde(default)]
            padding: Insets,
        }

        let f = Fields::deserialize(deserializer)?;
        Viewport::new(f.width, f.height, f.padding).map_err(serde::de::Error::custom)
    }
}

impl Viewport {
    /// Build a viewport, rejecting negative or non-finite sizes.
    pub fn new(width: f64, height: f64, padding: Insets) -> Result<Self, CoreError> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(CoreError::InvalidViewport(format!(
                "size must be finite and non-negative, got {width}x{height}"
            )));
        }
        let pads = [padding.top, padding.right, padding.bottom, padding.left];
        if pads.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(CoreError::InvalidViewport(
                "padding must be finite and non-negative".to_string(),
            ));
        }
        Ok(Self {
            width,
            height,
            padding,
        })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn padding(&self) -> Insets {
        self.padding
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.padding.left
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.padding.top
    }

    #[must_use]
    pub fn inner_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    #[must_use]
    pub fn inner_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }

    /// y of the bottom edge of the drawing area; also the area baseline.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top() + self.inner_height()
    }

    #[must_use]
    pub fn clamp_y(&self, y: f64) -> f64 {
        y.clamp(self.top(), self.bottom())
    }
}

/// One cubic Bezier piece of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub from: Point,
    pub bp1: Point,
    pub bp2: Point,
    pub to: Point,
}

/// Closing edges of the shaded area under the curve:
/// last point → (last.x, baseline) → (first.x, baseline) → first point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaClosure {
    pub baseline_y: f64,
    pub first: Point,
    pub last: Point,
}

impl AreaClosure {
    #[must_use]
    pub fn closing_points(&self) -> [Point; 3] {
        [
            Point::new(self.last.x, self.baseline_y),
            Point::new(self.first.x, self.baseline_y),
            self.first,
        ]
    }
}

/// A drawable smooth curve through evenly spaced samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    pub points: Vec<Point>,
    pub segments: Vec<CurveSegment>,
    pub area: AreaClosure,
}

impl CurvePath {
    /// Index of the point horizontally nearest to `px`.
    ///
    /// Points are sorted by x, so this is a binary search. On an exact
    /// midpoint the earlier index wins.
    #[must_use]
    pub fn hit_test(&self, px: f64) -> usize {
        let idx = self.points.partition_point(|p| p.x < px);
        if idx == 0 {
            return 0;
        }
        if idx >= self.points.len() {
            return self.first_at(self.points.len() - 1);
        }
        let left = px - self.points[idx - 1].x;
        let right = self.points[idx].x - px;
        let nearest = if left <= right { idx - 1 } else { idx };
        self.first_at(nearest)
    }

    /// Lowest index whose x equals that of `index`.
    fn first_at(&self, index: usize) -> usize {
        let x = self.points[index].x;
        self.points[..index]
            .iter()
            .rposition(|p| p.x != x)
            .map_or(0, |i| i + 1)
    }

    /// SVG path data for the stroke: `M x y C ...`.
    #[must_use]
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        let Some(first) = self.points.first() else {
            return d;
        };
        let _ = write!(d, "M{:.2},{:.2}", first.x, first.y);
        for s in &self.segments {
            let _ = write!(
                d,
                " C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                s.bp1.x, s.bp1.y, s.bp2.x, s.bp2.y, s.to.x, s.to.y
            );
        }
        d
    }

    /// SVG path data for the filled area below the stroke.
    #[must_use]
    pub fn to_svg_area_path(&self) -> String {
        let mut d = self.to_svg_path();
        if d.is_empty() {
            return d;
        }
        let [down, across, _] = self.area.closing_points();
        let _ = write!(
            d,
            " L{:.2},{:.2} L{:.2},{:.2} Z",
            down.x, down.y, across.x, across.y
        );
        d
    }
}

/// Result of turning a series into geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveGeometry {
    /// The series was empty; render an explicit "no data" state.
    NoData,
    Curve(CurvePath),
}

impl CurveGeometry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, CurveGeometry::NoData)
    }

    #[must_use]
    pub fn path(&self) -> Option<&CurvePath> {
        match self {
            CurveGeometry::NoData => None,
            CurveGeometry::Curve(path) => Some(path),
        }
    }

    #[must_use]
    pub fn hit_test(&self, px: f64) -> Option<usize> {
        self.path().map(|p| p.hit_test(px))
    }
}
