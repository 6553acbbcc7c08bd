use crate::models::geometry::{AreaClosure, CurveGeometry, CurvePath, CurveSegment, Point, Viewport};

/// Turns a scalar series into a smooth, frame-bounded curve.
///
/// Samples are assumed evenly spaced along x; the bucketing service's gap
/// filling guarantees that for period series.
pub struct GeometryService;

impl GeometryService {
    pub fn new() -> Self {
        Self
    }

    /// Project `series` into `viewport` and smooth it with clamped
    /// Catmull-Rom splines converted to cubic Bezier segments.
    #[must_use]
    pub fn to_path(&self, series: &[f64], viewport: &Viewport) -> CurveGeometry {
        if series.is_empty() {
            return CurveGeometry::NoData;
        }

        let points = Self::project(series, viewport);
        let segments = Self::smooth(&points, viewport);
        let area = AreaClosure {
            baseline_y: viewport.bottom(),
            first: points[0],
            last: points[points.len() - 1],
        };

        CurveGeometry::Curve(CurvePath {
            points,
            segments,
            area,
        })
    }

    /// Indices of the x-axis labels to draw so that neighbours are at least
    /// `min_spacing` pixels apart: every k-th label plus always the last one.
    #[must_use]
    pub fn thin_labels(&self, count: usize, viewport: &Viewport, min_spacing: f64) -> Vec<usize> {
        if count == 0 {
            return Vec::new();
        }
        let max_slots = if min_spacing > 0.0 && min_spacing.is_finite() {
            ((viewport.inner_width() / min_spacing).floor() as usize).max(1)
        } else {
            count
        };
        if count <= max_slots {
            return (0..count).collect();
        }

        let k = count.div_ceil(max_slots);
        let mut indices: Vec<usize> = (0..count).step_by(k).collect();
        if indices.last() != Some(&(count - 1)) {
            indices.push(count - 1);
        }
        indices
    }

    /// Index of the sample nearest to pointer x, from the sample spacing
    /// alone. Agrees with `CurvePath::hit_test`: exact midpoints and
    /// collapsed (zero-width) layouts resolve to the earlier index.
    #[must_use]
    pub fn nearest_index(&self, count: usize, viewport: &Viewport, px: f64) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let step = Self::sample_step(count, viewport);
        if step <= 0.0 || px.is_nan() {
            return Some(0);
        }
        let offset = ((px - viewport.left()) / step).clamp(0.0, (count - 1) as f64);
        let below = offset.floor();
        let index = if offset - below <= 0.5 { below } else { below + 1.0 };
        Some(index as usize)
    }

    /// Horizontal distance between neighbouring samples.
    #[must_use]
    pub fn step(&self, count: usize, viewport: &Viewport) -> f64 {
        Self::sample_step(count, viewport)
    }

    fn sample_step(count: usize, viewport: &Viewport) -> f64 {
        if count > 1 {
            viewport.inner_width() / (count - 1) as f64
        } else {
            0.0
        }
    }

    fn project(series: &[f64], viewport: &Viewport) -> Vec<Point> {
        // Non-finite samples plot as zero.
        let values: Vec<f64> = series
            .iter()
            .map(|v| if v.is_finite() { *v } else { 0.0 })
            .collect();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        let inner_height = viewport.inner_height();
        let step = Self::sample_step(values.len(), viewport);

        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let scaled = if range.abs() < f64::EPSILON {
                    inner_height / 2.0
                } else {
                    (v - min) / range * inner_height
                };
                let x = viewport.left() + i as f64 * step;
                let y = viewport.clamp_y(viewport.top() + inner_height - scaled);
                Point::new(x, y)
            })
            .collect()
    }

    fn smooth(points: &[Point], viewport: &Viewport) -> Vec<CurveSegment> {
        if points.len() == 1 {
            let p = points[0];
            return vec![CurveSegment {
                from: p,
                bp1: p,
                bp2: p,
                to: p,
            }];
        }

        let last = points.len() - 1;
        (0..last)
            .map(|i| {
                let p0 = points[i.saturating_sub(1)];
                let p1 = points[i];
                let p2 = points[i + 1];
                let p3 = points[(i + 2).min(last)];

                let bp1 = Point::new(
                    p1.x + (p2.x - p0.x) / 6.0,
                    viewport.clamp_y(p1.y + (p2.y - p0.y) / 6.0),
                );
                let bp2 = Point::new(
                    p2.x - (p3.x - p1.x) / 6.0,
                    viewport.clamp_y(p2.y - (p3.y - p1.y) / 6.0),
                );

                CurveSegment {
                    from: p1,
                    bp1,
                    bp2,
                    to: p2,
                }
            })
            .collect()
    }
}

impl Default for GeometryService {
    fn default() -> Self {
        Self::new()
    }
}
