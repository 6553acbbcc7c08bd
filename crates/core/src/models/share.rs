use serde::{Deserialize, Serialize};

/// Default slice colours of the share chart.
pub const DEFAULT_PALETTE: [&str; 3] = ["#8884d8", "#82ca9d", "#ffc658"];

/// One named amount going into a share chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub name: String,
    pub amount: f64,
}

impl ShareEntry {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// A computed slice. Angles are in degrees, counter-clockwise positive,
/// so a clockwise sweep has `end_angle < start_angle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSlice {
    pub name: String,
    pub amount: f64,
    /// Fraction of the positive total, in [0, 1]
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: String,
}

impl ShareSlice {
    #[must_use]
    pub fn sweep(&self) -> f64 {
        (self.start_angle - self.end_angle).abs()
    }
}

/// A ready-to-draw categorical share (donut) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareChart {
    pub slices: Vec<ShareSlice>,
    /// Sum of the positive entry amounts
    pub computed_total: f64,
    /// The total shown in the centre: caller override if parseable, else computed
    pub display_total: f64,
}
