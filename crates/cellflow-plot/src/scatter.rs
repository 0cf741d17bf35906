//! Scatter plot with an overlaid fitted line

use crate::error::{Error, Result};
use crate::ChartArtifact;
use charming::component::{Axis, Legend, Title};
use charming::element::{AxisType, ItemStyle};
use charming::series::{Line, Scatter};
use charming::Chart;
use tracing::trace;

/// Options for [`scatter_with_fit`]
///
/// ```rust
/// use cellflow_plot::ScatterFit;
///
/// let artifact = ScatterFit::new()
///     .title("demo")
///     .resolution(10)
///     .render(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], 2.0, 1.0)
///     .unwrap();
/// assert_eq!(artifact.kind, "echarts");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFit {
    title: String,
    x_name: String,
    y_name: String,
    resolution: usize,
    opacity: f64,
    symbol_size: f64,
}

impl Default for ScatterFit {
    fn default() -> Self {
        Self {
            title: "y vs x with fitted line".to_string(),
            x_name: "x".to_string(),
            y_name: "y".to_string(),
            resolution: 100,
            opacity: 0.6,
            symbol_size: 6.0,
        }
    }
}

impl ScatterFit {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the axis names
    pub fn axis_names(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_name = x.into();
        self.y_name = y.into();
        self
    }

    /// Number of points on the fitted line (at least 2)
    pub fn resolution(mut self, points: usize) -> Self {
        self.resolution = points.max(2);
        self
    }

    /// Opacity of the scatter markers
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Render samples and the line `y = slope·x + intercept`
    ///
    /// The line spans the observed x range.
    pub fn render(&self, xs: &[f64], ys: &[f64], slope: f64, intercept: f64) -> Result<ChartArtifact> {
        if xs.is_empty() {
            return Err(Error::EmptySeries("x"));
        }
        if xs.len() != ys.len() {
            return Err(Error::SizeMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        if xs.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFinite("x"));
        }
        if ys.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFinite("y"));
        }
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(Error::NonFinite("fitted line"));
        }

        let points: Vec<Vec<f64>> = xs.iter().zip(ys).map(|(&x, &y)| vec![x, y]).collect();
        let line = self.line_points(xs, slope, intercept);
        trace!(samples = points.len(), line = line.len(), "rendering scatter with fit");

        let chart = Chart::new()
            .title(Title::new().text(self.title.as_str()))
            .legend(Legend::new())
            .x_axis(Axis::new().type_(AxisType::Value).name(self.x_name.as_str()))
            .y_axis(Axis::new().type_(AxisType::Value).name(self.y_name.as_str()))
            .series(
                Scatter::new()
                    .name("samples")
                    .symbol_size(self.symbol_size)
                    .item_style(ItemStyle::new().opacity(self.opacity))
                    .data(points),
            )
            .series(Line::new().name("fitted line").show_symbol(false).data(line));

        Ok(ChartArtifact::echarts(chart.to_string()))
    }

    fn line_points(&self, xs: &[f64], slope: f64, intercept: f64) -> Vec<Vec<f64>> {
        let (lo, hi) = xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let step = (hi - lo) / (self.resolution - 1) as f64;
        (0..self.resolution)
            .map(|i| {
                let x = if i + 1 == self.resolution { hi } else { lo + step * i as f64 };
                vec![x, slope * x + intercept]
            })
            .collect()
    }
}

/// Scatter of `(xs, ys)` with the fitted line drawn over `resolution` points
pub fn scatter_with_fit(
    xs: &[f64],
    ys: &[f64],
    slope: f64,
    intercept: f64,
    resolution: usize,
) -> Result<ChartArtifact> {
    ScatterFit::new()
        .resolution(resolution)
        .render(xs, ys, slope, intercept)
}
