//! Regression notebook: two sliders drive synthetic data, a least-squares
//! fit, a Markdown summary, a chart and a layout.
//!
//! | cell | inputs | outputs |
//! |------|--------|---------|
//! | `data` | `n_slider`, `noise_slider` | `df`, `n`, `sigma` |
//! | `analysis` | `df` | `r`, `slope`, `intercept` |
//! | `summary` | `r`, `slope`, `intercept`, `n`, `sigma` | `md` |
//! | `plot` | `df`, `slope`, `intercept` | `fig` |
//! | `layout` | `n_slider`, `noise_slider`, `md`, `fig` | `ui` |

use crate::config::NotebookConfig;
use crate::error::Result;
use cellflow_core::{Cell, CellError, CellInputs, CellResult, Evaluator, NotebookBuilder, Table, Value};
use cellflow_plot::ScatterFit;
use cellflow_stats::{correlate, fit, LinearModel};
use tracing::debug;

/// Widget identifiers
pub mod widgets {
    pub const SAMPLES: &str = "n_slider";
    pub const NOISE: &str = "noise_slider";
}

/// Output names
pub mod outputs {
    pub const DATA: &str = "df";
    pub const N: &str = "n";
    pub const SIGMA: &str = "sigma";
    pub const R: &str = "r";
    pub const SLOPE: &str = "slope";
    pub const INTERCEPT: &str = "intercept";
    pub const SUMMARY: &str = "md";
    pub const FIGURE: &str = "fig";
    pub const LAYOUT: &str = "ui";
}

/// Markdown summary of a fit
pub fn summary_markdown(n: i64, sigma: f64, r: f64, slope: f64, intercept: f64) -> String {
    format!(
        "### Relationship summary\n\n\
         - Samples: **{n}**\n\
         - Noise σ: **{sigma:.2}**\n\
         - Pearson correlation: **{r:.3}**\n\
         - Fitted model: **y = {slope:.3}·x + {intercept:.3}**\n\n\
         **As σ increases**, points spread farther from the line, correlation decreases, \
         and the fitted slope/intercept may drift."
    )
}

/// Register the notebook's widgets and cells on `builder`
///
/// Call inside [`NotebookBuilder::with_namespace`] to host several copies in
/// one evaluator.
pub fn register(builder: NotebookBuilder, config: &NotebookConfig) -> Result<NotebookBuilder> {
    config.validate()?;
    debug!(namespace = %builder.qualify(""), seed = config.seed, "registering regression notebook");

    Ok(builder
        .widget(config.samples.widget(widgets::SAMPLES)?)
        .widget(config.noise.widget(widgets::NOISE)?)
        .cell(data_cell(config))
        .cell(analysis_cell())
        .cell(summary_cell())
        .cell(plot_cell(config))
        .cell(layout_cell(config)))
}

/// Build a standalone evaluator for the notebook
pub fn notebook(config: &NotebookConfig) -> Result<Evaluator> {
    Ok(register(NotebookBuilder::new(), config)?.build()?)
}

fn data_cell(config: &NotebookConfig) -> Cell {
    let model = LinearModel::new(config.true_slope, config.true_intercept);
    let seed = config.seed;
    Cell::new(
        "data",
        [widgets::SAMPLES, widgets::NOISE],
        [outputs::DATA, outputs::N, outputs::SIGMA],
        move |inputs| {
            let n = inputs.integer(widgets::SAMPLES)?;
            let sigma = inputs.float(widgets::NOISE)?;
            let count = usize::try_from(n)
                .map_err(|_| CellError::computation(format!("sample count {n} is negative")))?;

            let samples = model.sample(count, sigma, seed).map_err(CellError::computation)?;
            let df = Table::new()
                .with_column("x", samples.x)
                .and_then(|t| t.with_column("y", samples.y))
                .map_err(CellError::Computation)?;

            Ok(vec![Value::Table(df), Value::Integer(n), Value::Float(sigma)])
        },
    )
}

fn columns<'a>(inputs: &CellInputs<'a>) -> CellResult<(&'a [f64], &'a [f64])> {
    let df = inputs.table(outputs::DATA)?;
    let column = |name: &str| {
        df.column(name)
            .ok_or_else(|| CellError::computation(format!("table has no column '{name}'")))
    };
    Ok((column("x")?, column("y")?))
}

fn analysis_cell() -> Cell {
    Cell::new(
        "analysis",
        [outputs::DATA],
        [outputs::R, outputs::SLOPE, outputs::INTERCEPT],
        |inputs| {
            let (x, y) = columns(inputs)?;
            let r = correlate(x, y).map_err(CellError::computation)?;
            let line = fit(x, y).map_err(CellError::computation)?;
            Ok(vec![
                Value::Float(r),
                Value::Float(line.slope),
                Value::Float(line.intercept),
            ])
        },
    )
}

fn summary_cell() -> Cell {
    Cell::new(
        "summary",
        [outputs::R, outputs::SLOPE, outputs::INTERCEPT, outputs::N, outputs::SIGMA],
        [outputs::SUMMARY],
        |inputs| {
            let md = summary_markdown(
                inputs.integer(outputs::N)?,
                inputs.float(outputs::SIGMA)?,
                inputs.float(outputs::R)?,
                inputs.float(outputs::SLOPE)?,
                inputs.float(outputs::INTERCEPT)?,
            );
            Ok(vec![Value::Markdown(md)])
        },
    )
}

fn plot_cell(config: &NotebookConfig) -> Cell {
    let chart = ScatterFit::new().resolution(config.line_resolution);
    Cell::new(
        "plot",
        [outputs::DATA, outputs::SLOPE, outputs::INTERCEPT],
        [outputs::FIGURE],
        move |inputs| {
            let (x, y) = columns(inputs)?;
            let artifact = chart
                .render(
                    x,
                    y,
                    inputs.float(outputs::SLOPE)?,
                    inputs.float(outputs::INTERCEPT)?,
                )
                .map_err(CellError::computation)?;
            Ok(vec![artifact.into()])
        },
    )
}

fn layout_cell(config: &NotebookConfig) -> Cell {
    let samples_label = config.samples.label.clone();
    let noise_label = config.noise.label.clone();
    Cell::new(
        "layout",
        [widgets::SAMPLES, widgets::NOISE, outputs::SUMMARY, outputs::FIGURE],
        [outputs::LAYOUT],
        move |inputs| {
            let sliders = Value::Layout(vec![
                Value::Text(format!("{samples_label}: {}", inputs.integer(widgets::SAMPLES)?)),
                Value::Text(format!("{noise_label}: {:.1}", inputs.float(widgets::NOISE)?)),
            ]);
            Ok(vec![Value::Layout(vec![
                sliders,
                inputs.get(outputs::SUMMARY)?.clone(),
                inputs.get(outputs::FIGURE)?.clone(),
            ])])
        },
    )
}
