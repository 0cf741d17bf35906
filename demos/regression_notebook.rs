//! Drive the regression notebook from simulated slider events
//!
//! Run with `RUST_LOG=debug` to see every cell execution, or pass a JSON
//! config path as the first argument.

use anyhow::Result;
use cellflow::engine::{LoggingHandler, MetricsHandler};
use cellflow::notebook::notebook;
use cellflow::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => NotebookConfig::from_json_file(path)?,
        None => NotebookConfig::default(),
    };

    let mut evaluator = notebook(&config)?;
    let metrics = MetricsHandler::new();
    evaluator.event_bus().register(metrics.clone())?;
    evaluator
        .event_bus()
        .register(LoggingHandler::new(tracing::Level::DEBUG))?;

    let report = evaluator.run_all();
    info!(trace_id = %report.trace_id, executed = report.executed.len(), "initial pass");
    print_summary(&evaluator);

    // A host thread would hold this handle and submit as the user drags
    let host = evaluator.widget_events();
    for sigma in [1.5, 2.0, 2.5, 3.0] {
        host.submit(widgets::NOISE, sigma)?;
    }
    host.submit(widgets::SAMPLES, 800)?;
    host.submit(widgets::SAMPLES, 5000)?;

    let pumped = evaluator.pump()?;
    for (widget, error) in &pumped.rejected {
        info!(%widget, %error, "rejected slider value");
    }
    if let Some(pass) = &pumped.pass {
        info!(executed = ?pass.executed, duration = ?pass.duration, "incremental pass");
    }
    print_summary(&evaluator);

    if let Some((kind, payload)) = evaluator.snapshot().value(outputs::FIGURE).and_then(Value::as_artifact) {
        println!("figure: {kind} option, {} bytes", payload.len());
    }

    let totals = metrics.snapshot()?;
    println!(
        "passes: {}, cell executions: {}, rejected slider values: {}",
        totals.passes, totals.executions, totals.rejected_widget_values
    );
    Ok(())
}

fn print_summary(evaluator: &Evaluator) {
    match evaluator.snapshot().get(outputs::SUMMARY).map(|e| &e.value) {
        Some(OutputValue::Ready(md)) => println!("{}\n", md.as_text().unwrap_or_default()),
        Some(OutputValue::Failed(error)) => println!("summary failed: {error}\n"),
        _ => println!("summary not computed\n"),
    }
}
