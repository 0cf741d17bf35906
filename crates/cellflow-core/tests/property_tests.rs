//! Property-based tests for graph evaluation and the widget store

use cellflow_core::prelude::*;
use proptest::prelude::*;

/// Build a random DAG: cell `i` reads the outputs of the earlier cells picked
/// by `masks[i]`, or the widget when none are picked. Cells are declared in
/// reverse so the evaluator has to sort them.
fn random_notebook(masks: &[u16]) -> Evaluator {
    let mut builder = NotebookBuilder::new()
        .widget(Widget::new("w", "w", WidgetDomain::int_slider(0, 100), 1).unwrap());
    let mut cells = Vec::new();
    for (i, mask) in masks.iter().enumerate() {
        let mut inputs: Vec<String> = (0..i.min(16))
            .filter(|j| mask & (1 << j) != 0)
            .map(|j| format!("o{j}"))
            .collect();
        if inputs.is_empty() {
            inputs.push("w".to_string());
        }
        let names = inputs.clone();
        let offset = i as f64;
        cells.push(Cell::new(format!("c{i}"), inputs, [format!("o{i}")], move |cell_inputs| {
            let mut total = offset;
            for name in &names {
                total += cell_inputs.float(name)?;
            }
            Ok(vec![Value::Float(total)])
        }));
    }
    for cell in cells.into_iter().rev() {
        builder = builder.cell(cell);
    }
    builder.build().unwrap()
}

proptest! {
    #[test]
    fn prop_run_all_covers_every_output(masks in proptest::collection::vec(any::<u16>(), 1..12)) {
        let mut evaluator = random_notebook(&masks);
        let report = evaluator.run_all();

        prop_assert_eq!(report.executed.len(), masks.len());
        prop_assert_eq!(evaluator.snapshot().len(), masks.len());
        for i in 0..masks.len() {
            let cell = format!("c{i}");
            let output = format!("o{i}");
            prop_assert_eq!(evaluator.snapshot().cell_state(&cell), Some(CellState::Computed));
            prop_assert!(evaluator.snapshot().value(&output).is_some());
        }

        // producers always run before consumers
        for (pos, id) in report.executed.iter().enumerate() {
            let cell = evaluator.graph().cell(id).unwrap();
            for input in cell.inputs() {
                if let Some(producer) = evaluator.graph().producer_of(input) {
                    let producer_pos = report.executed.iter().position(|c| c == producer.id()).unwrap();
                    prop_assert!(producer_pos < pos);
                }
            }
        }
    }

    #[test]
    fn prop_incremental_equals_full(
        masks in proptest::collection::vec(any::<u16>(), 1..12),
        w in 0i64..=100,
    ) {
        let mut incremental = random_notebook(&masks);
        incremental.run_all();
        incremental.set_widget("w", w).unwrap();
        incremental.run_pending().unwrap();

        let mut full = random_notebook(&masks);
        full.set_widget("w", w).unwrap();
        full.run_all();
        let first = full.snapshot().clone();
        full.run_all();

        prop_assert!(incremental.snapshot().same_values(full.snapshot()));
        prop_assert!(first.same_values(full.snapshot()));
    }

    #[test]
    fn prop_int_slider_set_then_get(v in 50i64..=1000) {
        let mut store = WidgetStore::new();
        store.register(Widget::new("n", "n", WidgetDomain::int_slider(50, 1000), 300).unwrap()).unwrap();
        store.set("n", v).unwrap();
        prop_assert_eq!(store.get("n").unwrap(), &Value::Integer(v));
    }

    #[test]
    fn prop_float_slider_set_then_get(k in 0u32..=50) {
        let v = f64::from(k) * 0.1;
        let mut store = WidgetStore::new();
        store.register(Widget::new("s", "s", WidgetDomain::float_slider(0.0, 5.0, 0.1), 1.0).unwrap()).unwrap();
        store.set("s", v).unwrap();
        prop_assert_eq!(store.get("s").unwrap(), &Value::Float(v));
    }

    #[test]
    fn prop_out_of_range_keeps_prior(v in prop_oneof![i64::MIN..50, 1001i64..i64::MAX]) {
        let mut store = WidgetStore::new();
        store.register(Widget::new("n", "n", WidgetDomain::int_slider(50, 1000), 300).unwrap()).unwrap();
        let is_out_of_range = matches!(store.set("n", v), Err(Error::OutOfRange { .. }));
        prop_assert!(is_out_of_range);
        prop_assert_eq!(store.get("n").unwrap(), &Value::Integer(300));
    }
}
