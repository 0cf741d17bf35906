//! Widgets and the widget state store
//!
//! Widgets are the roots of the dependency graph. Their values only change
//! through [`WidgetStore::set`], which validates the new value against the
//! widget's domain and records the widget as dirty for the next pass.

use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relative tolerance used when checking step alignment of float sliders
const STEP_TOLERANCE: f64 = 1e-9;

/// Value domain of a widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WidgetDomain {
    /// Integer slider over `min..=max`
    IntSlider { min: i64, max: i64, step: i64 },
    /// Float slider over `min..=max`
    FloatSlider { min: f64, max: f64, step: f64 },
}

impl WidgetDomain {
    /// Integer slider with unit step
    pub fn int_slider(min: i64, max: i64) -> Self {
        Self::IntSlider { min, max, step: 1 }
    }

    /// Float slider with the given step
    pub fn float_slider(min: f64, max: f64, step: f64) -> Self {
        Self::FloatSlider { min, max, step }
    }

    /// Check that the domain itself is well formed
    pub fn validate(&self, widget: &str) -> Result<()> {
        match *self {
            Self::IntSlider { min, max, step } => {
                if min > max {
                    return Err(Error::invalid_domain(widget, format!("min {min} > max {max}")));
                }
                if step <= 0 {
                    return Err(Error::invalid_domain(widget, format!("step {step} must be positive")));
                }
            }
            Self::FloatSlider { min, max, step } => {
                if !min.is_finite() || !max.is_finite() || !step.is_finite() {
                    return Err(Error::invalid_domain(widget, "bounds and step must be finite"));
                }
                if min > max {
                    return Err(Error::invalid_domain(widget, format!("min {min} > max {max}")));
                }
                if step <= 0.0 {
                    return Err(Error::invalid_domain(widget, format!("step {step} must be positive")));
                }
            }
        }
        Ok(())
    }

    /// Validate a candidate value, returning it in the domain's canonical form
    pub fn check(&self, widget: &str, value: &Value) -> Result<Value> {
        match *self {
            Self::IntSlider { min, max, step } => {
                let v = match value {
                    Value::Integer(i) => *i,
                    Value::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
                    other => {
                        return Err(Error::invalid_value(
                            widget,
                            format!("expected integer, got {}", other.type_name()),
                        ))
                    }
                };
                // i128 keeps `v - min` exact across the full i64 range
                let misaligned = (i128::from(v) - i128::from(min)) % i128::from(step) != 0;
                if v < min || v > max || misaligned {
                    return Err(Error::OutOfRange {
                        widget: widget.to_string(),
                        value: v as f64,
                        min: min as f64,
                        max: max as f64,
                        step: step as f64,
                    });
                }
                Ok(Value::Integer(v))
            }
            Self::FloatSlider { min, max, step } => {
                let v = value.as_float().ok_or_else(|| {
                    Error::invalid_value(widget, format!("expected float, got {}", value.type_name()))
                })?;
                let out_of_range = || Error::OutOfRange {
                    widget: widget.to_string(),
                    value: v,
                    min,
                    max,
                    step,
                };
                if !v.is_finite() || v < min || v > max {
                    return Err(out_of_range());
                }
                let k = ((v - min) / step).round();
                if (v - (min + k * step)).abs() > STEP_TOLERANCE * step {
                    return Err(out_of_range());
                }
                Ok(Value::Float(v))
            }
        }
    }
}

/// A user-controlled input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    id: String,
    label: String,
    domain: WidgetDomain,
    value: Value,
}

impl Widget {
    /// Create a widget, validating the domain and the initial value
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        domain: WidgetDomain,
        initial: impl Into<Value>,
    ) -> Result<Self> {
        let id = id.into();
        domain.validate(&id)?;
        let value = domain.check(&id, &initial.into())?;
        Ok(Self {
            id,
            label: label.into(),
            domain,
            value,
        })
    }

    /// Widget identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Value domain
    pub fn domain(&self) -> &WidgetDomain {
        &self.domain
    }

    /// Current value
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn rename(mut self, id: String) -> Self {
        self.id = id;
        self
    }
}

/// Current values of all widgets, with dirty tracking
#[derive(Debug, Clone, Default)]
pub struct WidgetStore {
    widgets: Vec<Widget>,
    index: HashMap<String, usize>,
    dirty: Vec<String>,
}

impl WidgetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget
    pub fn register(&mut self, widget: Widget) -> Result<()> {
        if self.index.contains_key(widget.id()) {
            return Err(Error::DuplicateWidget(widget.id().to_string()));
        }
        self.index.insert(widget.id().to_string(), self.widgets.len());
        self.widgets.push(widget);
        Ok(())
    }

    /// Set a widget value
    ///
    /// Returns whether the value changed. An unchanged value does not mark
    /// the widget dirty. On error the previous value is kept.
    pub fn set(&mut self, id: &str, value: impl Into<Value>) -> Result<bool> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| Error::UnknownWidget(id.to_string()))?;
        let widget = &mut self.widgets[idx];
        let value = widget.domain.check(id, &value.into())?;
        if widget.value == value {
            return Ok(false);
        }
        tracing::debug!(widget = id, ?value, "widget changed");
        widget.value = value;
        if !self.dirty.iter().any(|d| d == id) {
            self.dirty.push(id.to_string());
        }
        Ok(true)
    }

    /// Current value of a widget
    pub fn get(&self, id: &str) -> Result<&Value> {
        self.widget(id).map(Widget::value)
    }

    /// Look up a widget
    pub fn widget(&self, id: &str) -> Result<&Widget> {
        self.index
            .get(id)
            .map(|&idx| &self.widgets[idx])
            .ok_or_else(|| Error::UnknownWidget(id.to_string()))
    }

    /// Check whether a widget is registered
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Widgets in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter()
    }

    /// Number of widgets
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widgets changed since the last drain, in first-change order
    pub fn dirty(&self) -> &[String] {
        &self.dirty
    }

    /// Drain the dirty set
    pub fn take_dirty(&mut self) -> Vec<String> {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub(crate) fn mark_clean<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let ids: Vec<&str> = ids.into_iter().collect();
        self.dirty.retain(|d| !ids.contains(&d.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WidgetStore {
        let mut store = WidgetStore::new();
        store
            .register(Widget::new("n", "Samples", WidgetDomain::int_slider(50, 1000), 300).unwrap())
            .unwrap();
        store
            .register(
                Widget::new("sigma", "Noise", WidgetDomain::float_slider(0.0, 5.0, 0.1), 1.0).unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_full_i64_range_slider() {
        let domain = WidgetDomain::IntSlider {
            min: i64::MIN,
            max: i64::MAX,
            step: 1,
        };
        let widget = Widget::new("w", "w", domain, 0).unwrap();
        assert_eq!(widget.value(), &Value::Integer(0));
        assert_eq!(domain.check("w", &Value::Integer(i64::MAX)).unwrap(), Value::Integer(i64::MAX));
        assert_eq!(domain.check("w", &Value::Integer(i64::MIN)).unwrap(), Value::Integer(i64::MIN));

        let coarse = WidgetDomain::IntSlider {
            min: i64::MIN,
            max: i64::MAX,
            step: 2,
        };
        assert!(coarse.check("w", &Value::Integer(0)).is_ok());
        assert!(matches!(
            coarse.check("w", &Value::Integer(i64::MAX)),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_set_then_get() {
        let mut store = store();
        assert!(store.set("n", 500).unwrap());
        assert_eq!(store.get("n").unwrap(), &Value::Integer(500));
        assert!(store.set("sigma", 2.3).unwrap());
        assert_eq!(store.get("sigma").unwrap(), &Value::Float(2.3));
        assert_eq!(store.dirty(), &["n".to_string(), "sigma".to_string()]);
    }

    #[test]
    fn test_out_of_range_keeps_prior_value() {
        let mut store = store();
        let err = store.set("n", 1001).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
        assert_eq!(store.get("n").unwrap(), &Value::Integer(300));

        assert!(matches!(store.set("sigma", -0.1), Err(Error::OutOfRange { .. })));
        assert!(matches!(store.set("sigma", 5.05), Err(Error::OutOfRange { .. })));
        assert_eq!(store.get("sigma").unwrap(), &Value::Float(1.0));
        assert!(store.dirty().is_empty());
    }

    #[test]
    fn test_step_alignment() {
        let mut store = store();
        assert!(matches!(store.set("sigma", 0.15), Err(Error::OutOfRange { .. })));
        assert!(store.set("sigma", 4.9).is_ok());
        assert!(store.set("sigma", 5.0).is_ok());
        assert!(store.set("sigma", 0.0).is_ok());
        // integers are accepted by float sliders
        assert!(store.set("sigma", 3).is_ok());
        assert_eq!(store.get("sigma").unwrap(), &Value::Float(3.0));
    }

    #[test]
    fn test_int_slider_step() {
        let domain = WidgetDomain::IntSlider { min: 0, max: 100, step: 10 };
        assert!(domain.check("w", &Value::Integer(40)).is_ok());
        assert!(matches!(domain.check("w", &Value::Integer(45)), Err(Error::OutOfRange { .. })));
        assert_eq!(domain.check("w", &Value::Float(20.0)).unwrap(), Value::Integer(20));
        assert!(matches!(
            domain.check("w", &Value::Float(20.5)),
            Err(Error::InvalidWidgetValue { .. })
        ));
    }

    #[test]
    fn test_unknown_widget() {
        let mut store = store();
        assert_eq!(store.get("missing"), Err(Error::UnknownWidget("missing".to_string())));
        assert!(matches!(store.set("missing", 1), Err(Error::UnknownWidget(_))));
    }

    #[test]
    fn test_wrong_value_type() {
        let mut store = store();
        assert!(matches!(store.set("sigma", "loud"), Err(Error::InvalidWidgetValue { .. })));
        assert!(matches!(store.set("n", true), Err(Error::InvalidWidgetValue { .. })));
    }

    #[test]
    fn test_unchanged_value_not_dirty() {
        let mut store = store();
        assert!(!store.set("n", 300).unwrap());
        assert!(store.dirty().is_empty());
        store.set("n", 301).unwrap();
        store.set("n", 302).unwrap();
        assert_eq!(store.take_dirty(), vec!["n".to_string()]);
        assert!(store.dirty().is_empty());
    }

    #[test]
    fn test_invalid_domain() {
        assert!(matches!(
            Widget::new("w", "", WidgetDomain::int_slider(10, 5), 7),
            Err(Error::InvalidDomain { .. })
        ));
        assert!(matches!(
            Widget::new("w", "", WidgetDomain::float_slider(0.0, 1.0, 0.0), 0.5),
            Err(Error::InvalidDomain { .. })
        ));
        assert!(matches!(
            Widget::new("w", "", WidgetDomain::int_slider(0, 5), 9),
            Err(Error::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_duplicate_widget() {
        let mut store = store();
        let dup = Widget::new("n", "again", WidgetDomain::int_slider(0, 1), 0).unwrap();
        assert_eq!(store.register(dup), Err(Error::DuplicateWidget("n".to_string())));
    }
}
