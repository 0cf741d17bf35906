//! Numeric collaborators for cellflow notebooks
//!
//! Bivariate statistics share the [`BivariateStatistic`] trait:
//!
//! - [`PearsonCorrelation`] - product-moment correlation coefficient
//! - [`OrdinaryLeastSquares`] - degree-1 least-squares line
//!
//! [`LinearModel`] draws reproducible synthetic data for demos and tests.
//!
//! # Example
//!
//! ```rust
//! use cellflow_stats::{correlate, fit, LinearModel};
//!
//! let samples = LinearModel::new(2.0, 3.0).sample(500, 0.5, 42).unwrap();
//! let line = fit(&samples.x, &samples.y).unwrap();
//! let r = correlate(&samples.x, &samples.y).unwrap();
//!
//! assert!((line.slope - 2.0).abs() < 0.2);
//! assert!(r > 0.9);
//! ```

pub mod correlation;
pub mod error;
pub mod regression;
pub mod synthetic;
pub mod traits;

pub use correlation::{correlate, PearsonCorrelation};
pub use error::{Error, Result};
pub use regression::{fit, linspace, LinearFit, OrdinaryLeastSquares};
pub use synthetic::{LinearModel, Samples};
pub use traits::BivariateStatistic;
