//! Chart artifacts for cellflow notebooks
//!
//! Charts are built with `charming` and carried through the notebook as
//! opaque artifacts: a kind tag plus the ECharts option JSON. Display hosts
//! decide how to render them.

pub mod error;
pub mod scatter;

pub use error::{Error, Result};
pub use scatter::{scatter_with_fit, ScatterFit};

use cellflow_core::Value;

/// Kind tag of ECharts option payloads
pub const ECHARTS: &str = "echarts";

/// Rendered chart ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub kind: String,
    pub payload: String,
}

impl ChartArtifact {
    /// Wrap an ECharts option document
    pub fn echarts(payload: String) -> Self {
        Self {
            kind: ECHARTS.to_string(),
            payload,
        }
    }
}

impl From<ChartArtifact> for Value {
    fn from(artifact: ChartArtifact) -> Self {
        Value::Artifact {
            kind: artifact.kind,
            payload: artifact.payload,
        }
    }
}
