//! The five sub-metrics.
//!
//! Each metric module fetches its raw signals through the shared [`EvalContext`]
//! and reduces them with a pure `normalize` function. [`evaluate`] dispatches on
//! [`MetricKind`] through [`METRIC_DEFINITIONS`] and guarantees a well-formed
//! [`MetricResult`] whatever happens to the underlying calls.

mod context;
mod evaluator;
mod metric_kind;
mod metric_result;

pub mod bus_factor;
pub mod correctness;
pub mod license;
pub mod maintainability;
pub mod ramp_up;

pub use context::EvalContext;
pub use evaluator::{METRIC_DEFINITIONS, MetricDef, evaluate};
pub use metric_kind::{MetricKind, QUOTA_FLOOR};
pub use metric_result::{MetricResult, clamp_score};
