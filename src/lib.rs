//! Fetch epidemic time series, align them on a common "days since N cases"
//! axis, and hand chart-ready views to a renderer.

pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod report;
pub mod schema;
pub mod server;
pub mod view;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use process::{Dataset, Pipeline};
pub use report::Reporter;
pub use view::ChartView;
