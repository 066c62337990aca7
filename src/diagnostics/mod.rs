//! Histogram sink for fit results and event overview plots

mod bins;
pub use bins::{BinSettings, Placement};

mod histogram;
pub use histogram::{CategoryHist, Hist1D, Hist2D};

pub mod metric;

mod registry;
pub use registry::{Diagnostics, Histogram, MetricSummary};
