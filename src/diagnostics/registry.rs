use crate::diagnostics::bins::BinSettings;
use crate::diagnostics::histogram::{CategoryHist, Hist1D, Hist2D};
use crate::error::HistogramError;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

#[derive(Clone, Debug, PartialEq)]
pub enum Histogram {
    OneD(Hist1D),
    TwoD(Hist2D),
    Category(CategoryHist),
}

/// Entries, mean and RMS of a one-dimensional metric
#[derive(Clone, Debug, PartialEq)]
pub struct MetricSummary {
    pub name: String,
    pub entries: usize,
    pub mean: Option<f64>,
    pub rms: Option<f64>,
}

/// Named histograms filled during a run
///
/// Filling a name that was never registered, or that belongs to a histogram of another kind,
/// does nothing and returns `false`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    histograms: BTreeMap<String, Histogram>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, histogram: Histogram) -> Result<(), HistogramError> {
        match self.histograms.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(HistogramError::Duplicate(name.to_owned())),
            Entry::Vacant(entry) => {
                entry.insert(histogram);
                Ok(())
            }
        }
    }

    pub fn make_1d(&mut self, name: &str, settings: BinSettings) -> Result<(), HistogramError> {
        self.register(name, Histogram::OneD(Hist1D::new(settings)?))
    }

    pub fn make_2d(
        &mut self,
        name: &str,
        x: BinSettings,
        y: BinSettings,
    ) -> Result<(), HistogramError> {
        self.register(name, Histogram::TwoD(Hist2D::new(x, y)?))
    }

    pub fn make_category(&mut self, name: &str) -> Result<(), HistogramError> {
        self.register(name, Histogram::Category(CategoryHist::new()))
    }

    pub fn fill(&mut self, name: &str, x: f64) -> bool {
        match self.histograms.get_mut(name) {
            Some(Histogram::OneD(hist)) => {
                hist.fill(x);
                true
            }
            _ => false,
        }
    }

    pub fn fill_2d(&mut self, name: &str, x: f64, y: f64) -> bool {
        match self.histograms.get_mut(name) {
            Some(Histogram::TwoD(hist)) => {
                hist.fill(x, y);
                true
            }
            _ => false,
        }
    }

    pub fn fill_category(&mut self, name: &str, label: &str) -> bool {
        match self.histograms.get_mut(name) {
            Some(Histogram::Category(hist)) => {
                hist.fill(label);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Histogram> {
        self.histograms.get(name)
    }

    pub fn get_1d(&self, name: &str) -> Option<&Hist1D> {
        match self.histograms.get(name) {
            Some(Histogram::OneD(hist)) => Some(hist),
            _ => None,
        }
    }

    pub fn get_2d(&self, name: &str) -> Option<&Hist2D> {
        match self.histograms.get(name) {
            Some(Histogram::TwoD(hist)) => Some(hist),
            _ => None,
        }
    }

    pub fn get_category(&self, name: &str) -> Option<&CategoryHist> {
        match self.histograms.get(name) {
            Some(Histogram::Category(hist)) => Some(hist),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.histograms.keys().map(String::as_str)
    }

    /// Summaries of every one-dimensional histogram, sorted by name
    pub fn summary(&self) -> Vec<MetricSummary> {
        self.histograms
            .iter()
            .filter_map(|(name, histogram)| match histogram {
                Histogram::OneD(hist) => Some(MetricSummary {
                    name: name.clone(),
                    entries: hist.entries(),
                    mean: hist.mean(),
                    rms: hist.rms(),
                }),
                _ => None,
            })
            .collect()
    }
}
