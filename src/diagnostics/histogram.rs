use crate::diagnostics::bins::{BinSettings, Placement};
use crate::error::HistogramError;

use ndarray::{Array1, Array2, ArrayView1};
use std::collections::BTreeMap;

/// One-dimensional histogram that also keeps every filled value
#[derive(Clone, Debug, PartialEq)]
pub struct Hist1D {
    settings: BinSettings,
    counts: Array1<u64>,
    underflow: u64,
    overflow: u64,
    values: Vec<f64>,
}

impl Hist1D {
    pub fn new(settings: BinSettings) -> Result<Self, HistogramError> {
        settings.validate()?;
        Ok(Self {
            settings,
            counts: Array1::zeros(settings.bins),
            underflow: 0,
            overflow: 0,
            values: vec![],
        })
    }

    pub fn fill(&mut self, x: f64) {
        match self.settings.place(x) {
            Placement::Underflow => self.underflow += 1,
            Placement::Bin(i) => self.counts[i] += 1,
            Placement::Overflow => self.overflow += 1,
        }
        self.values.push(x);
    }

    pub fn settings(&self) -> &BinSettings {
        &self.settings
    }

    pub fn counts(&self) -> &Array1<u64> {
        &self.counts
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Filled values in fill order, out-of-range ones included
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn entries(&self) -> usize {
        self.values.len()
    }

    fn values_view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.values.as_slice())
    }

    /// Mean of all filled values, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        self.values_view().mean()
    }

    /// Root-mean-square deviation from the mean, `None` when empty
    pub fn rms(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values_view().std(0.0))
    }
}

/// Two-dimensional histogram, out-of-range pairs are only counted
#[derive(Clone, Debug, PartialEq)]
pub struct Hist2D {
    x: BinSettings,
    y: BinSettings,
    counts: Array2<u64>,
    outside: u64,
    entries: usize,
}

impl Hist2D {
    pub fn new(x: BinSettings, y: BinSettings) -> Result<Self, HistogramError> {
        x.validate()?;
        y.validate()?;
        Ok(Self {
            x,
            y,
            counts: Array2::zeros((x.bins, y.bins)),
            outside: 0,
            entries: 0,
        })
    }

    pub fn fill(&mut self, x: f64, y: f64) {
        self.entries += 1;
        match (self.x.place(x), self.y.place(y)) {
            (Placement::Bin(i), Placement::Bin(j)) => self.counts[(i, j)] += 1,
            _ => self.outside += 1,
        }
    }

    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    pub fn outside(&self) -> u64 {
        self.outside
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn x_settings(&self) -> &BinSettings {
        &self.x
    }

    pub fn y_settings(&self) -> &BinSettings {
        &self.y
    }
}

/// Counts per text label, labels sorted alphabetically
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryHist {
    counts: BTreeMap<String, u64>,
}

impl CategoryHist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&mut self, label: &str) {
        *self.counts.entry(label.to_owned()).or_default() += 1;
    }

    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, &n)| (label.as_str(), n))
    }

    pub fn entries(&self) -> u64 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn hist1d_keeps_out_of_range_values() {
        let mut hist = Hist1D::new(BinSettings::new(4, 0.0, 4.0).unwrap()).unwrap();
        for x in [-1.0, 0.5, 1.5, 1.7, 3.9, 4.0, 10.0] {
            hist.fill(x);
        }
        assert_eq!(hist.counts().to_vec(), [1, 2, 0, 1]);
        assert_eq!(hist.underflow(), 1);
        assert_eq!(hist.overflow(), 2);
        assert_eq!(hist.entries(), 7);
        assert_eq!(hist.values()[0], -1.0);
        assert_relative_eq!(hist.mean().unwrap(), 20.6 / 7.0);
    }

    #[test]
    fn hist1d_moments() {
        let mut hist = Hist1D::new(BinSettings::pull()).unwrap();
        assert_eq!(hist.mean(), None);
        assert_eq!(hist.rms(), None);
        for x in [-1.0, 1.0, -1.0, 1.0] {
            hist.fill(x);
        }
        assert_relative_eq!(hist.mean().unwrap(), 0.0);
        assert_relative_eq!(hist.rms().unwrap(), 1.0);
    }

    #[test]
    fn hist2d() {
        let axis = BinSettings::new(2, 0.0, 2.0).unwrap();
        let mut hist = Hist2D::new(axis, axis).unwrap();
        hist.fill(0.5, 1.5);
        hist.fill(0.5, 1.6);
        hist.fill(5.0, 0.5);
        assert_eq!(hist.counts()[(0, 1)], 2);
        assert_eq!(hist.outside(), 1);
        assert_eq!(hist.entries(), 3);
    }

    #[test]
    fn category() {
        let mut hist = CategoryHist::new();
        hist.fill("Proton");
        hist.fill("Photon");
        hist.fill("Photon");
        assert_eq!(hist.count("Photon"), 2);
        assert_eq!(hist.count("Eta"), 0);
        assert_eq!(hist.entries(), 3);
        assert_eq!(
            hist.iter().map(|(label, _)| label).collect::<Vec<_>>(),
            ["Photon", "Proton"]
        );
    }
}
