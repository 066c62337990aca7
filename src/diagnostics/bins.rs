use crate::error::HistogramError;

use conv::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Uniform binning of `[min, max)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BinSettings {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
}

/// Where a value lands in a [BinSettings] range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Underflow,
    Bin(usize),
    /// Values at or above `max`, NaN included
    Overflow,
}

impl BinSettings {
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self, HistogramError> {
        let settings = Self { bins, min, max };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), HistogramError> {
        if self.bins == 0 {
            return Err(HistogramError::ZeroBins);
        }
        if !(self.min.is_finite() && self.max.is_finite() && self.min < self.max) {
            return Err(HistogramError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Energies from zero up to the detector energy scale, 1000 bins
    pub fn energy(scale: f64) -> Self {
        Self {
            bins: 1000,
            min: 0.0,
            max: scale,
        }
    }

    /// Veto (charged-particle detector) energies up to 10 MeV
    pub fn veto() -> Self {
        Self {
            bins: 1000,
            min: 0.0,
            max: 10.0,
        }
    }

    /// Tagged photon energies, 1 MeV bins up to 2 GeV
    pub fn tagger() -> Self {
        Self {
            bins: 2000,
            min: 0.0,
            max: 2000.0,
        }
    }

    pub fn pull() -> Self {
        Self {
            bins: 50,
            min: -3.0,
            max: 3.0,
        }
    }

    pub fn chi_square() -> Self {
        Self {
            bins: 100,
            min: 0.0,
            max: 30.0,
        }
    }

    pub fn probability() -> Self {
        Self {
            bins: 100,
            min: 0.0,
            max: 1.0,
        }
    }

    pub fn iterations() -> Self {
        Self {
            bins: 15,
            min: 0.0,
            max: 15.0,
        }
    }

    /// 200 bins within ±100 MeV around the expected mass
    pub fn invariant_mass(mass: f64) -> Self {
        Self {
            bins: 200,
            min: mass - 100.0,
            max: mass + 100.0,
        }
    }

    /// Vertex position along the beam, cm
    pub fn vertex() -> Self {
        Self {
            bins: 200,
            min: -10.0,
            max: 10.0,
        }
    }

    /// Event counters `0, 1, ..., n - 1`, one bin each
    pub fn counts(n: usize) -> Self {
        Self {
            bins: n.max(1),
            min: 0.0,
            max: n.max(1) as f64,
        }
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.min + (bin as f64 + 0.5) * self.bin_width()
    }

    pub fn place(&self, x: f64) -> Placement {
        if x < self.min {
            return Placement::Underflow;
        }
        if x >= self.max || x.is_nan() {
            return Placement::Overflow;
        }
        match ((x - self.min) / self.bin_width()).approx_as_by::<usize, RoundToZero>() {
            // rounding may push values just below `max` onto the upper edge
            Ok(bin) => Placement::Bin(bin.min(self.bins - 1)),
            Err(_) => Placement::Overflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement() {
        let settings = BinSettings::new(10, 0.0, 1.0).unwrap();
        assert_eq!(settings.place(-0.1), Placement::Underflow);
        assert_eq!(settings.place(0.0), Placement::Bin(0));
        assert_eq!(settings.place(0.55), Placement::Bin(5));
        assert_eq!(settings.place(1.0 - 1e-16), Placement::Bin(9));
        assert_eq!(settings.place(1.0), Placement::Overflow);
        assert_eq!(settings.place(f64::NAN), Placement::Overflow);
    }

    #[test]
    fn presets_are_valid() {
        for settings in [
            BinSettings::energy(1000.0),
            BinSettings::veto(),
            BinSettings::tagger(),
            BinSettings::pull(),
            BinSettings::chi_square(),
            BinSettings::probability(),
            BinSettings::iterations(),
            BinSettings::invariant_mass(134.9766),
            BinSettings::vertex(),
            BinSettings::counts(0),
        ] {
            settings.validate().unwrap();
        }
        assert_eq!(BinSettings::iterations().place(3.0), Placement::Bin(3));
    }

    #[test]
    fn invalid_settings() {
        assert_eq!(BinSettings::new(0, 0.0, 1.0), Err(HistogramError::ZeroBins));
        assert!(matches!(
            BinSettings::new(5, 1.0, 1.0),
            Err(HistogramError::InvalidRange { .. })
        ));
        assert!(BinSettings::new(5, 0.0, f64::INFINITY).is_err());
    }
}
