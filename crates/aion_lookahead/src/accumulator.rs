//! Cost Sample Accumulator (C1).
//!
//! Combines many `(delay, congestion)` samples observed for one
//! `(segment, dx, dy)` bucket into a single representative entry.

use serde::{Deserialize, Serialize};

/// A `(delay, congestion)` pair with a validity flag.
///
/// Invalid means "no sample observed, no extrapolation yet" — the default
/// value. A valid entry always carries finite, non-negative components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    /// Expected delay.
    pub delay: f64,
    /// Expected congestion (upstream base-cost accumulation).
    pub congestion: f64,
    valid: bool,
}

impl CostEntry {
    /// The invalid sentinel: no sample observed.
    pub const INVALID: CostEntry = CostEntry {
        delay: 0.0,
        congestion: 0.0,
        valid: false,
    };

    /// Creates a valid cost entry.
    pub fn new(delay: f64, congestion: f64) -> Self {
        Self {
            delay,
            congestion,
            valid: true,
        }
    }

    /// Returns whether this entry carries an observed or extrapolated sample.
    pub fn valid(&self) -> bool {
        self.valid
    }
}

impl Default for CostEntry {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Selects how [`ExpansionCostEntry`] reduces many samples to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionRule {
    /// The sample with the smallest delay (ties: first inserted).
    SmallestDelay,
    /// Componentwise arithmetic mean over all samples.
    ArithmeticMean,
    /// Componentwise geometric mean; requires strictly positive samples.
    GeometricMean,
    /// Binned-mode: the first sample in the most populous of 10 delay bins.
    BinnedMode,
}

/// Mutable per-bucket accumulator of observed `(delay, congestion)` samples.
///
/// Constructed empty, filled during a single `set_cost_map` call, consulted
/// exactly once via [`representative`](Self::representative), then dropped.
#[derive(Debug, Clone, Default)]
pub struct ExpansionCostEntry {
    samples: Vec<(f64, f64)>,
}

impl ExpansionCostEntry {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed sample.
    pub fn add(&mut self, delay: f64, congestion: f64) {
        self.samples.push((delay, congestion));
    }

    /// Reduces all recorded samples to one representative entry under
    /// `rule`. Leaves the accumulator unchanged. Returns
    /// [`CostEntry::INVALID`] if no samples were recorded.
    pub fn representative(&self, rule: ReductionRule) -> CostEntry {
        if self.samples.is_empty() {
            return CostEntry::INVALID;
        }
        match rule {
            ReductionRule::SmallestDelay => self.smallest_delay(),
            ReductionRule::ArithmeticMean => self.arithmetic_mean(),
            ReductionRule::GeometricMean => self.geometric_mean(),
            ReductionRule::BinnedMode => self.binned_mode(),
        }
    }

    fn smallest_delay(&self) -> CostEntry {
        let mut best: Option<(f64, f64)> = None;
        for &(delay, congestion) in &self.samples {
            if best.map(|(d, _)| delay < d).unwrap_or(true) {
                best = Some((delay, congestion));
            }
        }
        let (delay, congestion) = best.expect("non-empty samples");
        CostEntry::new(delay, congestion)
    }

    fn arithmetic_mean(&self) -> CostEntry {
        let n = self.samples.len() as f64;
        let (sum_d, sum_c) = self
            .samples
            .iter()
            .fold((0.0, 0.0), |(ad, ac), &(d, c)| (ad + d, ac + c));
        CostEntry::new(sum_d / n, sum_c / n)
    }

    fn geometric_mean(&self) -> CostEntry {
        let n = self.samples.len() as f64;
        let (sum_ln_d, sum_ln_c) = self
            .samples
            .iter()
            .fold((0.0, 0.0), |(ad, ac), &(d, c)| (ad + d.ln(), ac + c.ln()));
        CostEntry::new((sum_ln_d / n).exp(), (sum_ln_c / n).exp())
    }

    fn binned_mode(&self) -> CostEntry {
        const NUM_BINS: usize = 10;

        let min_delay = self
            .samples
            .iter()
            .map(|&(d, _)| d)
            .fold(f64::INFINITY, f64::min);
        let max_delay = self
            .samples
            .iter()
            .map(|&(d, _)| d)
            .fold(f64::NEG_INFINITY, f64::max);

        let span = max_delay - min_delay;
        let mut bins: Vec<Vec<(f64, f64)>> = vec![Vec::new(); NUM_BINS];

        for &(delay, congestion) in &self.samples {
            let bin = if span <= 0.0 {
                0
            } else {
                let raw = ((delay - min_delay) / span * NUM_BINS as f64).floor() as isize;
                raw.clamp(0, NUM_BINS as isize - 1) as usize
            };
            bins[bin].push((delay, congestion));
        }

        // Forward scan with a strict `>` keeps the lowest-index bin on a
        // population tie, matching the original's `ibin` walk.
        let mut largest_bin = 0;
        let mut largest_size = 0;
        for (i, b) in bins.iter().enumerate() {
            if b.len() > largest_size {
                largest_size = b.len();
                largest_bin = i;
            }
        }

        let (delay, congestion) = bins[largest_bin][0];
        CostEntry::new(delay, congestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_accumulator_is_invalid() {
        let acc = ExpansionCostEntry::new();
        assert!(!acc.representative(ReductionRule::SmallestDelay).valid());
    }

    #[test]
    fn smallest_delay_single_sample() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(3.0, 1.0);
        let e = acc.representative(ReductionRule::SmallestDelay);
        assert_eq!(e.delay, 3.0);
        assert_eq!(e.congestion, 1.0);
    }

    #[test]
    fn smallest_delay_picks_minimum() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(5.0, 1.0);
        acc.add(2.0, 9.0);
        acc.add(7.0, 0.0);
        let e = acc.representative(ReductionRule::SmallestDelay);
        assert_eq!(e.delay, 2.0);
        assert_eq!(e.congestion, 9.0);
    }

    #[test]
    fn smallest_delay_ties_first_insertion() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(2.0, 1.0);
        acc.add(2.0, 99.0);
        let e = acc.representative(ReductionRule::SmallestDelay);
        assert_eq!(e.congestion, 1.0);
    }

    #[test]
    fn arithmetic_mean_is_linear() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(2.0, 4.0);
        acc.add(4.0, 8.0);
        let e = acc.representative(ReductionRule::ArithmeticMean);
        assert_eq!(e.delay, 3.0);
        assert_eq!(e.congestion, 6.0);
    }

    #[test]
    fn geometric_mean_identical_samples() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(4.0, 9.0);
        acc.add(4.0, 9.0);
        let e = acc.representative(ReductionRule::GeometricMean);
        assert!((e.delay - 4.0).abs() < 1e-9);
        assert!((e.congestion - 9.0).abs() < 1e-9);
    }

    #[test]
    fn geometric_mean_of_two_values() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(2.0, 1.0);
        acc.add(8.0, 1.0);
        let e = acc.representative(ReductionRule::GeometricMean);
        assert!((e.delay - 4.0).abs() < 1e-9);
    }

    #[test]
    fn binned_mode_single_sample() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(5.0, 2.0);
        let e = acc.representative(ReductionRule::BinnedMode);
        assert_eq!(e.delay, 5.0);
        assert_eq!(e.congestion, 2.0);
    }

    #[test]
    fn binned_mode_picks_largest_bin() {
        let mut acc = ExpansionCostEntry::new();
        // min=0, max=10, bins of width 1: [0,1) [1,2) ... [9,10]
        acc.add(0.0, 0.0);
        acc.add(10.0, 10.0);
        // Bin 5 ([5,6)) gets three samples: wins.
        acc.add(5.1, 1.0);
        acc.add(5.2, 2.0);
        acc.add(5.3, 3.0);
        let e = acc.representative(ReductionRule::BinnedMode);
        assert_eq!(e.delay, 5.1);
        assert_eq!(e.congestion, 1.0);
    }

    #[test]
    fn binned_mode_max_delay_lands_in_last_bin_not_overflow() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(0.0, 0.0);
        acc.add(1.0, 1.0);
        acc.add(1.0, 1.0); // ties with bin 9's single occupant at max
        let e = acc.representative(ReductionRule::BinnedMode);
        // Bin 9 (last) holds the two samples at delay=1.0 (the max); it
        // wins over bin 0's single sample.
        assert_eq!(e.delay, 1.0);
    }

    #[test]
    fn binned_mode_all_same_delay() {
        let mut acc = ExpansionCostEntry::new();
        acc.add(3.0, 1.0);
        acc.add(3.0, 2.0);
        acc.add(3.0, 3.0);
        let e = acc.representative(ReductionRule::BinnedMode);
        assert_eq!(e.delay, 3.0);
        assert_eq!(e.congestion, 1.0);
    }

    #[test]
    fn cost_entry_default_invalid() {
        let e = CostEntry::default();
        assert!(!e.valid());
    }

    #[test]
    fn cost_entry_serde_roundtrip() {
        let e = CostEntry::new(1.5, 2.5);
        let json = serde_json::to_string(&e).unwrap();
        let restored: CostEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.delay, 1.5);
        assert_eq!(restored.congestion, 2.5);
        assert!(restored.valid());
    }
}
