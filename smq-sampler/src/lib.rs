//! # smq-sampler
//!
//! A discrete-distribution sampler: give it a probability density
//! function over `[0, 1)` and a bin count, and it draws bin indices with
//! that distribution. This is the `sampler` class from the original
//! `sampler.h`/`sampler.cc` — it drives the experiments in `smq-harness`
//! but has no dependency on `smq-core` itself.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A PDF that always returns 1.0 — a flat, unweighted distribution.
pub fn constant_pdf(_alpha: f64) -> f64 {
    1.0
}

/// The Gaussian density at `alpha`, with the given `mean` and
/// `deviation`. `alpha` is expected in `[0, 1)`, matching the sampler's
/// bin-fraction convention, but the formula itself is the ordinary
/// normal density and imposes no range restriction.
pub fn gaussian_pdf(mean: f64, deviation: f64, alpha: f64) -> f64 {
    let power = -((alpha - mean) * (alpha - mean)) / (2.0 * deviation * deviation);
    let k = 1.0 / (deviation * (2.0 * std::f64::consts::PI).sqrt());
    k * power.exp()
}

/// Builds a normalized PDF and its cumulative sum from a generator
/// function, then draws bin indices distributed accordingly.
pub struct Sampler {
    rng: StdRng,
    pdf: Vec<f64>,
    summation: Vec<f64>,
}

impl Sampler {
    /// Samples `pdf_fn(i / nr_bins)` for every bin `i`, normalizes the
    /// result (skipping normalization if the raw sum is too close to
    /// zero to divide by safely), and builds the cumulative sum used by
    /// [`Sampler::sample`].
    ///
    /// # Panics
    ///
    /// Panics if `nr_bins == 0` — there is no sample space to draw from.
    pub fn new(nr_bins: usize, pdf_fn: impl Fn(f64) -> f64) -> Self {
        assert!(nr_bins >= 1, "Sampler requires at least one bin");

        let mut pdf: Vec<f64> = (0..nr_bins)
            .map(|i| pdf_fn(i as f64 / nr_bins as f64))
            .collect();

        let total: f64 = pdf.iter().sum();
        if total > 1e-5 {
            for v in &mut pdf {
                *v /= total;
            }
        }

        let mut summation = Vec::with_capacity(nr_bins);
        let mut running = 0.0;
        for v in &pdf {
            running += v;
            summation.push(running);
        }

        Self {
            rng: StdRng::from_entropy(),
            pdf,
            summation,
        }
    }

    /// Draws a uniform value in `[0, 1)` and locates the first
    /// cumulative bucket `>=` it via binary search, clamped to
    /// `nr_bins - 1` (guards against floating-point rounding landing the
    /// draw past the last bucket).
    pub fn sample(&mut self) -> usize {
        let r: f64 = self.rng.gen_range(0.0..1.0);
        let index = self.summation.partition_point(|&cum| cum < r);
        index.min(self.summation.len() - 1)
    }

    pub fn get_pdf(&self) -> &[f64] {
        &self.pdf
    }

    pub fn get_summation(&self) -> &[f64] {
        &self.summation
    }

    pub fn nr_bins(&self) -> usize {
        self.pdf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_normalizes_to_one() {
        let s = Sampler::new(1000, constant_pdf);
        let total: f64 = s.get_pdf().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn summation_is_monotonic_and_ends_near_one() {
        let s = Sampler::new(500, |a| gaussian_pdf(0.5, 0.1, a));
        let sum = s.get_summation();
        for w in sum.windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!((sum[sum.len() - 1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sample_always_in_range() {
        let mut s = Sampler::new(37, |a| gaussian_pdf(0.3, 0.2, a));
        for _ in 0..5000 {
            let idx = s.sample();
            assert!(idx < 37);
        }
    }

    #[test]
    fn near_zero_total_skips_normalization() {
        // A pdf_fn that returns ~0 everywhere leaves the raw (tiny)
        // values untouched rather than dividing by a near-zero total.
        let s = Sampler::new(10, |_| 1e-10);
        assert!(s.get_pdf().iter().all(|&v| v < 1e-5));
    }

    #[test]
    fn single_bin_always_samples_zero() {
        let mut s = Sampler::new(1, constant_pdf);
        for _ in 0..100 {
            assert_eq!(s.sample(), 0);
        }
    }
}
