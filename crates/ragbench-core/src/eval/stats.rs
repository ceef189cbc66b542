//! Statistical summary of per-query metric values.
//!
//! Corpus means alone can hide how unstable a metric is across queries, so
//! the report pairs each mean with a bootstrap 95% confidence interval.
//! Resampling uses a seeded LCG for reproducible output without pulling in
//! a random-number dependency.
//!
//! # References
//!
//! - Efron & Tibshirani (1993). "An Introduction to the Bootstrap"
//! - Smucker et al. (2007). "A comparison of statistical significance tests for IR evaluation"

/// Mean of a sample with its bootstrap 95% confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    /// Sample mean
    pub mean: f64,
    /// Lower bound (2.5th percentile of bootstrap means)
    pub lower: f64,
    /// Upper bound (97.5th percentile of bootstrap means)
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Formats the interval as `mean [lower, upper]`.
    pub fn format(&self, precision: usize) -> String {
        format!(
            "{:.prec$} [{:.prec$}, {:.prec$}]",
            self.mean,
            self.lower,
            self.upper,
            prec = precision
        )
    }
}

/// Computes a bootstrap 95% confidence interval for the mean of `values`.
///
/// Draws `n_bootstrap` resamples with replacement, takes the mean of each,
/// and reads the 2.5th and 97.5th percentiles off the sorted bootstrap
/// means. The same `seed` always produces the same interval.
///
/// Returns `None` for an empty sample.
pub fn bootstrap_ci(values: &[f64], n_bootstrap: usize, seed: u64) -> Option<ConfidenceInterval> {
    if values.is_empty() || n_bootstrap == 0 {
        return None;
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;

    let mut rng = LcgRng::new(seed);
    let mut bootstrap_means = Vec::with_capacity(n_bootstrap);
    for _ in 0..n_bootstrap {
        let mut sum = 0.0;
        for _ in 0..n {
            sum += values[rng.next_index(n)];
        }
        bootstrap_means.push(sum / n as f64);
    }

    bootstrap_means.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let lower_idx = ((n_bootstrap as f64) * 0.025) as usize;
    let upper_idx = (((n_bootstrap as f64) * 0.975) as usize).min(n_bootstrap - 1);

    Some(ConfidenceInterval {
        mean,
        lower: bootstrap_means[lower_idx],
        upper: bootstrap_means[upper_idx],
    })
}

/// Linear congruential generator for reproducible resampling.
///
/// Parameters from Knuth's MMIX. The low bits of an LCG are weak, so index
/// selection uses the high half of the state.
struct LcgRng {
    state: u64,
}

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E3779B97F4A7C15),
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_index(&mut self, max: usize) -> usize {
        ((self.next() >> 32) as usize) % max
    }
}
