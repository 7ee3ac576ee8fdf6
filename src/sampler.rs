//! Metropolis-Hastings sampling with a symmetric uniform jump proposal.
//!
//! Independent of the aggregation engine; it only shares the crate's error
//! type and the seedable random source convention.

use crate::error::Error;
use crate::settings::SamplerSettings;
use rand::Rng;
use std::f64::consts::PI;

/// Gaussian density with mean `mu` and standard deviation `sigma`
pub fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let variance = sigma * sigma;
    (-(x - mu).powi(2) / (2.0 * variance)).exp() / (2.0 * PI * variance).sqrt()
}

/// Draw `size` samples from the (unnormalized) density `density`.
///
/// Candidates are `state + U(-alpha, alpha)` and are accepted with
/// probability `min(1, density(candidate) / density(state))`. Each accepted
/// move produces one sample, after the first `burn` accepted moves are
/// dropped.
///
/// `alpha` must be positive with `2 * alpha` finite.
/// Fails with [`Error::DensityEvaluation`] when the density is zero at the
/// current state, which usually means `alpha` is too large.
pub fn metropolis_hastings<F, R>(
    density: F,
    size: usize,
    settings: &SamplerSettings,
    rng: &mut R,
) -> Result<Vec<f64>, Error>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    let alpha = settings.alpha;
    // the proposal range spans 2 * alpha and must stay finite
    if !alpha.is_finite() || alpha <= 0.0 || !(2.0 * alpha).is_finite() {
        return Err(Error::InvalidAlpha(alpha));
    }

    let mut output = Vec::with_capacity(size);
    let mut burn = settings.burn;
    let mut state = rng.gen_range(-alpha..=alpha);
    let mut current_density = density(state);

    while output.len() < size {
        let candidate = state + rng.gen_range(-alpha..=alpha);
        let candidate_density = density(candidate);

        if current_density == 0.0 {
            return Err(Error::DensityEvaluation { state });
        }
        let ratio = candidate_density / current_density;
        if ratio.is_nan() {
            return Err(Error::DensityEvaluation { state });
        }

        if rng.gen::<f64>() < ratio {
            state = candidate;
            current_density = candidate_density;
            if burn == 0 {
                output.push(state);
            } else {
                burn -= 1;
            }
        }
    }

    Ok(output)
}
