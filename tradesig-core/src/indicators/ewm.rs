//! Exponentially weighted mean.
//!
//! Two weighting schemes:
//! - `adjust = true`: y[t] = Σ (1-α)^i x[t-i] / Σ (1-α)^i over observed x.
//! - `adjust = false`: y[t] = (1-α) y[t-1] + α x[t] (classic recursive EMA).
//!
//! NaN inputs are skipped but still age the older observations by one step,
//! so a gap weakens history exactly as a real observation would. Output is
//! NaN until `min_periods` non-NaN observations have been seen, then carries
//! the running mean (including across NaN inputs).

/// Exponentially weighted mean of `values` with smoothing factor `alpha`.
pub fn ewm_mean(values: &[f64], alpha: f64, adjust: bool, min_periods: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    let min_periods = min_periods.max(1);

    let old_wt_factor = 1.0 - alpha;
    let new_wt = if adjust { 1.0 } else { alpha };

    let mut weighted = f64::NAN;
    let mut old_wt = 1.0;
    let mut nobs = 0usize;

    for (i, &cur) in values.iter().enumerate() {
        let is_observation = !cur.is_nan();
        if is_observation {
            nobs += 1;
        }

        if !weighted.is_nan() {
            old_wt *= old_wt_factor;
            if is_observation {
                if weighted != cur {
                    weighted = (old_wt * weighted + new_wt * cur) / (old_wt + new_wt);
                }
                if adjust {
                    old_wt += new_wt;
                } else {
                    old_wt = 1.0;
                }
            }
        } else if is_observation {
            weighted = cur;
        }

        if nobs >= min_periods {
            result[i] = weighted;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn recursive_form_matches_hand_computation() {
        // alpha = 0.5, no adjustment: 10, 0.5*12+0.5*10 = 11, 0.5*14+0.5*11 = 12.5
        let result = ewm_mean(&[10.0, 12.0, 14.0], 0.5, false, 0);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 11.0, DEFAULT_EPSILON);
        assert_approx(result[2], 12.5, DEFAULT_EPSILON);
    }

    #[test]
    fn adjusted_form_matches_weighted_average() {
        // alpha = 0.5, weights (newest first) 1, 0.5, 0.25
        // y[2] = (14 + 0.5*12 + 0.25*10) / 1.75
        let result = ewm_mean(&[10.0, 12.0, 14.0], 0.5, true, 0);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], (12.0 + 0.5 * 10.0) / 1.5, DEFAULT_EPSILON);
        assert_approx(result[2], (14.0 + 0.5 * 12.0 + 0.25 * 10.0) / 1.75, DEFAULT_EPSILON);
    }

    #[test]
    fn min_periods_counts_observations_only() {
        let result = ewm_mean(&[f64::NAN, 1.0, 2.0, 3.0], 0.5, true, 2);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(!result[2].is_nan());
        assert!(!result[3].is_nan());
    }

    #[test]
    fn gap_ages_history_and_carries_value() {
        // alpha = 0.5, adjusted; the gap at index 1 decays x[0]'s weight to 0.25.
        let result = ewm_mean(&[10.0, f64::NAN, 14.0], 0.5, true, 0);
        assert_approx(result[1], 10.0, DEFAULT_EPSILON);
        assert_approx(result[2], (14.0 + 0.25 * 10.0) / 1.25, DEFAULT_EPSILON);
    }

    #[test]
    fn constant_series_is_constant() {
        let result = ewm_mean(&[5.0; 20], 1.0 / 14.0, true, 14);
        for v in &result[13..] {
            assert_approx(*v, 5.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn empty_input() {
        assert!(ewm_mean(&[], 0.5, true, 1).is_empty());
    }
}
