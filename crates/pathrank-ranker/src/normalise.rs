//! Score normalisation and small statistics helpers shared by the stages.

use std::collections::BTreeSet;

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// -log10(p) with p floored at `epsilon`. Never negative; p = 1 gives +0.0
/// so reports do not carry a signed zero.
pub fn neg_log10(p: f64, epsilon: f64) -> f64 {
    (-p.max(epsilon).log10()).max(0.0) + 0.0
}

/// Saturating ratio: value / scale, capped at `cap`.
/// Keeps very large gene sets from dominating purely by size.
pub fn saturating(value: f64, scale: f64, cap: f64) -> f64 {
    if scale <= 0.0 {
        return cap;
    }
    (value / scale).clamp(0.0, cap)
}

/// Fisher's method. X = -2 Σ ln(p_i) ~ χ²(2k) under the null; the
/// combined p-value is the upper tail at X.
///
/// A single p-value is returned unchanged. Inputs are floored at `floor`
/// so one zero cannot make X infinite.
pub fn fisher_combine(p_values: &[f64], floor: f64) -> f64 {
    match p_values {
        [] => 1.0,
        [p] => *p,
        _ => {
            let x: f64 = -2.0 * p_values.iter().map(|p| p.max(floor).ln()).sum::<f64>();
            let dof = 2.0 * p_values.len() as f64;
            let combined = match ChiSquared::new(dof) {
                Ok(dist) => dist.sf(x),
                // Only reachable with an invalid dof, which k >= 2 rules out.
                Err(_) => p_values.iter().copied().fold(1.0, f64::min),
            };
            combined.clamp(0.0, 1.0)
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn population_stddev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Standard deviation relative to the mean (coefficient of variation).
/// Zero for a single value or a zero mean.
pub fn normalized_stddev(values: &[f64]) -> f64 {
    match (mean(values), population_stddev(values)) {
        (Some(m), Some(sd)) if m > 0.0 => sd / m,
        _ => 0.0,
    }
}

/// Jaccard similarity |A ∩ B| / |A ∪ B|. Two empty sets are identical.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_neutral_p_value_is_positive_zero() {
        let component = neg_log10(1.0, 1e-300);
        assert_eq!(component, 0.0);
        assert!(component.is_sign_positive());
        assert_eq!(serde_json::to_string(&component).unwrap(), "0.0");
        assert!((neg_log10(1e-5, 1e-300) - 5.0).abs() < 1e-12);
        assert!((neg_log10(0.0, 1e-300) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_p_value_passes_through() {
        assert_eq!(fisher_combine(&[0.0123], 1e-300), 0.0123);
    }

    #[test]
    fn test_replication_strengthens_evidence() {
        for p in [0.05, 1e-3, 1e-6, 1e-10] {
            let combined = fisher_combine(&[p, p], 1e-300);
            assert!(combined < p, "p={p} combined={combined}");
        }
    }

    #[test]
    fn test_fisher_matches_closed_form_for_two() {
        // For k = 2, sf(X) = e^{-X/2} (1 + X/2) with X/2 = -ln(p1 p2).
        let (p1, p2): (f64, f64) = (0.01, 0.04);
        let half_x = -(p1 * p2).ln();
        let expected = (-half_x).exp() * (1.0 + half_x);
        let combined = fisher_combine(&[p1, p2], 1e-300);
        assert!((combined - expected).abs() < 1e-9, "{combined} vs {expected}");
    }

    #[test]
    fn test_weak_group_is_not_dominated_by_one_hit() {
        // One strong hit plus many null hits is weaker than the strong hit alone.
        let combined = fisher_combine(&[1e-4, 0.9, 0.9, 0.9, 0.9], 1e-300);
        assert!(combined > 1e-4);
    }

    #[test]
    fn test_zero_p_value_is_floored() {
        let combined = fisher_combine(&[0.0, 0.5], 1e-300);
        assert!(combined.is_finite());
        assert!(combined >= 0.0 && combined < 1e-200);
    }

    #[test]
    fn test_normalized_stddev() {
        assert_eq!(normalized_stddev(&[0.3]), 0.0);
        assert_eq!(normalized_stddev(&[0.2, 0.2, 0.2]), 0.0);
        // mean 0.5, population sd 0.5 → CV 1.0
        assert!((normalized_stddev(&[0.0, 1.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_saturating_caps() {
        assert!((saturating(5.0, 10.0, 2.0) - 0.5).abs() < 1e-12);
        assert!((saturating(500.0, 10.0, 2.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard() {
        let a = set(&["A", "B", "C", "D"]);
        let b = set(&["A", "B", "C", "E"]);
        assert!((jaccard(&a, &b) - 3.0 / 5.0).abs() < 1e-12);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &set(&["X"])), 0.0);
    }

    #[test]
    fn test_neg_log10_floor() {
        assert!((neg_log10(1e-10, 1e-300) - 10.0).abs() < 1e-9);
        assert!((neg_log10(0.0, 1e-300) - 300.0).abs() < 1e-9);
    }
}
