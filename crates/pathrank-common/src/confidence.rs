/// Confidence scoring for aggregated pathways.
/// Each contributing hit yields a confidence from its p-value; hits are
/// combined with noisy-OR and then adjusted for replication.

/// -log10(p) at which a single hit reaches full confidence.
const FULL_CONFIDENCE_LOG10: f64 = 10.0;

/// Confidence modifiers derived from how a pathway was discovered.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceModifiers {
    /// Number of hits merged into the pathway.
    pub support_count: usize,
    /// Number of distinct seed genes that reach the pathway.
    pub seed_gene_count: usize,
    /// Hits whose statistic had to be neutralised.
    pub unusable_statistics: usize,
}

/// Confidence carried by one hit's p-value, in [0.0, 1.0].
pub fn hit_confidence(p_value: f64) -> f64 {
    if !p_value.is_finite() || p_value < 0.0 {
        return 0.0;
    }
    (-p_value.max(f64::MIN_POSITIVE).log10() / FULL_CONFIDENCE_LOG10).clamp(0.0, 1.0)
}

/// Compute final confidence given base confidence and modifiers.
/// Returns value in [0.0, 1.0].
pub fn compute_confidence(base: f64, mods: &ConfidenceModifiers) -> f64 {
    let mut confidence = base;

    // Independent rediscovery
    if mods.support_count >= 2 {
        confidence *= 1.15;
    }

    // Reached from more than one seed
    if mods.seed_gene_count >= 2 {
        confidence *= 1.05;
    }

    // Some hits had no usable statistic
    if mods.unusable_statistics > 0 {
        confidence *= 0.85;
    }

    confidence.clamp(0.0, 1.0)
}

/// Aggregate confidence from multiple independent evidence sources
/// using the noisy-OR model: p = 1 - Π(1 - p_i)
pub fn aggregate_confidence(confidences: &[f64]) -> f64 {
    if confidences.is_empty() {
        return 0.0;
    }
    let product: f64 = confidences.iter().map(|&p| 1.0 - p).product();
    1.0 - product
}
