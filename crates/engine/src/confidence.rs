//! Stage 8: overall confidence.

use serde::Serialize;

use crate::intent::IntentScores;
use crate::scoring::{clamp_confidence, round2};
use crate::signals::ProjectSignals;
use crate::structure::StructureValidation;

const STRUCTURE_WEIGHT: f64 = 0.6;
const DOMINANCE_WEIGHT: f64 = 0.3;
const COMPLETENESS_WEIGHT: f64 = 0.1;
/// Dominance when no intent scored at all.
const NEUTRAL_DOMINANCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBreakdown {
    pub structural_match: f64,
    pub intent_dominance: f64,
    pub signal_completeness: f64,
    pub overall: f64,
}

/// `scores` are the raw intent scores; `primary_score` is the score of the
/// intent that ended up primary.
pub fn compute_confidence(
    structure: &StructureValidation,
    scores: &IntentScores,
    primary_score: i32,
    signals: &ProjectSignals,
) -> ConfidenceBreakdown {
    let total = scores.total();
    let intent_dominance = if total <= 0 {
        NEUTRAL_DOMINANCE
    } else {
        f64::from(primary_score.max(0)) / f64::from(total)
    };

    let required = signals.required_defined();
    let defined = required.iter().filter(|defined| **defined).count();
    let signal_completeness = defined as f64 / required.len() as f64;

    let structural_match = clamp_confidence(structure.structural_confidence);
    let overall = clamp_confidence(
        STRUCTURE_WEIGHT * structural_match
            + DOMINANCE_WEIGHT * intent_dominance
            + COMPLETENESS_WEIGHT * signal_completeness,
    );

    let breakdown = ConfidenceBreakdown {
        structural_match: round2(structural_match),
        intent_dominance: round2(intent_dominance),
        signal_completeness: round2(signal_completeness),
        overall: round2(overall),
    };
    log::debug!("confidence: {:?}", breakdown);
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::MutationFrequency;
    use crate::structure::DominantStructure;
    use pretty_assertions::assert_eq;

    fn structure(confidence: f64) -> StructureValidation {
        StructureValidation {
            dominant_structure: DominantStructure::Hybrid,
            structural_confidence: confidence,
            forced_intent: None,
            forced_domain: None,
            forced_type: None,
            should_override_intent: false,
            reason: String::new(),
        }
    }

    #[test]
    fn weights_combine_structure_dominance_and_completeness() {
        let scores = IntentScores {
            inform: 8,
            present: 2,
            convert: 0,
            operate: 0,
        };
        let signals = ProjectSignals {
            has_primary_cta: Some(false),
            auth_usage_detected: Some(false),
            content_mutation_frequency: Some(MutationFrequency::High),
            seo_heavy: Some(true),
            ..ProjectSignals::default()
        };
        let breakdown = compute_confidence(&structure(0.9), &scores, 8, &signals);
        // 0.6 * 0.9 + 0.3 * 0.8 + 0.1 * 1.0
        assert_eq!(breakdown.overall, 0.88);
        assert_eq!(breakdown.intent_dominance, 0.8);
        assert_eq!(breakdown.signal_completeness, 1.0);
    }

    #[test]
    fn zero_scores_use_neutral_dominance() {
        let breakdown = compute_confidence(
            &structure(0.6),
            &IntentScores::default(),
            0,
            &ProjectSignals::default(),
        );
        assert_eq!(breakdown.intent_dominance, 0.5);
        // five of nine signals are always defined
        assert_eq!(breakdown.signal_completeness, 0.56);
        assert_eq!(breakdown.overall, 0.57);
    }

    #[test]
    fn overall_never_exceeds_cap() {
        let scores = IntentScores {
            inform: 0,
            present: 0,
            convert: 0,
            operate: 9,
        };
        let signals = ProjectSignals {
            has_primary_cta: Some(true),
            auth_usage_detected: Some(true),
            content_mutation_frequency: Some(MutationFrequency::Low),
            seo_heavy: Some(false),
            ..ProjectSignals::default()
        };
        let breakdown = compute_confidence(&structure(0.95), &scores, 9, &signals);
        assert_eq!(breakdown.overall, 0.95);
    }
}
