//! Stage 4: intent scoring.

use repolens_protocol::Intent;
use serde::Serialize;

use crate::scoring::{clamp_confidence, score, w, Weight};
use crate::signals::{ProjectSignals, Signal};

const INTENT_WEIGHTS: &[Weight<Intent>] = &[
    w(Signal::HasBlogPosts, Intent::Inform, 3),
    w(Signal::SeoHeavy, Intent::Inform, 3),
    w(Signal::SeoHeavy, Intent::Present, 1),
    w(Signal::DynamicRoutes, Intent::Inform, 1),
    w(Signal::DynamicRoutes, Intent::Operate, 1),
    w(Signal::OnePage, Intent::Present, 2),
    w(Signal::OnePage, Intent::Convert, 2),
    w(Signal::HasPrimaryCta, Intent::Inform, 1),
    w(Signal::HasPrimaryCta, Intent::Convert, 3),
    w(Signal::PersonalIdentity, Intent::Present, 2),
    w(Signal::HasProjects, Intent::Present, 2),
    w(Signal::HasCheckout, Intent::Convert, 4),
    w(Signal::AuthLibPresent, Intent::Operate, 1),
    w(Signal::AuthUsageDetected, Intent::Operate, 3),
    w(Signal::HasDashboardUi, Intent::Operate, 4),
    w(Signal::AppState, Intent::Operate, 2),
];

/// Tie-break order among intents within one point of the top score.
const TIE_PRIORITY: [Intent; 4] = [
    Intent::Operate,
    Intent::Convert,
    Intent::Present,
    Intent::Inform,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntentScores {
    pub inform: i32,
    pub present: i32,
    pub convert: i32,
    pub operate: i32,
}

impl IntentScores {
    pub fn get(&self, intent: Intent) -> i32 {
        match intent {
            Intent::Inform => self.inform,
            Intent::Present => self.present,
            Intent::Convert => self.convert,
            Intent::Operate => self.operate,
        }
    }

    pub fn total(&self) -> i32 {
        self.inform + self.present + self.convert + self.operate
    }

    /// Highest score among intents other than `intent`.
    pub fn best_other(&self, intent: Intent) -> i32 {
        Intent::ALL
            .iter()
            .filter(|other| **other != intent)
            .map(|other| self.get(*other))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentResult {
    pub scores: IntentScores,
    pub primary_intent: Intent,
    pub secondary_intent: Option<Intent>,
    pub confidence: f64,
}

pub fn detect_intent(signals: &ProjectSignals) -> IntentResult {
    let mut scores = IntentScores::default();
    for (intent, points) in score(&Intent::ALL, INTENT_WEIGHTS, signals) {
        match intent {
            Intent::Inform => scores.inform = points,
            Intent::Present => scores.present = points,
            Intent::Convert => scores.convert = points,
            Intent::Operate => scores.operate = points,
        }
    }
    let result = resolve(scores);
    log::debug!(
        "intent: {:?} (secondary {:?}, confidence {:.2}) from {:?}",
        result.primary_intent,
        result.secondary_intent,
        result.confidence,
        result.scores
    );
    result
}

fn priority_rank(intent: Intent) -> usize {
    TIE_PRIORITY
        .iter()
        .position(|p| *p == intent)
        .unwrap_or(TIE_PRIORITY.len())
}

pub(crate) fn resolve(scores: IntentScores) -> IntentResult {
    let total = scores.total();
    if total <= 0 {
        return IntentResult {
            scores,
            primary_intent: Intent::Present,
            secondary_intent: None,
            confidence: 0.0,
        };
    }

    let mut ranked: Vec<(Intent, i32)> =
        Intent::ALL.iter().map(|i| (*i, scores.get(*i))).collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| priority_rank(a.0).cmp(&priority_rank(b.0)))
    });
    let (top, top_score) = ranked[0];
    let second_score = ranked[1].1;

    let (primary, secondary) = if top_score - second_score > 1 {
        let (runner_up, runner_score) = ranked[1];
        let secondary = (top_score - runner_score < 3 && runner_score > 0).then_some(runner_up);
        (top, secondary)
    } else {
        let primary = TIE_PRIORITY
            .iter()
            .copied()
            .find(|intent| scores.get(*intent) >= top_score - 1)
            .unwrap_or(top);
        let secondary = ranked
            .iter()
            .find(|(intent, points)| *intent != primary && *points > 0)
            .map(|(intent, _)| *intent);
        (primary, secondary)
    };

    let primary_score = scores.get(primary);
    let gap = (primary_score - scores.best_other(primary)).max(0);
    let confidence = 0.6 * f64::from(primary_score) / f64::from(total)
        + 0.4 * f64::from(gap) / f64::from(primary_score.max(1));

    IntentResult {
        scores,
        primary_intent: primary,
        secondary_intent: secondary,
        confidence: clamp_confidence(confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::MutationFrequency;
    use pretty_assertions::assert_eq;

    fn scores(inform: i32, present: i32, convert: i32, operate: i32) -> IntentScores {
        IntentScores {
            inform,
            present,
            convert,
            operate,
        }
    }

    #[test]
    fn clear_winner_without_close_secondary() {
        let result = resolve(scores(1, 2, 5, 0));
        assert_eq!(result.primary_intent, Intent::Convert);
        assert_eq!(result.secondary_intent, None);
        // 0.6 * 5/8 + 0.4 * 3/5
        assert!((result.confidence - 0.615).abs() < 1e-9);
    }

    #[test]
    fn clear_winner_records_close_secondary() {
        let result = resolve(scores(6, 4, 0, 0));
        assert_eq!(result.primary_intent, Intent::Inform);
        assert_eq!(result.secondary_intent, Some(Intent::Present));
    }

    #[test]
    fn near_tie_prefers_operate_then_convert() {
        let result = resolve(scores(5, 0, 4, 0));
        assert_eq!(result.primary_intent, Intent::Convert);
        assert_eq!(result.secondary_intent, Some(Intent::Inform));

        let result = resolve(scores(0, 4, 4, 3));
        assert_eq!(result.primary_intent, Intent::Operate);
    }

    #[test]
    fn all_zero_scores_claim_nothing() {
        let result = resolve(IntentScores::default());
        assert_eq!(result.primary_intent, Intent::Present);
        assert_eq!(result.secondary_intent, None);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn confidence_is_capped() {
        let result = resolve(scores(0, 0, 0, 10));
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn editorial_signals_score_inform() {
        let signals = ProjectSignals {
            has_blog_posts: true,
            seo_heavy: Some(true),
            dynamic_routes: true,
            has_editorial_flow: true,
            content_mutation_frequency: Some(MutationFrequency::High),
            ..ProjectSignals::default()
        };
        let result = detect_intent(&signals);
        assert_eq!(result.scores, scores(7, 1, 0, 1));
        assert_eq!(result.primary_intent, Intent::Inform);
        assert_eq!(result.secondary_intent, None);
    }
}
