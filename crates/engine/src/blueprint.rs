//! Stage 6: blueprint exclusion and scoring.

use repolens_protocol::{Blueprint, Intent};
use serde::Serialize;

use crate::classifier::Classification;
use crate::intent::IntentResult;
use crate::scoring::{clamp_confidence, score, w, Weight};
use crate::signals::{ProjectSignals, Signal};
use crate::structure::StructureValidation;

const BLUEPRINT_WEIGHTS: &[Weight<Blueprint>] = &[
    w(Signal::HasBlogPosts, Blueprint::ContentSite, 4),
    w(Signal::HasEditorialFlow, Blueprint::ContentSite, 3),
    w(Signal::SeoHeavy, Blueprint::ContentSite, 2),
    w(Signal::DynamicRoutes, Blueprint::ContentSite, 1),
    w(Signal::OnePage, Blueprint::LandingCro, 3),
    w(Signal::HasPrimaryCta, Blueprint::LandingCro, 3),
    w(Signal::SeoHeavy, Blueprint::LandingCro, 1),
    w(Signal::AuthUsageDetected, Blueprint::SaasApp, 3),
    w(Signal::HasDashboardUi, Blueprint::SaasApp, 3),
    w(Signal::AppState, Blueprint::SaasApp, 2),
    w(Signal::AuthLibPresent, Blueprint::SaasApp, 1),
    w(Signal::HasCheckout, Blueprint::SaasApp, 1),
    w(Signal::HasDashboardUi, Blueprint::Dashboard, 4),
    w(Signal::AppState, Blueprint::Dashboard, 2),
    w(Signal::DynamicRoutes, Blueprint::Dashboard, 1),
    w(Signal::HasCheckout, Blueprint::Ecommerce, 5),
    w(Signal::DynamicRoutes, Blueprint::Ecommerce, 1),
    w(Signal::SeoHeavy, Blueprint::Ecommerce, 1),
    w(Signal::AppState, Blueprint::Ecommerce, 1),
    w(Signal::PersonalIdentity, Blueprint::Portfolio, 4),
    w(Signal::HasProjects, Blueprint::Portfolio, 3),
    w(Signal::OnePage, Blueprint::Portfolio, 1),
    w(Signal::DocsSite, Blueprint::Documentation, 5),
    w(Signal::SeoHeavy, Blueprint::Documentation, 1),
    w(Signal::HasDashboardUi, Blueprint::InternalTool, 3),
    w(Signal::AppState, Blueprint::InternalTool, 2),
    w(Signal::AuthUsageDetected, Blueprint::InternalTool, 1),
    w(Signal::SeoHeavy, Blueprint::InternalTool, -2),
    w(Signal::HasCheckout, Blueprint::InternalTool, -2),
    w(Signal::ApiOnly, Blueprint::ApiService, 5),
    w(Signal::AuthLibPresent, Blueprint::ApiService, 1),
    w(Signal::ScriptOnly, Blueprint::AutomationScript, 5),
];

/// Points from the effective intent: (blueprint, intent, as primary, as secondary).
const INTENT_BONUS: &[(Blueprint, Intent, i32, i32)] = &[
    (Blueprint::ContentSite, Intent::Inform, 3, 1),
    (Blueprint::LandingCro, Intent::Convert, 3, 1),
    (Blueprint::LandingCro, Intent::Present, 2, 1),
    (Blueprint::SaasApp, Intent::Operate, 3, 1),
    (Blueprint::Dashboard, Intent::Operate, 3, 1),
    (Blueprint::Ecommerce, Intent::Convert, 3, 1),
    (Blueprint::Portfolio, Intent::Present, 3, 1),
    (Blueprint::Documentation, Intent::Inform, 2, 1),
    (Blueprint::InternalTool, Intent::Operate, 2, 1),
    (Blueprint::ApiService, Intent::Operate, 2, 1),
    (Blueprint::AutomationScript, Intent::Operate, 1, 0),
];

const CLASSIFIER_AGREEMENT_BONUS: i32 = 1;
const SECONDARY_GAP: i32 = 3;

struct Exclusion {
    blueprint: Blueprint,
    reason: &'static str,
    applies: fn(&ProjectSignals) -> bool,
}

/// Any matching rule excludes its blueprint.
const EXCLUSIONS: &[Exclusion] = &[
    Exclusion {
        blueprint: Blueprint::Ecommerce,
        reason: "no checkout flow",
        applies: |s| !s.has_checkout,
    },
    Exclusion {
        blueprint: Blueprint::Portfolio,
        reason: "portfolios never transact",
        applies: |s| s.has_checkout,
    },
    Exclusion {
        blueprint: Blueprint::Portfolio,
        reason: "no personal identity or projects",
        applies: |s| !s.flag(Signal::PersonalIdentity) && !s.has_projects,
    },
    Exclusion {
        blueprint: Blueprint::SaasApp,
        reason: "no auth and no dashboard",
        applies: |s| {
            !s.auth_lib_present && !s.flag(Signal::AuthUsageDetected) && !s.has_dashboard_ui
        },
    },
    Exclusion {
        blueprint: Blueprint::Dashboard,
        reason: "no dashboard and no application state",
        applies: |s| !s.has_dashboard_ui && !s.app_state,
    },
    Exclusion {
        blueprint: Blueprint::InternalTool,
        reason: "no dashboard",
        applies: |s| !s.has_dashboard_ui,
    },
    Exclusion {
        blueprint: Blueprint::ContentSite,
        reason: "no blog posts or editorial flow",
        applies: |s| !s.has_blog_posts && !s.has_editorial_flow,
    },
    Exclusion {
        blueprint: Blueprint::Documentation,
        reason: "not a documentation site",
        applies: |s| !s.docs_site,
    },
    Exclusion {
        blueprint: Blueprint::ApiService,
        reason: "serves pages or components",
        applies: |s| !s.api_only,
    },
    Exclusion {
        blueprint: Blueprint::AutomationScript,
        reason: "not a standalone script",
        applies: |s| !s.script_only,
    },
    Exclusion {
        blueprint: Blueprint::LandingCro,
        reason: "dashboard present",
        applies: |s| s.has_dashboard_ui,
    },
    Exclusion {
        blueprint: Blueprint::LandingCro,
        reason: "personal project showcase",
        applies: |s| s.flag(Signal::PersonalIdentity) && s.has_projects,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlueprintScore {
    pub blueprint: Blueprint,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlueprintSelection {
    pub primary: Blueprint,
    pub secondary: Option<Blueprint>,
    pub confidence: f64,
    /// Distinct, in declaration order.
    pub excluded_blueprints: Vec<Blueprint>,
    pub exclusion_reasons: Vec<String>,
    /// Non-excluded blueprints, best first.
    pub scores: Vec<BlueprintScore>,
    pub forced: bool,
}

pub fn excluded_blueprints(signals: &ProjectSignals) -> Vec<Blueprint> {
    Blueprint::ALL
        .iter()
        .copied()
        .filter(|blueprint| {
            EXCLUSIONS
                .iter()
                .any(|rule| rule.blueprint == *blueprint && (rule.applies)(signals))
        })
        .collect()
}

pub fn select_blueprint(
    signals: &ProjectSignals,
    intent: &IntentResult,
    structure: &StructureValidation,
    classification: &Classification,
) -> BlueprintSelection {
    let excluded = excluded_blueprints(signals);
    let exclusion_reasons: Vec<String> = EXCLUSIONS
        .iter()
        .filter(|rule| (rule.applies)(signals))
        .map(|rule| format!("{}: {}", rule.blueprint, rule.reason))
        .collect();

    let forced = structure
        .forced_type
        .filter(|_| structure.should_override_intent)
        .map(|project_type| project_type.blueprint())
        .filter(|blueprint| !excluded.contains(blueprint));
    if let Some(blueprint) = forced {
        log::debug!("blueprint: {blueprint} forced by structure");
        return BlueprintSelection {
            primary: blueprint,
            secondary: None,
            confidence: clamp_confidence(structure.structural_confidence),
            excluded_blueprints: excluded,
            exclusion_reasons,
            scores: Vec::new(),
            forced: true,
        };
    }

    let candidates: Vec<Blueprint> = Blueprint::ALL
        .iter()
        .copied()
        .filter(|b| !excluded.contains(b))
        .collect();
    let agreed = classification.project_type.blueprint();

    let mut scores: Vec<BlueprintScore> = score(&candidates, BLUEPRINT_WEIGHTS, signals)
        .into_iter()
        .map(|(blueprint, points)| {
            let bonus = intent_bonus(blueprint, intent)
                + if blueprint == agreed {
                    CLASSIFIER_AGREEMENT_BONUS
                } else {
                    0
                };
            BlueprintScore {
                blueprint,
                score: (points + bonus).max(0),
            }
        })
        .collect();
    // Stable sort keeps declaration order among equal scores.
    scores.sort_by(|a, b| b.score.cmp(&a.score));

    let selection = match scores.first() {
        None => BlueprintSelection {
            primary: Blueprint::LandingCro,
            secondary: None,
            confidence: 0.0,
            excluded_blueprints: excluded,
            exclusion_reasons,
            scores: Vec::new(),
            forced: false,
        },
        Some(top) => {
            let total: i32 = scores.iter().map(|s| s.score).sum();
            let secondary = scores
                .get(1)
                .filter(|next| top.score - next.score < SECONDARY_GAP)
                .map(|next| next.blueprint);
            let confidence = if total == 0 {
                0.0
            } else {
                clamp_confidence(f64::from(top.score) / f64::from(total))
            };
            BlueprintSelection {
                primary: top.blueprint,
                secondary,
                confidence,
                excluded_blueprints: excluded,
                exclusion_reasons,
                scores: scores.clone(),
                forced: false,
            }
        }
    };
    log::debug!(
        "blueprint: {} (secondary {:?}, confidence {:.2})",
        selection.primary,
        selection.secondary,
        selection.confidence
    );
    selection
}

fn intent_bonus(blueprint: Blueprint, intent: &IntentResult) -> i32 {
    INTENT_BONUS
        .iter()
        .filter(|(target, _, _, _)| *target == blueprint)
        .map(|&(_, bonus_intent, primary, secondary)| {
            if intent.primary_intent == bonus_intent {
                primary
            } else if intent.secondary_intent == Some(bonus_intent) {
                secondary
            } else {
                0
            }
        })
        .sum()
}
