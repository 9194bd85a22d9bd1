use proptest::prelude::*;
use repolens_engine::blueprint::{excluded_blueprints, select_blueprint};
use repolens_engine::classifier::Classification;
use repolens_engine::confidence::compute_confidence;
use repolens_engine::intent::detect_intent;
use repolens_engine::signals::{MutationFrequency, ProjectSignals};
use repolens_engine::structure::{apply_override, validate_structure};
use repolens_engine::taxonomy::{Domain, ProjectType};
use repolens_engine::{analyze, MAX_CONFIDENCE};
use repolens_protocol::{Blueprint, Complexity, Intent, NormalizedProject, Statefulness};

fn tri_state() -> impl Strategy<Value = Option<bool>> {
    prop_oneof![Just(None), Just(Some(false)), Just(Some(true))]
}

fn mutation() -> impl Strategy<Value = Option<MutationFrequency>> {
    prop_oneof![
        Just(None),
        Just(Some(MutationFrequency::Low)),
        Just(Some(MutationFrequency::Medium)),
        Just(Some(MutationFrequency::High)),
    ]
}

fn signals() -> impl Strategy<Value = ProjectSignals> {
    (
        (
            any::<bool>(),
            tri_state(),
            any::<bool>(),
            any::<bool>(),
            tri_state(),
            any::<bool>(),
        ),
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            0usize..12,
            mutation(),
            tri_state(),
        ),
        (
            any::<bool>(),
            tri_state(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        ),
    )
        .prop_map(|(a, b, c)| ProjectSignals {
            one_page: a.0,
            has_primary_cta: a.1,
            has_checkout: a.2,
            auth_lib_present: a.3,
            auth_usage_detected: a.4,
            has_dashboard_ui: a.5,
            has_blog_posts: b.0,
            has_editorial_flow: b.1,
            dynamic_routes: b.2,
            page_count: b.3,
            content_mutation_frequency: b.4,
            seo_heavy: b.5,
            app_state: c.0,
            personal_identity: c.1,
            has_projects: c.2,
            docs_site: c.3,
            api_only: c.4,
            script_only: c.5,
        })
}

fn classification() -> impl Strategy<Value = Classification> {
    prop_oneof![
        Just(ProjectType::Blog),
        Just(ProjectType::Landing),
        Just(ProjectType::Saas),
        Just(ProjectType::Dashboard),
        Just(ProjectType::Ecommerce),
        Just(ProjectType::Portfolio),
        Just(ProjectType::Docs),
        Just(ProjectType::Api),
    ]
    .prop_map(|project_type| Classification {
        intent: Intent::Present,
        domain: Domain::Product,
        project_type,
        complexity: Complexity::Low,
        statefulness: Statefulness::Stateless,
        auth_required: false,
        seo_relevant: false,
    })
}

fn in_bounds(value: f64) -> bool {
    (0.0..=MAX_CONFIDENCE).contains(&value)
}

const PATHS: &[&str] = &[
    "package.json",
    "pages/index.tsx",
    "pages/about.tsx",
    "pages/blog/[slug].tsx",
    "posts/first.md",
    "app/page.tsx",
    "app/dashboard/page.tsx",
    "app/api/users/route.ts",
    "components/Hero.tsx",
    "checkout/index.ts",
    "projects/demo.md",
    "docs/intro.md",
    "src/server.js",
    "scripts/sync.py",
    "public/robots.txt",
    "store/index.ts",
    "index.html",
];

proptest! {
    #[test]
    fn every_stage_confidence_is_bounded(signals in signals(), classified in classification()) {
        let intent = detect_intent(&signals);
        prop_assert!(in_bounds(intent.confidence));

        let structure = validate_structure(&signals, &intent);
        prop_assert!(in_bounds(structure.structural_confidence));

        let effective = apply_override(&intent, &structure);
        prop_assert!(in_bounds(effective.confidence));

        let selection = select_blueprint(&signals, &effective, &structure, &classified);
        prop_assert!(in_bounds(selection.confidence));
        prop_assert!(!selection.excluded_blueprints.contains(&selection.primary)
            || selection.confidence == 0.0);

        let breakdown = compute_confidence(
            &structure,
            &intent.scores,
            intent.scores.get(effective.primary_intent),
            &signals,
        );
        prop_assert!(in_bounds(breakdown.overall));
        prop_assert!((0.0..=1.0).contains(&breakdown.intent_dominance));
        prop_assert!((0.0..=1.0).contains(&breakdown.signal_completeness));
    }

    #[test]
    fn checkout_decides_ecommerce_and_portfolio_exclusion(signals in signals()) {
        let excluded = excluded_blueprints(&signals);
        if signals.has_checkout {
            prop_assert!(excluded.contains(&Blueprint::Portfolio));
            prop_assert!(!excluded.contains(&Blueprint::Ecommerce));
        } else {
            prop_assert!(excluded.contains(&Blueprint::Ecommerce));
        }
    }

    #[test]
    fn whole_pipeline_stays_bounded_and_repeatable(
        picks in proptest::sample::subsequence(PATHS.to_vec(), 1..PATHS.len())
    ) {
        let project = NormalizedProject::new(
            picks.iter().map(|p| p.to_string()),
            Vec::new(),
            Vec::new(),
            None,
        );
        let first = analyze(&project).unwrap();
        let second = analyze(&project).unwrap();
        prop_assert!(in_bounds(first.canonical.source.confidence));
        prop_assert_eq!(
            serde_json::to_string(&first.canonical).unwrap(),
            serde_json::to_string(&second.canonical).unwrap()
        );
    }
}
