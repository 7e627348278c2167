use std::collections::HashSet;

use crate::workflows::leads::scoring::domain::{InteractionKind, ScoringFactors};
use crate::workflows::leads::scoring::rules::{
    self, scoring_rules, FactorKind, RuleTrigger, SCORING_RULES,
};

const ALL_KINDS: &[InteractionKind] = &[
    InteractionKind::EmailOpen,
    InteractionKind::EmailClick,
    InteractionKind::WebsiteVisit,
    InteractionKind::DemoRequest,
    InteractionKind::Download,
    InteractionKind::SupportTicket,
    InteractionKind::Payment,
    InteractionKind::Referral,
];

#[test]
fn trigger_keys_are_globally_unique() {
    let mut seen = HashSet::new();
    for rule in SCORING_RULES {
        assert!(
            seen.insert(rule.trigger.key()),
            "duplicate trigger key: {}",
            rule.trigger.key()
        );
    }
}

#[test]
fn engagement_rule_points_sum_to_the_ceiling() {
    let total: u16 = SCORING_RULES
        .iter()
        .filter(|rule| rule.factor == FactorKind::Engagement)
        .map(|rule| u16::from(rule.points))
        .sum();
    assert_eq!(total, u16::from(ScoringFactors::ENGAGEMENT_CEILING));
}

#[test]
fn table_matches_the_compiled_point_lookups() {
    for rule in SCORING_RULES {
        if let RuleTrigger::Interaction(kind) = rule.trigger {
            let expected = match rule.factor {
                FactorKind::Engagement => rules::engagement_points(kind),
                FactorKind::Behavior => rules::behavior_points(kind),
                other => panic!("unexpected interaction-triggered factor: {other:?}"),
            };
            assert_eq!(
                rule.points,
                expected,
                "rule table disagrees with lookup for {}",
                kind.label()
            );
        }
    }
}

#[test]
fn every_interaction_kind_feeds_exactly_one_factor() {
    for kind in ALL_KINDS {
        let engagement = rules::engagement_points(*kind);
        let behavior = rules::behavior_points(*kind);
        assert!(
            (engagement > 0) ^ (behavior > 0),
            "{} must score in exactly one category",
            kind.label()
        );
    }
}

#[test]
fn recency_steps_match_documented_thresholds() {
    assert_eq!(rules::recency_points(0), 20);
    assert_eq!(rules::recency_points(7), 20);
    assert_eq!(rules::recency_points(8), 15);
    assert_eq!(rules::recency_points(30), 15);
    assert_eq!(rules::recency_points(31), 10);
    assert_eq!(rules::recency_points(90), 10);
    assert_eq!(rules::recency_points(91), 0);
    assert_eq!(rules::recency_points(400), 0);
}

#[test]
fn frequency_steps_match_documented_thresholds() {
    assert_eq!(rules::frequency_points(0), 0);
    assert_eq!(rules::frequency_points(4), 0);
    assert_eq!(rules::frequency_points(5), 10);
    assert_eq!(rules::frequency_points(9), 10);
    assert_eq!(rules::frequency_points(10), 15);
    assert_eq!(rules::frequency_points(19), 15);
    assert_eq!(rules::frequency_points(20), 20);
    assert_eq!(rules::frequency_points(250), 20);
}

#[test]
fn table_is_exposed_read_only_with_descriptions() {
    let rules = scoring_rules();
    assert_eq!(rules.len(), SCORING_RULES.len());
    assert!(rules.iter().all(|rule| !rule.description.is_empty()));
}
