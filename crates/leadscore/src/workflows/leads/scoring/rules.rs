use super::domain::InteractionKind;
use serde::Serialize;

/// Factor categories that make up a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Engagement,
    Recency,
    Frequency,
    Monetary,
    Behavior,
}

impl FactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Engagement => "engagement",
            Self::Recency => "recency",
            Self::Frequency => "frequency",
            Self::Monetary => "monetary",
            Self::Behavior => "behavior",
        }
    }
}

/// Condition a rule fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTrigger {
    /// Fires once per interaction of the given kind.
    Interaction(InteractionKind),
    /// Documents a threshold the calculator evaluates directly.
    Computed(&'static str),
}

impl RuleTrigger {
    pub const fn key(self) -> &'static str {
        match self {
            RuleTrigger::Interaction(kind) => kind.label(),
            RuleTrigger::Computed(key) => key,
        }
    }
}

/// Single entry in the shipped scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringRule {
    pub factor: FactorKind,
    pub trigger: RuleTrigger,
    pub points: u8,
    pub description: &'static str,
}

/// The shipped rubric. Ordered, immutable, exposed read-only. Trigger keys
/// are globally unique so the same business event cannot feed two factors.
pub const SCORING_RULES: &[ScoringRule] = &[
    ScoringRule {
        factor: FactorKind::Engagement,
        trigger: RuleTrigger::Interaction(InteractionKind::EmailOpen),
        points: 2,
        description: "Opened a marketing or sales email",
    },
    ScoringRule {
        factor: FactorKind::Engagement,
        trigger: RuleTrigger::Interaction(InteractionKind::EmailClick),
        points: 3,
        description: "Clicked a link inside an email",
    },
    ScoringRule {
        factor: FactorKind::Engagement,
        trigger: RuleTrigger::Interaction(InteractionKind::WebsiteVisit),
        points: 5,
        description: "Visited the product website",
    },
    ScoringRule {
        factor: FactorKind::Engagement,
        trigger: RuleTrigger::Interaction(InteractionKind::Download),
        points: 5,
        description: "Downloaded a whitepaper or resource",
    },
    ScoringRule {
        factor: FactorKind::Engagement,
        trigger: RuleTrigger::Interaction(InteractionKind::DemoRequest),
        points: 15,
        description: "Requested a product demo",
    },
    ScoringRule {
        factor: FactorKind::Recency,
        trigger: RuleTrigger::Computed("last_7_days"),
        points: 20,
        description: "Most recent touchpoint within 7 days",
    },
    ScoringRule {
        factor: FactorKind::Recency,
        trigger: RuleTrigger::Computed("last_30_days"),
        points: 15,
        description: "Most recent touchpoint within 30 days",
    },
    ScoringRule {
        factor: FactorKind::Recency,
        trigger: RuleTrigger::Computed("last_90_days"),
        points: 10,
        description: "Most recent touchpoint within 90 days",
    },
    ScoringRule {
        factor: FactorKind::Frequency,
        trigger: RuleTrigger::Computed("at_least_20_interactions"),
        points: 20,
        description: "20 or more touchpoints in the window",
    },
    ScoringRule {
        factor: FactorKind::Frequency,
        trigger: RuleTrigger::Computed("at_least_10_interactions"),
        points: 15,
        description: "10 or more touchpoints in the window",
    },
    ScoringRule {
        factor: FactorKind::Frequency,
        trigger: RuleTrigger::Computed("at_least_5_interactions"),
        points: 10,
        description: "5 or more touchpoints in the window",
    },
    ScoringRule {
        factor: FactorKind::Monetary,
        trigger: RuleTrigger::Computed("revenue_signal"),
        points: 15,
        description: "Reserved for the invoicing integration; scores 0 until wired in",
    },
    ScoringRule {
        factor: FactorKind::Behavior,
        trigger: RuleTrigger::Interaction(InteractionKind::SupportTicket),
        points: 5,
        description: "Opened a support ticket",
    },
    ScoringRule {
        factor: FactorKind::Behavior,
        trigger: RuleTrigger::Interaction(InteractionKind::Payment),
        points: 10,
        description: "Made a payment",
    },
    ScoringRule {
        factor: FactorKind::Behavior,
        trigger: RuleTrigger::Interaction(InteractionKind::Referral),
        points: 15,
        description: "Referred another prospect",
    },
];

pub fn scoring_rules() -> &'static [ScoringRule] {
    SCORING_RULES
}

/// Engagement points for one interaction; zero when the kind carries no
/// engagement signal.
pub(crate) const fn engagement_points(kind: InteractionKind) -> u8 {
    match kind {
        InteractionKind::EmailOpen => 2,
        InteractionKind::EmailClick => 3,
        InteractionKind::WebsiteVisit => 5,
        InteractionKind::Download => 5,
        InteractionKind::DemoRequest => 15,
        InteractionKind::SupportTicket | InteractionKind::Payment | InteractionKind::Referral => 0,
    }
}

/// Behavior points for one interaction; zero outside the behavior rules.
pub(crate) const fn behavior_points(kind: InteractionKind) -> u8 {
    match kind {
        InteractionKind::SupportTicket => 5,
        InteractionKind::Payment => 10,
        InteractionKind::Referral => 15,
        InteractionKind::EmailOpen
        | InteractionKind::EmailClick
        | InteractionKind::WebsiteVisit
        | InteractionKind::Download
        | InteractionKind::DemoRequest => 0,
    }
}

/// Recency step over days since the most recent touchpoint.
pub(crate) const fn recency_points(days_since_activity: i64) -> u8 {
    if days_since_activity <= 7 {
        20
    } else if days_since_activity <= 30 {
        15
    } else if days_since_activity <= 90 {
        10
    } else {
        0
    }
}

/// Frequency step over the interaction count inside the window.
pub(crate) const fn frequency_points(total_interactions: usize) -> u8 {
    if total_interactions >= 20 {
        20
    } else if total_interactions >= 10 {
        15
    } else if total_interactions >= 5 {
        10
    } else {
        0
    }
}
