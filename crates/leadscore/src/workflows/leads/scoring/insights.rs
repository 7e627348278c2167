use serde::Serialize;

use super::domain::{ClientId, ScoreBand, ScoringFactors};
use super::repository::ScoreRecord;

// Factor thresholds below which a targeted recommendation fires.
const LOW_ENGAGEMENT: u8 = 10;
const LOW_RECENCY: u8 = 10;
const LOW_FREQUENCY: u8 = 10;
const LOW_BEHAVIOR: u8 = 5;

pub(crate) const ENGAGEMENT_RECOMMENDATION: &str =
    "Increase engagement through targeted campaigns.";
pub(crate) const RECENCY_RECOMMENDATION: &str = "Re-engage with recent content or offers.";
pub(crate) const FREQUENCY_RECOMMENDATION: &str =
    "Increase interaction frequency with regular touchpoints.";
pub(crate) const BEHAVIOR_RECOMMENDATION: &str =
    "Encourage specific actions like demo requests or downloads.";

const HOT_ACTIONS: &[&str] = &[
    "Prioritize for immediate sales outreach",
    "Schedule a meeting or demo call",
    "Prepare a tailored proposal",
];
const WARM_ACTIONS: &[&str] = &[
    "Continue nurturing with relevant content",
    "Send case studies or product updates",
    "Monitor engagement for buying signals",
];
const COLD_ACTIONS: &[&str] = &[
    "Re-engage with educational content",
    "Segment into a re-activation campaign",
    "Consider re-qualifying the lead",
];

/// Outreach guidance derived from a client's latest stored score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringInsights {
    pub client_id: ClientId,
    pub current_score: u8,
    pub score_change: i16,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub factors: ScoringFactors,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<&'static str>,
    pub next_actions: Vec<&'static str>,
}

/// Evaluate the fixed threshold rules against a stored record. Each check
/// is independent and every matching recommendation is included, in rule
/// order.
pub fn insights_for(record: &ScoreRecord) -> ScoringInsights {
    let factors = record.factors;

    let mut recommendations = Vec::new();
    if factors.engagement < LOW_ENGAGEMENT {
        recommendations.push(ENGAGEMENT_RECOMMENDATION);
    }
    if factors.recency < LOW_RECENCY {
        recommendations.push(RECENCY_RECOMMENDATION);
    }
    if factors.frequency < LOW_FREQUENCY {
        recommendations.push(FREQUENCY_RECOMMENDATION);
    }
    if factors.behavior < LOW_BEHAVIOR {
        recommendations.push(BEHAVIOR_RECOMMENDATION);
    }

    let band = record.band();
    let next_actions = match band {
        ScoreBand::Hot => HOT_ACTIONS,
        ScoreBand::Warm => WARM_ACTIONS,
        ScoreBand::Cold => COLD_ACTIONS,
    }
    .to_vec();

    ScoringInsights {
        client_id: record.client_id.clone(),
        current_score: record.score,
        score_change: record.score_change,
        band,
        band_label: band.label(),
        factors,
        recommendations,
        next_actions,
    }
}
