use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{Communication, Interaction, ScoringFactors};
use super::rules;

/// Windowed history fetched for one client ahead of a calculation.
#[derive(Debug, Clone, Default)]
pub struct ClientHistory {
    pub interactions: Vec<Interaction>,
    pub communications: Vec<Communication>,
}

impl ClientHistory {
    /// Timestamp of the most recent touchpoint, if any.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.interactions
            .iter()
            .map(|interaction| interaction.occurred_at)
            .max()
    }
}

/// Revenue signal extension point. The shipped default carries no invoicing
/// integration and always reports zero.
pub trait MonetaryScorer: Send + Sync {
    fn score(&self, interactions: &[Interaction]) -> u8;
}

/// Placeholder scorer until revenue data is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRevenueData;

impl MonetaryScorer for NoRevenueData {
    fn score(&self, _interactions: &[Interaction]) -> u8 {
        0
    }
}

/// Stateless calculator producing the five bounded sub-scores from a
/// client's windowed history.
pub struct FactorCalculator {
    monetary: Arc<dyn MonetaryScorer>,
}

impl FactorCalculator {
    pub fn new() -> Self {
        Self::with_monetary(Arc::new(NoRevenueData))
    }

    pub fn with_monetary(monetary: Arc<dyn MonetaryScorer>) -> Self {
        Self { monetary }
    }

    pub fn compute(&self, history: &ClientHistory, now: DateTime<Utc>) -> ScoringFactors {
        let mut engagement: u16 = 0;
        let mut behavior: u16 = 0;
        for interaction in &history.interactions {
            engagement += u16::from(rules::engagement_points(interaction.kind));
            behavior += u16::from(rules::behavior_points(interaction.kind));
        }

        // Repeated touchpoints are additive, so the category ceilings are
        // enforced here rather than assumed from the rule table.
        let engagement = engagement.min(u16::from(ScoringFactors::ENGAGEMENT_CEILING)) as u8;
        let behavior = behavior.min(u16::from(ScoringFactors::BEHAVIOR_CEILING)) as u8;

        let recency = match history.last_activity() {
            Some(last_activity) => rules::recency_points((now - last_activity).num_days()),
            None => 0,
        };

        let frequency = rules::frequency_points(history.interactions.len());

        let monetary = self
            .monetary
            .score(&history.interactions)
            .min(ScoringFactors::MONETARY_CEILING);

        ScoringFactors {
            engagement,
            recency,
            frequency,
            monetary,
            behavior,
        }
    }
}

impl Default for FactorCalculator {
    fn default() -> Self {
        Self::new()
    }
}
