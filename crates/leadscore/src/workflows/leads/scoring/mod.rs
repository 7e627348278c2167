//! Lead scoring: client interaction history in, bounded auditable score out.
//!
//! The engine combines five weighted signal categories over a lookback
//! window, tracks score deltas across recalculations, and derives outreach
//! recommendations from the factor breakdown. Persistence of interactions,
//! communications, and score snapshots lives behind the collaborator traits
//! in [`repository`].

pub mod domain;
pub mod factors;
pub mod insights;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ClientId, Communication, Interaction, InteractionKind, ScoreBand, ScoreDistribution,
    ScoreMetadata, ScoreSnapshot, ScoringFactors,
};
pub use factors::{ClientHistory, FactorCalculator, MonetaryScorer, NoRevenueData};
pub use insights::{insights_for, ScoringInsights};
pub use repository::{
    CommunicationLog, DataAccessError, InteractionLog, ScoreQuery, ScoreRecord, ScoreRecordView,
    ScoreStore,
};
pub use router::scoring_router;
pub use rules::{scoring_rules, FactorKind, RuleTrigger, ScoringRule, SCORING_RULES};
pub use service::{
    ImportOutcome, LeadScoringService, NewInteraction, ScoringServiceError, ValidationError,
    DEFAULT_LOOKBACK_DAYS,
};
