use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::domain::{
    ClientId, Interaction, InteractionKind, ScoreBand, ScoreDistribution, ScoreMetadata,
    ScoreSnapshot,
};
use super::factors::{ClientHistory, FactorCalculator};
use super::insights::{self, ScoringInsights};
use super::repository::{
    CommunicationLog, DataAccessError, InteractionLog, ScoreQuery, ScoreRecord, ScoreStore,
};

/// Hard ceiling on the composite score. The category ceilings already sum
/// to 100; this guards against future rule-table edits pushing past it.
const SCORE_CEILING: u16 = 100;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 90;

/// New touchpoint accepted at the recording entry point.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInteraction {
    pub kind: InteractionKind,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub value: f64,
    /// Explicit timestamp for backfill and imports; defaults to the
    /// recording time.
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Outcome of a batch import of historical touchpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub recorded: usize,
    pub clients_rescored: usize,
}

/// Service composing the interaction/communication logs, the score store,
/// and the factor calculator.
pub struct LeadScoringService<I, C, S> {
    interactions: Arc<I>,
    communications: Arc<C>,
    scores: Arc<S>,
    calculator: FactorCalculator,
    default_lookback_days: u32,
    locks: ClientLocks,
}

impl<I, C, S> LeadScoringService<I, C, S>
where
    I: InteractionLog + 'static,
    C: CommunicationLog + 'static,
    S: ScoreStore + 'static,
{
    pub fn new(interactions: Arc<I>, communications: Arc<C>, scores: Arc<S>) -> Self {
        Self::with_calculator(
            interactions,
            communications,
            scores,
            FactorCalculator::new(),
            DEFAULT_LOOKBACK_DAYS,
        )
    }

    pub fn with_calculator(
        interactions: Arc<I>,
        communications: Arc<C>,
        scores: Arc<S>,
        calculator: FactorCalculator,
        default_lookback_days: u32,
    ) -> Self {
        Self {
            interactions,
            communications,
            scores,
            calculator,
            default_lookback_days,
            locks: ClientLocks::default(),
        }
    }

    /// Compute a snapshot over the lookback window using the wall clock.
    pub fn calculate_lead_score(
        &self,
        client_id: &ClientId,
        lookback_days: Option<u32>,
    ) -> Result<ScoreSnapshot, ScoringServiceError> {
        self.calculate_lead_score_at(client_id, lookback_days, Utc::now())
    }

    /// Compute a snapshot against an explicit reference time so callers and
    /// tests get deterministic windows.
    pub fn calculate_lead_score_at(
        &self,
        client_id: &ClientId,
        lookback_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ScoreSnapshot, ScoringServiceError> {
        let period_days = lookback_days.unwrap_or(self.default_lookback_days);
        if period_days == 0 {
            return Err(ValidationError::NonPositiveLookback.into());
        }

        let since = now - Duration::days(i64::from(period_days));
        let history = ClientHistory {
            interactions: self.interactions.query(client_id, since)?,
            communications: self.communications.query(client_id, since)?,
        };

        let factors = self.calculator.compute(&history, now);
        let score = factors.total().min(SCORE_CEILING) as u8;

        Ok(ScoreSnapshot {
            client_id: client_id.clone(),
            score,
            factors,
            metadata: ScoreMetadata {
                interactions_count: history.interactions.len() as u32,
                communications_count: history.communications.len() as u32,
                calculated_at: now,
                period_days,
            },
        })
    }

    /// Persist a snapshot, deriving the delta against the immediately prior
    /// record. Appends a new record; nothing is updated in place.
    pub fn save_lead_score(
        &self,
        snapshot: ScoreSnapshot,
    ) -> Result<ScoreRecord, ScoringServiceError> {
        let previous_score = self
            .scores
            .latest(&snapshot.client_id)?
            .map(|record| record.score);
        let score_change = match previous_score {
            Some(previous) => i16::from(snapshot.score) - i16::from(previous),
            None => i16::from(snapshot.score),
        };

        let last_updated = snapshot.metadata.calculated_at;
        let record = ScoreRecord {
            client_id: snapshot.client_id,
            score: snapshot.score,
            factors: snapshot.factors,
            previous_score,
            score_change,
            metadata: snapshot.metadata,
            last_updated,
        };

        Ok(self.scores.append(record)?)
    }

    /// Recalculate and persist with the default lookback. This is the
    /// trigger path after every new interaction, so the current score stays
    /// fresh without a scheduler.
    pub fn recalculate_score(&self, client_id: &ClientId) -> Result<ScoreRecord, ScoringServiceError> {
        self.recalculate_score_at(client_id, Utc::now())
    }

    pub fn recalculate_score_at(
        &self,
        client_id: &ClientId,
        now: DateTime<Utc>,
    ) -> Result<ScoreRecord, ScoringServiceError> {
        // Serialize read-previous/append per client so the delta is always
        // relative to the true immediately-prior record.
        let lock = self.locks.for_client(client_id);
        let _guard = lock.lock().expect("client lock poisoned");

        let snapshot = self.calculate_lead_score_at(client_id, None, now)?;
        self.save_lead_score(snapshot)
    }

    /// Entry point for new touchpoints: persist, then refresh the score.
    pub fn record_interaction(
        &self,
        client_id: &ClientId,
        interaction: NewInteraction,
    ) -> Result<Interaction, ScoringServiceError> {
        self.record_interaction_at(client_id, interaction, Utc::now())
    }

    pub fn record_interaction_at(
        &self,
        client_id: &ClientId,
        interaction: NewInteraction,
        now: DateTime<Utc>,
    ) -> Result<Interaction, ScoringServiceError> {
        let occurred_at = interaction.occurred_at.unwrap_or(now);
        let stored = self.interactions.record(Interaction {
            client_id: client_id.clone(),
            kind: interaction.kind,
            source: interaction.source,
            value: interaction.value,
            occurred_at,
        })?;

        self.recalculate_score_at(client_id, now)?;
        Ok(stored)
    }

    /// Append a batch of historical touchpoints, rescoring each distinct
    /// client once at the end instead of once per row.
    pub fn import_interactions(
        &self,
        rows: Vec<(ClientId, NewInteraction)>,
        now: DateTime<Utc>,
    ) -> Result<ImportOutcome, ScoringServiceError> {
        let mut clients: BTreeSet<ClientId> = BTreeSet::new();
        let mut recorded = 0usize;

        for (client_id, interaction) in rows {
            let occurred_at = interaction.occurred_at.unwrap_or(now);
            self.interactions.record(Interaction {
                client_id: client_id.clone(),
                kind: interaction.kind,
                source: interaction.source,
                value: interaction.value,
                occurred_at,
            })?;
            recorded += 1;
            clients.insert(client_id);
        }

        for client_id in &clients {
            self.recalculate_score_at(client_id, now)?;
        }

        Ok(ImportOutcome {
            recorded,
            clients_rescored: clients.len(),
        })
    }

    /// Latest stored score, or None for clients never scored — an expected
    /// steady state, not an error.
    pub fn get_lead_score(
        &self,
        client_id: &ClientId,
    ) -> Result<Option<ScoreRecord>, ScoringServiceError> {
        Ok(self.scores.latest(client_id)?)
    }

    pub fn get_all_lead_scores(
        &self,
        filter: &ScoreQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ScoreRecord>, ScoringServiceError> {
        validate_filter(filter)?;
        Ok(self.scores.query(filter, limit, offset)?)
    }

    /// Bucket every client's latest record into hot/warm/cold. Historical
    /// records are excluded so no client is counted twice.
    pub fn get_lead_score_distribution(&self) -> Result<ScoreDistribution, ScoringServiceError> {
        let latest = self.scores.latest_per_client()?;
        let mut distribution = ScoreDistribution {
            total: latest.len(),
            ..ScoreDistribution::default()
        };

        for record in &latest {
            match ScoreBand::classify(record.score) {
                ScoreBand::Hot => distribution.hot += 1,
                ScoreBand::Warm => distribution.warm += 1,
                ScoreBand::Cold => distribution.cold += 1,
            }
        }

        Ok(distribution)
    }

    pub fn get_scoring_insights(
        &self,
        client_id: &ClientId,
    ) -> Result<Option<ScoringInsights>, ScoringServiceError> {
        Ok(self
            .scores
            .latest(client_id)?
            .map(|record| insights::insights_for(&record)))
    }
}

fn validate_filter(filter: &ScoreQuery) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (filter.min_score, filter.max_score) {
        if min > max {
            return Err(ValidationError::EmptyScoreRange { min, max });
        }
    }
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(ValidationError::EmptyDateRange { from, to });
        }
    }
    Ok(())
}

/// One mutex per client so concurrent recalculations for different clients
/// never contend.
#[derive(Default)]
struct ClientLocks {
    inner: Mutex<HashMap<ClientId, Arc<Mutex<()>>>>,
}

impl ClientLocks {
    fn for_client(&self, client_id: &ClientId) -> Arc<Mutex<()>> {
        let mut guard = self.inner.lock().expect("client lock registry poisoned");
        guard.entry(client_id.clone()).or_default().clone()
    }
}

/// Rejected caller input.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("lookback window must cover at least one day")]
    NonPositiveLookback,
    #[error("min_score {min} exceeds max_score {max}")]
    EmptyScoreRange { min: u8, max: u8 },
    #[error("date_from {from} is after date_to {to}")]
    EmptyDateRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}
