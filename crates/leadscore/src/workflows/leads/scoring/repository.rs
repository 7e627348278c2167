use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ClientId, Communication, Interaction, ScoreBand, ScoreMetadata, ScoringFactors,
};

/// Persisted score entry. One record is appended per recalculation; the
/// current score for a client is the most recent record by `last_updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub client_id: ClientId,
    pub score: u8,
    pub factors: ScoringFactors,
    pub previous_score: Option<u8>,
    pub score_change: i16,
    pub metadata: ScoreMetadata,
    pub last_updated: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::classify(self.score)
    }

    pub fn status_view(&self) -> ScoreRecordView {
        ScoreRecordView {
            client_id: self.client_id.clone(),
            score: self.score,
            band: self.band().label(),
            previous_score: self.previous_score,
            score_change: self.score_change,
            factors: self.factors,
            last_updated: self.last_updated,
        }
    }
}

/// Sanitized representation of a client's current score for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecordView {
    pub client_id: ClientId,
    pub score: u8,
    pub band: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<u8>,
    pub score_change: i16,
    pub factors: ScoringFactors,
    pub last_updated: DateTime<Utc>,
}

/// Filter applied when listing persisted score records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScoreQuery {
    pub min_score: Option<u8>,
    pub max_score: Option<u8>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl ScoreQuery {
    pub fn matches(&self, record: &ScoreRecord) -> bool {
        if let Some(min) = self.min_score {
            if record.score < min {
                return false;
            }
        }
        if let Some(max) = self.max_score {
            if record.score > max {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if record.last_updated < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if record.last_updated > to {
                return false;
            }
        }
        true
    }
}

/// Append-only record of client touchpoints. The core reads and appends;
/// it never mutates or deletes.
pub trait InteractionLog: Send + Sync {
    fn record(&self, interaction: Interaction) -> Result<Interaction, DataAccessError>;
    fn query(
        &self,
        client_id: &ClientId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Interaction>, DataAccessError>;
}

/// Read interface over logged communications; only counts feed the score.
pub trait CommunicationLog: Send + Sync {
    fn query(
        &self,
        client_id: &ClientId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Communication>, DataAccessError>;
}

/// Durable append-log of score snapshots per client.
pub trait ScoreStore: Send + Sync {
    fn latest(&self, client_id: &ClientId) -> Result<Option<ScoreRecord>, DataAccessError>;
    /// Most recent record for every scored client, one entry per client.
    fn latest_per_client(&self) -> Result<Vec<ScoreRecord>, DataAccessError>;
    fn append(&self, record: ScoreRecord) -> Result<ScoreRecord, DataAccessError>;
    fn query(
        &self,
        filter: &ScoreQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ScoreRecord>, DataAccessError>;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum DataAccessError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}
