use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::leads::scoring::domain::{ClientId, Communication, Interaction, InteractionKind};
use crate::workflows::leads::scoring::repository::{
    CommunicationLog, DataAccessError, InteractionLog, ScoreQuery, ScoreRecord, ScoreStore,
};
use crate::workflows::leads::scoring::service::LeadScoringService;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn client(suffix: &str) -> ClientId {
    ClientId(format!("client-{suffix}"))
}

pub(super) fn interaction(
    client_id: &ClientId,
    kind: InteractionKind,
    days_ago: i64,
    now: DateTime<Utc>,
) -> Interaction {
    Interaction {
        client_id: client_id.clone(),
        kind,
        source: Some("crm".to_string()),
        value: 0.0,
        occurred_at: now - Duration::days(days_ago),
    }
}

pub(super) fn communication(
    client_id: &ClientId,
    days_ago: i64,
    now: DateTime<Utc>,
) -> Communication {
    Communication {
        client_id: client_id.clone(),
        channel: "email".to_string(),
        occurred_at: now - Duration::days(days_ago),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryInteractionLog {
    events: Arc<Mutex<Vec<Interaction>>>,
}

impl MemoryInteractionLog {
    pub(super) fn seed(&self, interaction: Interaction) {
        self.events
            .lock()
            .expect("interaction log mutex poisoned")
            .push(interaction);
    }

    pub(super) fn events(&self) -> Vec<Interaction> {
        self.events
            .lock()
            .expect("interaction log mutex poisoned")
            .clone()
    }
}

impl InteractionLog for MemoryInteractionLog {
    fn record(&self, interaction: Interaction) -> Result<Interaction, DataAccessError> {
        self.seed(interaction.clone());
        Ok(interaction)
    }

    fn query(
        &self,
        client_id: &ClientId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Interaction>, DataAccessError> {
        let guard = self.events.lock().expect("interaction log mutex poisoned");
        Ok(guard
            .iter()
            .filter(|event| &event.client_id == client_id && event.occurred_at >= since)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCommunicationLog {
    events: Arc<Mutex<Vec<Communication>>>,
}

impl MemoryCommunicationLog {
    pub(super) fn seed(&self, communication: Communication) {
        self.events
            .lock()
            .expect("communication log mutex poisoned")
            .push(communication);
    }
}

impl CommunicationLog for MemoryCommunicationLog {
    fn query(
        &self,
        client_id: &ClientId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Communication>, DataAccessError> {
        let guard = self.events.lock().expect("communication log mutex poisoned");
        Ok(guard
            .iter()
            .filter(|event| &event.client_id == client_id && event.occurred_at >= since)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryScoreStore {
    records: Arc<Mutex<Vec<ScoreRecord>>>,
}

impl MemoryScoreStore {
    pub(super) fn records(&self) -> Vec<ScoreRecord> {
        self.records.lock().expect("score store mutex poisoned").clone()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn latest(&self, client_id: &ClientId) -> Result<Option<ScoreRecord>, DataAccessError> {
        let guard = self.records.lock().expect("score store mutex poisoned");
        let mut latest: Option<&ScoreRecord> = None;
        for record in guard.iter().filter(|record| &record.client_id == client_id) {
            if latest.map_or(true, |best| record.last_updated >= best.last_updated) {
                latest = Some(record);
            }
        }
        Ok(latest.cloned())
    }

    fn latest_per_client(&self) -> Result<Vec<ScoreRecord>, DataAccessError> {
        let guard = self.records.lock().expect("score store mutex poisoned");
        let mut latest: HashMap<ClientId, ScoreRecord> = HashMap::new();
        for record in guard.iter() {
            match latest.get(&record.client_id) {
                Some(best) if record.last_updated < best.last_updated => {}
                _ => {
                    latest.insert(record.client_id.clone(), record.clone());
                }
            }
        }
        Ok(latest.into_values().collect())
    }

    fn append(&self, record: ScoreRecord) -> Result<ScoreRecord, DataAccessError> {
        self.records
            .lock()
            .expect("score store mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn query(
        &self,
        filter: &ScoreQuery,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ScoreRecord>, DataAccessError> {
        let guard = self.records.lock().expect("score store mutex poisoned");
        let mut matches: Vec<ScoreRecord> = guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(matches.into_iter().skip(offset).take(limit).collect())
    }
}

pub(super) struct UnavailableInteractionLog;

impl InteractionLog for UnavailableInteractionLog {
    fn record(&self, _interaction: Interaction) -> Result<Interaction, DataAccessError> {
        Err(DataAccessError::Unavailable("log offline".to_string()))
    }

    fn query(
        &self,
        _client_id: &ClientId,
        _since: DateTime<Utc>,
    ) -> Result<Vec<Interaction>, DataAccessError> {
        Err(DataAccessError::Unavailable("log offline".to_string()))
    }
}

pub(super) struct UnavailableScoreStore;

impl ScoreStore for UnavailableScoreStore {
    fn latest(&self, _client_id: &ClientId) -> Result<Option<ScoreRecord>, DataAccessError> {
        Err(DataAccessError::Unavailable("store offline".to_string()))
    }

    fn latest_per_client(&self) -> Result<Vec<ScoreRecord>, DataAccessError> {
        Err(DataAccessError::Unavailable("store offline".to_string()))
    }

    fn append(&self, _record: ScoreRecord) -> Result<ScoreRecord, DataAccessError> {
        Err(DataAccessError::Unavailable("store offline".to_string()))
    }

    fn query(
        &self,
        _filter: &ScoreQuery,
        _limit: usize,
        _offset: usize,
    ) -> Result<Vec<ScoreRecord>, DataAccessError> {
        Err(DataAccessError::Unavailable("store offline".to_string()))
    }
}

pub(super) type MemoryService =
    LeadScoringService<MemoryInteractionLog, MemoryCommunicationLog, MemoryScoreStore>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryInteractionLog>,
    Arc<MemoryCommunicationLog>,
    Arc<MemoryScoreStore>,
) {
    let interactions = Arc::new(MemoryInteractionLog::default());
    let communications = Arc::new(MemoryCommunicationLog::default());
    let scores = Arc::new(MemoryScoreStore::default());
    let service = LeadScoringService::new(
        interactions.clone(),
        communications.clone(),
        scores.clone(),
    );
    (service, interactions, communications, scores)
}
