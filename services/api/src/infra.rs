use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use leadscore::workflows::leads::scoring::domain::{ClientId, Communication, Interaction};
use leadscore::workflows::leads::scoring::repository::{
    CommunicationLog, DataAccessError, InteractionLog, ScoreQuery, ScoreRecord, ScoreStore,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInteractionLog {
    events: Arc<Mutex<Vec<Interaction>>>,
}

impl InteractionLog for InMemoryInteractionLog {
    fn record(&self, interaction: Interaction) -> Result<Interaction, DataAccessError> {
        let mut guard = self.events.lock().expect("interaction log mutex poisoned");
        guard.push(interaction.clone());
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
pub(crate) struct InMemoryCommunicationLog {
    events: Arc<Mutex<Vec<Communication>>>,
}

impl InMemoryCommunicationLog {
    pub(crate) fn seed(&self, communication: Communication) {
        let mut guard = self.events.lock().expect("communication log mutex poisoned");
        guard.push(communication);
    }
}

impl CommunicationLog for InMemoryCommunicationLog {
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

/// Append-only score log. The newest record by `last_updated` wins ties by
/// insertion order, matching the store's append semantics.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreStore {
    records: Arc<Mutex<Vec<ScoreRecord>>>,
}

impl ScoreStore for InMemoryScoreStore {
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
        let mut guard = self.records.lock().expect("score store mutex poisoned");
        guard.push(record.clone());
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

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as RFC3339 ({err})"))
}
