//! Batch import of historical touchpoints from a CRM CSV export.
//!
//! Rows carry `Client ID`, `Type`, `Source`, `Value`, and `Occurred At`
//! columns. Rows whose type is outside the scoring vocabulary are skipped
//! and counted; each distinct client is rescored once after its rows land.

mod parser;

use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::Path;

use crate::workflows::leads::scoring::domain::ClientId;
use crate::workflows::leads::scoring::repository::{CommunicationLog, InteractionLog, ScoreStore};
use crate::workflows::leads::scoring::service::{
    LeadScoringService, NewInteraction, ScoringServiceError,
};

#[derive(Debug)]
pub enum InteractionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Scoring(ScoringServiceError),
}

impl std::fmt::Display for InteractionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionImportError::Io(err) => {
                write!(f, "failed to read interaction export: {}", err)
            }
            InteractionImportError::Csv(err) => write!(f, "invalid interaction CSV data: {}", err),
            InteractionImportError::Scoring(err) => {
                write!(f, "could not apply imported interactions: {}", err)
            }
        }
    }
}

impl std::error::Error for InteractionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InteractionImportError::Io(err) => Some(err),
            InteractionImportError::Csv(err) => Some(err),
            InteractionImportError::Scoring(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for InteractionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for InteractionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ScoringServiceError> for InteractionImportError {
    fn from(err: ScoringServiceError) -> Self {
        Self::Scoring(err)
    }
}

/// Outcome of one CSV import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub recorded: usize,
    pub skipped: usize,
    pub clients_rescored: usize,
}

pub struct InteractionCsvImporter;

impl InteractionCsvImporter {
    pub fn from_path<P, I, C, S>(
        path: P,
        service: &LeadScoringService<I, C, S>,
        now: DateTime<Utc>,
    ) -> Result<ImportSummary, InteractionImportError>
    where
        P: AsRef<Path>,
        I: InteractionLog + 'static,
        C: CommunicationLog + 'static,
        S: ScoreStore + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service, now)
    }

    pub fn from_reader<R, I, C, S>(
        reader: R,
        service: &LeadScoringService<I, C, S>,
        now: DateTime<Utc>,
    ) -> Result<ImportSummary, InteractionImportError>
    where
        R: Read,
        I: InteractionLog + 'static,
        C: CommunicationLog + 'static,
        S: ScoreStore + 'static,
    {
        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for row in parser::parse_rows(reader)? {
            let Some(kind) = row.kind else {
                skipped += 1;
                continue;
            };

            rows.push((
                ClientId(row.client_id),
                NewInteraction {
                    kind,
                    source: row.source,
                    value: row.value,
                    occurred_at: row.occurred_at,
                },
            ));
        }

        let outcome = service.import_interactions(rows, now)?;
        Ok(ImportSummary {
            recorded: outcome.recorded,
            skipped,
            clients_rescored: outcome.clients_rescored,
        })
    }
}
