use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::leads::scoring::domain::InteractionKind;

#[derive(Debug)]
pub(crate) struct ImportedRow {
    pub(crate) client_id: String,
    pub(crate) kind: Option<InteractionKind>,
    pub(crate) source: Option<String>,
    pub(crate) value: f64,
    pub(crate) occurred_at: Option<DateTime<Utc>>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ImportedRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<InteractionRow>() {
        let row = record?;
        let kind = InteractionKind::from_label(&row.interaction_type);
        let occurred_at = row.occurred_at();
        let value = row.value.unwrap_or(0.0);

        rows.push(ImportedRow {
            client_id: row.client_id,
            kind,
            source: row.source,
            value,
            occurred_at,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct InteractionRow {
    #[serde(rename = "Client ID")]
    client_id: String,
    #[serde(rename = "Type")]
    interaction_type: String,
    #[serde(rename = "Source", default, deserialize_with = "empty_string_as_none")]
    source: Option<String>,
    #[serde(rename = "Value", default)]
    value: Option<f64>,
    #[serde(
        rename = "Occurred At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    occurred_at: Option<String>,
}

impl InteractionRow {
    fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.occurred_at
            .as_deref()
            .and_then(parse_datetime)
            .map(|naive| naive.and_utc())
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<NaiveDateTime> {
    parse_datetime(value)
}
