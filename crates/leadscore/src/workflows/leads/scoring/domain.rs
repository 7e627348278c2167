use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for scored clients.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

/// Touchpoint vocabulary recognized by the scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    EmailOpen,
    EmailClick,
    WebsiteVisit,
    DemoRequest,
    Download,
    SupportTicket,
    Payment,
    Referral,
}

impl InteractionKind {
    pub const fn label(self) -> &'static str {
        match self {
            InteractionKind::EmailOpen => "email_open",
            InteractionKind::EmailClick => "email_click",
            InteractionKind::WebsiteVisit => "website_visit",
            InteractionKind::DemoRequest => "demo_request",
            InteractionKind::Download => "download",
            InteractionKind::SupportTicket => "support_ticket",
            InteractionKind::Payment => "payment",
            InteractionKind::Referral => "referral",
        }
    }

    /// Resolve a wire/CSV label back to the typed kind.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "email_open" => Some(Self::EmailOpen),
            "email_click" => Some(Self::EmailClick),
            "website_visit" => Some(Self::WebsiteVisit),
            "demo_request" => Some(Self::DemoRequest),
            "download" => Some(Self::Download),
            "support_ticket" => Some(Self::SupportTicket),
            "payment" => Some(Self::Payment),
            "referral" => Some(Self::Referral),
            _ => None,
        }
    }
}

/// Append-only client touchpoint consumed from the interaction log.
/// The core never mutates or deletes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub client_id: ClientId,
    pub kind: InteractionKind,
    pub source: Option<String>,
    pub value: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Logged inbound or outbound message. Only its count feeds score metadata
/// today; no scoring rule references the channel or body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub client_id: ClientId,
    pub channel: String,
    pub occurred_at: DateTime<Utc>,
}

/// The five bounded sub-scores making up a lead score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringFactors {
    pub engagement: u8,
    pub recency: u8,
    pub frequency: u8,
    pub monetary: u8,
    pub behavior: u8,
}

impl ScoringFactors {
    pub const ENGAGEMENT_CEILING: u8 = 30;
    pub const RECENCY_CEILING: u8 = 20;
    pub const FREQUENCY_CEILING: u8 = 20;
    pub const MONETARY_CEILING: u8 = 15;
    pub const BEHAVIOR_CEILING: u8 = 15;

    pub fn total(&self) -> u16 {
        u16::from(self.engagement)
            + u16::from(self.recency)
            + u16::from(self.frequency)
            + u16::from(self.monetary)
            + u16::from(self.behavior)
    }
}

/// Calculation context persisted alongside every score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetadata {
    pub interactions_count: u32,
    pub communications_count: u32,
    pub calculated_at: DateTime<Utc>,
    pub period_days: u32,
}

/// Output of one score calculation, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub client_id: ClientId,
    pub score: u8,
    pub factors: ScoringFactors,
    pub metadata: ScoreMetadata,
}

/// Outreach temperature derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Hot,
    Warm,
    Cold,
}

impl ScoreBand {
    pub const HOT_THRESHOLD: u8 = 80;
    pub const WARM_THRESHOLD: u8 = 50;

    pub const fn classify(score: u8) -> Self {
        if score >= Self::HOT_THRESHOLD {
            Self::Hot
        } else if score >= Self::WARM_THRESHOLD {
            Self::Warm
        } else {
            Self::Cold
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
        }
    }
}

/// Latest-score bucket counts across the whole book of business.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub total: usize,
}
