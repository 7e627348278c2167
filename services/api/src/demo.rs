use crate::infra::{InMemoryCommunicationLog, InMemoryInteractionLog, InMemoryScoreStore};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use leadscore::error::AppError;
use leadscore::workflows::leads::import::InteractionCsvImporter;
use leadscore::workflows::leads::scoring::domain::{ClientId, Communication, InteractionKind};
use leadscore::workflows::leads::scoring::{
    scoring_rules, FactorCalculator, LeadScoringService, NewInteraction, RuleTrigger,
    DEFAULT_LOOKBACK_DAYS,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reference time (RFC3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Lookback window in days for the demo calculations.
    #[arg(long)]
    pub(crate) lookback_days: Option<u32>,
    /// Optional CRM CSV export of interactions to import before scoring.
    #[arg(long)]
    pub(crate) interactions_csv: Option<PathBuf>,
}

type DemoService =
    LeadScoringService<InMemoryInteractionLog, InMemoryCommunicationLog, InMemoryScoreStore>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        now,
        lookback_days,
        interactions_csv,
    } = args;

    let now = now.unwrap_or_else(Utc::now);
    let lookback_days = lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS);

    println!("Lead scoring demo (reference time {now}, lookback {lookback_days} days)");

    let interactions = Arc::new(InMemoryInteractionLog::default());
    let communications = Arc::new(InMemoryCommunicationLog::default());
    let scores = Arc::new(InMemoryScoreStore::default());
    let service = LeadScoringService::with_calculator(
        interactions,
        communications.clone(),
        scores,
        FactorCalculator::new(),
        lookback_days,
    );

    let seeded = seed_sample_clients(&service, &communications, now)?;

    if let Some(path) = interactions_csv {
        let summary = InteractionCsvImporter::from_path(path, &service, now)?;
        println!(
            "\nImported CRM export: {} recorded, {} skipped, {} client(s) rescored",
            summary.recorded, summary.skipped, summary.clients_rescored
        );
    }

    for client_id in &seeded {
        render_client(&service, client_id)?;
    }

    let distribution = service.get_lead_score_distribution()?;
    println!("\nScore distribution (latest record per client)");
    println!(
        "- hot {} | warm {} | cold {} | total {}",
        distribution.hot, distribution.warm, distribution.cold, distribution.total
    );

    Ok(())
}

pub(crate) fn run_rules() -> Result<(), AppError> {
    println!("Scoring rubric");
    for rule in scoring_rules() {
        let kind = match rule.trigger {
            RuleTrigger::Interaction(_) => "interaction",
            RuleTrigger::Computed(_) => "computed",
        };
        println!(
            "- [{}] {} ({kind}): {} point(s) — {}",
            rule.factor.label(),
            rule.trigger.key(),
            rule.points,
            rule.description
        );
    }
    Ok(())
}

fn seed_sample_clients(
    service: &DemoService,
    communications: &InMemoryCommunicationLog,
    now: DateTime<Utc>,
) -> Result<Vec<ClientId>, AppError> {
    let hot = ClientId("client-atlas".to_string());
    let warm = ClientId("client-borealis".to_string());
    let cold = ClientId("client-cascade".to_string());

    // Hot: a saturated month of activity ending in a referral.
    let hot_history = [
        (InteractionKind::EmailOpen, 20),
        (InteractionKind::EmailOpen, 18),
        (InteractionKind::EmailClick, 17),
        (InteractionKind::WebsiteVisit, 15),
        (InteractionKind::WebsiteVisit, 12),
        (InteractionKind::Download, 11),
        (InteractionKind::DemoRequest, 9),
        (InteractionKind::WebsiteVisit, 8),
        (InteractionKind::EmailOpen, 7),
        (InteractionKind::EmailClick, 6),
        (InteractionKind::WebsiteVisit, 6),
        (InteractionKind::Download, 5),
        (InteractionKind::EmailOpen, 5),
        (InteractionKind::WebsiteVisit, 4),
        (InteractionKind::EmailOpen, 4),
        (InteractionKind::SupportTicket, 3),
        (InteractionKind::Payment, 3),
        (InteractionKind::EmailOpen, 2),
        (InteractionKind::WebsiteVisit, 2),
        (InteractionKind::Referral, 1),
    ];

    // Warm: engaged recently but thin history.
    let warm_history = [
        (InteractionKind::EmailOpen, 10),
        (InteractionKind::EmailClick, 8),
        (InteractionKind::WebsiteVisit, 5),
        (InteractionKind::Download, 3),
        (InteractionKind::DemoRequest, 2),
    ];

    // Cold: a single stale touchpoint.
    let cold_history = [(InteractionKind::EmailOpen, 45)];

    let rows: Vec<(ClientId, NewInteraction)> = hot_history
        .iter()
        .map(|(kind, days)| (hot.clone(), seeded_interaction(*kind, *days, now)))
        .chain(
            warm_history
                .iter()
                .map(|(kind, days)| (warm.clone(), seeded_interaction(*kind, *days, now))),
        )
        .chain(
            cold_history
                .iter()
                .map(|(kind, days)| (cold.clone(), seeded_interaction(*kind, *days, now))),
        )
        .collect();

    service.import_interactions(rows, now)?;

    communications.seed(Communication {
        client_id: hot.clone(),
        channel: "email".to_string(),
        occurred_at: now - Duration::days(2),
    });
    communications.seed(Communication {
        client_id: warm.clone(),
        channel: "sms".to_string(),
        occurred_at: now - Duration::days(4),
    });

    // A follow-up payment for the hot client shows the delta tracking.
    service.record_interaction_at(
        &hot,
        NewInteraction {
            kind: InteractionKind::Payment,
            source: Some("invoice".to_string()),
            value: 1250.0,
            occurred_at: Some(now),
        },
        now + Duration::minutes(1),
    )?;

    Ok(vec![hot, warm, cold])
}

fn seeded_interaction(kind: InteractionKind, days_ago: i64, now: DateTime<Utc>) -> NewInteraction {
    NewInteraction {
        kind,
        source: Some("demo-seed".to_string()),
        value: 0.0,
        occurred_at: Some(now - Duration::days(days_ago)),
    }
}

fn render_client(service: &DemoService, client_id: &ClientId) -> Result<(), AppError> {
    let Some(record) = service.get_lead_score(client_id)? else {
        println!("\n{}: no score history", client_id.0);
        return Ok(());
    };

    println!("\n{}", client_id.0);
    println!(
        "- score {} ({}), change {:+}",
        record.score,
        record.band().label(),
        record.score_change
    );
    println!(
        "- factors: engagement {} | recency {} | frequency {} | monetary {} | behavior {}",
        record.factors.engagement,
        record.factors.recency,
        record.factors.frequency,
        record.factors.monetary,
        record.factors.behavior
    );
    println!(
        "- window: {} interaction(s), {} communication(s) over {} day(s)",
        record.metadata.interactions_count,
        record.metadata.communications_count,
        record.metadata.period_days
    );

    if let Some(insights) = service.get_scoring_insights(client_id)? {
        if !insights.recommendations.is_empty() {
            println!("- recommendations:");
            for recommendation in &insights.recommendations {
                println!("    - {recommendation}");
            }
        }
        println!("- next actions:");
        for action in &insights.next_actions {
            println!("    - {action}");
        }
    }

    Ok(())
}
