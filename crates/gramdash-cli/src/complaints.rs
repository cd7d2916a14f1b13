//! `complaints` command handlers.

use chrono::Local;
use clap::Subcommand;
use futures::future::try_join;
use gramdash_client::GramdashClient;
use gramdash_core::{
    aggregate_by_status, filter_records, AnalyticsAggregate, AppConfig, ComplaintAnalyticsQuery,
    ComplaintQuery, ComplaintRecord, NormalizedStatus,
};

use crate::{RangeArgs, SelectionArgs};

#[derive(Debug, Subcommand)]
pub enum ComplaintsCommands {
    /// List complaints for a scope and date range
    List {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// Only show this status (OPEN, VERIFIED, RESOLVED, CLOSED)
        #[arg(long, default_value = "")]
        status: String,
        /// Case-insensitive search over title, description and id
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Per-status counts for a scope and date range
    Summary {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        range: RangeArgs,
    },
}

pub(crate) async fn run_complaints(
    client: &GramdashClient,
    config: &AppConfig,
    command: ComplaintsCommands,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    match command {
        ComplaintsCommands::List {
            selection,
            range,
            status,
            search,
        } => {
            let range = range.resolve(today);
            let query = ComplaintQuery::for_selection(
                selection.scope,
                &selection.path(),
                &range,
                config.complaints_limit,
            );
            let records = client.list_complaints(&query).await?;
            let shown = filter_records(&records, &status, &search);
            println!("{} ({} of {})", range.display_text(), shown.len(), records.len());
            print_complaints(&shown);
        }
        ComplaintsCommands::Summary { selection, range } => {
            let range = range.resolve(today);
            let path = selection.path();
            let analytics_query =
                ComplaintAnalyticsQuery::for_selection(selection.scope, &path, &range);
            let list_query =
                ComplaintQuery::for_selection(selection.scope, &path, &range, config.complaints_limit);
            let (analytics, records) = try_join(
                client.complaint_analytics(&analytics_query),
                client.list_complaints(&list_query),
            )
            .await?;

            println!("{} ({})", range.display_text(), selection.scope);
            print_summary(&aggregate_by_status(&analytics.response));
            let listed = aggregate_by_status(&records);
            println!("listed complaints: {}", listed.total());
        }
    }
    Ok(())
}

fn print_summary(aggregate: &AnalyticsAggregate) {
    for status in NormalizedStatus::NAMED {
        println!("{:<10}{:>6}", status.as_str(), aggregate.count(&status));
    }
    if aggregate.unrecognized() > 0 {
        println!("{:<10}{:>6}", "OTHER", aggregate.unrecognized());
    }
    println!("{:<10}{:>6}", "TOTAL", aggregate.total());
}

fn print_complaints(records: &[&ComplaintRecord]) {
    if records.is_empty() {
        println!("no complaints match");
        return;
    }
    println!(
        "{:<12}{:<10}{:<9}{:<14}{:<28}{:<16}TITLE",
        "ID", "STATUS", "COLOUR", "SUBMITTED", "LOCATION", "ASSIGNED"
    );
    for record in records {
        println!(
            "{:<12}{:<10}{:<9}{:<14}{:<28}{:<16}{}",
            record.display_id,
            record.status.as_str(),
            record.status_color(),
            record.submitted_date(),
            truncate(&record.location, 26),
            truncate(&record.assigned_to, 14),
            record.title
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max - 3).collect::<String>())
    } else {
        s.to_string()
    }
}
