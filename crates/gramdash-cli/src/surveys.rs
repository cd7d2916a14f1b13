//! `surveys` command handlers.

use clap::Subcommand;
use gramdash_client::GramdashClient;
use gramdash_core::surveys::select_gp_surveys;
use gramdash_core::{GeoId, SurveyAnalyticsTarget, SurveyFilters};

use crate::SelectionArgs;

#[derive(Debug, Subcommand)]
pub enum SurveysCommands {
    /// Active financial years, newest first
    Years,
    /// List annual surveys
    List {
        #[arg(long)]
        district: Option<GeoId>,
        #[arg(long)]
        block: Option<GeoId>,
        #[arg(long)]
        gp: Option<GeoId>,
        /// Financial year id
        #[arg(long)]
        fy: Option<i64>,
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long, default_value = "100")]
        limit: u32,
    },
    /// Show one survey
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Survey analytics for the selected scope
    Analytics {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Financial year id
        #[arg(long)]
        fy: Option<i64>,
    },
}

pub(crate) async fn run_surveys(client: &GramdashClient, command: SurveysCommands) -> anyhow::Result<()> {
    match command {
        SurveysCommands::Years => {
            let years = client.active_financial_years().await?;
            if years.is_empty() {
                println!("no active financial years");
            }
            for year in years {
                println!("{:<6}{}", year.id, year.fy);
            }
        }
        SurveysCommands::List {
            district,
            block,
            gp,
            fy,
            skip,
            limit,
        } => {
            let filters = SurveyFilters {
                district_id: district,
                block_id: block,
                gp_id: gp,
                fy_id: fy,
                skip,
                limit,
            };
            let mut surveys = client.list_surveys(&filters).await?;
            if let (Some(gp_id), Some(fy_id)) = (gp, fy) {
                surveys = select_gp_surveys(surveys, gp_id, fy_id);
            }
            println!("{}", serde_json::to_string_pretty(&surveys)?);
        }
        SurveysCommands::Show { id } => {
            let survey = client.get_survey(id).await?;
            println!("{}", serde_json::to_string_pretty(&survey)?);
        }
        SurveysCommands::Analytics { selection, fy } => {
            let target = SurveyAnalyticsTarget::for_selection(selection.scope, &selection.path())
                .ok_or_else(|| {
                    anyhow::anyhow!("scope {} needs its --district/--block/--gp id", selection.scope)
                })?;
            let analytics = client.survey_analytics(target, fy).await?;
            println!("{}", serde_json::to_string_pretty(&analytics)?);
        }
    }
    Ok(())
}
