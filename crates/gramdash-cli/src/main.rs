mod complaints;
mod geo;
mod locate;
mod surveys;
mod vehicles;

use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use gramdash_client::GramdashClient;
use gramdash_core::{AppConfig, DatePreset, DateRange, GeoId, GeoPath, GeoRank, Scope};
use tracing_subscriber::EnvFilter;

use crate::complaints::ComplaintsCommands;
use crate::geo::GeoCommands;
use crate::surveys::SurveysCommands;
use crate::vehicles::VehiclesCommands;

#[derive(Debug, Parser)]
#[command(name = "gramdash")]
#[command(about = "Rural sanitation dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse districts, blocks and gram panchayats
    Geo {
        #[command(subcommand)]
        command: GeoCommands,
    },
    /// Complaint lists and status summaries
    Complaints {
        #[command(subcommand)]
        command: ComplaintsCommands,
    },
    /// Fleet vehicles
    Vehicles {
        #[command(subcommand)]
        command: VehiclesCommands,
    },
    /// Annual survey master data
    Surveys {
        #[command(subcommand)]
        command: SurveysCommands,
    },
    /// Walk the location selector down to a scope and print its state
    Locate(SelectionArgs),
}

/// Scope plus the district/block/GP ids that resolve it.
#[derive(Debug, Clone, Args)]
pub(crate) struct SelectionArgs {
    /// state, district, block or gp
    #[arg(long, default_value = "state")]
    pub scope: Scope,
    #[arg(long)]
    pub district: Option<GeoId>,
    #[arg(long)]
    pub block: Option<GeoId>,
    #[arg(long)]
    pub gp: Option<GeoId>,
}

impl SelectionArgs {
    pub(crate) fn path(&self) -> GeoPath {
        GeoPath {
            district_id: self.district,
            block_id: self.block,
            gp_id: self.gp,
        }
    }

    /// Rejects ids the scope cannot reach and ids given without their parent.
    pub(crate) fn check_depth(&self) -> anyhow::Result<()> {
        let given = [
            (GeoRank::District, "--district", self.district.is_some()),
            (GeoRank::Block, "--block", self.block.is_some()),
            (GeoRank::GramPanchayat, "--gp", self.gp.is_some()),
        ];
        let mut parent_given = true;
        for (rank, flag, present) in given {
            if present && self.scope.terminal_rank().is_none_or(|terminal| rank > terminal) {
                anyhow::bail!("{flag} is deeper than the {} scope reaches", self.scope);
            }
            if present && !parent_given {
                anyhow::bail!("{flag} needs its parent id as well");
            }
            parent_given = present;
        }
        Ok(())
    }
}

/// Date filter: a preset, or a custom `--from`/`--to` pair.
#[derive(Debug, Clone, Args)]
pub(crate) struct RangeArgs {
    /// today, yesterday, last7days, last30days, ...
    #[arg(long, default_value = "today", conflicts_with = "from")]
    pub range: DatePreset,
    /// Custom range start (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Custom range end (YYYY-MM-DD); omit for an open-ended range
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

impl RangeArgs {
    pub(crate) fn resolve(&self, today: NaiveDate) -> DateRange {
        let Some(from) = self.from else {
            return DateRange::preset(self.range, today);
        };
        let mut range = DateRange::begin_custom();
        range.pick_custom_date(from);
        if let Some(to) = self.to {
            range.pick_custom_date(to);
        }
        range
    }
}

fn build_client(config: &AppConfig) -> anyhow::Result<Arc<GramdashClient>> {
    Ok(Arc::new(GramdashClient::from_config(config)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("gramdash: run with --help to list commands");
        return Ok(());
    };
    if let Commands::Locate(selection) = &command {
        selection.check_depth()?;
    }

    let config = gramdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "configuration loaded");

    let client = build_client(&config)?;
    match command {
        Commands::Geo { command } => geo::run_geo(&client, &config, command).await,
        Commands::Complaints { command } => {
            complaints::run_complaints(&client, &config, command).await
        }
        Commands::Vehicles { command } => vehicles::run_vehicles(&client, command).await,
        Commands::Surveys { command } => surveys::run_surveys(&client, command).await,
        Commands::Locate(selection) => locate::run_locate(client, &config, &selection).await,
    }
}

#[cfg(test)]
mod tests;
