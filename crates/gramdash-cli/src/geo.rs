//! `geo` command handlers: raw geography lists as the backend returns them.

use clap::Subcommand;
use gramdash_client::GramdashClient;
use gramdash_core::{AppConfig, GeoId, GeoNode};

#[derive(Debug, Subcommand)]
pub enum GeoCommands {
    /// List districts
    Districts,
    /// List the blocks of a district
    Blocks {
        #[arg(long)]
        district: GeoId,
    },
    /// List the gram panchayats of a block
    Gps {
        #[arg(long)]
        district: GeoId,
        #[arg(long)]
        block: GeoId,
    },
}

pub(crate) async fn run_geo(
    client: &GramdashClient,
    config: &AppConfig,
    command: GeoCommands,
) -> anyhow::Result<()> {
    let limit = config.geo_page_limit;
    let nodes = match command {
        GeoCommands::Districts => client.list_districts(limit).await?,
        GeoCommands::Blocks { district } => client.list_blocks(district, limit).await?,
        GeoCommands::Gps { district, block } => {
            client.list_gram_panchayats(district, block, limit).await?
        }
    };
    print_nodes(&nodes);
    if nodes.len() >= usize::try_from(limit).unwrap_or(usize::MAX) {
        eprintln!("warning: page limit of {limit} reached; further entries are not shown");
    }
    Ok(())
}

pub(crate) fn print_nodes(nodes: &[GeoNode]) {
    if nodes.is_empty() {
        println!("no entries");
        return;
    }
    println!("{:<8}{:<10}NAME", "ID", "PARENT");
    for node in nodes {
        let parent = node
            .parent_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        println!("{:<8}{:<10}{}", node.id, parent, node.name);
    }
}
