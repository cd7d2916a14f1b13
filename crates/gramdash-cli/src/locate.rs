//! `locate`: drives the location selector the way a user would, from scope
//! change down to the terminal node, and prints where it ended up.

use std::sync::Arc;

use anyhow::Context;
use gramdash_client::GramdashClient;
use gramdash_core::{AppConfig, GeoNode};
use gramdash_location::{Effects, FetchOutcome, LocationContext, LocationController, OptionsView};

use crate::geo::print_nodes;
use crate::SelectionArgs;

type Controller = LocationController<Arc<GramdashClient>>;

pub(crate) async fn run_locate(
    client: Arc<GramdashClient>,
    config: &AppConfig,
    selection: &SelectionArgs,
) -> anyhow::Result<()> {
    let controller = Arc::new(LocationController::new(
        client,
        config.state_name.clone(),
        config.geo_page_limit,
    ));
    let context = LocationContext::Interactive(Arc::clone(&controller));

    report(&context.change_scope(selection.scope).await);
    walk(&controller, selection).await?;

    if selection.scope.supports_preview() {
        report(&controller.open_dropdown().await);
    }

    let snapshot = context.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!();
    println!("{} options:", snapshot.dropdown_level);
    match controller.options() {
        OptionsView::Loading => println!("loading"),
        OptionsView::Error(error) => println!("error: {error}"),
        OptionsView::Empty => println!("no entries"),
        OptionsView::Ready(nodes) => print_nodes(&nodes),
    }
    Ok(())
}

/// Selects the requested district, block and GP in turn, as far as the
/// arguments go.
async fn walk(controller: &Controller, selection: &SelectionArgs) -> anyhow::Result<()> {
    let Some(district_id) = selection.district else {
        return Ok(());
    };
    let district = lookup(controller, |c| c.find_district(district_id).cloned())
        .with_context(|| format!("district {district_id} is not in the district list"))?;
    report(&controller.select_node(&district).await);

    let Some(block_id) = selection.block else {
        return Ok(());
    };
    let block = lookup(controller, |c| {
        c.get_blocks(district_id).iter().find(|b| b.id == block_id).cloned()
    })
    .with_context(|| format!("block {block_id} does not belong to district {district_id}"))?;
    report(&controller.select_node(&block).await);

    let Some(gp_id) = selection.gp else {
        return Ok(());
    };
    let gp = lookup(controller, |c| {
        c.get_gram_panchayats(district_id, Some(block_id))
            .iter()
            .find(|g| g.id == gp_id)
            .cloned()
    })
    .with_context(|| format!("gram panchayat {gp_id} does not belong to block {block_id}"))?;
    report(&controller.select_node(&gp).await);
    Ok(())
}

fn lookup(
    controller: &Controller,
    find: impl FnOnce(&gramdash_location::GeographyCache) -> Option<GeoNode>,
) -> Option<GeoNode> {
    controller.fetcher().read(find)
}

fn report(effects: &Effects) {
    for outcome in &effects.outcomes {
        if let FetchOutcome::Failed(error) = outcome {
            eprintln!("warning: {error}");
        }
    }
    if let Some(path) = effects.committed() {
        tracing::info!(?path, "selection committed");
    }
}
