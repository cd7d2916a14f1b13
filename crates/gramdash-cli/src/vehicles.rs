//! `vehicles` command handlers.

use chrono::{Datelike, Local, Utc};
use clap::Subcommand;
use gramdash_client::{vehicles_with_telemetry, GramdashClient};
use gramdash_core::vehicles::{filter_by_fleet_tab, search_vehicles, FleetCounts};
use gramdash_core::{GeoId, GeoPath, Vehicle, VehicleDraft};

#[derive(Debug, Subcommand)]
pub enum VehiclesCommands {
    /// List vehicles registered under a district, block or GP
    List {
        #[arg(long)]
        district: Option<GeoId>,
        #[arg(long)]
        block: Option<GeoId>,
        #[arg(long)]
        gp: Option<GeoId>,
        /// Fleet tab, e.g. `All` or `Running(02)`
        #[arg(long, default_value = "All")]
        tab: String,
        /// Search vehicle number or name
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Register a vehicle
    Add {
        #[arg(long)]
        vehicle_no: String,
        #[arg(long)]
        imei: String,
        #[arg(long)]
        district: Option<GeoId>,
        #[arg(long)]
        block: Option<GeoId>,
        #[arg(long)]
        gp: Option<GeoId>,
    },
    /// Monthly detail for one vehicle
    Details {
        #[arg(long)]
        id: i64,
        /// Defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Remove a vehicle
    Delete {
        #[arg(long)]
        id: i64,
    },
}

pub(crate) async fn run_vehicles(client: &GramdashClient, command: VehiclesCommands) -> anyhow::Result<()> {
    match command {
        VehiclesCommands::List {
            district,
            block,
            gp,
            tab,
            search,
        } => {
            let path = GeoPath {
                district_id: district,
                block_id: block,
                gp_id: gp,
            };
            if path.is_empty() {
                anyhow::bail!("pass at least one of --district, --block or --gp");
            }
            let records = client.list_vehicles(&path).await?;
            let fleet = vehicles_with_telemetry(records, Utc::now(), &mut rand::rng());

            println!("{}", FleetCounts::from_vehicles(&fleet).tab_labels().join("  "));
            let in_tab: Vec<Vehicle> = filter_by_fleet_tab(&fleet, &tab).into_iter().cloned().collect();
            print_vehicles(&search_vehicles(&in_tab, &search));
        }
        VehiclesCommands::Add {
            vehicle_no,
            imei,
            district,
            block,
            gp,
        } => {
            let draft = VehicleDraft {
                imei_number: imei,
                vehicle_number: vehicle_no,
                district_id: district,
                block_id: block,
                gp_id: gp,
            };
            let payload = draft.into_payload()?;
            let created = client.add_vehicle(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        VehiclesCommands::Details { id, month, year } => {
            let today = Local::now().date_naive();
            let details = client
                .get_vehicle_details(
                    id,
                    month.unwrap_or_else(|| today.month()),
                    year.unwrap_or_else(|| today.year()),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        VehiclesCommands::Delete { id } => {
            client.delete_vehicle(id).await?;
            println!("deleted vehicle {id}");
        }
    }
    Ok(())
}

fn print_vehicles(vehicles: &[&Vehicle]) {
    if vehicles.is_empty() {
        println!("no vehicles");
        return;
    }
    println!(
        "{:<6}{:<16}{:<10}{:>6}  {:<22}GP",
        "ID", "NUMBER", "STATUS", "KM/H", "POSITION"
    );
    for v in vehicles {
        let gp = v.gp_id.map_or_else(|| "-".to_string(), |id| id.to_string());
        let position = format!("{:.4},{:.4}", v.coordinates.lat, v.coordinates.lng);
        println!(
            "{:<6}{:<16}{:<10}{:>6}  {:<22}{}",
            v.id,
            v.vehicle_no,
            v.status.as_str(),
            v.speed_kmh,
            position,
            gp
        );
    }
}
