use chrono::NaiveDate;
use gramdash_core::{DatePreset, RangeMode};

use super::*;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["gramdash"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_geo_blocks_command() {
    let cli = Cli::try_parse_from(["gramdash", "geo", "blocks", "--district", "1"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Geo {
            command: GeoCommands::Blocks { district: 1 }
        })
    ));
}

#[test]
fn geo_gps_requires_block() {
    let result = Cli::try_parse_from(["gramdash", "geo", "gps", "--district", "1"]);
    assert!(result.is_err());
}

#[test]
fn parses_complaints_list_with_scope_and_preset() {
    let cli = Cli::try_parse_from([
        "gramdash",
        "complaints",
        "list",
        "--scope",
        "blocks",
        "--district",
        "1",
        "--block",
        "10",
        "--range",
        "last7days",
        "--status",
        "open",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Complaints {
        command:
            ComplaintsCommands::List {
                selection,
                range,
                status,
                search,
            },
    }) = cli.command
    else {
        panic!("expected complaints list");
    };
    assert_eq!(selection.scope, Scope::Block);
    assert_eq!(selection.path().block_id, Some(10));
    assert_eq!(range.range, DatePreset::LastDays(7));
    assert_eq!(status, "open");
    assert!(search.is_empty());
}

#[test]
fn complaints_default_to_state_scope_today() {
    let cli = Cli::try_parse_from(["gramdash", "complaints", "summary"])
        .expect("expected valid cli args");
    let Some(Commands::Complaints {
        command: ComplaintsCommands::Summary { selection, range },
    }) = cli.command
    else {
        panic!("expected complaints summary");
    };
    assert_eq!(selection.scope, Scope::State);
    assert_eq!(range.resolve(day(15)), DateRange::today(day(15)));
}

#[test]
fn unknown_scope_is_rejected() {
    let result = Cli::try_parse_from(["gramdash", "locate", "--scope", "county"]);
    assert!(result.is_err());
}

#[test]
fn custom_range_swaps_out_of_order_dates() {
    let args = RangeArgs {
        range: DatePreset::Today,
        from: Some(day(20)),
        to: Some(day(10)),
    };
    let range = args.resolve(day(31));
    assert_eq!(range.mode(), RangeMode::Custom);
    assert_eq!(range.start(), Some(day(10)));
    assert_eq!(range.end(), Some(day(20)));
}

#[test]
fn custom_range_without_end_is_half_entered() {
    let args = RangeArgs {
        range: DatePreset::Today,
        from: Some(day(3)),
        to: None,
    };
    let range = args.resolve(day(31));
    assert!(!range.is_complete());
    assert_eq!(range.end(), None);
}

#[test]
fn to_requires_from() {
    let result = Cli::try_parse_from(["gramdash", "complaints", "list", "--to", "2025-07-01"]);
    assert!(result.is_err());
}

#[test]
fn parses_vehicles_add_command() {
    let cli = Cli::try_parse_from([
        "gramdash",
        "vehicles",
        "add",
        "--vehicle-no",
        "RJ19-GA-0009",
        "--imei",
        "860000000000009",
        "--gp",
        "100",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Vehicles {
            command: VehiclesCommands::Add { gp: Some(100), district: None, .. }
        })
    ));
}

#[test]
fn parses_surveys_analytics_command() {
    let cli = Cli::try_parse_from([
        "gramdash", "surveys", "analytics", "--scope", "gp", "--gp", "100", "--fy", "2",
    ])
    .expect("expected valid cli args");
    let Some(Commands::Surveys {
        command: SurveysCommands::Analytics { selection, fy },
    }) = cli.command
    else {
        panic!("expected surveys analytics");
    };
    assert_eq!(selection.scope, Scope::Gp);
    assert_eq!(fy, Some(2));
}

#[test]
fn parses_locate_command() {
    let cli = Cli::try_parse_from([
        "gramdash", "locate", "--scope", "gp", "--district", "1", "--block", "10", "--gp", "100",
    ])
    .expect("expected valid cli args");
    let Some(Commands::Locate(selection)) = cli.command else {
        panic!("expected locate");
    };
    assert_eq!(
        selection.path(),
        GeoPath {
            district_id: Some(1),
            block_id: Some(10),
            gp_id: Some(100),
        }
    );
}

fn locate_args(args: &[&str]) -> SelectionArgs {
    let cli = Cli::try_parse_from(["gramdash", "locate"].iter().chain(args).copied())
        .expect("expected valid cli args");
    let Some(Commands::Locate(selection)) = cli.command else {
        panic!("expected locate");
    };
    selection
}

#[test]
fn help_parses_without_configuration() {
    let err = Cli::try_parse_from(["gramdash", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn locate_rejects_ids_deeper_than_scope() {
    let state = locate_args(&["--scope", "state", "--district", "1"]);
    assert!(state.check_depth().is_err());

    let district = locate_args(&["--scope", "district", "--district", "1", "--block", "10"]);
    assert!(district.check_depth().is_err());
}

#[test]
fn locate_rejects_child_without_parent() {
    let args = locate_args(&["--scope", "gp", "--district", "1", "--gp", "100"]);
    assert!(args.check_depth().is_err());
}

#[test]
fn locate_accepts_ids_within_scope() {
    let args = locate_args(&["--scope", "block", "--district", "1", "--block", "10"]);
    assert!(args.check_depth().is_ok());
    assert!(locate_args(&["--scope", "gp"]).check_depth().is_ok());
}
