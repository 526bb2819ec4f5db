use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn migrate_directions_map_to_engine_directions() {
    let cli = Cli::try_parse_from(["hbm", "migrate", "up"]).unwrap();
    match cli.command {
        Commands::Migrate(args) => assert_eq!(Direction::from(args.direction), Direction::Apply),
        other => panic!("unexpected command {other:?}"),
    }

    let cli = Cli::try_parse_from(["hbm", "migrate", "down"]).unwrap();
    match cli.command {
        Commands::Migrate(args) => assert_eq!(Direction::from(args.direction), Direction::Revert),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn unknown_direction_is_rejected() {
    assert!(Cli::try_parse_from(["hbm", "migrate", "sideways"]).is_err());
    assert!(Cli::try_parse_from(["hbm", "migrate"]).is_err());
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["hbm", "seed"]).is_err());
}

#[test]
fn create_requires_a_name() {
    assert!(Cli::try_parse_from(["hbm", "create"]).is_err());
    let cli = Cli::try_parse_from(["hbm", "create", "add_users"]).unwrap();
    assert!(matches!(cli.command, Commands::Create(ref args) if args.name == "add_users"));
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "hbm",
        "status",
        "--json",
        "-p",
        "project",
        "--database-url",
        ":memory:",
    ])
    .unwrap();
    assert_eq!(cli.global.project_dir, "project");
    assert_eq!(cli.global.database_url.as_deref(), Some(":memory:"));
    assert!(matches!(cli.command, Commands::Status(StatusArgs { json: true })));
}
