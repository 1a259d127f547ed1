use clap::{CommandFactory, Parser};
use metaclient::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["metaclient", "group", "./data"],
        vec!["metaclient", "group", "./data", "--limit", "1024", "--format", "json"],
        vec!["metaclient", "group", "./data", "--plan"],
        vec!["metaclient", "tree"],
        vec!["metaclient", "tree", "--all", "--concurrency", "4"],
        vec!["metaclient", "tree", "--api-url", "http://10.0.0.2:5001", "--format", "json"],
        vec!["metaclient", "pins"],
        vec!["metaclient", "--config", "client.toml", "config"],
        vec!["metaclient", "--log-level", "debug", "--log-format", "json", "pins"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_unknown_format() {
    let parsed = Cli::try_parse_from(["metaclient", "tree", "--format", "yaml"]);
    assert!(parsed.is_err());
}

#[test]
fn parse_rejects_non_numeric_limit() {
    let parsed = Cli::try_parse_from(["metaclient", "group", "./data", "--limit", "lots"]);
    assert!(parsed.is_err());
}

#[test]
fn group_requires_a_path() {
    assert!(Cli::try_parse_from(["metaclient", "group"]).is_err());
}

#[test]
fn group_arguments_are_carried_through() {
    let cli = Cli::try_parse_from(["metaclient", "group", "/srv/data", "--limit", "4096"]).unwrap();
    match cli.command {
        Commands::Group {
            path,
            limit,
            format,
            plan,
        } => {
            assert_eq!(path, std::path::PathBuf::from("/srv/data"));
            assert_eq!(limit, Some(4096));
            assert_eq!(format, "text");
            assert!(!plan);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}
