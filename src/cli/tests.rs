//! Tests for cli module

use super::*;
use clap::Parser;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("stash-api").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_parse_commands() {
    let cli = parse(&["--host", "stash.local", "repos", "PRJ"]);
    assert_eq!(
        cli.command,
        Commands::Repos {
            project: "PRJ".to_string()
        }
    );
    assert!(!cli.aggregate);
    assert_eq!(cli.format, OutputFormat::Json);

    let cli = parse(&["file-contents", "PRJ", "app", "src/main.rs", "--at", "develop", "-a"]);
    assert_eq!(
        cli.command,
        Commands::FileContents {
            project: "PRJ".to_string(),
            repo: "app".to_string(),
            path: "src/main.rs".to_string(),
            at: "develop".to_string(),
        }
    );
    assert!(cli.aggregate);

    let cli = parse(&["pull-request-build-status", "PRJ", "app", "42"]);
    assert_eq!(
        cli.command,
        Commands::PullRequestBuildStatus {
            project: "PRJ".to_string(),
            repo: "app".to_string(),
            id: 42,
        }
    );
}

#[test]
fn test_parse_rejects_bad_id() {
    let result = Cli::try_parse_from(["stash-api", "pull-request", "PRJ", "app", "latest"]);
    assert!(result.is_err());
}

#[test]
fn test_config_from_flags() {
    let runner = Runner::new(parse(&[
        "--protocol",
        "https",
        "--host",
        "stash.local",
        "--port",
        "7990",
        "--page-limit",
        "100",
        "projects",
    ]));

    let config = runner.stash_config().unwrap();

    assert_eq!(config.connection.protocol, "https");
    assert_eq!(config.connection.hostname, "stash.local");
    assert_eq!(config.connection.port, Some(7990));
    assert_eq!(config.page_limit, Some(100));
    assert_eq!(
        config.connection.base_url().unwrap().as_str(),
        "https://stash.local:7990/rest/api/1.0/"
    );
}

#[test]
fn test_flags_override_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "connection:\n  hostname: from-file.local\n  user: alice\npage_limit: 25"
    )
    .unwrap();

    let runner = Runner::new(parse(&[
        "--config",
        file.path().to_str().unwrap(),
        "--host",
        "from-flag.local",
        "tags",
        "PRJ",
        "app",
    ]));
    let config = runner.stash_config().unwrap();

    assert_eq!(config.connection.hostname, "from-flag.local");
    assert_eq!(config.connection.user.as_deref(), Some("alice"));
    assert_eq!(config.page_limit, Some(25));
}

#[test]
fn test_config_requires_host() {
    let runner = Runner::new(Cli {
        host: None,
        config: None,
        ..parse(&["projects"])
    });
    assert!(runner.stash_config().is_err());
}
