// gitlab-mirror: GitLab repository backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the command line.
//!
//! Parses realistic argument lists and drives them through configuration
//! loading and the `sync`/`list` handlers.

use clap::Parser;
use gitlab_mirror::cli::{Cli, Command};
use gitlab_mirror::cmd::config::load_config;
use gitlab_mirror::cmd::list::run_list_command;
use gitlab_mirror::cmd::sync::run_sync_command;
use gitlab_mirror::config::types::{CloneTransport, RetryMode};
use gitlab_mirror::gitlab::Selector;
use gitlab_mirror::sync::SyncSettings;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Command as Process;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["gitlab-mirror", "--no-default-config"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn git(args: &[&str], cwd: &Path) {
    let status = Process::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {} failed", args.join(" "));
}

fn upstream(root: &Path) -> PathBuf {
    let path = root.join("remotes").join("api");
    std::fs::create_dir_all(&path).unwrap();
    git(&["init", "-q"], &path);
    git(&["symbolic-ref", "HEAD", "refs/heads/main"], &path);
    std::fs::write(path.join("README.md"), "# api\n").unwrap();
    git(&["add", "README.md"], &path);
    git(&["commit", "-q", "-m", "initial"], &path);
    path
}

async fn serve_project(server: &MockServer, id: u64, url: &Path) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/projects/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "name": "api",
            "path_with_namespace": "team/api",
            "default_branch": "main",
            "ssh_url_to_repo": url.display().to_string(),
            "http_url_to_repo": "",
            "web_url": "https://gitlab.example.com/team/api",
            "empty_repo": false
        })))
        .mount(server)
        .await;
}

// =============================================================================
// Flags to settings
// =============================================================================

#[test]
fn cli_sync_flags_become_settings() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("mirror.toml");
    std::fs::write(
        &file,
        "[gitlab]\nbase_url = \"https://old.example.com\"\n\n[sync]\nselector = \"all\"\nexclude = [\"legacy/**\"]\n",
    )
    .unwrap();

    let cli = parse(&[
        "-c",
        file.to_str().unwrap(),
        "--set",
        "sync.branch=develop",
        "sync",
        "-u",
        "https://gitlab.example.com",
        "-g",
        "platform",
        "-d",
        "/srv/mirror",
        "-b",
        "release",
        "-t",
        "https",
        "-x",
        "platform/sandbox-*",
        "-x",
        "platform/tmp/**",
    ]);
    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync command");
    };

    let config = load_config(
        &cli.global,
        &args.to_config_overrides(),
        &args.target.exclude,
    )
    .unwrap();
    assert_eq!(config.gitlab.base_url, "https://gitlab.example.com");
    assert_eq!(
        config.sync.exclude,
        vec!["platform/sandbox-*", "platform/tmp/**"]
    );

    let settings = SyncSettings::from_config(&config.sync).unwrap();
    assert_eq!(settings.selector, Selector::Group("platform".to_string()));
    assert_eq!(settings.backup_root, PathBuf::from("/srv/mirror"));
    assert_eq!(settings.branch.as_deref(), Some("release"));
    assert_eq!(settings.transport, CloneTransport::Https);
}

#[test]
fn cli_config_file_values_survive_without_flags() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("mirror.toml");
    std::fs::write(
        &file,
        "[sync]\nselector = \"project:9\"\nretry = \"auto\"\nexclude = [\"legacy/**\"]\n",
    )
    .unwrap();

    let cli = parse(&["-c", file.to_str().unwrap(), "sync", "-n"]);
    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync command");
    };
    assert!(args.non_interactive);

    let config = load_config(
        &cli.global,
        &args.to_config_overrides(),
        &args.target.exclude,
    )
    .unwrap();
    assert_eq!(config.sync.selector, "project:9");
    assert_eq!(config.sync.retry, RetryMode::Auto);
    assert_eq!(config.sync.exclude, vec!["legacy/**"]);
}

#[test]
fn cli_help_lists_commands() {
    let err = Cli::try_parse_from(["gitlab-mirror", "--help"]).unwrap_err();
    let help = err.to_string();
    for command in ["sync", "list", "options", "config-files", "version"] {
        assert!(help.contains(command), "help is missing '{command}'");
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[tokio::test]
async fn cli_sync_mirrors_a_project() {
    let temp = TempDir::new().unwrap();
    let remote = upstream(temp.path());
    let backup = temp.path().join("backup");
    let server = MockServer::start().await;
    serve_project(&server, 5, &remote).await;

    let uri = server.uri();
    let backup_arg = backup.display().to_string();
    let cli = parse(&[
        "sync",
        "-u",
        &uri,
        "-p",
        "5",
        "-d",
        &backup_arg,
        "-n",
        "--no-progress",
        "--retry",
        "never",
    ]);
    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync command");
    };
    let config = load_config(
        &cli.global,
        &args.to_config_overrides(),
        &args.target.exclude,
    )
    .unwrap();

    run_sync_command(&args, config.clone()).await.unwrap();
    assert!(backup.join("team/api/README.md").exists());
    assert!(backup.join("tmp/gitlab-projects.json").exists());

    run_sync_command(&args, config).await.unwrap();
    let log = std::fs::read_to_string(backup.join("tmp/log")).unwrap();
    assert!(log.contains("team/api (#5): cloned into"));
    assert!(log.contains("team/api (#5): updated branch main"));
    assert_eq!(log.matches("- BACKUP:").count(), 2);
}

#[tokio::test]
async fn cli_sync_fails_when_repositories_stay_broken() {
    let temp = TempDir::new().unwrap();
    let backup = temp.path().join("backup");
    let server = MockServer::start().await;
    serve_project(&server, 6, &temp.path().join("remotes").join("missing")).await;

    let uri = server.uri();
    let backup_arg = backup.display().to_string();
    let cli = parse(&[
        "sync",
        "-u",
        &uri,
        "-p",
        "6",
        "-d",
        &backup_arg,
        "-n",
        "--no-progress",
        "--retry",
        "auto",
        "--max-retries",
        "2",
    ]);
    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync command");
    };
    let config = load_config(
        &cli.global,
        &args.to_config_overrides(),
        &args.target.exclude,
    )
    .unwrap();

    let err = run_sync_command(&args, config).await.unwrap_err();
    assert!(
        err.to_string()
            .starts_with("1 repositories could not be mirrored")
    );

    let log = std::fs::read_to_string(backup.join("tmp/log")).unwrap();
    assert_eq!(log.matches("- EXCEPTION:").count(), 3);
}

#[tokio::test]
async fn cli_sync_requires_backup_dir_when_non_interactive() {
    let cli = parse(&["sync", "-u", "https://gitlab.example.com", "-a", "-n"]);
    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync command");
    };
    let config = load_config(
        &cli.global,
        &args.to_config_overrides(),
        &args.target.exclude,
    )
    .unwrap();

    let err = run_sync_command(&args, config).await.unwrap_err();
    assert!(format!("{err:#}").contains("'backup_root'"));
}

#[tokio::test]
async fn cli_list_prints_catalog() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    serve_project(&server, 5, &temp.path().join("remotes").join("api")).await;

    let uri = server.uri();
    let cli = parse(&["list", "-u", &uri, "-p", "5", "--json", "-n"]);
    let Some(Command::List(args)) = cli.command else {
        panic!("expected list command");
    };
    let config = load_config(&cli.global, &args.target.to_config_overrides(), &[]).unwrap();

    run_list_command(&args, config).await.unwrap();
}

#[tokio::test]
async fn cli_list_requires_selector() {
    let cli = parse(&["list", "-u", "https://gitlab.example.com", "-n"]);
    let Some(Command::List(args)) = cli.command else {
        panic!("expected list command");
    };
    let config = load_config(&cli.global, &args.target.to_config_overrides(), &[]).unwrap();

    let err = run_list_command(&args, config).await.unwrap_err();
    assert!(format!("{err:#}").contains("'selector'"));
}
