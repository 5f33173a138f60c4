//! End-to-end runs of the binary against a mocked HydroShare server.

use assert_cmd::prelude::*;
use hstools::auth::{BasicCredentialRecord, BasicCredentials};
use hstools::configuration::Configuration;
use mockito::{Matcher, ServerGuard};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use url::Url;

struct Workspace {
    config_dir: TempDir,
    home: TempDir,
    downloads: TempDir,
}

impl Workspace {
    /// Configuration pointing at `server` with valid basic credentials
    fn new(server: &ServerGuard) -> Self {
        let workspace = Self {
            config_dir: tempfile::tempdir().unwrap(),
            home: tempfile::tempdir().unwrap(),
            downloads: tempfile::tempdir().unwrap(),
        };

        let basic = workspace.home.path().join(".hs_auth_basic");
        BasicCredentials::new(&basic)
            .store(&BasicCredentialRecord {
                usr: "jdoe".to_string(),
                pwd: "secret".to_string(),
            })
            .unwrap();

        let mut configuration = Configuration::default();
        configuration.set_api_url(&Url::parse(&format!("{}/hsapi/", server.url())).unwrap());
        configuration.set_basic_credentials(Some(basic));
        configuration.set_oauth_credentials(Some(workspace.home.path().join(".hs_auth")));
        configuration
            .save(&workspace.config_dir.path().join("config.yml"))
            .unwrap();
        workspace
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("hstools").unwrap();
        cmd.env("HSTOOLS_CONFIG_DIR", self.config_dir.path())
            .env("HOME", self.home.path())
            .env("JUPYTER_DOWNLOADS", self.downloads.path())
            .env_remove("RUST_LOG")
            .current_dir(self.downloads.path());
        cmd
    }

    fn file(&self, name: &str) -> PathBuf {
        let path = self.downloads.path().join(name);
        std::fs::write(&path, b"x,y\n1,2\n").unwrap();
        path
    }
}

fn mock_user_info(server: &mut ServerGuard) {
    server
        .mock("GET", "/hsapi/userInfo/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"username": "jdoe"}"#)
        .create();
}

#[test]
fn test_list_prints_owned_resources() {
    let mut server = mockito::Server::new();
    mock_user_info(&mut server);
    let listing = server
        .mock("GET", "/hsapi/resource/")
        .match_query(Matcher::UrlEncoded("owner".into(), "jdoe".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"count": 1, "next": null, "previous": null, "results": [
                {"resource_id": "abc123", "resource_title": "Snow water equivalent", "creator": "jdoe"}
            ]}"#,
        )
        .expect(1)
        .create();
    let workspace = Workspace::new(&server);

    workspace
        .command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("abc123"))
        .stdout(predicate::str::contains("Snow water equivalent"));
    listing.assert();
}

#[test]
fn test_missing_credentials_exit_with_auth_error() {
    let server = mockito::Server::new();
    let workspace = Workspace::new(&server);
    std::fs::remove_file(workspace.home.path().join(".hs_auth_basic")).unwrap();

    workspace
        .command()
        .args(["delete", "abc123"])
        .assert()
        .code(100)
        .stderr(predicate::str::contains("ERROR: authentication with HydroShare failed"));
}

#[test]
fn test_missing_download_dir_exits_with_config_error() {
    let server = mockito::Server::new();
    let workspace = Workspace::new(&server);
    let missing: &Path = &workspace.downloads.path().join("nowhere");

    workspace
        .command()
        .args(["get", "abc123", "--force", "-d"])
        .arg(missing)
        .assert()
        .code(78)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_delete_continues_after_failure() {
    let mut server = mockito::Server::new();
    mock_user_info(&mut server);
    server
        .mock("DELETE", "/hsapi/resource/missing/")
        .with_status(404)
        .create();
    let deleted = server
        .mock("DELETE", "/hsapi/resource/abc123/")
        .with_status(204)
        .expect(1)
        .create();
    let workspace = Workspace::new(&server);

    workspace
        .command()
        .args(["delete", "missing", "abc123"])
        .assert()
        .code(102)
        .stdout(predicate::str::contains("Deleted resource"))
        .stdout(predicate::str::contains("abc123"))
        .stderr(predicate::str::contains("1 of 2 resource(s) failed"));
    deleted.assert();
}

#[test]
fn test_create_with_missing_file_exits_with_no_input() {
    let mut server = mockito::Server::new();
    mock_user_info(&mut server);
    let create = server.mock("POST", "/hsapi/resource/").expect(0).create();
    let workspace = Workspace::new(&server);
    let present = workspace.file("present.csv");

    workspace
        .command()
        .args(["create", "--title", "T", "--abstract", "A"])
        .arg(present)
        .arg("missing.csv")
        .assert()
        .code(66)
        .stderr(predicate::str::contains("missing.csv"));
    create.assert();
}

#[test]
fn test_create_partial_failure_reports_resource() {
    let mut server = mockito::Server::new();
    mock_user_info(&mut server);
    server
        .mock("GET", "/hsapi/resource/types/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"resource_type": "CompositeResource"}]"#)
        .create();
    server
        .mock("POST", "/hsapi/resource/")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"resource_id": "abc123"}"#)
        .create();
    server
        .mock("POST", "/hsapi/resource/abc123/files/")
        .with_status(500)
        .create();
    let workspace = Workspace::new(&server);
    let first = workspace.file("a.csv");
    let second = workspace.file("b.csv");

    workspace
        .command()
        .args(["create", "-t", "Title", "-a", "Abstract"])
        .arg(first)
        .arg(second)
        .assert()
        .code(103)
        .stdout(predicate::str::contains("abc123"))
        .stderr(predicate::str::contains("resource abc123 was created"));
}
