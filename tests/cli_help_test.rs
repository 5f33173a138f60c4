#[cfg(test)]
mod cli_help_tests {
    use assert_cmd::prelude::*;
    use predicates::prelude::*;
    use std::process::Command;

    fn hstools(config_dir: &std::path::Path) -> Command {
        let mut cmd = Command::cargo_bin("hstools").unwrap();
        cmd.env("HSTOOLS_CONFIG_DIR", config_dir)
            .env_remove("JUPYTER_DOWNLOADS")
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_cli_help_output() {
        let config_dir = tempfile::tempdir().unwrap();
        let assert_result = hstools(config_dir.path()).arg("--help").assert().success();
        let output = assert_result.get_output();
        let help_output = String::from_utf8_lossy(&output.stdout);

        assert!(help_output.contains("Usage:"));
        assert!(help_output.contains("Commands:"));
        for command in ["list", "describe", "delete", "get", "create", "add", "config"] {
            assert!(help_output.contains(command), "missing command {}", command);
        }
        assert!(help_output.contains("-v, --verbose"));
        assert!(help_output.contains("-V, --version"));
        assert!(help_output.contains("hstools"));
    }

    #[test]
    fn test_cli_version_output() {
        let config_dir = tempfile::tempdir().unwrap();
        hstools(config_dir.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("hstools "));
    }

    #[test]
    fn test_list_help_names_filters() {
        let config_dir = tempfile::tempdir().unwrap();
        hstools(config_dir.path())
            .args(["list", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--filter"))
            .stdout(predicate::str::contains("editable"));
    }

    #[test]
    fn test_no_arguments_prints_help() {
        let config_dir = tempfile::tempdir().unwrap();
        hstools(config_dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage:"));
    }

    #[test]
    fn test_invalid_filter_is_usage_error() {
        let config_dir = tempfile::tempdir().unwrap();
        hstools(config_dir.path())
            .args(["list", "--filter", "color=red"])
            .assert()
            .code(64)
            .stderr(predicate::str::contains("ERROR: invalid filter: color=red"));
    }

    #[test]
    fn test_config_path_honors_environment() {
        let config_dir = tempfile::tempdir().unwrap();
        let expected = config_dir.path().join("config.yml");
        hstools(config_dir.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected.display().to_string()));
    }

    #[test]
    fn test_config_show_creates_default_configuration() {
        let config_dir = tempfile::tempdir().unwrap();
        hstools(config_dir.path())
            .args(["config", "show", "-f", "json"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("{"));
        assert!(config_dir.path().join("config.yml").exists());
    }
}
