use omictl::core::config::ConfigLoader;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_omictl_env() {
    for v in &[
        "OMICTL_AWS_REGION",
        "OMICTL_AWS_BUCKET",
        "OMICTL_AWS_ROLE",
        "OMICTL_AWS_ACCOUNT_ID",
    ] {
        env::remove_var(v);
    }
}

/// Config loading end to end: file values, derived staging URI, overrides.
#[test]
#[serial]
fn test_config_loading_integration() {
    clear_omictl_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[aws]
region = "eu-west-2"
bucket = "lab-staging"
role = "LabOmicsRole"
account_id = "210987654321"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(&config_path).unwrap();
    assert_eq!(config.region(), "eu-west-2");
    assert_eq!(config.bucket(), "lab-staging");
    assert_eq!(config.role(), "LabOmicsRole");
    assert_eq!(config.staging_uri(), "s3://lab-staging");
    assert_eq!(config.require_account_id().unwrap(), "210987654321");
}

#[test]
#[serial]
fn test_each_required_key_gets_its_own_message() {
    clear_omictl_env();
    let temp_dir = TempDir::new().unwrap();

    for (body, missing) in [
        ("[aws]\nbucket = \"b\"\nrole = \"r\"\n", "region"),
        ("[aws]\nregion = \"us-east-1\"\nrole = \"r\"\n", "bucket"),
        ("[aws]\nregion = \"us-east-1\"\nbucket = \"b\"\n", "role"),
    ] {
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, body).unwrap();
        let err = ConfigLoader::load(&config_path).unwrap_err();
        assert!(
            err.to_string().contains(&format!("AWS {} not found", missing)),
            "expected message naming '{}', got: {}",
            missing,
            err
        );
    }
}

#[test]
#[serial]
fn test_env_overrides_take_precedence() {
    clear_omictl_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[aws]
region = "us-east-1"
bucket = "file-bucket"
role = "FileRole"
"#,
    )
    .unwrap();

    env::set_var("OMICTL_AWS_REGION", "ap-southeast-2");
    let config = ConfigLoader::load(&config_path).unwrap();
    assert_eq!(config.region(), "ap-southeast-2");
    assert_eq!(config.bucket(), "file-bucket");

    clear_omictl_env();
}

#[test]
#[serial]
fn test_env_can_complete_a_partial_file() {
    clear_omictl_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[aws]\nregion = \"us-east-1\"\n").unwrap();

    env::set_var("OMICTL_AWS_BUCKET", "env-bucket");
    env::set_var("OMICTL_AWS_ROLE", "EnvRole");
    let config = ConfigLoader::load(&config_path).unwrap();
    assert_eq!(config.bucket(), "env-bucket");
    assert_eq!(config.role(), "EnvRole");

    clear_omictl_env();
}
