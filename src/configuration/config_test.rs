extern crate tempdir;

use anyhow::Result;
use once_cell::sync::Lazy;
use tempdir::TempDir;
use tokio::sync::Mutex;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

// Config is process-wide, so tests that load it take turns.
static LOAD_LOCK: Lazy<Mutex<()>> = Lazy::new(|| return Mutex::new(()));

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    assert!(res.contains("api-url = \"http://localhost:8000\""));
    assert!(res.contains("[possible values: claude, openai]\nmodel = \"claude\""));
    assert!(res.contains("# username = \"\""));
    assert!(res.contains("session-file = "));
    assert!(!res.contains("config-file"));
}

#[test]
fn it_uses_kebab_case_keys() {
    assert_eq!(ConfigKey::ApiURL.to_string(), "api-url");
    assert_eq!(ConfigKey::SessionFile.to_string(), "session-file");
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let matches =
        cli::build().try_get_matches_from(vec!["ragdesk", "-c", "./config.example.toml"])?;
    Config::load(cli::build(), vec![&matches]).await?;

    assert_eq!(Config::get(ConfigKey::ApiURL), "http://localhost:8000");
    assert_eq!(Config::get(ConfigKey::Model), "claude");
    return Ok(());
}

#[tokio::test]
async fn it_prefers_flags_over_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let tmp_dir = TempDir::new("ragdesk")?;
    let config_path = tmp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "api-url = \"http://rag.internal:9000\"\nmodel = \"openai\"\n",
    )?;
    let config_path = config_path.to_string_lossy().to_string();

    let matches = cli::build().try_get_matches_from(vec!["ragdesk", "-c", &config_path])?;
    Config::load(cli::build(), vec![&matches]).await?;
    assert_eq!(Config::get(ConfigKey::ApiURL), "http://rag.internal:9000");
    assert_eq!(Config::get(ConfigKey::Model), "openai");

    let matches = cli::build().try_get_matches_from(vec![
        "ragdesk",
        "-c",
        &config_path,
        "--api-url",
        "http://flag:8000",
    ])?;
    Config::load(cli::build(), vec![&matches]).await?;
    assert_eq!(Config::get(ConfigKey::ApiURL), "http://flag:8000");
    assert_eq!(Config::get(ConfigKey::Model), "openai");
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let matches =
        cli::build().try_get_matches_from(vec!["ragdesk", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}
