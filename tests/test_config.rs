mod common;

use ferroscan::Settings;
use ferroscan::config::{DEFAULT_API_URL, DEFAULT_MODELS};

use common::*;

#[test]
fn defaults_match_the_published_models() -> anyhow::Result<()> {
    let settings = Settings::default();
    assert_eq!(settings.api_url, DEFAULT_API_URL);
    assert_eq!(settings.models.len(), 3);
    assert_eq!(settings.models[0].as_str(), DEFAULT_MODELS[0]);

    let config = settings.default_configuration()?;
    assert_eq!(config.model_id.as_str(), "encre-ferrogallique-2-wy9md/5");
    assert_eq!(config.confidence_threshold, ConfidenceThreshold::default());
    Ok(())
}

#[test]
fn partial_yaml_fills_in_defaults() -> anyhow::Result<()> {
    let settings = Settings::from_yaml(
        "confidence_threshold: 0.6\nmodels:\n  - manuscripts/7\n  - manuscripts/6\n",
    )?;

    assert_eq!(settings.api_url, DEFAULT_API_URL);
    assert_eq!(settings.timeout_secs, 30);
    assert!(settings.api_key.is_none());

    let config = settings.default_configuration()?;
    assert_eq!(config.model_id, ModelId::new("manuscripts/7"));
    assert_eq!(config.confidence_threshold.value(), 0.6);
    Ok(())
}

#[test]
fn invalid_settings_are_rejected() {
    for yaml in [
        "confidence_threshold: 1.5\n",
        "models: []\n",
        "timeout_secs: 0\n",
        "models: not-a-list\n",
    ] {
        let result = Settings::from_yaml(yaml);
        assert!(matches!(result, Err(Error::Config(_))), "{yaml:?} should be rejected");
    }
}

#[test]
fn load_reads_explicit_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, "api_url: http://localhost:9001\napi_key: file-key\n")?;

    let settings = Settings::load(Some(path.as_path()))?;
    assert_eq!(settings.api_url, "http://localhost:9001");
    assert_eq!(settings.api_key.as_deref(), Some("file-key"));
    Ok(())
}

#[test]
fn missing_explicit_file_is_an_error() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let result = Settings::load(Some(dir.path().join("absent.yaml").as_path()));
    assert!(matches!(result, Err(Error::Config(_))));
    Ok(())
}
