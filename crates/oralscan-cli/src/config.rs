use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use oralscan_classify::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use oralscan_suggest::gemini::DEFAULT_GEMINI_MODEL;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

pub const CLASSIFIER_URL_ENV: &str = "ORALSCAN_CLASSIFIER_URL";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_BEDROCK_MODEL: &str = "us.anthropic.claude-3-5-haiku-20241022-v1:0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OralScanConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub classifier_url: String,
    /// Classification request timeout. Added in v1.
    pub timeout_secs: u64,
    /// Where suggestion text comes from. Added in v2; replaces the flat
    /// `gemini_api_key` field.
    pub suggestions: SuggestionSource,
    /// Default output directory for reports; the working directory if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestionSource {
    Gemini {
        /// Falls back to `GEMINI_API_KEY` when absent.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        api_key: Option<String>,
        model: String,
    },
    Bedrock {
        region: String,
        model_id: String,
    },
    Disabled,
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub classifier_url: String,
    pub timeout_secs: u64,
    pub suggestion_backend: String,
    pub model: Option<String>,
    pub region: Option<String>,
    pub api_key_hint: Option<String>,
    pub report_dir: Option<String>,
    pub created_at: String,
}

impl OralScanConfig {
    pub fn new(created_at: jiff::Timestamp) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            classifier_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            suggestions: SuggestionSource::Gemini {
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
            },
            report_dir: None,
            created_at,
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.oralscan.cli"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config at `path`, or defaults when no file exists yet.
pub fn load_or_default(path: &Path) -> eyre::Result<OralScanConfig> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(OralScanConfig::new(jiff::Timestamp::now()))
    }
}

pub fn load_config(path: &Path) -> eyre::Result<OralScanConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: OralScanConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update OralScan."
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 → v1: add timeout_secs
    if from_version < 1 {
        obj.entry("timeout_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_TIMEOUT.as_secs().into()));
        tracing::info!("migrated config v0 → v1 (added timeout_secs)");
    }

    // v1 → v2: flat gemini_api_key becomes a tagged suggestion source
    if from_version < 2 {
        let api_key = obj
            .remove("gemini_api_key")
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|k| !k.is_empty());
        let mut source = serde_json::json!({
            "type": "gemini",
            "model": DEFAULT_GEMINI_MODEL,
        });
        if let Some(key) = api_key {
            source["api_key"] = serde_json::Value::String(key);
        }
        obj.entry("suggestions").or_insert(source);
        tracing::info!("migrated config v1 → v2 (added suggestions source)");
    }

    obj.insert(
        "config_version".to_string(),
        serde_json::Value::Number(CURRENT_VERSION.into()),
    );

    Ok(json)
}

pub fn save_config(path: &Path, config: &OralScanConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file may hold an API key.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn delete_config(path: &Path) -> eyre::Result<bool> {
    if path.exists() {
        std::fs::remove_file(path)?;
        tracing::info!(path = %path.display(), "config deleted");
        return Ok(true);
    }
    Ok(false)
}

/// Apply environment overrides: `ORALSCAN_CLASSIFIER_URL` replaces the
/// classifier URL, `GEMINI_API_KEY` fills a Gemini source that has no key.
pub fn apply_env_overrides(config: OralScanConfig) -> OralScanConfig {
    apply_overrides(config, |name| std::env::var(name).ok())
}

pub fn apply_overrides(
    mut config: OralScanConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> OralScanConfig {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(CLASSIFIER_URL_ENV) {
        config.classifier_url = url;
    }

    if let SuggestionSource::Gemini { api_key, .. } = &mut config.suggestions
        && api_key.is_none()
    {
        *api_key = non_empty(GEMINI_API_KEY_ENV);
    }

    config
}

pub fn config_info(config: &OralScanConfig) -> ConfigInfo {
    let (suggestion_backend, model, region, api_key_hint) = match &config.suggestions {
        SuggestionSource::Gemini { api_key, model } => (
            "gemini".to_string(),
            Some(model.clone()),
            None,
            api_key.as_deref().map(redact_api_key),
        ),
        SuggestionSource::Bedrock { region, model_id } => (
            "bedrock".to_string(),
            Some(model_id.clone()),
            Some(region.clone()),
            None,
        ),
        SuggestionSource::Disabled => ("disabled".to_string(), None, None, None),
    };

    ConfigInfo {
        classifier_url: config.classifier_url.clone(),
        timeout_secs: config.timeout_secs,
        suggestion_backend,
        model,
        region,
        api_key_hint,
        report_dir: config.report_dir.as_ref().map(|p| p.display().to_string()),
        created_at: config.created_at.to_string(),
    }
}

fn redact_api_key(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "****".to_string();
    }
    let prefix = &key[..4];
    let suffix = &key[key.len() - 4..];
    format!("{prefix}...{suffix}")
}
