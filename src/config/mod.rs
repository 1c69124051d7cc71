/// Configuration system for alertdash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::DashConfig::default()`]
/// 2. **User global config** — `~/.alertdash/config.toml`
/// 3. **Project local config** — `.alertdash.toml` in the current working directory
/// 4. **Environment variables** — `ALERTDASH_*` overrides (highest precedence)
///
/// Later layers override earlier ones at the key level: the TOML files are
/// deep-merged as `toml::Value` trees before deserialization, so a project
/// file that only sets `[dashboard] pool_size` keeps the global API key.
///
/// # Usage
///
/// ```rust,ignore
/// let cfg = alertdash::config::load();
/// let chat = ChatService::from_config(&cfg.llm);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::DashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars. Malformed files
/// are skipped with a warning rather than aborting startup.
pub fn load() -> DashConfig {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    for path in [global_config_path(), project_config_path()].into_iter().flatten() {
        if let Some(layer) = load_toml_value(&path) {
            merge_values(&mut merged, layer);
        }
    }

    let mut config: DashConfig = merged.try_into().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config files do not match the schema, using defaults");
        DashConfig::default()
    });

    apply_env_overrides(&mut config);
    config
}

/// Read a TOML file as a raw value tree.
///
/// Returns `None` if the file doesn't exist or fails to parse.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

/// Deep-merge `overlay` into `base`. Tables merge key by key; any other
/// value in the overlay replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.alertdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".alertdash").join("config.toml"))
}

/// Path to the project local config: `.alertdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".alertdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `ALERTDASH_ADDR` — listen address
/// - `ALERTDASH_API_KEY` — completion API credential
/// - `ALERTDASH_LLM_URL` — completion API base URL
/// - `ALERTDASH_LLM_MODEL` — model identifier
/// - `ALERTDASH_LLM_TIMEOUT_MS` — completion request timeout
/// - `ALERTDASH_DOCUMENT_URL` — shared link of the reference document
fn apply_env_overrides(config: &mut DashConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from any `key -> value` source. Empty values are ignored.
fn apply_overrides(config: &mut DashConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(val) = get("ALERTDASH_ADDR") {
        config.server.addr = val;
    }
    if let Some(val) = get("ALERTDASH_API_KEY") {
        config.llm.api_key = val;
    }
    if let Some(val) = get("ALERTDASH_LLM_URL") {
        config.llm.base_url = val;
    }
    if let Some(val) = get("ALERTDASH_LLM_MODEL") {
        config.llm.model = val;
    }
    if let Some(val) = get("ALERTDASH_LLM_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.llm.timeout_ms = Some(ms);
    }
    if let Some(val) = get("ALERTDASH_DOCUMENT_URL") {
        config.document.url = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.alertdash/config.toml`.
///
/// Returns an error if the file already exists and `force` is false.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.alertdash/ directory")?;
    }

    fs::write(&path, DashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single dotted key (e.g. `llm.model`) in the global config file.
///
/// Starts from the existing file, or from serialized defaults when there is
/// none, so the value type of the key is known.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&DashConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let _: DashConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// Keys that do not exist yet inside an existing section are stored as strings,
/// except the optional timeouts which are integers.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("config key must look like 'section.key', got '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => parse_integer(key, raw_value)?,
        None if leaf == "timeout_ms" => parse_integer(key, raw_value)?,
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

fn parse_integer(key: &str, raw_value: &str) -> Result<toml::Value> {
    let n: i64 = raw_value
        .parse()
        .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
    Ok(toml::Value::Integer(n))
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective config as TOML, with the API key masked.
pub fn show_effective_config() -> Result<String> {
    let config = load().redacted();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn overrides_apply_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("ALERTDASH_API_KEY", "sk-env"),
            ("ALERTDASH_LLM_MODEL", "deepseek-reasoner"),
            ("ALERTDASH_LLM_TIMEOUT_MS", "2500"),
            ("ALERTDASH_ADDR", ""),
        ]
        .into_iter()
        .collect();

        let mut config = DashConfig::default();
        apply_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key, "sk-env");
        assert_eq!(config.llm.model, "deepseek-reasoner");
        assert_eq!(config.llm.timeout_ms, Some(2500));
        // Empty values leave the default in place.
        assert_eq!(config.server.addr, "127.0.0.1:8501");
    }

    #[test]
    fn invalid_timeout_override_is_ignored() {
        let mut config = DashConfig::default();
        apply_overrides(&mut config, |k| {
            (k == "ALERTDASH_LLM_TIMEOUT_MS").then(|| "soon".to_string())
        });
        assert!(config.llm.timeout_ms.is_none());
    }

    #[test]
    fn merge_keeps_keys_from_lower_layers() {
        let mut base: toml::Value = toml::from_str(
            r#"
[llm]
api_key = "sk-global"
model = "deepseek-chat"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[llm]
model = "other-model"

[dashboard]
pool_size = 12
"#,
        )
        .unwrap();

        merge_values(&mut base, overlay);
        let config: DashConfig = base.try_into().unwrap();
        assert_eq!(config.llm.api_key, "sk-global");
        assert_eq!(config.llm.model, "other-model");
        assert_eq!(config.dashboard.pool_size, 12);
        assert_eq!(config.dashboard.sample_size, 5);
    }

    #[test]
    fn set_toml_value_updates_typed_values() {
        let mut root: toml::Value = toml::from_str(
            r#"
[server]
open_browser = false

[dashboard]
pool_size = 300

[llm]
temperature = 0.7
model = "deepseek-chat"
"#,
        )
        .unwrap();

        set_toml_value(&mut root, "server.open_browser", "yes").unwrap();
        set_toml_value(&mut root, "dashboard.pool_size", "42").unwrap();
        set_toml_value(&mut root, "llm.temperature", "0.2").unwrap();
        set_toml_value(&mut root, "llm.model", "m").unwrap();
        set_toml_value(&mut root, "llm.timeout_ms", "900").unwrap();

        assert_eq!(root["server"]["open_browser"].as_bool(), Some(true));
        assert_eq!(root["dashboard"]["pool_size"].as_integer(), Some(42));
        assert!((root["llm"]["temperature"].as_float().unwrap() - 0.2).abs() < f64::EPSILON);
        assert_eq!(root["llm"]["model"].as_str(), Some("m"));
        assert_eq!(root["llm"]["timeout_ms"].as_integer(), Some(900));
    }

    #[test]
    fn set_toml_value_rejects_bad_input() {
        let mut root: toml::Value = toml::from_str("[dashboard]\npool_size = 300\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "dashboard.pool_size", "many").is_err());
        assert!(set_toml_value(&mut root, "dashboard", "1").is_err());
    }
}
