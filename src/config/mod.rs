/// Configuration system for pitchdeck.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::PitchdeckConfig::default()`]
/// 2. **User global config**: `~/.pitchdeck/config.toml`
/// 3. **Project local config**: `.pitchdeck.toml` in the current working directory
/// 4. **Environment variables**: `PITCHDECK_*` overrides (highest precedence)
///
/// Later layers override earlier ones key by key. Keys a TOML file leaves
/// out keep the value from the layer below.
///
/// # Usage
///
/// ```rust,ignore
/// use pitchdeck::config;
///
/// let cfg = config::load();
/// let calc = pitchdeck::pricing::PricingCalculator::from_config(&cfg.pricing)?;
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::PitchdeckConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> PitchdeckConfig {
    let files: Vec<String> = [global_config_path(), project_config_path()]
        .into_iter()
        .flatten()
        .filter_map(|path| fs::read_to_string(path).ok())
        .collect();

    let mut config = layered(files.iter().map(String::as_str));
    apply_env_overrides(&mut config);

    config
}

/// Resolve the built-in defaults overlaid with each TOML layer in turn.
///
/// Layers merge per key, so a project file that only sets
/// `general.client_name` keeps the global `gate.password`. Arrays such as
/// `pricing.tiers` replace the earlier value whole. A malformed layer is
/// skipped and the previous layers stand.
fn layered<'a>(layers: impl IntoIterator<Item = &'a str>) -> PitchdeckConfig {
    let Ok(mut merged) = toml::Value::try_from(PitchdeckConfig::default()) else {
        return PitchdeckConfig::default();
    };

    for content in layers {
        let Ok(layer) = toml::from_str::<toml::Value>(content) else {
            continue;
        };
        if layer.clone().try_into::<PitchdeckConfig>().is_err() {
            continue;
        }
        merge_toml(&mut merged, layer);
    }

    merged.try_into().unwrap_or_default()
}

/// Overlay `overlay` onto `base`: tables merge key by key, anything else
/// replaces.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
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

/// `~/.pitchdeck/`, home of the global config and the activity log.
pub fn state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pitchdeck"))
}

fn global_config_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".pitchdeck.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `PITCHDECK_PASSWORD`: gate password
/// - `PITCHDECK_PREVIEW`: keep the session flag across reloads (`1`/`true`/`yes`/`on`)
/// - `PITCHDECK_ADDR`: server listen address
/// - `PITCHDECK_DATA`: dataset file path
/// - `PITCHDECK_CLIENT`: client name
/// - `PITCHDECK_LOGGING`: activity event log on/off
fn apply_env_overrides(config: &mut PitchdeckConfig) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable source.
fn apply_overrides(config: &mut PitchdeckConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("PITCHDECK_PASSWORD")
        && !val.is_empty()
    {
        config.gate.password = val;
    }
    if let Some(val) = var("PITCHDECK_PREVIEW") {
        config.gate.preview_mode = is_truthy(&val);
    }
    if let Some(val) = var("PITCHDECK_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Some(val) = var("PITCHDECK_DATA")
        && !val.is_empty()
    {
        config.data.path = Some(PathBuf::from(val));
    }
    if let Some(val) = var("PITCHDECK_CLIENT")
        && !val.is_empty()
    {
        config.general.client_name = val;
    }
    if let Some(val) = var("PITCHDECK_LOGGING") {
        config.logging.enabled = is_truthy(&val);
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

/// Write the default annotated config to `~/.pitchdeck/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.pitchdeck/ directory")?;
    }

    fs::write(&path, PitchdeckConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key in the global config file.
///
/// Reads the current global config (or the defaults), updates the dotted key
/// (e.g. `gate.preview_mode`) and writes the result back.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&PitchdeckConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Refuse to write a file the loader would silently discard.
    let text = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<PitchdeckConfig>(&text)
        .with_context(|| format!("'{value}' is not a valid value for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, text).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(_)) => {
            anyhow::bail!("'{key}' is a list; edit the config file directly")
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert((*leaf).to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
