//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$QUADGEN_CONFIG` environment variable
//! 2. `~/.config/quadgen/config.toml`
//! 3. Built-in defaults (everything is optional)
//!
//! The API key is never stored in the config file; `[llm].api_key_env`
//! names the environment variable to read it from.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub plot: PlotConfig,
    pub extract: ExtractConfig,
}

/// LLM endpoint settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL.
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Temperature for question extraction (low: faithful transcription).
    pub extract_temperature: f64,
    /// Temperature for question generation (high: variety).
    pub generate_temperature: f64,
}

/// Graph rendering settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Directory graph images are written to.
    pub output_dir: String,
    /// Sample points per curve.
    pub samples: usize,
    pub width: u32,
    pub height: u32,
}

/// PDF extraction settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Directory per-page LLM output is written to.
    pub output_dir: String,
    /// Maximum pages per document to send to the LLM.
    pub max_pages: usize,
}

// --- Defaults ---

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: quadgen_llm::client::DEFAULT_BASE_URL.into(),
            model: quadgen_llm::client::DEFAULT_MODEL.into(),
            api_key_env: "API_KEY".into(),
            extract_temperature: 0.1,
            generate_temperature: 0.8,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: "graphs".into(),
            samples: 400,
            width: 800,
            height: 600,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: "output_text".into(),
            max_pages: 6,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => bail!(
                "no API key: set the {} environment variable",
                self.api_key_env
            ),
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    let path = config_path();

    if let Some(p) = &path {
        if p.exists() {
            let content =
                std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| format!("parsing {}", p.display()))?;
            return Ok(config);
        }
    }

    Ok(Config::default())
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("QUADGEN_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // 2. ~/.config/quadgen/config.toml
    directories::ProjectDirs::from("dev", "quadgen", "quadgen")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Show the active config path (for `quadgen config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.extract_temperature, 0.1);
        assert_eq!(config.plot.samples, 400);
        assert_eq!(config.extract.max_pages, 6);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[plot]
output_dir = "out/graphs"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.plot.output_dir, "out/graphs");
        // Other fields should be defaults
        assert_eq!(config.plot.samples, 400);
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[llm]
base_url = "https://llm.internal/v1"
model = "gpt-4o-mini"
api_key_env = "MY_KEY"
extract_temperature = 0.0
generate_temperature = 0.9

[plot]
output_dir = "graphs"
samples = 200
width = 1024
height = 768

[extract]
output_dir = "pages"
max_pages = 3
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.base_url, "https://llm.internal/v1");
        assert_eq!(config.llm.api_key_env, "MY_KEY");
        assert_eq!(config.plot.width, 1024);
        assert_eq!(config.extract.max_pages, 3);
    }

    #[test]
    fn test_api_key_missing_is_error() {
        let llm = LlmConfig {
            api_key_env: "QUADGEN_TEST_KEY_THAT_IS_NOT_SET".into(),
            ..LlmConfig::default()
        };
        assert!(llm.api_key().is_err());
    }
}
