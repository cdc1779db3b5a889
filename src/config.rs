use serde::{Deserialize, Serialize};
use std::fs;
use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::capture::FacingMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub gemini_config: GeminiConfig,
    #[serde(default)]
    pub geocode_config: GeocodeConfig,
    #[serde(default)]
    pub camera_config: CameraConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    12393
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    /// May be left out and supplied through `GEMINI_API_KEY` instead.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_vision_model() -> String {
    "gemini-1.5-flash".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeConfig {
    #[serde(default = "default_geocode_base_url")]
    pub base_url: String,
    #[serde(default = "default_locality_language")]
    pub locality_language: String,
}

fn default_geocode_base_url() -> String {
    "https://api.bigdatacloud.net".to_string()
}

fn default_locality_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Directory holding `front.*` and `back.*` stills for the image-directory camera
    #[serde(default = "default_device_dir")]
    pub device_dir: String,
    #[serde(default)]
    pub default_facing_mode: FacingMode,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_device_dir() -> String {
    "camera".to_string()
}

fn default_jpeg_quality() -> u8 {
    85
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Parse configuration text, picking JSON or YAML by the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);

        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }
}

impl GeminiConfig {
    /// The configured credential, or `GEMINI_API_KEY` from the environment.
    /// Blank values and unresolved `${VAR}` placeholders count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| is_usable_key(k)) {
            return Some(key.trim().to_string());
        }

        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if is_usable_key(&key) => Some(key.trim().to_string()),
            _ => {
                debug!("No Gemini API key in config or environment");
                None
            }
        }
    }
}

fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !(key.starts_with("${") && key.ends_with('}'))
}

/// Replace `${VAR_NAME}` with the environment value, leaving unknown variables as-is.
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static pattern");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            api_key: None,
        }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocode_base_url(),
            locality_language: default_locality_language(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_dir: default_device_dir(),
            default_facing_mode: FacingMode::default(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}
