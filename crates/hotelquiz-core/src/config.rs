//! Application configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, DEFAULT_TIME_LIMIT_SECS};
use crate::traits::{SpeechParams, PREFERRED_VOICES};

/// Language of the presentation strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        })
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ja" => Ok(Locale::Ja),
            "en" => Ok(Locale::En),
            other => Err(format!("unknown locale: {other} (expected ja or en)")),
        }
    }
}

/// `[speech]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub preferred_voices: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        let params = SpeechParams::default();
        Self {
            lang: params.lang,
            rate: params.rate,
            pitch: params.pitch,
            volume: params.volume,
            preferred_voices: PREFERRED_VOICES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl SpeechConfig {
    pub fn params(&self) -> SpeechParams {
        SpeechParams {
            lang: self.lang.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}

/// Top-level hotelquiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelQuizConfig {
    /// Seconds allowed per question.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u32,
    /// Bank file or directory. The built-in bank is used when unset.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    #[serde(default = "default_progress_path")]
    pub progress_path: PathBuf,
    #[serde(default)]
    pub locale: Locale,
    /// Fixed shuffle seed, for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_SECS
}
fn default_progress_path() -> PathBuf {
    PathBuf::from("./hotelquiz-progress.json")
}

impl Default for HotelQuizConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit(),
            question_bank: None,
            progress_path: default_progress_path(),
            locale: Locale::default(),
            seed: None,
            speech: SpeechConfig::default(),
        }
    }
}

impl HotelQuizConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            time_limit_secs: self.time_limit_secs,
        }
    }

    /// Reject values the engine or a speech backend cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.time_limit_secs == 0 {
            anyhow::bail!("time_limit_secs must be at least 1");
        }
        let s = &self.speech;
        if !(0.1..=10.0).contains(&s.rate) {
            anyhow::bail!("speech.rate must be within 0.1..=10, got {}", s.rate);
        }
        if !(0.0..=2.0).contains(&s.pitch) {
            anyhow::bail!("speech.pitch must be within 0..=2, got {}", s.pitch);
        }
        if !(0.0..=1.0).contains(&s.volume) {
            anyhow::bail!("speech.volume must be within 0..=1, got {}", s.volume);
        }
        Ok(())
    }

    /// Apply `HOTELQUIZ_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("HOTELQUIZ_TIME_LIMIT") {
            self.time_limit_secs = v
                .trim()
                .parse()
                .with_context(|| format!("invalid HOTELQUIZ_TIME_LIMIT: {v}"))?;
        }
        if let Some(v) = lookup("HOTELQUIZ_PROGRESS_PATH") {
            self.progress_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("HOTELQUIZ_LOCALE") {
            self.locale = v.parse().map_err(anyhow::Error::msg)?;
        }
        Ok(())
    }

    fn resolve_paths(&mut self) {
        self.progress_path = resolve_env_path(&self.progress_path);
        self.question_bank = self.question_bank.as_deref().map(resolve_env_path);
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Expand `${NAME}` references once. Substituted values are not rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_env_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Parse a config from TOML text without touching the environment.
pub fn parse_config(content: &str) -> Result<HotelQuizConfig> {
    let config: HotelQuizConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `hotelquiz.toml` in the current directory
/// 2. `~/.config/hotelquiz/config.toml`
///
/// Environment variable overrides: `HOTELQUIZ_TIME_LIMIT`,
/// `HOTELQUIZ_PROGRESS_PATH`, `HOTELQUIZ_LOCALE`.
pub fn load_config_from(path: Option<&Path>) -> Result<HotelQuizConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("hotelquiz.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => HotelQuizConfig::default(),
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.resolve_paths();
    config.validate()?;

    tracing::debug!(
        source = %config_path.as_deref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".into()),
        time_limit = config.time_limit_secs,
        locale = %config.locale,
        "configuration loaded"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("hotelquiz"))
}

/// Sample configuration written by `hotelquiz init`.
pub fn sample_config() -> &'static str {
    r#"# hotelquiz configuration

# Seconds allowed per question.
time_limit_secs = 30

# Bank file or directory; the built-in hotel bank is used when unset.
# question_bank = "./banks"

progress_path = "./hotelquiz-progress.json"

# Presentation language: "ja" or "en".
locale = "ja"

# Fix the shuffle for reproducible sessions.
# seed = 42

[speech]
lang = "en-US"
rate = 0.8
pitch = 1.0
volume = 1.0
preferred_voices = ["Microsoft Zira", "Google US English", "Alex", "Samantha"]
"#
}
